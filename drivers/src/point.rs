/*++

Licensed under the Apache-2.0 license.

File Name:

    point.rs

Abstract:

    File contains Jacobian point arithmetic for short Weierstrass curves
    with a = -3. Coordinates are Montgomery residues; Z = 0 is the identity.

--*/

use crate::arena::{Arena, Slot};
use crate::ecc::EccSession;
use crate::engine::BignumEngine;
use crate::mont::Montgomery;
use crate::{CasperError, CasperResult};

/// Point `(X : Y : Z)` standing for the affine point `(X / Z^2, Y / Z^3)`
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct JacPoint {
    pub x: Slot,
    pub y: Slot,
    pub z: Slot,
}

impl JacPoint {
    pub(crate) fn alloc<E: BignumEngine>(
        mont: &Montgomery<'_, E>,
        arena: &mut Arena,
    ) -> CasperResult<Self> {
        let [x, y, z] = mont.alloc_array(arena)?;
        Ok(Self { x, y, z })
    }

    fn coords(self) -> [Slot; 3] {
        [self.x, self.y, self.z]
    }

    /// Whether any coordinate of `self` shares storage with one of `other`
    pub fn overlaps(self, other: JacPoint) -> bool {
        self.coords()
            .iter()
            .any(|a| other.coords().iter().any(|b| a.overlaps(*b)))
    }
}

impl<E: BignumEngine> EccSession<'_, E> {
    pub(crate) fn copy_point(&mut self, out: JacPoint, p: JacPoint) -> CasperResult<()> {
        self.mont.copy(out.x, p.x)?;
        self.mont.copy(out.y, p.y)?;
        self.mont.copy(out.z, p.z)
    }

    pub(crate) fn set_identity(&mut self, out: JacPoint) -> CasperResult<()> {
        self.mont.set_zero(out.x)?;
        self.mont.set_zero(out.y)?;
        self.mont.set_zero(out.z)
    }

    /// `out = 2 * p`; `out` may be `p`
    pub(crate) fn double(&mut self, out: JacPoint, p: JacPoint) -> CasperResult<()> {
        let [t1, t2, t3, t4, t5] = [self.t[0], self.t[1], self.t[2], self.t[3], self.t[4]];
        let m = &mut self.mont;

        // M = 3 (X - Z^2)(X + Z^2)
        m.sqr(t1, p.z)?;
        m.sub(t3, p.x, t1)?;
        m.add(t1, p.x, t1)?;
        m.mul(t4, t3, t1)?;
        m.add(t3, t4, t4)?;
        m.add(t2, t3, t4)?;

        // Y' = 2Y, Z3 = Y' Z
        m.add(out.y, p.y, p.y)?;
        m.copy(t5, p.z)?;
        m.mul(out.z, out.y, t5)?;

        // S = Y'^2 X, T = Y'^4 / 2
        m.sqr(t5, out.y)?;
        m.mul(t3, t5, p.x)?;
        m.sqr(out.y, t5)?;
        m.half(t5, out.y)?;

        // X3 = M^2 - 2S, Y3 = M (S - X3) - T
        m.sqr(out.x, t2)?;
        m.add(t1, t3, t3)?;
        m.sub(out.x, out.x, t1)?;
        m.sub(t1, t3, out.x)?;
        m.mul(t3, t1, t2)?;
        m.sub(out.y, t3, t5)
    }

    /// `out = p1 + p2` where `p2` is affine (only `x` and `y` are read).
    ///
    /// `out` must not overlap `p1`.
    pub(crate) fn add_mixed(
        &mut self,
        out: JacPoint,
        p1: JacPoint,
        p2: JacPoint,
    ) -> CasperResult<()> {
        if out.overlaps(p1) {
            return Err(CasperError::DRIVER_CASPER_SCRATCH_OVERLAP);
        }
        if self.mont.is_zero(p1.z)? {
            let one = self.one;
            self.mont.copy(out.x, p2.x)?;
            self.mont.copy(out.y, p2.y)?;
            return self.mont.copy(out.z, one);
        }

        let [t1, t2, t3, t4, t5] = [self.t[0], self.t[1], self.t[2], self.t[3], self.t[4]];
        let m = &mut self.mont;

        // U2 = X2 Z1^2, S2 = Y2 Z1^3
        m.copy(t5, p1.z)?;
        m.sqr(t3, p1.z)?;
        m.mul(t2, t3, p1.z)?;
        m.mul(t4, t3, p2.x)?;
        m.mul(t3, t2, p2.y)?;

        if m.equal(t4, p1.x)? && m.equal(t3, p1.y)? {
            return self.double(out, p1);
        }

        // H = U2 - X1, r = S2 - Y1
        m.sub(t1, t4, p1.x)?;
        m.sub(t2, t3, p1.y)?;
        m.mul(out.z, t5, t1)?;
        m.sqr(t3, t1)?;
        m.mul(t4, t3, t1)?;
        m.mul(t5, t3, p1.x)?;
        m.add(t1, t5, t5)?;

        // X3 = r^2 - H^3 - 2 X1 H^2
        m.sqr(out.x, t2)?;
        m.sub(out.x, out.x, t1)?;
        m.sub(out.x, out.x, t4)?;

        // Y3 = r (X1 H^2 - X3) - Y1 H^3
        m.sub(t3, t5, out.x)?;
        m.mul(t1, t3, t2)?;
        m.mul(t2, t4, p1.y)?;
        m.sub(out.y, t1, t2)
    }

    /// `out = p1 + p2` for Jacobian inputs; `out` may alias either input
    pub(crate) fn add(&mut self, out: JacPoint, p1: JacPoint, p2: JacPoint) -> CasperResult<()> {
        if self.mont.is_zero(p1.z)? {
            return self.copy_point(out, p2);
        }
        if self.mont.is_zero(p2.z)? {
            return self.copy_point(out, p1);
        }

        let [z1z1, z2z2, u1, s1, j, h, v, t0, t1] = self.t;
        let m = &mut self.mont;

        // U1 = X1 Z2^2, U2 = X2 Z1^2, S1 = Y1 Z2^3, S2 = Y2 Z1^3
        m.sqr(z1z1, p1.z)?;
        m.sqr(z2z2, p2.z)?;
        m.mul(u1, p1.x, z2z2)?;
        m.mul(h, p2.x, z1z1)?;
        m.mul(t0, p2.z, z2z2)?;
        m.mul(s1, p1.y, t0)?;
        m.mul(t0, p1.z, z1z1)?;
        m.mul(j, p2.y, t0)?;

        if m.equal(h, u1)? && m.equal(s1, j)? {
            return self.double(out, p1);
        }

        // H = U2 - U1, I = (2H)^2, J = H I, r = 2 (S2 - S1), V = U1 I
        m.sub(h, h, u1)?;
        m.add(t0, h, h)?;
        m.sqr(t1, t0)?;
        m.sub(t0, j, s1)?;
        m.mul(j, h, t1)?;
        m.mul(v, u1, t1)?;
        m.add(u1, t0, t0)?;

        // X3 = r^2 - J - 2V
        m.sqr(t0, u1)?;
        m.add(t1, v, v)?;
        m.sub(t0, t0, j)?;
        m.sub(out.x, t0, t1)?;

        // Y3 = r (V - X3) - 2 S1 J
        m.sub(t0, v, out.x)?;
        m.mul(t1, s1, j)?;
        m.add(t1, t1, t1)?;
        m.mul(v, u1, t0)?;
        m.sub(out.y, v, t1)?;

        // Z3 = ((Z1 + Z2)^2 - Z1Z1 - Z2Z2) H
        m.add(v, p1.z, p2.z)?;
        m.sqr(t1, v)?;
        m.sub(t1, t1, z1z1)?;
        m.sub(t1, t1, z2z2)?;
        m.mul(out.z, t1, h)
    }

    /// Affine coordinates of `p` into `x` and `y`, still in Montgomery form.
    /// The identity maps to `(0, 0)`.
    pub(crate) fn to_affine(&mut self, x: Slot, y: Slot, p: JacPoint) -> CasperResult<()> {
        let (t1, t2) = (self.t[0], self.t[1]);
        self.mont.sqr(t1, p.z)?;
        self.mont.mul(t2, t1, p.z)?;
        self.invert(t1, t2)?;
        self.mont.mul(y, p.y, t1)?;
        self.mont.mul(t2, t1, p.z)?;
        self.mont.mul(x, p.x, t2)
    }

    /// Whether `Y^2 = X^3 - 3 X Z^4 + b Z^6`
    pub(crate) fn point_on_curve(&mut self, p: JacPoint) -> CasperResult<bool> {
        let [t1, t2, t3, t4, t5, t6] = [
            self.t[0], self.t[1], self.t[2], self.t[3], self.t[4], self.t[5],
        ];
        let b = self.b;
        let m = &mut self.mont;
        m.sqr(t1, p.y)?;
        m.sqr(t2, p.x)?;
        m.mul(t3, t2, p.x)?;
        m.sqr(t4, p.z)?;
        m.sqr(t5, t4)?;
        m.mul(t2, p.x, t5)?;
        m.add(t6, t2, t2)?;
        m.add(t6, t6, t2)?;
        m.sub(t3, t3, t6)?;
        m.mul(t6, t5, t4)?;
        m.mul(t2, t6, b)?;
        m.add(t3, t3, t2)?;
        m.equal(t1, t3)
    }
}
