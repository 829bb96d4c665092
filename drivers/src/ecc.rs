/*++

Licensed under the Apache-2.0 license.

File Name:

    ecc.rs

Abstract:

    File contains the elliptic curve session: scratch layout for one curve
    plus the affine-in, affine-out entry points built on the point and
    scalar layers.

--*/

use crate::arena::{Arena, Slot};
use crate::curve::Curve;
use crate::engine::BignumEngine;
use crate::mont::Montgomery;
use crate::point::JacPoint;
use crate::scalar::sub_words;
use crate::{CasperError, CasperResult, MAX_LIMBS};
use casper_registers::CASPER_RAM_WORDS;

/// Number of general temporaries used by the point formulas
pub(crate) const POINT_TEMPS: usize = 9;

/// Number of temporaries used by the inversion chains
pub(crate) const INV_TEMPS: usize = 10;

/// Number of precomputed points (double-scalar table is the larger one)
pub(crate) const LUT_POINTS: usize = 12;

/// Exclusive use of the coprocessor for elliptic curve work on one curve.
///
/// The session lays out every residue it needs in coprocessor RAM when it
/// is created and wipes that RAM again when dropped.
pub struct EccSession<'a, E: BignumEngine> {
    pub(crate) curve: Curve,
    pub(crate) mont: Montgomery<'a, E>,
    scratch: Slot,

    /// Montgomery form of 1 (`R mod p`)
    pub(crate) one: Slot,
    pub(crate) zero: Slot,

    /// Montgomery form of the curve constant `b`
    pub(crate) b: Slot,
    r2: Slot,

    /// Plain 1, used to leave the Montgomery domain
    unity: Slot,

    pub(crate) t: [Slot; POINT_TEMPS],
    pub(crate) inv: [Slot; INV_TEMPS],
    pub(crate) lut: [JacPoint; LUT_POINTS],
    pub(crate) acc: JacPoint,
    pub(crate) sel: JacPoint,
    pub(crate) dbl: JacPoint,
    pub(crate) neg: Slot,

    /// Affine inputs; their `z` is `one`
    pub(crate) in1: JacPoint,
    pub(crate) in2: JacPoint,
}

impl<'a, E: BignumEngine> EccSession<'a, E> {
    /// Claim the coprocessor and load the parameters of `curve`.
    ///
    /// # Arguments
    ///
    /// * `engine` - Coprocessor, held until the session is dropped
    /// * `curve` - Curve every operation of the session works on
    pub fn new(engine: &'a mut E, curve: Curve) -> CasperResult<Self> {
        let params = curve.params();
        engine.fill(0, CASPER_RAM_WORDS, 0)?;

        let mut arena = Arena::new();
        let mut mont = Montgomery::new(engine, &mut arena, params.p)?;
        let [one, zero, b, r2, unity, neg] = mont.alloc_array(&mut arena)?;
        let t: [Slot; POINT_TEMPS] = mont.alloc_array(&mut arena)?;
        let inv: [Slot; INV_TEMPS] = mont.alloc_array(&mut arena)?;
        let mut lut = [JacPoint::default(); LUT_POINTS];
        for point in lut.iter_mut() {
            *point = JacPoint::alloc(&mont, &mut arena)?;
        }
        let acc = JacPoint::alloc(&mont, &mut arena)?;
        let sel = JacPoint::alloc(&mont, &mut arena)?;
        let dbl = JacPoint::alloc(&mont, &mut arena)?;
        let [x1, y1, x2, y2] = mont.alloc_array(&mut arena)?;

        mont.load(one, params.r_mod_p)?;
        mont.load(r2, params.r2_mod_p)?;
        mont.load(unity, &[1])?;
        mont.load(t[0], params.b)?;
        mont.to_mont(b, t[0], r2)?;

        log::debug!(
            "casper: {:?} session, {} scratch words",
            curve,
            arena.used().len()
        );

        Ok(Self {
            curve,
            mont,
            scratch: arena.used(),
            one,
            zero,
            b,
            r2,
            unity,
            t,
            inv,
            lut,
            acc,
            sel,
            dbl,
            neg,
            in1: JacPoint { x: x1, y: y1, z: one },
            in2: JacPoint { x: x2, y: y2, z: one },
        })
    }

    /// Curve of this session
    pub fn curve(&self) -> Curve {
        self.curve
    }

    fn check_len(&self, words: &[&[u32]]) -> CasperResult<()> {
        if words.iter().any(|w| w.len() != self.curve.limbs()) {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        Ok(())
    }

    /// Load an affine point given in plain form into `p` (Montgomery form)
    pub(crate) fn load_affine(&mut self, p: JacPoint, x: &[u32], y: &[u32]) -> CasperResult<()> {
        let raw = self.t[0];
        self.mont.load(raw, x)?;
        self.mont.to_mont(p.x, raw, self.r2)?;
        self.mont.load(raw, y)?;
        self.mont.to_mont(p.y, raw, self.r2)
    }

    /// Write the affine, plain form of `p`; the identity becomes `(0, 0)`
    pub(crate) fn store_affine(
        &mut self,
        p: JacPoint,
        x: &mut [u32],
        y: &mut [u32],
    ) -> CasperResult<()> {
        let (ax, ay, plain) = (self.t[7], self.t[8], self.t[6]);
        self.to_affine(ax, ay, p)?;
        self.mont.from_mont(plain, ax, self.unity)?;
        self.mont.store(plain, x)?;
        self.mont.from_mont(plain, ay, self.unity)?;
        self.mont.store(plain, y)
    }

    /// Compute `k * P`.
    ///
    /// The scalar is handled in constant time; it is reduced modulo the group
    /// order first, so `k = q` yields the identity, reported as `(0, 0)`.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Affine coordinates of `P`
    /// * `k` - Scalar
    /// * `out_x`, `out_y` - Affine coordinates of the result
    pub fn mul(
        &mut self,
        x: &[u32],
        y: &[u32],
        k: &[u32],
        out_x: &mut [u32],
        out_y: &mut [u32],
    ) -> CasperResult<()> {
        self.check_len(&[x, y, k, &*out_x, &*out_y])?;
        let p = self.in1;
        self.load_affine(p, x, y)?;
        let result = self.scalar_mul(p, k)?;
        self.store_affine(result, out_x, out_y)
    }

    /// Compute `k1 * P + k2 * Q`.
    ///
    /// Variable time; meant for signature verification with public inputs.
    #[allow(clippy::too_many_arguments)]
    pub fn mul_add(
        &mut self,
        x1: &[u32],
        y1: &[u32],
        k1: &[u32],
        x2: &[u32],
        y2: &[u32],
        k2: &[u32],
        out_x: &mut [u32],
        out_y: &mut [u32],
    ) -> CasperResult<()> {
        self.check_len(&[x1, y1, k1, x2, y2, k2, &*out_x, &*out_y])?;
        let (p, q) = (self.in1, self.in2);
        self.load_affine(p, x1, y1)?;
        self.load_affine(q, x2, y2)?;
        let result = self.double_scalar_mul(p, k1, q, k2)?;
        self.store_affine(result, out_x, out_y)
    }

    /// Whether `(x, y)` is a point of the curve with both coordinates
    /// reduced modulo `p`
    pub fn on_curve(&mut self, x: &[u32], y: &[u32]) -> CasperResult<bool> {
        self.check_len(&[x, y])?;
        let p = self.curve.params().p;
        let mut diff = [0u32; MAX_LIMBS];
        let limbs = self.curve.limbs();
        let reduced = sub_words(&mut diff[..limbs], x, p) & sub_words(&mut diff[..limbs], y, p);
        if reduced == 0 {
            return Ok(false);
        }
        let point = self.in1;
        self.load_affine(point, x, y)?;
        self.point_on_curve(point)
    }
}

impl<E: BignumEngine> Drop for EccSession<'_, E> {
    fn drop(&mut self) {
        let scratch = self.scratch;
        if self
            .mont
            .engine_mut()
            .fill(scratch.offset(), scratch.len(), 0)
            .is_err()
        {
            log::warn!("casper: failed to wipe ECC scratch");
        }
    }
}
