/*++

Licensed under the Apache-2.0 license.

File Name:

    invert.rs

Abstract:

    File contains field inversion modulo the P-256 and P-384 primes as
    a^(p-2) evaluated through fixed addition chains.

--*/

use crate::arena::Slot;
use crate::curve::Curve;
use crate::ecc::EccSession;
use crate::engine::BignumEngine;
use crate::CasperResult;

impl<E: BignumEngine> EccSession<'_, E> {
    /// `c = a^-1 mod p` in Montgomery form; zero maps to zero.
    ///
    /// The chain is fixed by the prime, so timing does not depend on `a`.
    pub(crate) fn invert(&mut self, c: Slot, a: Slot) -> CasperResult<()> {
        match self.curve {
            Curve::P256 => self.invert_p256(c, a),
            Curve::P384 => self.invert_p384(c, a),
        }
    }

    /// `n` successive squarings of `src`, ping-ponging through `spare` so
    /// that the last one lands in `dst`.
    fn sqr_n(&mut self, dst: Slot, src: Slot, spare: Slot, n: usize) -> CasperResult<()> {
        let mut cur = src;
        for i in 0..n {
            let out = if (n - i) % 2 == 1 { dst } else { spare };
            self.mont.sqr(out, cur)?;
            cur = out;
        }
        Ok(())
    }

    /// `dst = src^(2^n) * m`
    fn sqr_mul(&mut self, dst: Slot, src: Slot, n: usize, m: Slot) -> CasperResult<()> {
        let (w0, w1) = (self.inv[8], self.inv[9]);
        self.sqr_n(w0, src, w1, n)?;
        self.mont.mul(dst, w0, m)
    }

    fn invert_p256(&mut self, c: Slot, a: Slot) -> CasperResult<()> {
        let [x2, x4, x8, x16, x32, t, ..] = self.inv;

        // xN = a^(2^N - 1)
        self.sqr_mul(x2, a, 1, a)?;
        self.sqr_mul(x4, x2, 2, x2)?;
        self.sqr_mul(x8, x4, 4, x4)?;
        self.sqr_mul(x16, x8, 8, x8)?;
        self.sqr_mul(x32, x16, 16, x16)?;

        // p - 2 = ffffffff 00000001 00000000 00000000 00000000 ffffffff ffffffff fffffffd
        self.sqr_mul(t, x32, 32, a)?;
        self.sqr_mul(t, t, 128, x32)?;
        self.sqr_mul(t, t, 32, x32)?;
        self.sqr_mul(t, t, 16, x16)?;
        self.sqr_mul(t, t, 8, x8)?;
        self.sqr_mul(t, t, 4, x4)?;
        self.sqr_mul(t, t, 2, x2)?;
        self.sqr_mul(c, t, 2, a)
    }

    fn invert_p384(&mut self, c: Slot, a: Slot) -> CasperResult<()> {
        let [a13, a14, x4, x8, x16, x32, x64, t, w0, w1] = self.inv;

        // a^12 from a^4 and a^8, then a^13, a^14 and a^15
        self.mont.sqr(w0, a)?;
        self.mont.sqr(w1, w0)?;
        self.mont.sqr(w0, w1)?;
        self.mont.mul(x8, w0, w1)?;
        self.mont.mul(a13, x8, a)?;
        self.mont.mul(a14, a13, a)?;
        self.mont.mul(x4, a14, a)?;

        // xN = a^(2^N - 1)
        self.sqr_mul(x8, x4, 4, x4)?;
        self.sqr_mul(x16, x8, 8, x8)?;
        self.sqr_mul(x32, x16, 16, x16)?;
        self.sqr_mul(x64, x32, 32, x32)?;
        self.sqr_mul(t, x64, 64, x64)?;

        // 255 ones, then a zero
        self.sqr_mul(t, t, 64, x64)?;
        self.sqr_mul(t, t, 32, x32)?;
        self.sqr_mul(t, t, 16, x16)?;
        self.sqr_mul(t, t, 8, x8)?;
        self.sqr_mul(t, t, 4, x4)?;
        self.sqr_mul(t, t, 4, a14)?;

        // 32 ones, 64 zeros, then fffffffd
        self.sqr_mul(t, t, 32, x32)?;
        self.sqr_n(t, t, w0, 64)?;
        self.sqr_mul(t, t, 16, x16)?;
        self.sqr_mul(t, t, 8, x8)?;
        self.sqr_mul(t, t, 4, x4)?;
        self.sqr_mul(c, t, 4, a13)
    }
}
