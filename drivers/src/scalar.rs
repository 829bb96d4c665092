/*++

Licensed under the Apache-2.0 license.

File Name:

    scalar.rs

Abstract:

    File contains scalar multiplication: the constant-time signed window
    method for k * P and Shamir's trick for k1 * P + k2 * Q.

--*/

use crate::ecc::EccSession;
use crate::engine::BignumEngine;
use crate::point::JacPoint;
use crate::{CasperError, CasperResult, MAX_LIMBS};
use zeroize::Zeroize;

/// Signed digits of a recoded P-384 scalar, the longest supported
const MAX_DIGITS: usize = (MAX_LIMBS * 32 + 2) / 3 + 1;

/// `out = a - b`, returning the final borrow (0 or 1)
pub(crate) fn sub_words(out: &mut [u32], a: &[u32], b: &[u32]) -> u32 {
    let mut borrow = 0u32;
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        let (d, b1) = a.overflowing_sub(*b);
        let (d, b2) = d.overflowing_sub(borrow);
        *o = d;
        borrow = u32::from(b1 | b2);
    }
    borrow
}

/// `dst = src` when `choose == 1`, unchanged when `choose == 0`; both are
/// read in full either way
pub(crate) fn ct_assign(dst: &mut [u32], src: &[u32], choose: u32) {
    let mask = 0u32.wrapping_sub(choose & 1);
    for (d, s) in dst.iter_mut().zip(src) {
        *d = (*d & !mask) | (*s & mask);
    }
}

/// 1 if `a == b`, else 0
pub(crate) fn ct_eq(a: u32, b: u32) -> u32 {
    let diff = a ^ b;
    1 ^ ((diff | diff.wrapping_neg()) >> 31)
}

/// Magnitude and sign bit of a recoded digit
pub(crate) fn digit_parts(digit: i8) -> (u32, u32) {
    let sign = (digit >> 7) as i32;
    let mag = ((i32::from(digit) ^ sign) - sign) as u32;
    (mag, sign as u32 & 1)
}

/// Recode the odd scalar `k` into `(bits + 2) / 3 + 1` signed odd digits in
/// `[-7, 7]`, least significant first, such that
/// `k = sum(digits[i] * 8^i)`.
///
/// Returns the number of digits written.
pub(crate) fn recode(k: &[u32], digits: &mut [i8]) -> usize {
    let limbs = k.len();
    let count = (limbs * 32 + 2) / 3;
    let mut buf = [0u32; MAX_LIMBS + 1];
    buf[..limbs].copy_from_slice(k);
    let buf = &mut buf[..limbs + 1];

    for digit in digits.iter_mut().take(count) {
        let d = (buf[0] & 15) as i32 - 8;
        *digit = d as i8;

        // buf = (buf >> 3) + (d < 0)
        for i in 0..limbs {
            buf[i] = (buf[i] >> 3) | (buf[i + 1] << 29);
        }
        buf[limbs] >>= 3;
        let mut carry = (d as u32) >> 31;
        for word in buf.iter_mut() {
            let (sum, c) = word.overflowing_add(carry);
            *word = sum;
            carry = u32::from(c);
        }
    }
    digits[count] = buf[0] as i8;
    buf.zeroize();
    count + 1
}

fn shl(k: &mut [u32], n: u32) {
    for i in (1..k.len()).rev() {
        k[i] = (k[i] << n) | (k[i - 1] >> (32 - n));
    }
    k[0] <<= n;
}

fn top_bit(k: &[u32]) -> u32 {
    k[k.len() - 1] >> 31
}

fn top_pair(k: &[u32]) -> u32 {
    k[k.len() - 1] >> 30
}

/// Index into the double-scalar table for the top bit pairs of `k1` and
/// `k2`; at least one of them must have its top bit set.
fn pair_index(k1: &[u32], k2: &[u32]) -> usize {
    let (x1, x2) = (top_pair(k1), top_pair(k2));
    let index = (x2 | (x1 << 2)) - 2 - u32::from(x1 != 0) * 2;
    index as usize
}

impl<E: BignumEngine> EccSession<'_, E> {
    /// Conditionally replace `p.y` by `-p.y` without branching on `negate`
    fn ct_negate_y(&mut self, p: JacPoint, negate: u32) -> CasperResult<()> {
        let (neg, zero) = (self.neg, self.zero);
        self.mont.sub(neg, zero, p.y)?;
        self.mont.select(p.y, p.y, neg, negate)
    }

    /// `out = lut[mag / 2]` for odd `mag` in `[1, 7]`, reading every entry
    fn ct_lookup(&mut self, out: JacPoint, mag: u32) -> CasperResult<()> {
        let lut = self.lut;
        self.copy_point(out, lut[0])?;
        for (i, entry) in lut[1..4].iter().enumerate() {
            let hit = ct_eq(mag, 2 * i as u32 + 3);
            self.mont.select(out.x, out.x, entry.x, hit)?;
            self.mont.select(out.y, out.y, entry.y, hit)?;
            self.mont.select(out.z, out.z, entry.z, hit)?;
        }
        Ok(())
    }

    /// `k * P` for an affine `P`, in constant time with respect to `k`.
    ///
    /// Returns the session accumulator holding the Jacobian result.
    pub(crate) fn scalar_mul(&mut self, p: JacPoint, k: &[u32]) -> CasperResult<JacPoint> {
        let limbs = self.curve.limbs();
        if k.len() != limbs {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        let q = self.curve.params().q;
        let mut scalar = [0u32; MAX_LIMBS];
        let mut tmp = [0u32; MAX_LIMBS];
        let mut digits = [0i8; MAX_DIGITS];

        // Reduce below q, then make odd: even k becomes q - k, fixed up at the end
        let borrow = sub_words(&mut scalar[..limbs], k, q);
        ct_assign(&mut scalar[..limbs], k, borrow);
        let odd = scalar[0] & 1;
        sub_words(&mut tmp[..limbs], q, &scalar[..limbs]);
        ct_assign(&mut scalar[..limbs], &tmp[..limbs], odd ^ 1);
        let count = recode(&scalar[..limbs], &mut digits);

        // 1P, 3P, 5P, 7P
        let [e1, e3, e5, e7, ..] = self.lut;
        let (dbl, acc, sel, one) = (self.dbl, self.acc, self.sel, self.one);
        self.mont.copy(e1.x, p.x)?;
        self.mont.copy(e1.y, p.y)?;
        self.mont.copy(e1.z, one)?;
        self.double(dbl, e1)?;
        self.add_mixed(e3, dbl, p)?;
        self.add(e5, e3, dbl)?;
        self.add(e7, e5, dbl)?;

        let (mag, sign) = digit_parts(digits[count - 1]);
        self.ct_lookup(acc, mag)?;
        self.ct_negate_y(acc, sign)?;

        for i in (0..count - 1).rev() {
            self.double(acc, acc)?;
            self.double(acc, acc)?;
            self.double(acc, acc)?;
            let (mag, sign) = digit_parts(digits[i]);
            self.ct_lookup(sel, mag)?;
            self.ct_negate_y(sel, sign)?;
            self.add(acc, acc, sel)?;
        }

        self.ct_negate_y(acc, odd ^ 1)?;

        scalar.zeroize();
        tmp.zeroize();
        digits.zeroize();
        Ok(acc)
    }

    /// `k1 * P + k2 * Q` for affine `P` and `Q`. Variable time.
    ///
    /// Returns the session accumulator holding the Jacobian result.
    pub(crate) fn double_scalar_mul(
        &mut self,
        p: JacPoint,
        k1: &[u32],
        q: JacPoint,
        k2: &[u32],
    ) -> CasperResult<JacPoint> {
        let limbs = self.curve.limbs();
        if k1.len() != limbs || k2.len() != limbs {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        let bits = self.curve.bits();
        let mut a = [0u32; MAX_LIMBS];
        let mut b = [0u32; MAX_LIMBS];
        let (a, b) = (&mut a[..limbs], &mut b[..limbs]);
        a.copy_from_slice(k1);
        b.copy_from_slice(k2);

        // lut[i] = u P + v Q for the (u, v) pairs with u or v in {2, 3}
        let lut = self.lut;
        self.double(lut[0], q)?;
        self.add_mixed(lut[1], lut[0], q)?;
        self.add_mixed(lut[2], lut[0], p)?;
        self.add_mixed(lut[3], lut[2], q)?;
        self.double(lut[4], p)?;
        self.add_mixed(lut[5], lut[4], q)?;
        self.add_mixed(lut[6], lut[5], q)?;
        self.add_mixed(lut[7], lut[6], q)?;
        self.add_mixed(lut[8], lut[4], p)?;
        self.add_mixed(lut[9], lut[8], q)?;
        self.add_mixed(lut[10], lut[9], q)?;
        self.add_mixed(lut[11], lut[10], q)?;

        let acc = self.acc;
        let mut consumed = 0;
        while consumed < bits && top_bit(a) | top_bit(b) == 0 {
            shl(a, 1);
            shl(b, 1);
            consumed += 1;
        }
        if consumed == bits {
            self.set_identity(acc)?;
            return Ok(acc);
        }

        if consumed + 2 <= bits {
            self.copy_point(acc, lut[pair_index(a, b)])?;
            shl(a, 2);
            shl(b, 2);
            consumed += 2;
        } else {
            self.set_identity(acc)?;
        }

        loop {
            while consumed < bits && top_bit(a) | top_bit(b) == 0 {
                shl(a, 1);
                shl(b, 1);
                self.double(acc, acc)?;
                consumed += 1;
            }
            if consumed + 1 >= bits {
                break;
            }
            self.double(acc, acc)?;
            self.double(acc, acc)?;
            self.add(acc, acc, lut[pair_index(a, b)])?;
            shl(a, 2);
            shl(b, 2);
            consumed += 2;
        }

        if consumed + 1 == bits {
            self.double(acc, acc)?;
            if top_bit(a) == 1 {
                self.add(acc, acc, p)?;
            }
            if top_bit(b) == 1 {
                self.add(acc, acc, q)?;
            }
        }
        Ok(acc)
    }
}
