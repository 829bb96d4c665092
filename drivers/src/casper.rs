/*++

Licensed under the Apache-2.0 license.

File Name:

    casper.rs

Abstract:

    File contains the public API of the CASPER driver: RSA modular
    exponentiation and P-256/P-384 point multiplication.

--*/

use crate::curve::Curve;
use crate::ecc::EccSession;
use crate::engine::BignumEngine;
use crate::rsa::{RsaSession, RSA_MAX_WORDS};
use crate::scalar::{ct_eq, sub_words};
use crate::{CasperError, CasperResult, MAX_LIMBS};
use zeroize::Zeroize;

/// CASPER bignum coprocessor.
///
/// Every operation takes `&mut self`: the coprocessor and its RAM belong to
/// one call at a time.
pub struct Casper<E: BignumEngine> {
    engine: E,
}

fn words_from_le_bytes(bytes: &[u8], words: &mut [u32]) {
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

fn words_to_le_bytes(words: &[u32], bytes: &mut [u8]) {
    for (word, chunk) in words.iter().zip(bytes.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

impl<E: BignumEngine> Casper<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start a session of elliptic curve operations on `curve`
    pub fn ecc_session(&mut self, curve: Curve) -> CasperResult<EccSession<'_, E>> {
        EccSession::new(&mut self.engine, curve)
    }

    /// Start a session of exponentiations modulo `modulus`
    pub fn rsa_session(&mut self, modulus: &[u32]) -> CasperResult<RsaSession<'_, E>> {
        RsaSession::new(&mut self.engine, modulus)
    }

    /// Compute `signature^exponent mod modulus`.
    ///
    /// # Arguments
    ///
    /// * `signature` - Little-endian bytes, `4 * word_len` long
    /// * `modulus` - Odd modulus, little-endian bytes, `4 * word_len` long
    /// * `word_len` - Operand length in 32-bit words
    /// * `exponent` - Public exponent
    /// * `plaintext` - Result, little-endian bytes, `4 * word_len` long
    pub fn mod_exp(
        &mut self,
        signature: &[u8],
        modulus: &[u8],
        word_len: usize,
        exponent: u32,
        plaintext: &mut [u8],
    ) -> CasperResult<()> {
        let len = word_len * 4;
        if word_len == 0
            || word_len > RSA_MAX_WORDS
            || signature.len() != len
            || modulus.len() != len
            || plaintext.len() != len
        {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        let mut n = [0u32; RSA_MAX_WORDS];
        let mut s = [0u32; RSA_MAX_WORDS];
        let mut m = [0u32; RSA_MAX_WORDS];
        words_from_le_bytes(modulus, &mut n[..word_len]);
        words_from_le_bytes(signature, &mut s[..word_len]);

        self.rsa_session(&n[..word_len])?
            .mod_exp(&s[..word_len], exponent, &mut m[..word_len])?;
        words_to_le_bytes(&m[..word_len], plaintext);
        Ok(())
    }

    /// Compute `k * P` on `curve`; see `EccSession::mul`
    pub fn ecc_mul(
        &mut self,
        curve: Curve,
        x: &[u32],
        y: &[u32],
        k: &[u32],
        out_x: &mut [u32],
        out_y: &mut [u32],
    ) -> CasperResult<()> {
        self.ecc_session(curve)?.mul(x, y, k, out_x, out_y)
    }

    /// Compute `k1 * P + k2 * Q` on `curve`; see `EccSession::mul_add`
    #[allow(clippy::too_many_arguments)]
    pub fn ecc_mul_add(
        &mut self,
        curve: Curve,
        x1: &[u32],
        y1: &[u32],
        k1: &[u32],
        x2: &[u32],
        y2: &[u32],
        k2: &[u32],
        out_x: &mut [u32],
        out_y: &mut [u32],
    ) -> CasperResult<()> {
        self.ecc_session(curve)?
            .mul_add(x1, y1, k1, x2, y2, k2, out_x, out_y)
    }

    /// P-256 point multiplication
    pub fn ecc_secp256r1_mul(
        &mut self,
        x: &[u32; 8],
        y: &[u32; 8],
        k: &[u32; 8],
    ) -> CasperResult<([u32; 8], [u32; 8])> {
        let (mut rx, mut ry) = ([0u32; 8], [0u32; 8]);
        self.ecc_mul(Curve::P256, x, y, k, &mut rx, &mut ry)?;
        Ok((rx, ry))
    }

    /// P-256 `k1 * P + k2 * Q`
    pub fn ecc_secp256r1_mul_add(
        &mut self,
        p: (&[u32; 8], &[u32; 8]),
        k1: &[u32; 8],
        q: (&[u32; 8], &[u32; 8]),
        k2: &[u32; 8],
    ) -> CasperResult<([u32; 8], [u32; 8])> {
        let (mut rx, mut ry) = ([0u32; 8], [0u32; 8]);
        self.ecc_mul_add(Curve::P256, p.0, p.1, k1, q.0, q.1, k2, &mut rx, &mut ry)?;
        Ok((rx, ry))
    }

    /// P-384 point multiplication
    pub fn ecc_secp384r1_mul(
        &mut self,
        x: &[u32; 12],
        y: &[u32; 12],
        k: &[u32; 12],
    ) -> CasperResult<([u32; 12], [u32; 12])> {
        let (mut rx, mut ry) = ([0u32; 12], [0u32; 12]);
        self.ecc_mul(Curve::P384, x, y, k, &mut rx, &mut ry)?;
        Ok((rx, ry))
    }

    /// P-384 `k1 * P + k2 * Q`
    pub fn ecc_secp384r1_mul_add(
        &mut self,
        p: (&[u32; 12], &[u32; 12]),
        k1: &[u32; 12],
        q: (&[u32; 12], &[u32; 12]),
        k2: &[u32; 12],
    ) -> CasperResult<([u32; 12], [u32; 12])> {
        let (mut rx, mut ry) = ([0u32; 12], [0u32; 12]);
        self.ecc_mul_add(Curve::P384, p.0, p.1, k1, q.0, q.1, k2, &mut rx, &mut ry)?;
        Ok((rx, ry))
    }

    /// Whether `(x, y)` is a point of `curve` with reduced coordinates
    pub fn point_on_curve(&mut self, curve: Curve, x: &[u32], y: &[u32]) -> CasperResult<bool> {
        self.ecc_session(curve)?.on_curve(x, y)
    }

    /// Fail with `DRIVER_CASPER_POINT_NOT_ON_CURVE` unless `(x, y)` is on `curve`
    pub fn validate_point(&mut self, curve: Curve, x: &[u32], y: &[u32]) -> CasperResult<()> {
        if !self.point_on_curve(curve, x, y)? {
            return Err(CasperError::DRIVER_CASPER_POINT_NOT_ON_CURVE);
        }
        Ok(())
    }

    /// Whether `1 <= k < q`, evaluated without branching on `k`
    pub fn scalar_in_range(curve: Curve, k: &[u32]) -> bool {
        let limbs = curve.limbs();
        if k.len() != limbs {
            return false;
        }
        let mut diff = [0u32; MAX_LIMBS];
        let below_q = sub_words(&mut diff[..limbs], k, curve.params().q);
        diff.zeroize();
        let nonzero = 1 ^ ct_eq(k.iter().fold(0, |acc, w| acc | w), 0);
        below_q & nonzero == 1
    }

    /// Fail with `DRIVER_CASPER_SCALAR_OUT_OF_RANGE` unless `1 <= k < q`
    pub fn validate_scalar(curve: Curve, k: &[u32]) -> CasperResult<()> {
        if !Self::scalar_in_range(curve, k) {
            return Err(CasperError::DRIVER_CASPER_SCALAR_OUT_OF_RANGE);
        }
        Ok(())
    }
}
