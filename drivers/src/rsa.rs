/*++

Licensed under the Apache-2.0 license.

File Name:

    rsa.rs

Abstract:

    File contains RSA public-key modular exponentiation over Montgomery
    arithmetic on the coprocessor.

--*/

use crate::arena::{Arena, Slot};
use crate::engine::BignumEngine;
use crate::mont::Montgomery;
use crate::{CasperError, CasperResult};
use casper_registers::CASPER_RAM_WORDS;

/// Largest supported modulus, in 32-bit words (4096 bits)
pub const RSA_MAX_WORDS: usize = 128;

/// Exclusive use of the coprocessor for exponentiations modulo one `N`.
pub struct RsaSession<'a, E: BignumEngine> {
    mont: Montgomery<'a, E>,
    word_len: usize,
    scratch: Slot,

    /// `R mod N`, the Montgomery form of 1
    r: Slot,

    /// `R^2 mod N`
    r2: Slot,

    /// Plain 1
    unity: Slot,
    raw: Slot,
    base: Slot,
    acc: Slot,
    acc2: Slot,
}

/// Bit length of the little-endian value `words`
fn bit_len(words: &[u32]) -> usize {
    words
        .iter()
        .rposition(|w| *w != 0)
        .map_or(0, |i| i * 32 + 32 - words[i].leading_zeros() as usize)
}

impl<'a, E: BignumEngine> RsaSession<'a, E> {
    /// Claim the coprocessor and prepare Montgomery constants for `modulus`.
    ///
    /// # Arguments
    ///
    /// * `engine` - Coprocessor, held until the session is dropped
    /// * `modulus` - Odd modulus greater than 1, little-endian words, at most
    ///   `RSA_MAX_WORDS` long
    ///
    /// # Error
    ///
    /// * `DRIVER_CASPER_INVALID_WORD_LEN` - Empty or oversized modulus
    /// * `DRIVER_CASPER_INVALID_MODULUS` - Even modulus, or modulus 1
    pub fn new(engine: &'a mut E, modulus: &[u32]) -> CasperResult<Self> {
        let word_len = modulus.len();
        if word_len == 0 || word_len > RSA_MAX_WORDS {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        let bits = bit_len(modulus);
        if modulus[0] & 1 == 0 || bits < 2 {
            return Err(CasperError::DRIVER_CASPER_INVALID_MODULUS);
        }

        // Odd word lengths are padded to whole double-words
        let limbs = word_len.div_ceil(2) * 2;
        let mut padded = [0u32; RSA_MAX_WORDS];
        padded[..word_len].copy_from_slice(modulus);

        engine.fill(0, CASPER_RAM_WORDS, 0)?;
        let mut arena = Arena::new();
        let mut mont = Montgomery::new(engine, &mut arena, &padded[..limbs])?;
        let [r, r2, unity, raw, base, acc, acc2] = mont.alloc_array(&mut arena)?;
        mont.load(unity, &[1])?;

        // R mod N: 2^(bits - 1) < N, doubled up to 2^(32 * limbs)
        let width = 32 * limbs;
        let top = bits - 1;
        mont.engine_mut()
            .write_word(r.at(top / 32), 1 << (top % 32))?;
        for _ in top..width {
            mont.add(r, r, r)?;
        }

        // R^2 mod N: with width = t * 2^s, double R t times to get the
        // Montgomery form of 2^t, then square s times
        let s = width.trailing_zeros();
        let t = width >> s;
        mont.copy(acc, r)?;
        for _ in 0..t {
            mont.add(acc, acc, acc)?;
        }
        let (mut cur, mut other) = (acc, acc2);
        for _ in 0..s {
            mont.sqr(other, cur)?;
            core::mem::swap(&mut cur, &mut other);
        }
        mont.copy(r2, cur)?;

        log::debug!(
            "casper: RSA session, {}-bit modulus, {} scratch words",
            bits,
            arena.used().len()
        );

        Ok(Self {
            mont,
            word_len,
            scratch: arena.used(),
            r,
            r2,
            unity,
            raw,
            base,
            acc,
            acc2,
        })
    }

    /// Modulus length in words
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Compute `base^exponent mod N`.
    ///
    /// The exponent is public; the ladder branches on its bits.
    ///
    /// # Arguments
    ///
    /// * `base` - Little-endian words, `word_len` long
    /// * `exponent` - Public exponent
    /// * `out` - Result, `word_len` words
    pub fn mod_exp(&mut self, base: &[u32], exponent: u32, out: &mut [u32]) -> CasperResult<()> {
        if base.len() != self.word_len || out.len() != self.word_len {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        let m = &mut self.mont;
        m.load(self.raw, base)?;
        m.mul(self.base, self.raw, self.r2)?;

        let (mut cur, mut other) = (self.acc, self.acc2);
        if exponent == 0 {
            m.copy(cur, self.r)?;
        } else {
            m.copy(cur, self.base)?;
            let msb = 31 - exponent.leading_zeros();
            for bit in (0..msb).rev() {
                m.sqr(other, cur)?;
                core::mem::swap(&mut cur, &mut other);
                if exponent & (1 << bit) != 0 {
                    m.mul(other, cur, self.base)?;
                    core::mem::swap(&mut cur, &mut other);
                }
            }
        }

        m.from_mont(self.raw, cur, self.unity)?;
        m.store(self.raw, out)
    }
}

impl<E: BignumEngine> Drop for RsaSession<'_, E> {
    fn drop(&mut self) {
        let scratch = self.scratch;
        if self
            .mont
            .engine_mut()
            .fill(scratch.offset(), scratch.len(), 0)
            .is_err()
        {
            log::warn!("casper: failed to wipe RSA scratch");
        }
    }
}
