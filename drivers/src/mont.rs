/*++

Licensed under the Apache-2.0 license.

File Name:

    mont.rs

Abstract:

    File contains Montgomery arithmetic over coprocessor RAM: CIOS
    multiplication plus modular add, subtract and halve.

--*/

use crate::arena::{ensure_distinct, Arena, Slot};
use crate::engine::BignumEngine;
use crate::{CasperError, CasperResult};
use casper_registers::{Opcode, CASPER_MAX_ITER};

/// Compute `-n0^-1 mod 2^64` for an odd `n0`.
///
/// Starts from an inverse correct to 4 bits and doubles the number of
/// correct bits with each Newton step.
pub fn montgomery_np(n0: u64) -> u64 {
    let mut x = (((n0.wrapping_add(2)) & 4) << 1).wrapping_add(n0);
    for _ in 0..4 {
        x = x.wrapping_mul(2u64.wrapping_sub(n0.wrapping_mul(x)));
    }
    x.wrapping_neg()
}

/// Montgomery arithmetic context for one modulus.
///
/// Every residue lives in a slot of `limbs + 4` words whose words past
/// `limbs` are kept zero between operations; results are always fully
/// reduced into `[0, N)`.
pub struct Montgomery<'a, E: BignumEngine> {
    engine: &'a mut E,
    limbs: usize,
    np: u64,
    modulus: Slot,
    tmp: Slot,
    m64: Slot,
}

impl<'a, E: BignumEngine> Montgomery<'a, E> {
    /// Load `modulus` and set up the context.
    ///
    /// # Arguments
    ///
    /// * `engine` - Coprocessor; borrowed for the lifetime of the context
    /// * `arena` - Arena the modulus and working slots are taken from
    /// * `modulus` - Odd modulus, little-endian words, even non-zero length
    pub fn new(engine: &'a mut E, arena: &mut Arena, modulus: &[u32]) -> CasperResult<Self> {
        let limbs = modulus.len();
        if limbs == 0 || limbs % 2 != 0 || limbs / 2 + 1 > CASPER_MAX_ITER as usize + 1 {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        if modulus[0] & 1 == 0 {
            return Err(CasperError::DRIVER_CASPER_INVALID_MODULUS);
        }
        let mut mont = Self {
            engine,
            limbs,
            np: montgomery_np(u64::from(modulus[0]) | (u64::from(modulus[1]) << 32)),
            modulus: arena.alloc(limbs + 4)?,
            tmp: arena.alloc(limbs + 4)?,
            m64: arena.alloc(2)?,
        };
        mont.load(mont.modulus, modulus)?;
        Ok(mont)
    }

    /// Number of 32-bit limbs per residue
    pub fn limbs(&self) -> usize {
        self.limbs
    }

    /// `-N^-1 mod 2^64`
    pub fn np(&self) -> u64 {
        self.np
    }

    /// Slot holding the modulus
    pub fn modulus(&self) -> Slot {
        self.modulus
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut *self.engine
    }

    /// Allocate a residue slot sized for this modulus
    pub fn alloc(&self, arena: &mut Arena) -> CasperResult<Slot> {
        arena.alloc(self.limbs + 4)
    }

    /// Allocate `N` residue slots sized for this modulus
    pub fn alloc_array<const N: usize>(&self, arena: &mut Arena) -> CasperResult<[Slot; N]> {
        arena.alloc_array(self.limbs + 4)
    }

    fn dwords(&self) -> usize {
        self.limbs / 2
    }

    /// Write `words` into `dst`, zero-filling the rest of the slot
    pub fn load(&mut self, dst: Slot, words: &[u32]) -> CasperResult<()> {
        if words.len() > self.limbs {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        self.engine.load(dst.offset(), words)?;
        self.engine
            .fill(dst.at(words.len()), self.limbs + 4 - words.len(), 0)
    }

    /// Read the low `out.len()` limbs of `src`
    pub fn store(&self, src: Slot, out: &mut [u32]) -> CasperResult<()> {
        if out.len() > self.limbs {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        self.engine.store(src.offset(), out)
    }

    /// `dst = 0`
    pub fn set_zero(&mut self, dst: Slot) -> CasperResult<()> {
        self.engine.fill(dst.offset(), self.limbs + 4, 0)
    }

    /// `dst = src`
    pub fn copy(&mut self, dst: Slot, src: Slot) -> CasperResult<()> {
        if dst == src {
            return Ok(());
        }
        self.engine
            .run(Opcode::Copy, src.offset(), 0, self.dwords(), dst.offset())
    }

    /// Whether `a` is zero
    pub fn is_zero(&self, a: Slot) -> CasperResult<bool> {
        let mut acc = 0;
        for i in 0..self.limbs {
            acc |= self.engine.read_word(a.at(i))?;
        }
        Ok(acc == 0)
    }

    /// Whether `a` and `b` hold the same value
    pub fn equal(&self, a: Slot, b: Slot) -> CasperResult<bool> {
        let mut acc = 0;
        for i in 0..self.limbs {
            acc |= self.engine.read_word(a.at(i))? ^ self.engine.read_word(b.at(i))?;
        }
        Ok(acc == 0)
    }

    /// `dst = if choose_b == 1 { b } else { a }` without branching on
    /// `choose_b`; both inputs are read in full.
    pub fn select(&mut self, dst: Slot, a: Slot, b: Slot, choose_b: u32) -> CasperResult<()> {
        let mask = 0u32.wrapping_sub(choose_b & 1);
        for i in 0..self.limbs {
            let va = self.engine.read_word(a.at(i))?;
            let vb = self.engine.read_word(b.at(i))?;
            self.engine
                .write_word(dst.at(i), (va & !mask) | (vb & mask))?;
        }
        Ok(())
    }

    /// Sign bit of the top word of the double-word at `word`
    fn borrow(&self, word: u16) -> CasperResult<u32> {
        Ok(self.engine.read_word(word + 1)? >> 31)
    }

    /// Montgomery product `c = a * b * R^-1 mod N`.
    ///
    /// # Arguments
    ///
    /// * `c` - Result; must not share storage with `a`, `b` or the context
    /// * `a` - Multiplicand residue
    /// * `b` - Multiplier residue; may equal `a`
    pub fn mul(&mut self, c: Slot, a: Slot, b: Slot) -> CasperResult<()> {
        ensure_distinct(c, &[a, b, self.modulus, self.tmp, self.m64])?;
        let (l, d) = (self.limbs, self.dwords());
        self.engine.fill(c.offset(), l + 4, 0)?;

        for i in 0..d {
            // c += a * b[i]; the overflow of the top double-word is kept aside
            let top = self.engine.read64(c.at(l))?;
            self.engine.run(
                Opcode::Mul6464FullSum,
                b.at(2 * i),
                a.offset(),
                d,
                c.offset(),
            )?;
            let overflow = u64::from(self.engine.read64(c.at(l))? < top);
            self.engine.write64(c.at(l + 2), overflow)?;

            // c += (c[0] * np mod 2^64) * N, which clears the low double-word
            let m = self.engine.read64(c.offset())?.wrapping_mul(self.np);
            self.engine.write64(self.m64.offset(), m)?;
            let top = self.engine.read64(c.at(l))?;
            self.engine.run(
                Opcode::Mul6464FullSum,
                self.m64.offset(),
                self.modulus.offset(),
                d,
                c.offset(),
            )?;
            let carry = u64::from(self.engine.read64(c.at(l))? < top);

            // c >>= 64
            self.engine.run(Opcode::Copy, c.at(2), 0, d, c.offset())?;
            let overflow = self.engine.read64(c.at(l + 2))?;
            self.engine.write64(c.at(l), overflow + carry)?;
        }

        // c < 2N here; subtract N once and keep whichever is in range
        self.engine
            .run(Opcode::Copy, c.offset(), 0, d + 1, self.tmp.offset())?;
        self.engine
            .run(Opcode::Sub64, self.modulus.offset(), 0, d + 1, c.offset())?;
        let borrow = self.borrow(c.at(l))?;
        self.select(c, c, self.tmp, borrow)?;
        self.engine.fill(c.at(l), 4, 0)
    }

    /// `c = a^2 * R^-1 mod N`
    pub fn sqr(&mut self, c: Slot, a: Slot) -> CasperResult<()> {
        self.mul(c, a, a)
    }

    /// `c = a + b mod N`; `c` may alias either input
    pub fn add(&mut self, c: Slot, a: Slot, b: Slot) -> CasperResult<()> {
        ensure_distinct(c, &[self.modulus, self.tmp, self.m64])?;
        let (l, d) = (self.limbs, self.dwords());
        self.engine
            .run(Opcode::Copy, a.offset(), 0, d, self.tmp.offset())?;
        self.engine.write64(self.tmp.at(l), 0)?;
        self.engine
            .run(Opcode::Add64, b.offset(), 0, d + 1, self.tmp.offset())?;
        self.engine
            .run(Opcode::Copy, self.tmp.offset(), 0, d + 1, c.offset())?;
        self.engine
            .run(Opcode::Sub64, self.modulus.offset(), 0, d + 1, c.offset())?;
        let borrow = self.borrow(c.at(l))?;
        self.select(c, c, self.tmp, borrow)?;
        self.engine.fill(c.at(l), 2, 0)
    }

    /// `c = a - b mod N`; `c` may alias either input
    pub fn sub(&mut self, c: Slot, a: Slot, b: Slot) -> CasperResult<()> {
        ensure_distinct(c, &[self.modulus, self.tmp, self.m64])?;
        let (l, d) = (self.limbs, self.dwords());
        self.engine
            .run(Opcode::Copy, a.offset(), 0, d, self.tmp.offset())?;
        self.engine.write64(self.tmp.at(l), 0)?;
        self.engine
            .run(Opcode::Sub64, b.offset(), 0, d + 1, self.tmp.offset())?;
        let borrow = self.borrow(self.tmp.at(l))?;
        self.engine
            .run(Opcode::Copy, self.tmp.offset(), 0, d, c.offset())?;
        self.engine
            .run(Opcode::Add64, self.modulus.offset(), 0, d, c.offset())?;
        self.select(c, self.tmp, c, borrow)
    }

    /// `c = a / 2 mod N`; `c` may alias `a`
    pub fn half(&mut self, c: Slot, a: Slot) -> CasperResult<()> {
        ensure_distinct(c, &[self.modulus, self.tmp, self.m64])?;
        let (l, d) = (self.limbs, self.dwords());
        self.engine
            .run(Opcode::Copy, a.offset(), 0, d, self.tmp.offset())?;
        self.engine.write64(self.tmp.at(l), 0)?;
        self.engine.run(
            Opcode::Add64,
            self.modulus.offset(),
            0,
            d + 1,
            self.tmp.offset(),
        )?;

        // Shift both a and a + N right by one and keep the even one
        let mut a_cur = self.engine.read_word(a.offset())?;
        let mut t_cur = self.engine.read_word(self.tmp.offset())?;
        let mask = 0u32.wrapping_sub(a_cur & 1);
        for i in 0..l {
            let a_next = if i + 1 < l {
                self.engine.read_word(a.at(i + 1))?
            } else {
                0
            };
            let t_next = self.engine.read_word(self.tmp.at(i + 1))?;
            let even = (a_cur >> 1) | (a_next << 31);
            let odd = (t_cur >> 1) | (t_next << 31);
            self.engine
                .write_word(c.at(i), (even & !mask) | (odd & mask))?;
            a_cur = a_next;
            t_cur = t_next;
        }
        Ok(())
    }

    /// Convert `a` into Montgomery form given `r2 = R^2 mod N`
    pub fn to_mont(&mut self, c: Slot, a: Slot, r2: Slot) -> CasperResult<()> {
        self.mul(c, a, r2)
    }

    /// Convert `a` out of Montgomery form given `unity`, the plain value 1
    pub fn from_mont(&mut self, c: Slot, a: Slot, unity: Slot) -> CasperResult<()> {
        self.mul(c, a, unity)
    }
}
