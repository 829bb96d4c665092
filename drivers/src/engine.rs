/*++

Licensed under the Apache-2.0 license.

File Name:

    engine.rs

Abstract:

    File contains the BignumEngine abstraction over the CASPER coprocessor:
    word access to its RAM plus issuing one double-word run operation at a
    time.

--*/

use crate::{wait, CasperError, CasperResult};
use casper_registers::{Opcode, CASPER_MAX_ITER, CASPER_RAM_WORDS};

/// Default number of status polls before an operation is declared lost
pub const DEFAULT_POLL_LIMIT: u32 = 1 << 20;

/// A CASPER-compatible bignum engine.
///
/// Offsets are logical word offsets into coprocessor RAM. Implementations
/// apply their `MemoryView` on every CPU access.
pub trait BignumEngine {
    /// Read the word at logical word offset `word`
    fn read_word(&self, word: u16) -> CasperResult<u32>;

    /// Write the word at logical word offset `word`
    fn write_word(&mut self, word: u16, val: u32) -> CasperResult<()>;

    /// Program the two operand base offsets of the next operation
    fn set_operands(&mut self, ab: u16, cd: u16) -> CasperResult<()>;

    /// Start an operation over `iter + 1` double-words, result at `result`
    fn start(&mut self, iter: u8, op: Opcode, result: u16) -> CasperResult<()>;

    /// Completion flag of the last started operation
    fn done(&self) -> CasperResult<bool>;

    /// Number of status polls before giving up on an operation
    fn poll_limit(&self) -> u32 {
        DEFAULT_POLL_LIMIT
    }

    /// Issue one operation and block until it completes.
    ///
    /// # Arguments
    ///
    /// * `op` - Operation
    /// * `ab` - Word offset of the AB operand (multiplier or source run)
    /// * `cd` - Word offset of the CD operand (multiplicand run)
    /// * `dwords` - Number of double-words processed
    /// * `result` - Word offset of the result run
    fn run(
        &mut self,
        op: Opcode,
        ab: u16,
        cd: u16,
        dwords: usize,
        result: u16,
    ) -> CasperResult<()> {
        if dwords == 0 || dwords > CASPER_MAX_ITER as usize + 1 {
            return Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN);
        }
        self.set_operands(ab, cd)?;
        self.start((dwords - 1) as u8, op, result)?;
        wait::until(|| self.done(), self.poll_limit())
    }

    /// Read the double-word starting at logical word offset `word`
    fn read64(&self, word: u16) -> CasperResult<u64> {
        Ok(u64::from(self.read_word(word)?) | (u64::from(self.read_word(word + 1)?) << 32))
    }

    /// Write the double-word starting at logical word offset `word`
    fn write64(&mut self, word: u16, val: u64) -> CasperResult<()> {
        self.write_word(word, val as u32)?;
        self.write_word(word + 1, (val >> 32) as u32)
    }

    /// Copy `src` into coprocessor RAM at `word`
    fn load(&mut self, word: u16, src: &[u32]) -> CasperResult<()> {
        for (i, val) in src.iter().enumerate() {
            self.write_word(word + i as u16, *val)?;
        }
        Ok(())
    }

    /// Copy coprocessor RAM at `word` into `dst`
    fn store(&self, word: u16, dst: &mut [u32]) -> CasperResult<()> {
        for (i, val) in dst.iter_mut().enumerate() {
            *val = self.read_word(word + i as u16)?;
        }
        Ok(())
    }

    /// Set `len` words at `word` to `val`
    fn fill(&mut self, word: u16, len: usize, val: u32) -> CasperResult<()> {
        for i in 0..len {
            self.write_word(word + i as u16, val)?;
        }
        Ok(())
    }
}

/// Bounds check shared by the engine implementations
pub(crate) fn check_word(word: u16) -> CasperResult<()> {
    if usize::from(word) < CASPER_RAM_WORDS {
        Ok(())
    } else {
        Err(CasperError::DRIVER_CASPER_ENGINE_FAULT)
    }
}
