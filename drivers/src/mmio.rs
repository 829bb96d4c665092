/*++

Licensed under the Apache-2.0 license.

File Name:

    mmio.rs

Abstract:

    File contains the BignumEngine backed by a memory-mapped CASPER
    register block and RAM window.

--*/

use crate::engine::{check_word, BignumEngine, DEFAULT_POLL_LIMIT};
use crate::CasperResult;
use casper_registers::{CasperRegisters, Ctrl0, Ctrl1, MemoryView, Opcode, Status};
use tock_registers::interfaces::{Readable, Writeable};

/// Memory-mapped CASPER coprocessor
pub struct MmioEngine {
    regs: *const CasperRegisters,
    ram: *mut u32,
    view: &'static dyn MemoryView,
    poll_limit: u32,
}

impl MmioEngine {
    /// Create an engine over a mapped coprocessor.
    ///
    /// # Safety
    ///
    /// `regs` must point to the CASPER register block and `ram` to the start
    /// of its RAM window, spanning `view.window_size()` bytes. Both must stay
    /// mapped for the lifetime of the engine and must not be accessed through
    /// any other path meanwhile.
    pub unsafe fn new(
        regs: *const CasperRegisters,
        ram: *mut u32,
        view: &'static dyn MemoryView,
    ) -> Self {
        Self {
            regs,
            ram,
            view,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    /// Replace the number of status polls allowed per operation
    pub fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    fn regs(&self) -> &CasperRegisters {
        // SAFETY: validity of the register block is a construction contract
        unsafe { &*self.regs }
    }

    fn ram_word(&self, word: u16) -> CasperResult<*mut u32> {
        check_word(word)?;
        let physical = self.view.to_physical(u32::from(word) << 2);
        // SAFETY: the view keeps in-range offsets inside the window
        Ok(unsafe { self.ram.add((physical >> 2) as usize) })
    }
}

impl BignumEngine for MmioEngine {
    fn read_word(&self, word: u16) -> CasperResult<u32> {
        let ptr = self.ram_word(word)?;
        // SAFETY: see `ram_word`
        Ok(unsafe { ptr.read_volatile() })
    }

    fn write_word(&mut self, word: u16, val: u32) -> CasperResult<()> {
        let ptr = self.ram_word(word)?;
        // SAFETY: see `ram_word`
        unsafe { ptr.write_volatile(val) };
        Ok(())
    }

    fn set_operands(&mut self, ab: u16, cd: u16) -> CasperResult<()> {
        check_word(ab)?;
        check_word(cd)?;
        self.regs()
            .ctrl0
            .write(Ctrl0::ABOFF.val(ab.into()) + Ctrl0::CDOFF.val(cd.into()));
        Ok(())
    }

    fn start(&mut self, iter: u8, op: Opcode, result: u16) -> CasperResult<()> {
        check_word(result)?;
        self.regs().ctrl1.write(
            Ctrl1::ITER.val(iter.into())
                + Ctrl1::MODE.val(op as u32)
                + Ctrl1::RESOFF.val(result.into()),
        );
        Ok(())
    }

    fn done(&self) -> CasperResult<bool> {
        Ok(self.regs().status.is_set(Status::DONE))
    }

    fn poll_limit(&self) -> u32 {
        self.poll_limit
    }
}
