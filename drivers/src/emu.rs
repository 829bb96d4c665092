/*++

Licensed under the Apache-2.0 license.

File Name:

    emu.rs

Abstract:

    File contains the BignumEngine that drives the software model of the
    CASPER coprocessor over an emulator bus.

--*/

use crate::engine::{check_word, BignumEngine, DEFAULT_POLL_LIMIT};
use crate::{CasperError, CasperResult};
use casper_emu_bus::{Bus, BusError, RvAddr, RvSize};
use casper_emu_periph::CasperRootBus;
use casper_registers::{
    offsets, Ctrl0, Ctrl1, Layout, MemoryView, Opcode, Status, CASPER_RAM_ADDR, CASPER_REGS_ADDR,
};
use tock_registers::LocalRegisterCopy;

/// Engine backed by an emulated coprocessor
pub struct EmuEngine<B: Bus = CasperRootBus> {
    bus: B,
    view: &'static dyn MemoryView,
    poll_limit: u32,
}

impl EmuEngine<CasperRootBus> {
    /// Create an engine over a fresh emulated coprocessor
    ///
    /// # Arguments
    ///
    /// * `layout` - RAM layout of the emulated part
    pub fn new(layout: Layout) -> Self {
        Self::with_bus(CasperRootBus::new(layout), layout)
    }

    /// Number of coprocessor operations executed so far
    pub fn op_count(&self) -> u64 {
        self.bus.casper.op_count()
    }
}

impl<B: Bus> EmuEngine<B> {
    /// Create an engine over an arbitrary bus
    ///
    /// # Arguments
    ///
    /// * `bus` - Bus decoding the CASPER register block and RAM window
    /// * `layout` - RAM layout the bus presents
    pub fn with_bus(bus: B, layout: Layout) -> Self {
        Self {
            bus,
            view: layout.view(),
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    /// Replace the number of status polls allowed per operation
    pub fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    fn ram_addr(&self, word: u16) -> CasperResult<RvAddr> {
        check_word(word)?;
        Ok(CASPER_RAM_ADDR + self.view.to_physical(u32::from(word) << 2))
    }

    fn read(&self, addr: RvAddr) -> CasperResult<u32> {
        self.bus
            .read(RvSize::Word, addr)
            .map_err(|err| fault(err, addr))
    }

    fn write(&mut self, addr: RvAddr, val: u32) -> CasperResult<()> {
        self.bus
            .write(RvSize::Word, addr, val)
            .map_err(|err| fault(err, addr))
    }
}

fn fault(err: BusError, addr: RvAddr) -> CasperError {
    log::warn!("casper: bus error {:?} at {:#010x}", err, addr);
    CasperError::DRIVER_CASPER_ENGINE_FAULT
}

impl<B: Bus> BignumEngine for EmuEngine<B> {
    fn read_word(&self, word: u16) -> CasperResult<u32> {
        let addr = self.ram_addr(word)?;
        self.read(addr)
    }

    fn write_word(&mut self, word: u16, val: u32) -> CasperResult<()> {
        let addr = self.ram_addr(word)?;
        self.write(addr, val)
    }

    fn set_operands(&mut self, ab: u16, cd: u16) -> CasperResult<()> {
        check_word(ab)?;
        check_word(cd)?;
        let ctrl0 = Ctrl0::ABOFF.val(ab.into()) + Ctrl0::CDOFF.val(cd.into());
        self.write(CASPER_REGS_ADDR + offsets::CTRL0, ctrl0.value)
    }

    fn start(&mut self, iter: u8, op: Opcode, result: u16) -> CasperResult<()> {
        check_word(result)?;
        let ctrl1 = Ctrl1::ITER.val(iter.into())
            + Ctrl1::MODE.val(op as u32)
            + Ctrl1::RESOFF.val(result.into());
        self.write(CASPER_REGS_ADDR + offsets::CTRL1, ctrl1.value)
    }

    fn done(&self) -> CasperResult<bool> {
        let status = self.read(CASPER_REGS_ADDR + offsets::STATUS)?;
        Ok(LocalRegisterCopy::<u32, Status::Register>::new(status).is_set(Status::DONE))
    }

    fn poll_limit(&self) -> u32 {
        self.poll_limit
    }
}
