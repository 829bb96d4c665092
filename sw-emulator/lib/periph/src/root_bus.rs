/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the system bus exposing the CASPER register block and its
    RAM window at their CPU addresses.

--*/

use crate::Casper;
use casper_emu_bus::{Bus, BusError, RvAddr, RvData, RvSize};
use casper_registers::{offsets, Layout, CASPER_RAM_ADDR, CASPER_REGS_ADDR};

/// System bus with a single CASPER instance
pub struct CasperRootBus {
    pub casper: Casper,
}

impl CasperRootBus {
    pub fn new(layout: Layout) -> Self {
        Self {
            casper: Casper::new(layout),
        }
    }

    fn regs_offset(addr: RvAddr) -> Option<RvAddr> {
        addr.checked_sub(CASPER_REGS_ADDR)
            .filter(|offset| *offset < offsets::BLOCK_SIZE)
    }

    fn ram_offset(&self, addr: RvAddr) -> Option<RvAddr> {
        addr.checked_sub(CASPER_RAM_ADDR)
            .filter(|offset| *offset < self.casper.ram_window_size())
    }
}

impl Bus for CasperRootBus {
    fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if let Some(offset) = Self::regs_offset(addr) {
            return self.casper.read(size, offset);
        }
        match self.ram_offset(addr) {
            Some(offset) => self.casper.read_ram(size, offset),
            None => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if let Some(offset) = Self::regs_offset(addr) {
            return self.casper.write(size, offset, val);
        }
        match self.ram_offset(addr) {
            Some(offset) => self.casper.write_ram(size, offset, val),
            None => Err(BusError::StoreAccessFault),
        }
    }
}
