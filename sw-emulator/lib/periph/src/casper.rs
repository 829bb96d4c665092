/*++

Licensed under the Apache-2.0 license.

File Name:

    casper.rs

Abstract:

    File contains the CASPER bignum coprocessor peripheral implementation.
    Operations run to completion in plain 64-bit arithmetic when CTRL1 is
    written.

--*/

use casper_emu_bus::{Bus, BusError, Ram, RvAddr, RvData, RvSize};
use casper_registers::{
    offsets, Ctrl0, Ctrl1, Layout, MemoryView, Opcode, Status, CASPER_RAM_WORDS,
};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::InMemoryRegister;

/// CASPER coprocessor
pub struct Casper {
    /// Operand address register
    ctrl0: InMemoryRegister<u32, Ctrl0::Register>,

    /// Operation control register
    ctrl1: InMemoryRegister<u32, Ctrl1::Register>,

    /// Status register
    status: InMemoryRegister<u32, Status::Register>,

    /// Loader register (stored, not interpreted)
    loader: u32,

    /// Interrupt enable mask
    int_en: u32,

    /// Coprocessor RAM, stored in CPU (physical) order
    ram: Ram,

    /// Mapping between engine and CPU RAM offsets
    view: &'static dyn MemoryView,

    /// Number of operations executed since reset
    op_count: u64,
}

impl Casper {
    /// Create a new instance of the CASPER coprocessor
    ///
    /// # Arguments
    ///
    /// * `layout` - RAM layout presented to the CPU
    pub fn new(layout: Layout) -> Self {
        let view = layout.view();
        Self {
            ctrl0: InMemoryRegister::new(0),
            ctrl1: InMemoryRegister::new(0),
            status: InMemoryRegister::new(0),
            loader: 0,
            int_en: 0,
            ram: Ram::new(view.window_size() as usize),
            view,
            op_count: 0,
        }
    }

    /// Number of operations executed since reset
    pub fn op_count(&self) -> u64 {
        self.op_count
    }

    /// Size of the CPU-visible RAM window in bytes
    pub fn ram_window_size(&self) -> RvAddr {
        self.view.window_size()
    }

    /// Reset registers and clear RAM
    pub fn reset(&mut self) {
        self.ctrl0.set(0);
        self.ctrl1.set(0);
        self.status.set(0);
        self.loader = 0;
        self.int_en = 0;
        self.ram.clear();
        self.op_count = 0;
    }

    /// Read from the RAM window
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `offset` - Byte offset inside the CPU RAM window
    pub fn read_ram(&self, size: RvSize, offset: RvAddr) -> Result<RvData, BusError> {
        self.view
            .to_logical(offset)
            .ok_or(BusError::LoadAccessFault)?;
        self.ram.read(size, offset)
    }

    /// Write to the RAM window
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the write
    /// * `offset` - Byte offset inside the CPU RAM window
    /// * `val` - Data to write
    pub fn write_ram(&mut self, size: RvSize, offset: RvAddr, val: RvData) -> Result<(), BusError> {
        self.view
            .to_logical(offset)
            .ok_or(BusError::StoreAccessFault)?;
        self.ram.write(size, offset, val)
    }

    fn word(&self, word: u32) -> Result<u32, BusError> {
        if word as usize >= CASPER_RAM_WORDS {
            return Err(BusError::LoadAccessFault);
        }
        self.ram.read(RvSize::Word, self.view.to_physical(word << 2))
    }

    fn set_word(&mut self, word: u32, val: u32) -> Result<(), BusError> {
        if word as usize >= CASPER_RAM_WORDS {
            return Err(BusError::StoreAccessFault);
        }
        self.ram
            .write(RvSize::Word, self.view.to_physical(word << 2), val)
    }

    /// Double-word `index` of the run starting at word offset `base`
    fn dword(&self, base: u32, index: u32) -> Result<u64, BusError> {
        let word = base + 2 * index;
        Ok(u64::from(self.word(word)?) | (u64::from(self.word(word + 1)?) << 32))
    }

    fn set_dword(&mut self, base: u32, index: u32, val: u64) -> Result<(), BusError> {
        let word = base + 2 * index;
        self.set_word(word, val as u32)?;
        self.set_word(word + 1, (val >> 32) as u32)
    }

    /// Execute the operation described by CTRL0/CTRL1
    fn execute(&mut self) -> Result<(), BusError> {
        let ab = self.ctrl0.read(Ctrl0::ABOFF);
        let cd = self.ctrl0.read(Ctrl0::CDOFF);
        let iter = self.ctrl1.read(Ctrl1::ITER);
        let res = self.ctrl1.read(Ctrl1::RESOFF);
        let op = Opcode::try_from(self.ctrl1.read(Ctrl1::MODE)).map_err(|mode| {
            log::warn!("casper: unsupported mode {:#x}", mode);
            BusError::StoreAccessFault
        })?;
        let count = iter + 1;

        log::trace!(
            "casper: {:?} iter={} ab={:#x} cd={:#x} res={:#x}",
            op,
            iter,
            ab,
            cd,
            res
        );

        match op {
            Opcode::Mul6464NoSum | Opcode::Mul6464Sum | Opcode::Mul6464FullSum => {
                let a = u128::from(self.dword(ab, 0)?);
                let mut carry = 0u128;
                for j in 0..count {
                    let acc = if op == Opcode::Mul6464NoSum {
                        0
                    } else {
                        u128::from(self.dword(res, j)?)
                    };
                    let t = a * u128::from(self.dword(cd, j)?) + acc + carry;
                    self.set_dword(res, j, t as u64)?;
                    carry = t >> 64;
                }
                let top = if op == Opcode::Mul6464FullSum {
                    self.dword(res, count)?.wrapping_add(carry as u64)
                } else {
                    carry as u64
                };
                self.set_dword(res, count, top)?;
            }
            Opcode::Add64 => {
                let mut carry = 0u128;
                for j in 0..count {
                    let t = u128::from(self.dword(res, j)?)
                        + u128::from(self.dword(ab, j)?)
                        + carry;
                    self.set_dword(res, j, t as u64)?;
                    carry = t >> 64;
                }
            }
            Opcode::Sub64 => {
                let mut borrow = false;
                for j in 0..count {
                    let (t, b1) = self.dword(res, j)?.overflowing_sub(self.dword(ab, j)?);
                    let (t, b2) = t.overflowing_sub(u64::from(borrow));
                    self.set_dword(res, j, t)?;
                    borrow = b1 | b2;
                }
            }
            Opcode::Copy => {
                for j in 0..count {
                    let val = self.dword(ab, j)?;
                    self.set_dword(res, j, val)?;
                }
            }
        }

        self.op_count += 1;
        Ok(())
    }
}

impl Bus for Casper {
    /// Read data of specified size from given register offset
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `addr` - Register offset to read from
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault`
    fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            return Err(BusError::LoadAccessFault);
        }
        match addr {
            offsets::CTRL0 => Ok(self.ctrl0.get()),
            offsets::CTRL1 => Ok(self.ctrl1.get()),
            offsets::LOADER => Ok(self.loader),
            offsets::STATUS => Ok(self.status.get()),
            offsets::INTENSET => Ok(self.int_en),
            offsets::INTSTAT => Ok(self.status.read(Status::DONE) & self.int_en),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    /// Write data of specified size to given register offset
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the write
    /// * `addr` - Register offset to write
    /// * `val` - Data to write
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault`
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if size != RvSize::Word {
            return Err(BusError::StoreAccessFault);
        }
        match addr {
            offsets::CTRL0 => self.ctrl0.set(val),
            offsets::CTRL1 => {
                self.ctrl1.set(val);
                self.status.write(Status::BUSY::SET);
                let result = self.execute();
                self.status.write(Status::DONE::SET);
                result?;
            }
            offsets::LOADER => self.loader = val,
            offsets::INTENSET => self.int_en |= val,
            offsets::INTENCLR => self.int_en &= !val,
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u32 = 0x100;
    const B: u32 = 0x120;
    const R: u32 = 0x140;

    fn load(casper: &mut Casper, word: u32, vals: &[u32]) {
        for (i, val) in vals.iter().enumerate() {
            casper.set_word(word + i as u32, *val).unwrap();
        }
    }

    fn dump(casper: &Casper, word: u32, len: u32) -> Vec<u32> {
        (0..len).map(|i| casper.word(word + i).unwrap()).collect()
    }

    fn run(casper: &mut Casper, ab: u32, cd: u32, iter: u32, op: Opcode, res: u32) {
        let ctrl0 = Ctrl0::ABOFF.val(ab) + Ctrl0::CDOFF.val(cd);
        let ctrl1 = Ctrl1::ITER.val(iter) + Ctrl1::MODE.val(op as u32) + Ctrl1::RESOFF.val(res);
        casper
            .write(RvSize::Word, offsets::CTRL0, ctrl0.value)
            .unwrap();
        casper
            .write(RvSize::Word, offsets::CTRL1, ctrl1.value)
            .unwrap();
        let status = casper.read(RvSize::Word, offsets::STATUS).unwrap();
        assert_eq!(status & 1, 1);
    }

    #[test]
    fn test_add_with_carry_chain() {
        for layout in [Layout::Linear, Layout::Interleaved] {
            let mut casper = Casper::new(layout);
            load(&mut casper, R, &[0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 5, 0]);
            load(&mut casper, A, &[1, 0, 0, 0, 0, 0]);
            run(&mut casper, A, 0, 2, Opcode::Add64, R);
            assert_eq!(dump(&casper, R, 6), [0, 0, 0, 0, 6, 0]);
            assert_eq!(casper.op_count(), 1);
        }
    }

    #[test]
    fn test_sub_with_borrow_wraps() {
        let mut casper = Casper::new(Layout::Linear);
        load(&mut casper, R, &[0, 0, 0, 0]);
        load(&mut casper, A, &[1, 0, 0, 0]);
        run(&mut casper, A, 0, 1, Opcode::Sub64, R);
        assert_eq!(dump(&casper, R, 4), [u32::MAX; 4]);
    }

    #[test]
    fn test_multiply_variants() {
        let mut casper = Casper::new(Layout::Interleaved);
        // multiplier 2^64 - 1, multiplicand run [2^64 - 1, 1]
        load(&mut casper, A, &[u32::MAX, u32::MAX]);
        load(&mut casper, B, &[u32::MAX, u32::MAX, 1, 0]);

        load(&mut casper, R, &[7, 7, 7, 7, 7, 7]);
        run(&mut casper, A, B, 1, Opcode::Mul6464NoSum, R);
        // (2^64-1) * (2^64 + 2^64 - 1) = 2^129 - 2^65 - 2^64 + 1
        assert_eq!(dump(&casper, R, 6), [1, 0, 0xFFFF_FFFD, u32::MAX, 1, 0]);

        load(&mut casper, R, &[1, 0, 0, 0, 0, 0]);
        run(&mut casper, A, B, 1, Opcode::Mul6464Sum, R);
        assert_eq!(dump(&casper, R, 6), [2, 0, 0xFFFF_FFFD, u32::MAX, 1, 0]);

        load(&mut casper, R, &[0, 0, 0, 0, 5, 0]);
        run(&mut casper, A, B, 1, Opcode::Mul6464FullSum, R);
        assert_eq!(dump(&casper, R, 6), [1, 0, 0xFFFF_FFFD, u32::MAX, 6, 0]);
    }

    #[test]
    fn test_copy_shifts_down() {
        let mut casper = Casper::new(Layout::Linear);
        load(&mut casper, R, &[1, 2, 3, 4, 5, 6]);
        run(&mut casper, R + 2, 0, 1, Opcode::Copy, R);
        assert_eq!(dump(&casper, R, 6), [3, 4, 5, 6, 5, 6]);
    }

    #[test]
    fn test_ram_window_interleaved() {
        let mut casper = Casper::new(Layout::Interleaved);
        casper.write_ram(RvSize::Word, 0x0000, 0x1111).unwrap();
        casper.write_ram(RvSize::Word, 0x4000, 0x2222).unwrap();
        assert_eq!(casper.dword(0, 0).unwrap(), 0x2222_0000_1111);
        assert_eq!(
            casper.write_ram(RvSize::Word, 0x2000, 0),
            Err(BusError::StoreAccessFault)
        );
        assert_eq!(
            casper.read_ram(RvSize::Word, 0x5000),
            Err(BusError::LoadAccessFault)
        );
    }

    #[test]
    fn test_unsupported_mode() {
        let mut casper = Casper::new(Layout::Linear);
        let ctrl1 = Ctrl1::MODE.val(0x04);
        assert_eq!(
            casper.write(RvSize::Word, offsets::CTRL1, ctrl1.value),
            Err(BusError::StoreAccessFault)
        );
        assert_eq!(casper.status.read(Status::DONE), 1);
        assert_eq!(casper.op_count(), 0);
    }

    #[test]
    fn test_out_of_range_run() {
        let mut casper = Casper::new(Layout::Linear);
        assert_eq!(
            casper.set_word(CASPER_RAM_WORDS as u32, 0),
            Err(BusError::StoreAccessFault)
        );
        let ctrl0 = Ctrl0::ABOFF.val(0x7F0);
        casper
            .write(RvSize::Word, offsets::CTRL0, ctrl0.value)
            .unwrap();
        let ctrl1 = Ctrl1::ITER.val(0x20) + Ctrl1::MODE.val(Opcode::Copy as u32);
        assert!(casper
            .write(RvSize::Word, offsets::CTRL1, ctrl1.value)
            .is_err());
    }

    #[test]
    fn test_interrupt_status() {
        let mut casper = Casper::new(Layout::Linear);
        casper.write(RvSize::Word, offsets::INTENSET, 1).unwrap();
        run(&mut casper, A, 0, 0, Opcode::Copy, R);
        assert_eq!(casper.read(RvSize::Word, offsets::INTSTAT), Ok(1));
        casper.write(RvSize::Word, offsets::INTENCLR, 1).unwrap();
        assert_eq!(casper.read(RvSize::Word, offsets::INTSTAT), Ok(0));
        casper.reset();
        assert_eq!(casper.read(RvSize::Word, offsets::STATUS), Ok(0));
    }
}
