/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the CASPER coprocessor register map, control word
    bitfields, opcode table and RAM window geometry.

--*/

#![no_std]

mod view;

pub use view::{InterleavedView, Layout, LinearView, MemoryView};

use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

/// Base address of the CASPER register block
pub const CASPER_REGS_ADDR: u32 = 0x400A_5000;

/// Base address of the CASPER RAM window as seen by the CPU
pub const CASPER_RAM_ADDR: u32 = 0x1400_0000;

/// Size of the coprocessor RAM in bytes
pub const CASPER_RAM_SIZE: u32 = 0x2000;

/// Size of the coprocessor RAM in 32-bit words
pub const CASPER_RAM_WORDS: usize = (CASPER_RAM_SIZE / 4) as usize;

/// Largest `ITER` value, i.e. runs of up to 256 double-words
pub const CASPER_MAX_ITER: u32 = 0xFF;

register_bitfields! [
    u32,

    /// Operand address register
    pub Ctrl0 [
        ABOFF OFFSET(2) NUMBITS(11) [],
        CDOFF OFFSET(18) NUMBITS(11) [],
    ],

    /// Operation control register; writing it starts the operation
    pub Ctrl1 [
        ITER OFFSET(0) NUMBITS(8) [],
        MODE OFFSET(8) NUMBITS(8) [],
        RESOFF OFFSET(18) NUMBITS(11) [],
    ],

    /// Status register
    pub Status [
        DONE OFFSET(0) NUMBITS(1) [],
        BUSY OFFSET(4) NUMBITS(1) [],
    ],
];

register_structs! {
    /// CASPER register block
    pub CasperRegisters {
        (0x000 => pub ctrl0: ReadWrite<u32, Ctrl0::Register>),
        (0x004 => pub ctrl1: ReadWrite<u32, Ctrl1::Register>),
        (0x008 => pub loader: ReadWrite<u32>),
        (0x00C => pub status: ReadOnly<u32, Status::Register>),
        (0x010 => pub intenset: ReadWrite<u32>),
        (0x014 => pub intenclr: WriteOnly<u32>),
        (0x018 => pub intstat: ReadOnly<u32>),
        (0x01C => @END),
    }
}

/// Register offsets inside the register block
pub mod offsets {
    pub const CTRL0: u32 = 0x00;
    pub const CTRL1: u32 = 0x04;
    pub const LOADER: u32 = 0x08;
    pub const STATUS: u32 = 0x0C;
    pub const INTENSET: u32 = 0x10;
    pub const INTENCLR: u32 = 0x14;
    pub const INTSTAT: u32 = 0x18;

    /// Size of the register block in bytes
    pub const BLOCK_SIZE: u32 = 0x1C;
}

/// Coprocessor operations over runs of 64-bit double-words.
///
/// For the multiplies, the single double-word at `ABOFF` is multiplied into
/// the run starting at `CDOFF` and accumulated at `RESOFF`. For the other
/// operations the source run starts at `ABOFF` and the result run at `RESOFF`.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Opcode {
    /// `RES[j] = lo(A * CD[j] + c)`; carry written to `RES[iter + 1]`
    Mul6464NoSum = 0x01,

    /// `RES[j] += A * CD[j] + c`; carry written to `RES[iter + 1]`
    Mul6464Sum = 0x02,

    /// `RES[j] += A * CD[j] + c`; carry added into `RES[iter + 1]`
    Mul6464FullSum = 0x03,

    /// `RES[j] += AB[j] + c`
    Add64 = 0x08,

    /// `RES[j] -= AB[j] + b`
    Sub64 = 0x09,

    /// `RES[j] = AB[j]`, ascending
    Copy = 0x14,
}

impl TryFrom<u32> for Opcode {
    type Error = u32;

    fn try_from(val: u32) -> Result<Self, Self::Error> {
        match val {
            0x01 => Ok(Opcode::Mul6464NoSum),
            0x02 => Ok(Opcode::Mul6464Sum),
            0x03 => Ok(Opcode::Mul6464FullSum),
            0x08 => Ok(Opcode::Add64),
            0x09 => Ok(Opcode::Sub64),
            0x14 => Ok(Opcode::Copy),
            _ => Err(val),
        }
    }
}
