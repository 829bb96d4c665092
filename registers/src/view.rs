/*++

Licensed under the Apache-2.0 license.

File Name:

    view.rs

Abstract:

    File contains the CPU-side views of the CASPER RAM window. Some parts
    store even and odd words of a double-word in separate banks, so every
    CPU access to coprocessor RAM goes through a MemoryView.

--*/

use crate::CASPER_RAM_SIZE;

/// Translation between logical coprocessor RAM offsets (what the engine
/// sees) and physical offsets inside the CPU address window.
pub trait MemoryView {
    /// Physical byte offset of logical byte offset `logical`
    fn to_physical(&self, logical: u32) -> u32;

    /// Logical byte offset of physical byte offset `physical`, or `None` if
    /// the offset does not back any coprocessor RAM.
    fn to_logical(&self, physical: u32) -> Option<u32>;

    /// Span of the physical window in bytes, holes included
    fn window_size(&self) -> u32;
}

/// Plain linear mapping
#[derive(Debug, Default, Copy, Clone)]
pub struct LinearView;

impl MemoryView for LinearView {
    fn to_physical(&self, logical: u32) -> u32 {
        logical
    }

    fn to_logical(&self, physical: u32) -> Option<u32> {
        (physical < CASPER_RAM_SIZE).then_some(physical)
    }

    fn window_size(&self) -> u32 {
        CASPER_RAM_SIZE
    }
}

/// Even words in bank 0, odd words in bank 1 (bit 14 of the CPU address)
#[derive(Debug, Default, Copy, Clone)]
pub struct InterleavedView;

impl InterleavedView {
    const BANK_SHIFT: u32 = 14;
    const BANK_SIZE: u32 = CASPER_RAM_SIZE / 2;
}

impl MemoryView for InterleavedView {
    fn to_physical(&self, logical: u32) -> u32 {
        ((((logical >> 2) & 1) << Self::BANK_SHIFT) + ((logical >> 3) << 2) + (logical & 3))
            & 0xFFFF
    }

    fn to_logical(&self, physical: u32) -> Option<u32> {
        let bank = physical >> Self::BANK_SHIFT;
        let within = physical & ((1 << Self::BANK_SHIFT) - 1);
        if bank > 1 || within >= Self::BANK_SIZE {
            return None;
        }
        Some(((within >> 2) << 3) | (bank << 2) | (physical & 3))
    }

    fn window_size(&self) -> u32 {
        (1 << Self::BANK_SHIFT) + Self::BANK_SIZE
    }
}

/// RAM layout selector, resolved to a view once at startup
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum Layout {
    #[default]
    Linear,
    Interleaved,
}

impl Layout {
    pub fn view(self) -> &'static dyn MemoryView {
        static LINEAR: LinearView = LinearView;
        static INTERLEAVED: InterleavedView = InterleavedView;
        match self {
            Layout::Linear => &LINEAR,
            Layout::Interleaved => &INTERLEAVED,
        }
    }
}
