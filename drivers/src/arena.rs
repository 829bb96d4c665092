/*++

Licensed under the Apache-2.0 license.

File Name:

    arena.rs

Abstract:

    File contains the scratch arena that carves coprocessor RAM into
    non-overlapping, double-word aligned slots.

--*/

use crate::{CasperError, CasperResult};
use casper_registers::CASPER_RAM_WORDS;

/// A run of words in coprocessor RAM
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Slot {
    offset: u16,
    len: u16,
}

impl Slot {
    /// Word offset of the first word
    pub fn offset(self) -> u16 {
        self.offset
    }

    /// Length in words
    pub fn len(self) -> usize {
        self.len.into()
    }

    /// Whether the slot spans no words
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Word offset of word `index` of the slot
    pub fn at(self, index: usize) -> u16 {
        self.offset + index as u16
    }

    /// Whether the two slots share any word
    pub fn overlaps(self, other: Slot) -> bool {
        let (a_end, b_end) = (self.offset + self.len, other.offset + other.len);
        self.offset < b_end && other.offset < a_end
    }
}

/// Bump allocator over coprocessor RAM.
///
/// Slots are handed out once and never freed; a new arena is laid out for
/// every session.
#[derive(Debug)]
pub struct Arena {
    start: u16,
    next: u16,
    end: u16,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Arena spanning the whole coprocessor RAM
    pub fn new() -> Self {
        Self::with_bounds(0, CASPER_RAM_WORDS as u16)
    }

    /// Arena spanning words `[start, end)`, `start` rounded up to a double-word
    pub fn with_bounds(start: u16, end: u16) -> Self {
        let start = (start + 1) & !1;
        Self {
            start,
            next: start,
            end: end.min(CASPER_RAM_WORDS as u16),
        }
    }

    /// Allocate a slot of `len` words, rounded up to whole double-words.
    ///
    /// # Returns
    ///
    /// * `CasperError::DRIVER_CASPER_SCRATCH_EXHAUSTED` if the RAM is full
    pub fn alloc(&mut self, len: usize) -> CasperResult<Slot> {
        let len = len.div_ceil(2) * 2;
        let end = usize::from(self.next) + len;
        if end > usize::from(self.end) {
            return Err(CasperError::DRIVER_CASPER_SCRATCH_EXHAUSTED);
        }
        let slot = Slot {
            offset: self.next,
            len: len as u16,
        };
        self.next = end as u16;
        Ok(slot)
    }

    /// Allocate `N` slots of `len` words each
    pub fn alloc_array<const N: usize>(&mut self, len: usize) -> CasperResult<[Slot; N]> {
        let mut slots = [Slot::default(); N];
        for slot in slots.iter_mut() {
            *slot = self.alloc(len)?;
        }
        Ok(slots)
    }

    /// Everything handed out so far, as one slot
    pub fn used(&self) -> Slot {
        Slot {
            offset: self.start,
            len: self.next - self.start,
        }
    }
}

/// Fail with `DRIVER_CASPER_SCRATCH_OVERLAP` if `dst` shares storage with
/// any of `others`.
pub(crate) fn ensure_distinct(dst: Slot, others: &[Slot]) -> CasperResult<()> {
    if others.iter().any(|other| dst.overlaps(*other)) {
        return Err(CasperError::DRIVER_CASPER_SCRATCH_OVERLAP);
    }
    Ok(())
}
