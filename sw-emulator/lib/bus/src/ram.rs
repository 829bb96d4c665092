/*++

Licensed under the Apache-2.0 license.

File Name:

    ram.rs

Abstract:

    File contains implementation of a word-organised RAM device.

--*/

use crate::{Bus, BusError, RvAddr, RvData, RvSize};

/// Random Access Memory backed by 32-bit words
pub struct Ram {
    words: Vec<u32>,
}

impl Ram {
    /// Create a zero-filled RAM
    ///
    /// # Arguments
    ///
    /// * `size` - Size in bytes; rounded up to a whole word
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size.div_ceil(4)],
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        (self.words.len() * 4) as RvAddr
    }

    /// Word storage
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Zero the whole device
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    fn lane(size: RvSize, addr: RvAddr) -> Option<(usize, u32, u32)> {
        let width = size as u32;
        if addr % width != 0 {
            return None;
        }
        let shift = (addr & 3) * 8;
        let mask = if width == 4 {
            u32::MAX
        } else {
            ((1u32 << (width * 8)) - 1) << shift
        };
        Some(((addr >> 2) as usize, shift, mask))
    }
}

impl Bus for Ram {
    /// Read data of specified size from given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `addr` - Address to read from
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault`
    ///                or `BusError::LoadAddrMisaligned`
    fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let (index, shift, mask) = Self::lane(size, addr).ok_or(BusError::LoadAddrMisaligned)?;
        let word = self.words.get(index).ok_or(BusError::LoadAccessFault)?;
        Ok((word & mask) >> shift)
    }

    /// Write data of specified size to given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the write
    /// * `addr` - Address to write
    /// * `val` - Data to write
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault`
    ///                or `BusError::StoreAddrMisaligned`
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let (index, shift, mask) = Self::lane(size, addr).ok_or(BusError::StoreAddrMisaligned)?;
        let word = self
            .words
            .get_mut(index)
            .ok_or(BusError::StoreAccessFault)?;
        *word = (*word & !mask) | ((val << shift) & mask);
        Ok(())
    }
}
