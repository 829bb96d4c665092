/*++

Licensed under the Apache-2.0 license.

File Name:

    fake_bus.rs

Abstract:

    File contains a fake Bus implementation that records every access.

--*/
use crate::{Bus, BusError, RvAddr, RvData, RvSize};
use std::{cell::RefCell, fmt::Write, rc::Rc};

/// Shared text log. Clones append to the same buffer, so a test can keep a
/// handle to the log of a bus it has moved into the code under test.
#[derive(Clone, Default)]
pub struct Log {
    log: Rc<RefCell<String>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded text and clears the log.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn line(&self, args: std::fmt::Arguments) {
        let mut log = self.log.borrow_mut();
        let _ = log.write_fmt(args);
        log.push('\n');
    }
}

/// A Bus implementation that logs all calls and returns caller-chosen
/// results.
pub struct FakeBus {
    pub log: Log,
    pub read_result: Result<RvData, BusError>,
    pub write_result: Result<(), BusError>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            log: Log::new(),
            read_result: Ok(0),
            write_result: Ok(()),
        }
    }
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for FakeBus {
    fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        self.log
            .line(format_args!("read(RvSize::{size:?}, {addr:#x})"));
        self.read_result
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        self.log
            .line(format_args!("write(RvSize::{size:?}, {addr:#x}, {val:#x})"));
        self.write_result
    }
}
