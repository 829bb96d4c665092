/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the CASPER Emulator Bus library.

--*/
mod bus;
mod ram;
pub mod testing;

pub use crate::bus::{Bus, BusError, RvAddr, RvData, RvSize};
pub use crate::ram::Ram;
