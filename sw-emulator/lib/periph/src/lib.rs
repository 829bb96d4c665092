/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the CASPER Emulator Peripheral library.

--*/

mod casper;
mod root_bus;

pub use casper::Casper;
pub use root_bus::CasperRootBus;
