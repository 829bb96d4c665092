/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains exports for code useful for testing Bus clients.

--*/
mod fake_bus;

pub use fake_bus::{FakeBus, Log};
