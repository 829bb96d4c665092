/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the CASPER bignum coprocessor driver.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod arena;
mod casper;
mod curve;
mod ecc;
mod engine;
mod invert;
mod mmio;
mod mont;
mod point;
mod rsa;
mod scalar;
mod wait;

pub use arena::{Arena, Slot};
pub use casper::Casper;
pub use casper_error::{CasperError, CasperResult};
pub use casper_registers::{InterleavedView, Layout, LinearView, MemoryView, Opcode};
pub use curve::{Curve, CurveParams, MAX_LIMBS};
pub use ecc::EccSession;
pub use engine::{BignumEngine, DEFAULT_POLL_LIMIT};
pub use mmio::MmioEngine;
pub use mont::{montgomery_np, Montgomery};
pub use point::JacPoint;
pub use rsa::{RsaSession, RSA_MAX_WORDS};

cfg_if::cfg_if! {
    if #[cfg(feature = "emu")] {
        mod emu;

        pub use emu::EmuEngine;
    }
}
