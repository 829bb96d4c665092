/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the CASPER crates for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// CASPER Error Type
/// Derives debug, copy, clone, eq, and partial eq
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CasperError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: CasperError = CasperError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl CasperError {
    /// Create a CASPER error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. Use `CasperError::try_from()` for runtime values.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("CasperError cannot be 0"),
        }
    }

    define_error_constants![
        (
            DRIVER_CASPER_TIMEOUT,
            0x0001_0001,
            "Driver Error: CASPER operation did not signal completion"
        ),
        (
            DRIVER_CASPER_ENGINE_FAULT,
            0x0001_0002,
            "Driver Error: CASPER engine rejected an access or opcode"
        ),
        (
            DRIVER_CASPER_INVALID_WORD_LEN,
            0x0001_0003,
            "Driver Error: CASPER operand word length is invalid"
        ),
        (
            DRIVER_CASPER_INVALID_MODULUS,
            0x0001_0004,
            "Driver Error: CASPER modulus must be odd and greater than one"
        ),
        (
            DRIVER_CASPER_SCRATCH_EXHAUSTED,
            0x0001_0005,
            "Driver Error: CASPER scratch arena does not fit in coprocessor RAM"
        ),
        (
            DRIVER_CASPER_SCRATCH_OVERLAP,
            0x0001_0006,
            "Driver Error: CASPER scratch slots overlap"
        ),
        (
            DRIVER_CASPER_POINT_NOT_ON_CURVE,
            0x0001_0007,
            "Driver Error: CASPER point is not on the curve"
        ),
        (
            DRIVER_CASPER_SCALAR_OUT_OF_RANGE,
            0x0001_0008,
            "Driver Error: CASPER scalar is outside [1, q)"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::CasperError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::CasperError(val)
    }
}

impl From<CasperError> for core::num::NonZeroU32 {
    fn from(val: CasperError) -> Self {
        val.0
    }
}

impl From<CasperError> for u32 {
    fn from(val: CasperError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for CasperError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        NonZeroU32::try_from(val).map(CasperError)
    }
}

impl core::fmt::Display for CasperError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CASPER error 0x{:08x}", self.0.get())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CasperError {}

pub type CasperResult<T> = Result<T, CasperError>;
