/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement wait routines.

--*/

use crate::{CasperError, CasperResult};

/// Spin until `predicate` reports true, polling at most `limit` times.
///
/// # Arguments
///
/// * `predicate` - Completion check; errors abort the wait
/// * `limit` - Maximum number of polls
///
/// # Returns
///
/// * `CasperError::DRIVER_CASPER_TIMEOUT` if the predicate never became true
pub fn until<F>(predicate: F, limit: u32) -> CasperResult<()>
where
    F: Fn() -> CasperResult<bool>,
{
    for _ in 0..limit {
        if predicate()? {
            return Ok(());
        }
    }
    Err(CasperError::DRIVER_CASPER_TIMEOUT)
}
