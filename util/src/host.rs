//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while querying the host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("The software root environment variable (AP_SW_ROOT) is not set")]
    SwRootNotSet,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the autopilot software.
///
/// The root is pointed to by the `AP_SW_ROOT` environment variable, and is
/// used to resolve the `params` and `sessions` directories.
pub fn get_ap_sw_root() -> Result<PathBuf, HostError> {
    match env::var("AP_SW_ROOT") {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => Err(HostError::SwRootNotSet),
    }
}
