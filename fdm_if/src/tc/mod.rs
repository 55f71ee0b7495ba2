//! # Telecommand module
//!
//! This module provides the telecommand definitions for the autopilot
//! executable.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod guidance;
