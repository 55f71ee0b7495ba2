//! # Flight dynamics interface crate.
//!
//! Provides the common interface types between the autopilot and the flight
//! dynamics model, along with the guidance telecommand definitions.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// State and demand definitions for the flight dynamics model boundary
pub mod eqpt;

/// Telecommand definitions
pub mod tc;
