//! # Stabilisation control module
//!
//! Stabilisation control is responsible for keeping the aircraft on the
//! demanded heading, altitude and airspeed. It does this with a cascade of
//! feedback loops: the heading and altitude loops produce bounded roll and
//! pitch demands, which the inner attitude loops convert into surface
//! deflections using a proportional attitude term and a rate damping term.
//! The airspeed loop drives the throttle directly.
//!
//! The inner attitude loops are deliberately PD only - the rate term is the
//! measured body rate, not a differentiated error, which avoids
//! differentiation noise. The outer heading, airspeed and altitude loops are
//! PI, with their outputs saturated to the physically valid ranges before
//! being passed down the cascade.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controllers;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors raised during StabCtrl processing.
///
/// Out of range demands are normalised or saturated rather than rejected, so
/// cyclic processing itself cannot currently fail.
#[derive(Debug, thiserror::Error)]
pub enum StabCtrlError {}
