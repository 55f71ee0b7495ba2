//! # Guidance module
//!
//! Guidance converts a navigational goal into the heading, altitude and
//! airspeed demands flown by the stabilisation stack. Three goal types are
//! supported:
//!
//! - `Home` - home directly onto a local-plane target with no track
//!   constraint.
//! - `Track` - fly the track frozen at goal acceptance, steering back onto
//!   it when displaced rather than homing on the target. This prevents the
//!   curved dog-leg paths homing produces when the aircraft is pushed off
//!   the line.
//! - `Profile` / `Fillet` - fly an ordered list of waypoints. The plain
//!   profile follower sequences legs at the capture radius; the fillet
//!   follower smooths each corner with a circular arc, switching between
//!   straight-leg tracking and arc tracking as the transition half-planes
//!   are crossed.
//!
//! Steering on a track uses a proportional closure law: the demanded
//! heading is offset from the track bearing by a term proportional to the
//! off-track angle scaled by the distance still to go, so the aircraft
//! closes on the track aggressively when far out and settles onto it as the
//! remaining distance shrinks.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod fillet;
mod home;
mod params;
mod profile;
mod state;
mod track;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use fillet::*;
pub use home::*;
pub use params::Params;
pub use profile::*;
pub use state::*;
pub use track::*;

use crate::nav::NavError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    /// A goal is already active. This error occurs when attempting to begin
    /// a new goal before the current one has finished. To replace the active
    /// goal first call `abort`.
    #[error("Attempted to begin a guidance goal while one is already active")]
    GoalAlreadyActive,

    /// The supplied profile is not flyable.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The navigation utility was queried without a target set.
    #[error(transparent)]
    Nav(#[from] NavError),

    /// A leg index was reached which does not exist in the profile. The
    /// profile validity checks at goal acceptance should make this
    /// impossible.
    #[error("Leg {0} does not exist in the active profile")]
    InvalidLeg(usize),
}
