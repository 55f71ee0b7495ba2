//! # Guidance Telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands handed from the guidance layer to the stabilisation stack.
///
/// These can also be commanded directly from the ground with the `hold`
/// telecommand, bypassing the guidance laws.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, StructOpt)]
pub struct HoldDems {
    /// Demanded heading in degrees, [0, 360) compass domain.
    pub heading_deg: f64,

    /// Demanded altitude in meters above sea level.
    pub alt_m: f64,

    /// Demanded airspeed in knots.
    pub speed_kt: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be performed by the guidance system.
#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
pub enum GuidanceCmd {
    /// Home directly onto a local-plane target, with no track constraint.
    #[structopt(name = "home")]
    Home {
        /// Northing offset of the target in the local plane.
        ///
        /// Units: meters
        north_m: f64,

        /// Easting offset of the target in the local plane.
        ///
        /// Units: meters
        east_m: f64,

        /// Altitude to hold while homing.
        ///
        /// Units: meters above sea level
        alt_m: f64,
    },

    /// Fly the track from the current position to a local-plane target,
    /// steering back onto the track when displaced.
    #[structopt(name = "track")]
    Track {
        /// Northing offset of the target in the local plane.
        ///
        /// Units: meters
        north_m: f64,

        /// Easting offset of the target in the local plane.
        ///
        /// Units: meters
        east_m: f64,

        /// Altitude to hold along the track.
        ///
        /// Units: meters above sea level
        alt_m: f64,
    },

    /// Follow the waypoint profile stored in the given profile file,
    /// sequencing legs at the capture radius.
    #[structopt(name = "follow")]
    Follow {
        /// The path to the profile file to load.
        path: PathBuf,
    },

    /// Follow the waypoint profile stored in the given profile file,
    /// smoothing each corner with a circular arc of the given radius.
    #[structopt(name = "fillet")]
    Fillet {
        /// The path to the profile file to load.
        path: PathBuf,

        /// The fillet radius to fly at each corner.
        ///
        /// Units: meters
        radius_m: f64,
    },

    /// Hold the given heading, altitude and airspeed with no guidance law
    /// active.
    #[structopt(name = "hold")]
    Hold(HoldDems),
}
