//! # Flight dynamics equipment interface
//!
//! This module defines the structures exchanged with the flight dynamics
//! model each control cycle: the aircraft state read by the autopilot and the
//! actuator demands written back to the model.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The state of the aircraft as reported by the flight dynamics model.
///
/// Positions are in the local tangent plane with north and east in meters.
/// Altitude and airspeed are in the model's native units (feet and feet per
/// second), attitudes and rates in degrees and degrees per second. The
/// autopilot only ever reads this structure, it never mutates it.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct AircraftState {
    /// Northing in the local tangent plane.
    ///
    /// Units: meters
    pub north_m: f64,

    /// Easting in the local tangent plane.
    ///
    /// Units: meters
    pub east_m: f64,

    /// Altitude above sea level.
    ///
    /// Units: feet (model native)
    pub alt_ft: f64,

    /// Pitch attitude.
    ///
    /// Units: degrees, positive nose up
    pub pitch_deg: f64,

    /// Roll attitude.
    ///
    /// Units: degrees
    pub roll_deg: f64,

    /// Heading.
    ///
    /// Units: degrees in the [0, 360) compass domain
    pub heading_deg: f64,

    /// Pitch body rate.
    ///
    /// Units: degrees/second
    pub pitch_rate_dps: f64,

    /// Roll body rate.
    ///
    /// Units: degrees/second
    pub roll_rate_dps: f64,

    /// Airspeed.
    ///
    /// Units: feet/second (model native)
    pub airspeed_fps: f64,
}

/// Actuator demands produced by the autopilot, one set per control cycle.
///
/// Elevator and aileron are normalised surface deflections bounded only by
/// the composition of the control gains. Throttle is bounded to [0, 1] by
/// the airspeed controller before it is issued.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct ActuatorDems {
    /// Elevator deflection demand, normalised.
    pub elevator: f64,

    /// Aileron deflection demand, normalised.
    ///
    /// Positive aileron produces negative roll in the modeled airframe.
    pub aileron: f64,

    /// Throttle demand in [0, 1].
    pub throttle: f64,
}
