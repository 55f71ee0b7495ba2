//! Guidance parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for guidance.
///
/// The `Default` implementation carries the working tuning, which the
/// `guidance.toml` parameter file mirrors.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Capture radius for the homing goal.
    ///
    /// Units: meters
    pub home_capture_radius_m: f64,

    /// Capture radius for the single-track goal.
    ///
    /// Units: meters
    pub track_capture_radius_m: f64,

    /// Capture radius at which a profile leg is considered reached and the
    /// follower sequences to the next leg. 30 m in the working
    /// configuration; values up to 300 m have been flown.
    ///
    /// Units: meters
    pub profile_capture_radius_m: f64,

    /// Track closure gain: degrees of heading offset per degree of off-track
    /// angle per meter of distance to go.
    pub track_steer_gain: f64,

    /// Distance-to-go ceiling applied in the steering law, preventing
    /// unbounded heading commands far from the track.
    ///
    /// Units: meters
    pub max_steer_distance_m: f64,

    /// Orbit correction gain pulling the aircraft onto the fillet arc.
    pub fillet_orbit_gain: f64,

    /// Fillet half-angles below this threshold are treated as collinear legs
    /// and flown straight through, avoiding the transition geometry's
    /// division singularity.
    ///
    /// Units: radians
    pub min_half_angle_rad: f64,

    /// Airspeed demand issued alongside every guidance goal.
    ///
    /// Units: knots
    pub cruise_speed_kt: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            home_capture_radius_m: 100.0,
            track_capture_radius_m: 200.0,
            profile_capture_radius_m: 30.0,
            track_steer_gain: 8.0 * 0.00033,
            max_steer_distance_m: 3000.0,
            fillet_orbit_gain: 4.0,
            min_half_angle_rad: 0.01,
            cruise_speed_kt: 80.0,
        }
    }
}
