//! Stabilisation control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for stabilisation control.
///
/// The `Default` implementation carries the working tuning, which the
/// `stab_ctrl.toml` parameter file mirrors.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Pitch attitude loop proportional gain, elevator per degree of error.
    pub pitch_k_p: f64,

    /// Pitch rate damping gain, elevator per degree/second of body rate.
    pub pitch_rate_k_d: f64,

    /// Roll attitude loop proportional gain, aileron per degree of error.
    ///
    /// The attitude term is negated before the rate term is added, because
    /// positive aileron produces negative roll in the modeled airframe.
    pub roll_k_p: f64,

    /// Roll rate damping gain, aileron per degree/second of body rate.
    pub roll_rate_k_d: f64,

    /// Heading loop proportional gain, degrees of roll demand per degree of
    /// heading error. Negative, so that a positive heading error rolls the
    /// aircraft through the roll loop's negation.
    pub head_k_p: f64,

    /// Heading loop integral gain. Negative, see `head_k_p`.
    pub head_k_i: f64,

    /// Limit on the roll demand produced by the heading loop.
    ///
    /// Units: degrees
    pub roll_dem_limit_deg: f64,

    /// Airspeed loop proportional gain, throttle per knot of error.
    pub spd_k_p: f64,

    /// Airspeed loop integral gain.
    pub spd_k_i: f64,

    /// Altitude loop proportional gain, degrees of pitch demand per meter of
    /// error.
    pub alt_k_p: f64,

    /// Altitude loop integral gain.
    pub alt_k_i: f64,

    /// Minimum pitch demand from the altitude loop (descent authority).
    ///
    /// Units: degrees
    pub pitch_dem_min_deg: f64,

    /// Maximum pitch demand from the altitude loop (climb authority).
    ///
    /// The climb authority deliberately exceeds the descent authority.
    ///
    /// Units: degrees
    pub pitch_dem_max_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            pitch_k_p: 0.05,
            pitch_rate_k_d: -0.01,
            roll_k_p: 0.05,
            roll_rate_k_d: 0.01,
            head_k_p: -0.8,
            head_k_i: -0.005,
            roll_dem_limit_deg: 30.0,
            spd_k_p: 1.0,
            spd_k_i: 0.035,
            alt_k_p: 0.04,
            alt_k_i: 0.001,
            pitch_dem_min_deg: -10.0,
            pitch_dem_max_deg: 15.0,
        }
    }
}
