//! # Flight dynamics client
//!
//! This module provides the boundary to the flight dynamics model. The
//! autopilot reads an [`AircraftState`] from the model each cycle and writes
//! [`ActuatorDems`] back to it through the [`FlightDynamics`] trait.
//!
//! [`SimFdm`] is a deliberately simple kinematic stand-in used by the
//! executable driver and the closed-loop tests. It models first-order
//! channel responses only - no aerodynamics - with the modeled airframe's
//! sign conventions: positive aileron produces negative roll, and negative
//! roll turns the nose clockwise.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use fdm_if::eqpt::{ActuatorDems, AircraftState};
use util::{convert, maths};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Steady-state roll rate per unit of aileron deflection.
///
/// Negative response: positive aileron rolls the airframe negative.
const AILERON_TO_ROLL_RATE_DPS: f64 = 50.0;

/// Steady-state pitch rate per unit of elevator deflection.
const ELEVATOR_TO_PITCH_RATE_DPS: f64 = 30.0;

/// First-order time constant of the surface/rate responses.
const SURFACE_TC_S: f64 = 0.2;

/// Heading rate per degree of roll. Negative roll turns the nose clockwise.
const TURN_RATE_PER_ROLL: f64 = 0.25;

/// Airspeed reached at full throttle.
const MAX_AIRSPEED_FPS: f64 = 200.0;

/// First-order time constant of the airspeed response.
const AIRSPEED_TC_S: f64 = 5.0;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The flight dynamics model boundary.
pub trait FlightDynamics {
    /// The aircraft state at the current simulation time.
    fn state(&self) -> AircraftState;

    /// Set the actuator demands to apply from the next step.
    fn set_dems(&mut self, dems: &ActuatorDems);

    /// Advance the model by one step.
    fn step(&mut self, dt_s: f64);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simple kinematic flight dynamics stand-in.
pub struct SimFdm {
    state: AircraftState,
    dems: ActuatorDems,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimFdm {
    /// Create a new model at the given initial state.
    pub fn new(initial_state: AircraftState) -> Self {
        Self {
            state: initial_state,
            dems: ActuatorDems::default(),
        }
    }
}

impl FlightDynamics for SimFdm {
    fn state(&self) -> AircraftState {
        self.state
    }

    fn set_dems(&mut self, dems: &ActuatorDems) {
        self.dems = *dems;
    }

    fn step(&mut self, dt_s: f64) {
        let s = &mut self.state;

        // Rate responses, first order towards the surface-commanded rates
        let roll_rate_cmd_dps = -AILERON_TO_ROLL_RATE_DPS * self.dems.aileron;
        s.roll_rate_dps += (roll_rate_cmd_dps - s.roll_rate_dps) * dt_s / SURFACE_TC_S;
        s.roll_deg += s.roll_rate_dps * dt_s;

        let pitch_rate_cmd_dps = ELEVATOR_TO_PITCH_RATE_DPS * self.dems.elevator;
        s.pitch_rate_dps += (pitch_rate_cmd_dps - s.pitch_rate_dps) * dt_s / SURFACE_TC_S;
        s.pitch_deg += s.pitch_rate_dps * dt_s;

        // Coordinated turn: bank angle drives heading rate
        s.heading_deg =
            maths::norm_360(s.heading_deg + (-TURN_RATE_PER_ROLL * s.roll_deg) * dt_s);

        // Airspeed first order towards the throttle-scaled maximum
        s.airspeed_fps +=
            (self.dems.throttle * MAX_AIRSPEED_FPS - s.airspeed_fps) * dt_s / AIRSPEED_TC_S;

        // Climb/descend along the pitch attitude
        s.alt_ft += s.airspeed_fps * s.pitch_deg.to_radians().sin() * dt_s;

        // Ground track
        let speed_ms = s.airspeed_fps * convert::FT_TO_M;
        let heading_rad = s.heading_deg.to_radians();
        s.north_m += speed_ms * heading_rad.cos() * dt_s;
        s.east_m += speed_ms * heading_rad.sin() * dt_s;

        trace!(
            "SimFdm: pos ({:.1}, {:.1}) m, hdg {:.1} deg, alt {:.0} ft, spd {:.1} fps",
            s.north_m,
            s.east_m,
            s.heading_deg,
            s.alt_ft,
            s.airspeed_fps
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stab_ctrl::{self, StabCtrl};
    use fdm_if::tc::guidance::HoldDems;
    use util::module::State;

    const DT_S: f64 = 0.1;

    /// Closed-loop check that the stabilisation stack flies the stand-in
    /// model onto its demands.
    #[test]
    fn test_closed_loop_holds() {
        let mut stab = StabCtrl::from_params(stab_ctrl::Params::default());

        let mut fdm = SimFdm::new(AircraftState {
            alt_ft: 500.0 / 0.3048,
            airspeed_fps: 80.0 / 0.5925,
            ..Default::default()
        });

        let dems = HoldDems {
            heading_deg: 90.0,
            alt_m: 550.0,
            speed_kt: 80.0,
        };

        // Two minutes of simulated flight
        for _ in 0..1200 {
            let input = stab_ctrl::InputData {
                dems,
                state: fdm.state(),
                dt_s: DT_S,
            };
            let (output, _) = stab.proc(&input).unwrap();
            fdm.set_dems(&output);
            fdm.step(DT_S);
        }

        let state = fdm.state();

        // Heading captured the demand and the wings are close to level
        let head_err = util::maths::wrap_180(dems.heading_deg - state.heading_deg);
        assert!(head_err.abs() < 10.0, "heading error {:.1} deg", head_err);
        assert!(state.roll_deg.abs() < 10.0, "roll {:.1} deg", state.roll_deg);

        // Altitude climbed towards the demand
        let alt_m = util::convert::ft_to_m(state.alt_ft);
        assert!(alt_m > 510.0, "altitude {:.1} m", alt_m);

        // Airspeed near the demand
        let speed_kt = util::convert::fps_to_knots(state.airspeed_fps);
        assert!((speed_kt - 80.0).abs() < 15.0, "airspeed {:.1} kt", speed_kt);
    }
}
