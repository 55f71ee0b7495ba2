//! Implementations for the StabCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Params, PidController, StabCtrlError};
use fdm_if::{
    eqpt::{ActuatorDems, AircraftState},
    tc::guidance::HoldDems,
};
use util::{
    archive::{Archived, Archiver},
    convert, maths,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Stabilisation control module state
#[derive(Default)]
pub struct StabCtrl {
    params: Params,

    /// Heading error to roll demand controller
    head_ctrl: PidController,

    /// Airspeed error to throttle controller
    spd_ctrl: PidController,

    /// Altitude error to pitch demand controller
    alt_ctrl: PidController,

    report: StatusReport,
    arch_report: Archiver,

    output: Option<ActuatorDems>,
    arch_output: Archiver,
}

/// Input data to Stabilisation Control.
#[derive(Clone, Copy, Debug)]
pub struct InputData {
    /// The heading/altitude/airspeed demands to hold this cycle.
    pub dems: HoldDems,

    /// The aircraft state reported by the flight dynamics model this cycle.
    pub state: AircraftState,

    /// Duration of the control step.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Status report for StabCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Roll demand produced by the heading loop, after saturation.
    pub roll_dem_deg: f64,

    /// Pitch demand produced by the altitude loop, after saturation.
    pub pitch_dem_deg: f64,

    /// If true the roll demand hit the saturation limit.
    pub roll_dem_limited: bool,

    /// If true the pitch demand hit the saturation limit.
    pub pitch_dem_limited: bool,

    /// If true the throttle demand hit the saturation limit.
    pub throttle_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for StabCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = ActuatorDems;
    type StatusReport = StatusReport;
    type ProcError = StabCtrlError;

    /// Initialise the StabCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        // Load the parameters
        let loaded: Params = params::load(init_data)?;
        *self = Self::from_params(loaded);

        // Create the arch folder for stab_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("stab_ctrl");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archivers
        self.arch_report = Archiver::from_path(session, "stab_ctrl/status_report.csv").unwrap();
        self.arch_output = Archiver::from_path(session, "stab_ctrl/output.csv").unwrap();

        Ok(())
    }

    /// Perform cyclic processing of Stabilisation Control.
    ///
    /// The demands cascade down the loop stack: airspeed to throttle,
    /// altitude to pitch demand to elevator, heading to roll demand to
    /// aileron.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let state = &input_data.state;
        let dt_s = input_data.dt_s;

        // Outer loops
        let throttle = self.airspeed_hold(input_data.dems.speed_kt, state, dt_s);
        let pitch_dem_deg = self.altitude_hold(input_data.dems.alt_m, state, dt_s);
        let roll_dem_deg = self.heading_hold(input_data.dems.heading_deg, state, dt_s);

        // Inner attitude loops
        let elevator = self.pitch_hold(pitch_dem_deg, state);
        let aileron = self.roll_hold(roll_dem_deg, state);

        let output = ActuatorDems {
            elevator,
            aileron,
            throttle,
        };

        trace!(
            "StabCtrl output:\n    elev: {:.4}\n    ail: {:.4}\n    thr: {:.4}",
            output.elevator,
            output.aileron,
            output.throttle
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for StabCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

impl StabCtrl {
    /// Build the module directly from a parameter set.
    pub fn from_params(params: Params) -> Self {
        let head_ctrl = PidController::new(params.head_k_p, params.head_k_i, 0.0);
        let spd_ctrl = PidController::new(params.spd_k_p, params.spd_k_i, 0.0);
        let alt_ctrl = PidController::new(params.alt_k_p, params.alt_k_i, 0.0);

        Self {
            params,
            head_ctrl,
            spd_ctrl,
            alt_ctrl,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            output: None,
            arch_output: Archiver::default(),
        }
    }

    /// Clear all accumulated controller state.
    ///
    /// Must be called when a new guidance goal is accepted so the integral
    /// accumulated for the previous goal does not bias the new one.
    pub fn reset(&mut self) {
        self.head_ctrl.reset();
        self.spd_ctrl.reset();
        self.alt_ctrl.reset();
    }

    /// Pitch attitude hold.
    ///
    /// Combines a proportional attitude term with a rate damping term. The
    /// rate term uses the measured body rate directly rather than a
    /// differentiated error. The output is unsaturated - the altitude loop
    /// bounds its pitch demand before calling this.
    pub fn pitch_hold(&self, pitch_dem_deg: f64, state: &AircraftState) -> f64 {
        self.params.pitch_k_p * (pitch_dem_deg - state.pitch_deg)
            + self.params.pitch_rate_k_d * state.pitch_rate_dps
    }

    /// Roll attitude hold.
    ///
    /// As `pitch_hold`, but the attitude term is negated before the rate
    /// term is added: positive aileron produces negative roll in the modeled
    /// airframe.
    pub fn roll_hold(&self, roll_dem_deg: f64, state: &AircraftState) -> f64 {
        -(self.params.roll_k_p * (roll_dem_deg - state.roll_deg))
            + self.params.roll_rate_k_d * state.roll_rate_dps
    }

    /// Heading hold.
    ///
    /// The heading error is remapped into (-180, 180] so the aircraft always
    /// turns the shorter way, then passed through the PI controller and
    /// saturated to the roll demand limit. The returned roll demand is
    /// intended to be passed to `roll_hold`.
    pub fn heading_hold(&mut self, heading_dem_deg: f64, state: &AircraftState, dt_s: f64) -> f64 {
        let error_deg = maths::wrap_180(maths::norm_360(heading_dem_deg) - state.heading_deg);

        let roll_dem_deg = self.head_ctrl.update(error_deg, dt_s);

        let limit = self.params.roll_dem_limit_deg;
        let limited = maths::clamp(&roll_dem_deg, &-limit, &limit);
        if limited != roll_dem_deg {
            self.report.roll_dem_limited = true;
        }
        self.report.roll_dem_deg = limited;

        limited
    }

    /// Airspeed hold.
    ///
    /// The measured airspeed is converted from the model's native feet per
    /// second into knots. The output is saturated to the valid throttle
    /// range and issued directly as the throttle demand.
    pub fn airspeed_hold(&mut self, speed_dem_kt: f64, state: &AircraftState, dt_s: f64) -> f64 {
        let error_kt = speed_dem_kt - convert::fps_to_knots(state.airspeed_fps);

        let throttle = self.spd_ctrl.update(error_kt, dt_s);

        let limited = maths::clamp(&throttle, &0.0, &1.0);
        if limited != throttle {
            self.report.throttle_limited = true;
        }

        limited
    }

    /// Altitude hold.
    ///
    /// The measured altitude is converted from the model's native feet into
    /// meters. The output is saturated to the asymmetric pitch demand range
    /// (climb authority exceeds descent authority) and is intended to be
    /// passed to `pitch_hold`.
    pub fn altitude_hold(&mut self, alt_dem_m: f64, state: &AircraftState, dt_s: f64) -> f64 {
        let error_m = alt_dem_m - convert::ft_to_m(state.alt_ft);

        let pitch_dem_deg = self.alt_ctrl.update(error_m, dt_s);

        let limited = maths::clamp(
            &pitch_dem_deg,
            &self.params.pitch_dem_min_deg,
            &self.params.pitch_dem_max_deg,
        );
        if limited != pitch_dem_deg {
            self.report.pitch_dem_limited = true;
        }
        self.report.pitch_dem_deg = limited;

        limited
    }
}
