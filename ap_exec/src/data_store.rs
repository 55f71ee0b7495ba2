//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use fdm_if::{
    eqpt::{ActuatorDems, AircraftState},
    tc::guidance::HoldDems,
};

use crate::{guidance, stab_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    // Aircraft state
    pub aircraft_state: Option<AircraftState>,

    // Guidance
    pub guidance: guidance::Guidance,
    pub guidance_dems: Option<HoldDems>,
    pub guidance_status_rpt: guidance::StatusReport,

    // StabCtrl
    pub stab_ctrl: stab_ctrl::StabCtrl,
    pub actuator_dems: ActuatorDems,
    pub stab_ctrl_status_rpt: stab_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        if self.num_cycles % (cycle_frequency_hz as u128) == 0 {
            self.is_1_hz_cycle = true;
        } else {
            self.is_1_hz_cycle = false;
        }

        self.aircraft_state = None;
        self.guidance_dems = None;
        self.guidance_status_rpt = guidance::StatusReport::default();
        self.stab_ctrl_status_rpt = stab_ctrl::StatusReport::default();
    }
}
