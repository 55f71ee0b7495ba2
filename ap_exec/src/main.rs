//! Main autopilot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Aircraft state acquisition from the flight dynamics model
//!         - Guidance processing:
//!             - Goal/leg sequencing
//!             - Heading/altitude/airspeed demand generation
//!         - Stabilisation control processing
//!         - Actuator demand output to the flight dynamics model
//!
//! # Modules
//!
//! All modules (e.g. `stab_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use ap_lib::{
    data_store::DataStore,
    fdm_client::{FlightDynamics, SimFdm},
    guidance::{Profile, Waypoint},
    stab_ctrl,
};
use fdm_if::{
    eqpt::AircraftState,
    tc::guidance::{GuidanceCmd, HoldDems},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Maximum simulated time before the execution is stopped regardless of goal
/// progress.
const MAX_SIM_TIME_S: f64 = 1800.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line arguments of the autopilot executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "ap_exec", about = "Fixed-wing autopilot executable")]
struct Args {
    /// Run the cycles back to back instead of pacing them in real time.
    #[structopt(long)]
    fast: bool,

    /// The guidance goal to execute.
    #[structopt(subcommand)]
    cmd: GuidanceCmd,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session =
        Session::new("ap_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Fixed-Wing Autopilot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- PARSE ARGUMENTS ----

    let args = Args::from_args();
    info!("Guidance command: {:?}", args.cmd);

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.stab_ctrl
        .init("stab_ctrl.toml", &session)
        .wrap_err("Failed to initialise StabCtrl")?;
    info!("StabCtrl init complete");

    ds.guidance
        .init("guidance.toml", &session)
        .wrap_err("Failed to initialise Guidance")?;
    info!("Guidance init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE FLIGHT DYNAMICS ----

    // Start in trimmed cruise at the local plane origin
    let mut fdm = SimFdm::new(AircraftState {
        alt_ft: util::convert::m_to_ft(500.0),
        airspeed_fps: 80.0 / util::convert::FPS_TO_KNOTS,
        ..Default::default()
    });

    // ---- ACCEPT THE GOAL ----

    // Direct hold demands bypass guidance entirely
    let mut hold_dems: Option<HoldDems> = None;

    match args.cmd {
        GuidanceCmd::Home {
            north_m,
            east_m,
            alt_m,
        } => ds.guidance.begin_home_to(
            &fdm.state(),
            Waypoint {
                north_m,
                east_m,
                alt_m,
            },
        )?,
        GuidanceCmd::Track {
            north_m,
            east_m,
            alt_m,
        } => ds.guidance.begin_track_to(
            &fdm.state(),
            Waypoint {
                north_m,
                east_m,
                alt_m,
            },
        )?,
        GuidanceCmd::Follow { ref path } => {
            let profile = load_profile(path)?;
            ds.guidance.begin_profile(&fdm.state(), profile)?;
        }
        GuidanceCmd::Fillet { ref path, radius_m } => {
            let profile = load_profile(path)?;
            ds.guidance.begin_fillet(&fdm.state(), profile, radius_m)?;
        }
        GuidanceCmd::Hold(dems) => {
            info!("Holding {:?}", dems);
            hold_dems = Some(dems);
        }
    }

    // New goal accepted: start the loop stack from clean controller state
    ds.stab_ctrl.reset();

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    loop {
        let cycle_start_instant = Instant::now();

        ds.cycle_start(CYCLE_FREQUENCY_HZ);
        ds.sim_time_s = ds.num_cycles as f64 * CYCLE_PERIOD_S;

        // ---- STATE ACQUISITION ----

        let aircraft_state = fdm.state();
        ds.aircraft_state = Some(aircraft_state);

        // ---- GUIDANCE PROCESSING ----

        if ds.guidance.is_active() {
            let (dems, report) = ds
                .guidance
                .proc(&aircraft_state)
                .wrap_err("Guidance processing failed")?;

            ds.guidance_dems = dems;
            ds.guidance_status_rpt = report;

            if report.complete {
                info!(
                    "Guidance goal complete after {:.1} s at ({:.0}, {:.0}) m",
                    ds.sim_time_s, aircraft_state.north_m, aircraft_state.east_m
                );
                break;
            }
        } else {
            ds.guidance_dems = hold_dems;
        }

        // ---- STABILISATION PROCESSING ----

        if let Some(dems) = ds.guidance_dems {
            let (actuator_dems, report) = ds
                .stab_ctrl
                .proc(&stab_ctrl::InputData {
                    dems,
                    state: aircraft_state,
                    dt_s: CYCLE_PERIOD_S,
                })
                .wrap_err("StabCtrl processing failed")?;

            ds.actuator_dems = actuator_dems;
            ds.stab_ctrl_status_rpt = report;
        }

        // ---- FLIGHT DYNAMICS ----

        fdm.set_dems(&ds.actuator_dems);
        fdm.step(CYCLE_PERIOD_S);

        // ---- ARCHIVING & MONITORING ----

        if let Err(e) = ds.guidance.write() {
            warn!("Could not archive Guidance data: {}", e);
        }
        if let Err(e) = ds.stab_ctrl.write() {
            warn!("Could not archive StabCtrl data: {}", e);
        }

        if ds.is_1_hz_cycle {
            info!(
                "t {:6.1} s: pos ({:7.1}, {:7.1}) m, hdg {:5.1} deg, alt {:6.1} m, \
                tgt dist {:7.1} m",
                ds.sim_time_s,
                aircraft_state.north_m,
                aircraft_state.east_m,
                aircraft_state.heading_deg,
                util::convert::ft_to_m(aircraft_state.alt_ft),
                ds.guidance_status_rpt.target_distance_m
            );
        }

        ds.num_cycles += 1;

        if ds.sim_time_s > MAX_SIM_TIME_S {
            warn!("Maximum simulated time reached, stopping");
            break;
        }

        // ---- CYCLE PACING ----

        let cycle_dur_s = cycle_start_instant.elapsed().as_secs_f64();

        if args.fast {
            continue;
        }

        if cycle_dur_s < CYCLE_PERIOD_S {
            ds.num_consec_cycle_overruns = 0;
            thread::sleep(Duration::from_secs_f64(CYCLE_PERIOD_S - cycle_dur_s));
        } else {
            ds.num_consec_cycle_overruns += 1;
            warn!(
                "Cycle overran ({:.4} s), {} consecutive overruns",
                cycle_dur_s, ds.num_consec_cycle_overruns
            );
        }
    }

    info!("Execution complete after {} cycles", ds.num_cycles);

    Ok(())
}

/// Load a waypoint profile from a JSON file.
fn load_profile(path: &Path) -> Result<Profile, Report> {
    let profile_str = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read profile file {:?}", path))?;

    let profile: Profile = serde_json::from_str(&profile_str)
        .wrap_err_with(|| format!("Could not parse profile file {:?}", path))?;

    if profile.num_waypoints() < 2 {
        return Err(eyre!("Profile {:?} has fewer than 2 waypoints", path));
    }

    info!(
        "Loaded profile with {} waypoints, length {:.0} m",
        profile.num_waypoints(),
        profile.get_length().unwrap_or(0.0)
    );

    Ok(profile)
}
