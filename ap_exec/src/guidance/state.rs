//! Guidance module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;

// Internal
use super::{
    FilletFollower, FilletPhase, FollowProfile, GuidanceError, HomeTo, Params, Profile, TrackTo,
    Waypoint,
};
use crate::nav::LocalNav;
use fdm_if::{eqpt::AircraftState, tc::guidance::HoldDems};
use util::{
    archive::{Archived, Archiver},
    maths,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Guidance module state
#[derive(Default)]
pub struct Guidance {
    params: Params,

    /// Local tangent plane navigation utility, updated with the aircraft
    /// position each cycle.
    nav: LocalNav,

    /// The currently executing goal.
    mode: GuidanceMode,

    report: StatusReport,
    arch_report: Archiver,
}

/// The result of stepping a guidance goal for one cycle.
#[derive(Debug, Clone, Default)]
pub struct StepResult {
    /// Demands to fly this cycle, or `None` if the goal issues nothing.
    pub dems: Option<HoldDems>,

    /// True if the goal's completion condition was met this cycle.
    pub complete: bool,
}

impl StepResult {
    /// A step which issues the given demands.
    pub fn dems(dems: HoldDems) -> Self {
        Self {
            dems: Some(dems),
            complete: false,
        }
    }

    /// A step whose completion condition was met. No demands are issued on
    /// the completing cycle.
    pub fn complete() -> Self {
        Self {
            dems: None,
            complete: true,
        }
    }
}

/// The status report containing monitoring quantities for the active goal.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    /// Bearing from the current position to the active target.
    ///
    /// Units: degrees, [0, 360)
    pub target_bearing_deg: f64,

    /// Distance to the active target (for the fillet arc phase, distance
    /// from the arc centre).
    ///
    /// Units: meters
    pub target_distance_m: f64,

    /// Off-track angle of the current leg.
    ///
    /// Units: degrees, (-180, 180]
    pub off_track_deg: f64,

    /// Signed projection of the remaining distance onto the track.
    ///
    /// Units: meters
    pub distance_to_go_m: f64,

    /// Index of the current target waypoint or corner.
    pub track_id: usize,

    /// Phase of the fillet automaton, when a fillet goal is active.
    pub fillet_phase: Option<FilletPhase>,

    /// True on the cycle in which the active goal completed.
    pub complete: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible modes of execution of Guidance.
pub enum GuidanceMode {
    /// No goal is active.
    Off,

    /// Homing directly onto a local target.
    Home(HomeTo),

    /// Flying a single frozen track to a local target.
    Track(TrackTo),

    /// Following a waypoint profile with sharp corners.
    Profile(FollowProfile),

    /// Following a waypoint profile with filleted corners.
    Fillet(FilletFollower),

    /// The last goal completed; the next cycle returns to `Off`.
    Complete,
}

impl Default for GuidanceMode {
    fn default() -> Self {
        GuidanceMode::Off
    }
}

impl GuidanceMode {
    /// A short name for logging.
    fn name(&self) -> &'static str {
        match self {
            GuidanceMode::Off => "Off",
            GuidanceMode::Home(_) => "Home",
            GuidanceMode::Track(_) => "Track",
            GuidanceMode::Profile(_) => "Profile",
            GuidanceMode::Fillet(_) => "Fillet",
            GuidanceMode::Complete => "Complete",
        }
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for Guidance {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = AircraftState;
    type OutputData = Option<HoldDems>;
    type StatusReport = StatusReport;
    type ProcError = GuidanceError;

    /// Initialise the Guidance module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        let loaded: Params = params::load(init_data)?;
        *self = Self::from_params(loaded);

        // Create the arch folder for guidance
        let mut arch_path = session.arch_root.clone();
        arch_path.push("guidance");
        std::fs::create_dir_all(arch_path).unwrap();

        self.arch_report = Archiver::from_path(session, "guidance/status_report.csv").unwrap();

        Ok(())
    }

    /// Process guidance for one cycle.
    ///
    /// Processing involves:
    ///  1. Updating the navigation utility with the aircraft position.
    ///  2. Stepping the active goal, which may sequence legs, switch fillet
    ///     phase, or complete.
    ///  3. Returning the demands for the stabilisation stack, or `None` when
    ///     no goal is active.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Setup cycle data
        self.nav.set_pos(input_data.north_m, input_data.east_m);
        self.report = StatusReport::default();

        // A goal which completed last cycle tears down to Off before this
        // cycle is processed
        if matches!(self.mode, GuidanceMode::Complete) {
            self.mode = GuidanceMode::Off;
        }

        let result = match self.mode {
            GuidanceMode::Off | GuidanceMode::Complete => StepResult::default(),
            GuidanceMode::Home(ref mut home) => {
                home.step(&mut self.nav, &self.params, &mut self.report)?
            }
            GuidanceMode::Track(ref mut track) => {
                track.step(&mut self.nav, &self.params, &mut self.report)?
            }
            GuidanceMode::Profile(ref mut profile) => {
                profile.step(&mut self.nav, &self.params, &mut self.report)?
            }
            GuidanceMode::Fillet(ref mut fillet) => {
                fillet.step(&mut self.nav, &self.params, &mut self.report)?
            }
        };

        // On completion release the target and tear the goal down
        if result.complete {
            info!("{} goal complete", self.mode.name());
            self.nav.clear_target();
            self.mode = GuidanceMode::Complete;
            self.report.complete = true;
        }

        Ok((result.dems, self.report))
    }
}

impl Archived for Guidance {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

impl Guidance {
    /// Build the module directly from a parameter set.
    pub fn from_params(params: Params) -> Self {
        Self {
            params,
            nav: LocalNav::new(),
            mode: GuidanceMode::Off,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        }
    }

    /// True while a goal is active or completing.
    pub fn is_active(&self) -> bool {
        !matches!(self.mode, GuidanceMode::Off)
    }

    /// Begin homing onto a local-plane target.
    ///
    /// Execution begins on the next call to `proc`. Beginning a goal while
    /// one is active is an error; call `abort` first to replace it.
    pub fn begin_home_to(
        &mut self,
        state: &AircraftState,
        target: Waypoint,
    ) -> Result<(), GuidanceError> {
        self.check_inactive()?;

        self.nav.set_pos(state.north_m, state.east_m);
        self.nav.set_local_target(target.north_m, target.east_m);

        info!(
            "Homing to ({:.0}, {:.0}) m at {:.0} m",
            target.north_m, target.east_m, target.alt_m
        );

        self.mode = GuidanceMode::Home(HomeTo::new(target));

        Ok(())
    }

    /// Begin flying a track from the current position to a local-plane
    /// target.
    ///
    /// The bearing from the current position to the target is frozen as the
    /// track at acceptance.
    pub fn begin_track_to(
        &mut self,
        state: &AircraftState,
        target: Waypoint,
    ) -> Result<(), GuidanceError> {
        self.check_inactive()?;

        self.nav.set_pos(state.north_m, state.east_m);
        self.nav.set_local_target(target.north_m, target.east_m);

        let track_bearing_deg = maths::norm_360(self.nav.bearing()?.to_degrees());

        info!(
            "Tracking to ({:.0}, {:.0}) m on bearing {:.1} deg",
            target.north_m, target.east_m, track_bearing_deg
        );

        self.mode = GuidanceMode::Track(TrackTo::new(target, track_bearing_deg));

        Ok(())
    }

    /// Begin following a waypoint profile, sequencing legs at the capture
    /// radius.
    pub fn begin_profile(
        &mut self,
        state: &AircraftState,
        profile: Profile,
    ) -> Result<(), GuidanceError> {
        self.check_inactive()?;

        let follower = FollowProfile::new(profile)?;

        self.nav.set_pos(state.north_m, state.east_m);

        // The first target is waypoint 1, the end of the first leg
        let target = follower.first_target();
        self.nav.set_local_target(target.north_m, target.east_m);

        info!("Following profile, first target ({:.0}, {:.0}) m", target.north_m, target.east_m);

        self.mode = GuidanceMode::Profile(follower);

        Ok(())
    }

    /// Begin following a waypoint profile with corners filleted at the given
    /// radius.
    pub fn begin_fillet(
        &mut self,
        state: &AircraftState,
        profile: Profile,
        radius_m: f64,
    ) -> Result<(), GuidanceError> {
        self.check_inactive()?;

        let follower = FilletFollower::new(profile, radius_m, &self.params)?;

        self.nav.set_pos(state.north_m, state.east_m);

        let target = follower.first_target();
        self.nav.set_local_target(target.north_m, target.east_m);

        info!(
            "Following filleted profile, radius {:.0} m, first corner ({:.0}, {:.0}) m",
            radius_m, target.north_m, target.east_m
        );

        self.mode = GuidanceMode::Fillet(follower);

        Ok(())
    }

    /// Abort the currently executing goal.
    ///
    /// The target is released and the mode returns to `Off`; nothing is
    /// issued on subsequent cycles until a new goal is begun.
    pub fn abort(&mut self) {
        if self.is_active() {
            info!("{} goal aborted", self.mode.name());
            self.nav.clear_target();
            self.mode = GuidanceMode::Off;
        }
    }

    /// Error if a goal is currently active.
    fn check_inactive(&self) -> Result<(), GuidanceError> {
        match self.mode {
            GuidanceMode::Off | GuidanceMode::Complete => Ok(()),
            _ => Err(GuidanceError::GoalAlreadyActive),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state_at(north_m: f64, east_m: f64) -> AircraftState {
        AircraftState {
            north_m,
            east_m,
            ..Default::default()
        }
    }

    fn target() -> Waypoint {
        Waypoint {
            north_m: 5000.0,
            east_m: 0.0,
            alt_m: 500.0,
        }
    }

    #[test]
    fn test_begin_while_active_is_rejected() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_home_to(&state_at(0.0, 0.0), target())
            .unwrap();

        assert!(matches!(
            guidance.begin_track_to(&state_at(0.0, 0.0), target()),
            Err(GuidanceError::GoalAlreadyActive)
        ));
    }

    #[test]
    fn test_abort_releases_goal() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_home_to(&state_at(0.0, 0.0), target())
            .unwrap();
        assert!(guidance.is_active());

        guidance.abort();
        assert!(!guidance.is_active());

        // Idle cycles issue nothing
        let (dems, report) = guidance.proc(&state_at(0.0, 0.0)).unwrap();
        assert!(dems.is_none());
        assert!(!report.complete);

        // A new goal can be accepted after the abort
        assert!(guidance
            .begin_track_to(&state_at(0.0, 0.0), target())
            .is_ok());
    }
}
