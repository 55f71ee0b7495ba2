//! Track and profile following goals

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use super::{GuidanceError, Params, Profile, StatusReport, StepResult, Waypoint};
use crate::nav::LocalNav;
use fdm_if::tc::guidance::HoldDems;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of an active single-track goal.
///
/// Unlike homing the initial bearing to the target is frozen as the track
/// at goal acceptance. Each cycle the demanded heading is offset from the
/// current bearing by a term proportional to the off-track angle scaled by
/// the distance to go, steering the aircraft back onto the track rather than
/// directly at the target.
#[derive(Debug, Clone)]
pub struct TrackTo {
    /// The target at the end of the track.
    target: Waypoint,

    /// Bearing of the track, frozen at goal acceptance.
    ///
    /// Units: degrees, [0, 360)
    track_bearing_deg: f64,
}

/// State of an active profile-following goal.
///
/// Generalises [`TrackTo`] across an ordered waypoint list. The leg index
/// only ever advances, and the track bearing is recomputed from the profile
/// geometry each time a leg is captured.
#[derive(Debug, Clone)]
pub struct FollowProfile {
    /// The profile being flown.
    profile: Profile,

    /// Index of the current target waypoint. Starts at 1, since a leg is
    /// defined backwards from its target, and only ever increases.
    track_id: usize,

    /// Bearing of the current leg.
    ///
    /// Units: degrees, [0, 360)
    track_bearing_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrackTo {
    /// Create a new track goal.
    ///
    /// The local target must already be set in the navigation utility, and
    /// `track_bearing_deg` is the bearing from the acceptance position to
    /// the target.
    pub fn new(target: Waypoint, track_bearing_deg: f64) -> Self {
        Self {
            target,
            track_bearing_deg,
        }
    }

    /// Process one cycle of the track goal.
    pub fn step(
        &mut self,
        nav: &mut LocalNav,
        params: &Params,
        report: &mut StatusReport,
    ) -> Result<StepResult, GuidanceError> {
        let bearing_deg = maths::norm_360(nav.bearing()?.to_degrees());
        let distance_m = nav.distance()?;

        report.target_bearing_deg = bearing_deg;
        report.target_distance_m = distance_m;

        if distance_m < params.track_capture_radius_m {
            return Ok(StepResult::complete());
        }

        // Closure law: offset from the current bearing by the off-track
        // angle scaled with the distance still to go along the track.
        let off_track_deg = maths::wrap_180(bearing_deg - self.track_bearing_deg);
        let dtg_m = nav.distance_to_go(distance_m, off_track_deg.to_radians());

        report.off_track_deg = off_track_deg;
        report.distance_to_go_m = dtg_m;

        let heading_deg =
            maths::norm_360(params.track_steer_gain * (off_track_deg * dtg_m) + bearing_deg);

        Ok(StepResult::dems(HoldDems {
            heading_deg,
            alt_m: self.target.alt_m,
            speed_kt: params.cruise_speed_kt,
        }))
    }
}

impl FollowProfile {
    /// Create a new profile-following goal.
    ///
    /// The profile must contain at least two waypoints with no zero length
    /// legs. The first leg runs from waypoint 0 to waypoint 1; the caller
    /// sets waypoint 1 as the local target.
    pub fn new(profile: Profile) -> Result<Self, GuidanceError> {
        profile.validate(2)?;

        // Leg existence is guaranteed by the validation above
        let track_bearing_deg = match profile.get_leg_to_target(1) {
            Some(leg) => leg.bearing_deg,
            None => return Err(GuidanceError::InvalidLeg(1)),
        };

        Ok(Self {
            profile,
            track_id: 1,
            track_bearing_deg,
        })
    }

    /// Index of the current target waypoint.
    pub fn track_id(&self) -> usize {
        self.track_id
    }

    /// The first target waypoint (the end of the first leg).
    pub fn first_target(&self) -> Waypoint {
        self.profile.waypoints[self.track_id]
    }

    /// Process one cycle of the profile goal.
    pub fn step(
        &mut self,
        nav: &mut LocalNav,
        params: &Params,
        report: &mut StatusReport,
    ) -> Result<StepResult, GuidanceError> {
        let mut bearing_deg = maths::norm_360(nav.bearing()?.to_degrees());
        let mut distance_m = nav.distance()?;

        // ---- LEG MANAGEMENT ----

        if distance_m < params.profile_capture_radius_m {
            // Last waypoint captured: the profile is complete
            if self.track_id >= self.profile.num_waypoints() - 1 {
                info!("Profile complete at waypoint {}", self.track_id);
                return Ok(StepResult::complete());
            }

            // Sequence onto the next leg
            self.track_id += 1;
            let leg = self
                .profile
                .get_leg_to_target(self.track_id)
                .ok_or(GuidanceError::InvalidLeg(self.track_id))?;

            nav.set_local_target(leg.target_m[0], leg.target_m[1]);
            self.track_bearing_deg = leg.bearing_deg;

            debug!(
                "Leg captured, tracking waypoint {} on bearing {:.1} deg",
                self.track_id, self.track_bearing_deg
            );

            bearing_deg = maths::norm_360(nav.bearing()?.to_degrees());
            distance_m = nav.distance()?;
        }

        report.track_id = self.track_id;
        report.target_bearing_deg = bearing_deg;
        report.target_distance_m = distance_m;

        // ---- COMMAND GENERATION ----

        // As the track goal's closure law, but anchored on the track bearing
        // and with the distance-to-go ceiling applied so the heading command
        // stays bounded far from the track.
        let off_track_deg = maths::wrap_180(bearing_deg - self.track_bearing_deg);
        let dtg_m = nav
            .distance_to_go(distance_m, off_track_deg.to_radians())
            .min(params.max_steer_distance_m);

        report.off_track_deg = off_track_deg;
        report.distance_to_go_m = dtg_m;

        let heading_deg =
            maths::norm_360(params.track_steer_gain * dtg_m * off_track_deg + self.track_bearing_deg);

        Ok(StepResult::dems(HoldDems {
            heading_deg,
            alt_m: self.profile.waypoints[self.track_id].alt_m,
            speed_kt: params.cruise_speed_kt,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::super::{Guidance, Params};
    use super::*;
    use fdm_if::eqpt::AircraftState;
    use util::module::State;

    fn state_at(north_m: f64, east_m: f64) -> AircraftState {
        AircraftState {
            north_m,
            east_m,
            ..Default::default()
        }
    }

    fn wp(north_m: f64, east_m: f64, alt_m: f64) -> Waypoint {
        Waypoint {
            north_m,
            east_m,
            alt_m,
        }
    }

    #[test]
    fn test_track_reestablishment() {
        let mut guidance = Guidance::from_params(Params::default());

        // Track accepted at the origin towards (1000, 0): bearing 0 deg
        guidance
            .begin_track_to(&state_at(0.0, 0.0), wp(1000.0, 0.0, 500.0))
            .unwrap();

        // Displaced 50 m right of the track. Homing would fly the direct
        // bearing; the track law must steer left of it to close back onto
        // the track before the target.
        let (dems, report) = guidance.proc(&state_at(100.0, 50.0)).unwrap();
        let dems = dems.unwrap();

        let direct_bearing_deg =
            maths::norm_360((0.0f64 - 50.0).atan2(1000.0 - 100.0).to_degrees());

        assert!(dems.heading_deg < direct_bearing_deg);
        assert!(dems.heading_deg > 270.0);

        // Right of track means a negative off-track angle
        assert!(report.off_track_deg < 0.0);
        assert!(report.distance_to_go_m > 0.0);
    }

    #[test]
    fn test_track_on_track_flies_the_bearing() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_track_to(&state_at(0.0, 0.0), wp(1000.0, 0.0, 500.0))
            .unwrap();

        // On the track the closure term vanishes
        let (dems, _) = guidance.proc(&state_at(300.0, 0.0)).unwrap();
        assert!(dems.unwrap().heading_deg.abs() < 1e-9);
    }

    #[test]
    fn test_track_completion() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_track_to(&state_at(0.0, 0.0), wp(1000.0, 0.0, 500.0))
            .unwrap();

        // Outside the capture radius
        let (_, report) = guidance.proc(&state_at(700.0, 0.0)).unwrap();
        assert!(!report.complete);

        // Inside the 200 m capture radius
        let (_, report) = guidance.proc(&state_at(900.0, 0.0)).unwrap();
        assert!(report.complete);
    }

    #[test]
    fn test_profile_leg_sequencing() {
        let mut guidance = Guidance::from_params(Params::default());

        let profile = Profile {
            waypoints: vec![
                wp(0.0, 0.0, 500.0),
                wp(1000.0, 0.0, 520.0),
                wp(1000.0, 1000.0, 540.0),
            ],
        };

        guidance
            .begin_profile(&state_at(0.0, 0.0), profile)
            .unwrap();

        // Walk the aircraft along the profile, checking the leg index never
        // decreases
        let positions = [
            (0.0, 0.0),
            (500.0, 0.0),
            (995.0, 0.0),
            (1000.0, 200.0),
            (1000.0, 600.0),
        ];

        let mut last_track_id = 0;
        for &(north_m, east_m) in positions.iter() {
            let (dems, report) = guidance.proc(&state_at(north_m, east_m)).unwrap();
            assert!(report.track_id >= last_track_id);
            last_track_id = report.track_id;
            assert!(dems.is_some());
            assert!(!report.complete);
        }

        // The second leg is active after the first was captured at 995 m
        assert_eq!(last_track_id, 2);

        // Capturing the final waypoint terminates at len - 1
        let (dems, report) = guidance.proc(&state_at(1000.0, 995.0)).unwrap();
        assert!(report.complete);
        assert!(dems.is_none());
        assert_eq!(report.track_id, 0);
    }

    #[test]
    fn test_profile_altitude_follows_target_waypoint() {
        let mut guidance = Guidance::from_params(Params::default());

        let profile = Profile {
            waypoints: vec![
                wp(0.0, 0.0, 500.0),
                wp(1000.0, 0.0, 520.0),
                wp(1000.0, 1000.0, 540.0),
            ],
        };

        guidance
            .begin_profile(&state_at(0.0, 0.0), profile)
            .unwrap();

        // First leg flies the altitude of waypoint 1
        let (dems, _) = guidance.proc(&state_at(100.0, 0.0)).unwrap();
        assert!((dems.unwrap().alt_m - 520.0).abs() < 1e-9);

        // After capture the altitude of waypoint 2 is demanded
        let (dems, _) = guidance.proc(&state_at(995.0, 0.0)).unwrap();
        assert!((dems.unwrap().alt_m - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_requires_two_waypoints() {
        let mut guidance = Guidance::from_params(Params::default());

        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0, 500.0)],
        };

        assert!(guidance
            .begin_profile(&state_at(0.0, 0.0), profile)
            .is_err());
    }
}
