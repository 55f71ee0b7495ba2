//! Homing goal

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{GuidanceError, Params, StatusReport, StepResult, Waypoint};
use crate::nav::LocalNav;
use fdm_if::tc::guidance::HoldDems;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of an active homing goal.
///
/// Homing is the simplest guidance behaviour: fly the bearing to the target
/// each cycle, with no track constraint. When displaced the aircraft simply
/// re-points at the target, so the flown path curves.
#[derive(Debug, Clone)]
pub struct HomeTo {
    /// The target being homed on.
    target: Waypoint,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HomeTo {
    /// Create a new homing goal on the given target.
    ///
    /// The local target must already be set in the navigation utility.
    pub fn new(target: Waypoint) -> Self {
        Self { target }
    }

    /// Process one cycle of the homing goal.
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

        // Within the capture radius the goal is complete and the target is
        // released.
        if distance_m < params.home_capture_radius_m {
            return Ok(StepResult::complete());
        }

        Ok(StepResult::dems(HoldDems {
            heading_deg: bearing_deg,
            alt_m: self.target.alt_m,
            speed_kt: params.cruise_speed_kt,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::super::{Guidance, Params, Waypoint};
    use fdm_if::eqpt::AircraftState;
    use util::module::State;

    fn state_at(north_m: f64, east_m: f64) -> AircraftState {
        AircraftState {
            north_m,
            east_m,
            ..Default::default()
        }
    }

    #[test]
    fn test_homing_capture() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_home_to(
                &state_at(0.0, 0.0),
                Waypoint {
                    north_m: 100.0,
                    east_m: 0.0,
                    alt_m: 500.0,
                },
            )
            .unwrap();

        // Held 150 m from the target the goal must never complete
        for _ in 0..50 {
            let (dems, report) = guidance.proc(&state_at(-50.0, 0.0)).unwrap();
            assert!(!report.complete);

            let dems = dems.unwrap();
            assert!(dems.heading_deg.abs() < 1e-9);
            assert!((dems.alt_m - 500.0).abs() < 1e-9);
        }

        // Crossing inside the capture radius completes the goal and releases
        // the target
        let (dems, report) = guidance.proc(&state_at(50.0, 0.0)).unwrap();
        assert!(report.complete);
        assert!(dems.is_none());

        // The next cycle is idle and a new goal can be accepted
        let (dems, report) = guidance.proc(&state_at(50.0, 0.0)).unwrap();
        assert!(dems.is_none());
        assert!(!report.complete);
        assert!(!guidance.is_active());
    }

    #[test]
    fn test_homing_points_at_target() {
        let mut guidance = Guidance::from_params(Params::default());

        guidance
            .begin_home_to(
                &state_at(0.0, 0.0),
                Waypoint {
                    north_m: 1000.0,
                    east_m: 1000.0,
                    alt_m: 500.0,
                },
            )
            .unwrap();

        // Homing issues the direct bearing, 45 deg here, wherever the
        // aircraft is displaced to
        let (dems, _) = guidance.proc(&state_at(0.0, 0.0)).unwrap();
        assert!((dems.unwrap().heading_deg - 45.0).abs() < 1e-9);

        let (dems, _) = guidance.proc(&state_at(1000.0, 0.0)).unwrap();
        assert!((dems.unwrap().heading_deg - 90.0).abs() < 1e-9);
    }
}
