//! Fillet path-following goal
//!
//! Flies a waypoint profile with each corner smoothed by a circular arc of
//! fixed radius, instead of the sharp turns the plain profile follower
//! makes. At each corner the follower is a two-phase automaton: it tracks
//! the inbound leg until the entry half-plane is crossed, flies the arc
//! around the corner's fillet centre, and exits back to straight tracking
//! when the outbound half-plane is crossed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{GuidanceError, Params, Profile, StatusReport, StepResult};
use crate::nav::LocalNav;
use fdm_if::tc::guidance::HoldDems;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of an active fillet-following goal.
#[derive(Debug, Clone)]
pub struct FilletFollower {
    /// The profile being flown.
    profile: Profile,

    /// Fillet radius flown at each corner.
    ///
    /// Units: meters
    radius_m: f64,

    /// Index of the current corner waypoint. Starts at 1 (the first
    /// waypoint with both an inbound and an outbound leg) and only ever
    /// increases.
    corner: usize,

    /// Geometry of the current corner.
    geom: CornerGeom,

    /// Current phase of the automaton.
    phase: FilletPhase,
}

/// Geometry of a single profile corner.
#[derive(Debug, Clone)]
struct CornerGeom {
    /// Corner waypoint position.
    corner_m: Vector2<f64>,

    /// Unit direction of the inbound leg.
    q_in: Vector2<f64>,

    /// Unit direction of the outbound leg.
    q_out: Vector2<f64>,

    /// Bearing of the inbound leg.
    ///
    /// Units: degrees, [0, 360)
    bearing_in_deg: f64,

    /// Arc geometry, or `None` when the legs are collinear and the corner is
    /// flown straight through.
    arc: Option<ArcGeom>,
}

/// Arc geometry of a non-degenerate corner.
#[derive(Debug, Clone)]
struct ArcGeom {
    /// Entry transition point on the inbound leg.
    z_in_m: Vector2<f64>,

    /// Exit transition point on the outbound leg.
    z_out_m: Vector2<f64>,

    /// Centre of the fillet arc.
    centre_m: Vector2<f64>,

    /// Turn direction: +1 for a clockwise (right) turn, -1 for
    /// anticlockwise.
    turn_dir: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The two phases of the fillet automaton.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FilletPhase {
    /// Tracking the straight inbound leg.
    Straight,

    /// Flying the circular arc around the corner's fillet centre.
    Arc,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FilletFollower {
    /// Create a new fillet-following goal.
    ///
    /// Three consecutive waypoints are needed to define an arc, so the
    /// profile must contain at least three. The caller sets the first
    /// corner waypoint (index 1) as the local target.
    pub fn new(profile: Profile, radius_m: f64, params: &Params) -> Result<Self, GuidanceError> {
        profile.validate(3)?;

        let geom = corner_geom(&profile, 1, radius_m, params)?;

        Ok(Self {
            profile,
            radius_m,
            corner: 1,
            geom,
            phase: FilletPhase::Straight,
        })
    }

    /// Index of the current corner waypoint.
    pub fn corner(&self) -> usize {
        self.corner
    }

    /// The first corner waypoint of the profile.
    pub fn first_target(&self) -> super::Waypoint {
        self.profile.waypoints[self.corner]
    }

    /// Current phase of the automaton.
    pub fn phase(&self) -> FilletPhase {
        self.phase
    }

    /// Process one cycle of the fillet goal.
    pub fn step(
        &mut self,
        nav: &mut LocalNav,
        params: &Params,
        report: &mut StatusReport,
    ) -> Result<StepResult, GuidanceError> {
        let pos_m = nav.get_local_pos();

        // ---- PHASE TRANSITIONS ----

        match self.phase {
            FilletPhase::Straight => {
                match self.geom.arc {
                    Some(ref arc) => {
                        // Entry half-plane: the projection of the position
                        // relative to the entry transition point onto the
                        // inbound direction becomes non-negative once the
                        // aircraft crosses into the transition region.
                        if (pos_m - arc.z_in_m).dot(&self.geom.q_in) >= 0.0 {
                            debug!("Corner {}: entry half-plane crossed", self.corner);
                            self.phase = FilletPhase::Arc;
                        }
                    }
                    None => {
                        // Degenerate corner (collinear legs): no arc to fly,
                        // pass straight through the corner's half-plane.
                        if (pos_m - self.geom.corner_m).dot(&self.geom.q_in) >= 0.0 {
                            if self.advance(nav, params)? {
                                return Ok(StepResult::complete());
                            }
                        }
                    }
                }
            }
            FilletPhase::Arc => {
                // Exit half-plane, relative to the outbound transition point
                // along the outbound direction.
                let exit_crossed = match self.geom.arc {
                    Some(ref arc) => (pos_m - arc.z_out_m).dot(&self.geom.q_out) >= 0.0,
                    None => false,
                };

                if exit_crossed {
                    debug!("Corner {}: exit half-plane crossed", self.corner);
                    self.phase = FilletPhase::Straight;
                    if self.advance(nav, params)? {
                        return Ok(StepResult::complete());
                    }
                }
            }
        }

        // ---- COMMAND GENERATION ----

        report.track_id = self.corner;
        report.fillet_phase = Some(self.phase);

        let heading_deg = match self.phase {
            FilletPhase::Straight => self.straight_heading(nav, params, report)?,
            FilletPhase::Arc => self.arc_heading(pos_m, params, report),
        };

        Ok(StepResult::dems(HoldDems {
            heading_deg,
            alt_m: self.profile.waypoints[self.corner].alt_m,
            speed_kt: params.cruise_speed_kt,
        }))
    }

    /// Advance to the next corner, returning true if the path is complete.
    ///
    /// The path is complete once fewer than two waypoints remain beyond the
    /// current corner, since the next corner would have no outbound leg.
    fn advance(&mut self, nav: &mut LocalNav, params: &Params) -> Result<bool, GuidanceError> {
        if self.corner + 2 > self.profile.num_waypoints() - 1 {
            info!("Fillet path complete at corner {}", self.corner);
            return Ok(true);
        }

        self.corner += 1;
        self.geom = corner_geom(&self.profile, self.corner, self.radius_m, params)?;

        let target = self.geom.corner_m;
        nav.set_local_target(target[0], target[1]);

        debug!(
            "Advanced to corner {}, inbound bearing {:.1} deg",
            self.corner, self.geom.bearing_in_deg
        );

        Ok(false)
    }

    /// Heading demand while tracking the inbound leg, using the same
    /// distance-to-go closure law as the profile follower.
    fn straight_heading(
        &self,
        nav: &LocalNav,
        params: &Params,
        report: &mut StatusReport,
    ) -> Result<f64, GuidanceError> {
        let bearing_deg = maths::norm_360(nav.bearing()?.to_degrees());
        let distance_m = nav.distance()?;

        report.target_bearing_deg = bearing_deg;
        report.target_distance_m = distance_m;

        let off_track_deg = maths::wrap_180(bearing_deg - self.geom.bearing_in_deg);
        let dtg_m = nav
            .distance_to_go(distance_m, off_track_deg.to_radians())
            .min(params.max_steer_distance_m);

        report.off_track_deg = off_track_deg;
        report.distance_to_go_m = dtg_m;

        Ok(maths::norm_360(
            params.track_steer_gain * dtg_m * off_track_deg + self.geom.bearing_in_deg,
        ))
    }

    /// Heading demand while flying the arc: the tangent at the current
    /// angle around the centre, plus a radial correction pulling the
    /// aircraft onto the circle.
    fn arc_heading(&self, pos_m: Vector2<f64>, params: &Params, report: &mut StatusReport) -> f64 {
        let arc = match self.geom.arc {
            Some(ref a) => a,
            // Phase can only be Arc for corners with arc geometry, but fall
            // back to the inbound bearing rather than trusting that here.
            None => return self.geom.bearing_in_deg,
        };

        let radial = pos_m - arc.centre_m;
        let dist_m = radial.norm();

        let circle_angle_deg = maths::norm_360(radial[1].atan2(radial[0]).to_degrees());

        let correction_deg = (params.fillet_orbit_gain * (dist_m - self.radius_m) / self.radius_m)
            .atan()
            .to_degrees();

        report.target_distance_m = dist_m;

        maths::norm_360(circle_angle_deg + arc.turn_dir * (90.0 + correction_deg))
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Compute the geometry of the corner at the given waypoint index.
fn corner_geom(
    profile: &Profile,
    corner: usize,
    radius_m: f64,
    params: &Params,
) -> Result<CornerGeom, GuidanceError> {
    let leg_in = profile
        .get_leg_to_target(corner)
        .ok_or(GuidanceError::InvalidLeg(corner))?;
    let leg_out = profile
        .get_leg_to_target(corner + 1)
        .ok_or(GuidanceError::InvalidLeg(corner + 1))?;

    let corner_m = leg_in.target_m;
    let q_in = leg_in.direction;
    let q_out = leg_out.direction;

    // Fillet half-angle, from the difference of the leg bearings. The
    // transition geometry divides by tan and sin of this angle, so
    // near-collinear legs must be caught before any of it is computed.
    let turn_deg = maths::wrap_180(leg_out.bearing_deg - leg_in.bearing_deg);
    let half_angle_rad = (turn_deg.abs() / 2.0).to_radians();

    if half_angle_rad < params.min_half_angle_rad {
        warn!(
            "Corner {} is collinear (half angle {:.4} rad), flying straight through",
            corner, half_angle_rad
        );
        return Ok(CornerGeom {
            corner_m,
            q_in,
            q_out,
            bearing_in_deg: leg_in.bearing_deg,
            arc: None,
        });
    }

    // Transition points sit along each leg, offset from the corner by the
    // fillet tangent length.
    let tangent_m = radius_m / half_angle_rad.tan();
    let z_in_m = corner_m - q_in * tangent_m;
    let z_out_m = corner_m + q_out * tangent_m;

    // The centre sits along the corner's bisector. The bisector direction is
    // well defined here since q_in == q_out was caught above.
    let bisector = (q_in - q_out).normalize();
    let centre_m = corner_m - bisector * (radius_m / half_angle_rad.sin());

    // Turn direction from the cross product of the leg directions: positive
    // z means the outbound leg is clockwise of the inbound one.
    let turn_dir = (q_in[0] * q_out[1] - q_in[1] * q_out[0]).signum();

    Ok(CornerGeom {
        corner_m,
        q_in,
        q_out,
        bearing_in_deg: leg_in.bearing_deg,
        arc: Some(ArcGeom {
            z_in_m,
            z_out_m,
            centre_m,
            turn_dir,
        }),
    })
}

#[cfg(test)]
mod test {
    use super::super::{Guidance, Params, Waypoint};
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

    fn wp(north_m: f64, east_m: f64) -> Waypoint {
        Waypoint {
            north_m,
            east_m,
            alt_m: 500.0,
        }
    }

    #[test]
    fn test_collinear_corner_flies_straight() {
        let mut guidance = Guidance::from_params(Params::default());

        // Equal inbound and outbound bearings: the corner has no arc and the
        // division singularity in the transition geometry must not be hit
        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(1000.0, 0.0), wp(2000.0, 0.0)],
        };

        guidance
            .begin_fillet(&state_at(0.0, 0.0), profile, 100.0)
            .unwrap();

        // The straight-leg bearing is held through the corner
        let (dems, report) = guidance.proc(&state_at(500.0, 0.0)).unwrap();
        assert!(dems.unwrap().heading_deg.abs() < 1e-9);
        assert_eq!(report.fillet_phase, Some(FilletPhase::Straight));

        // Crossing the corner's half-plane on a 3 waypoint profile leaves no
        // further corner, so the path completes
        let (_, report) = guidance.proc(&state_at(1001.0, 0.0)).unwrap();
        assert!(report.complete);
    }

    #[test]
    fn test_entry_half_plane_switches_to_arc() {
        let mut guidance = Guidance::from_params(Params::default());

        // Right-angle right turn at (1000, 0), radius 100 m: the entry
        // transition point sits at (900, 0)
        let profile = Profile {
            waypoints: vec![
                wp(0.0, 0.0),
                wp(1000.0, 0.0),
                wp(1000.0, 1000.0),
                wp(0.0, 1000.0),
            ],
        };

        guidance
            .begin_fillet(&state_at(0.0, 0.0), profile, 100.0)
            .unwrap();

        // Short of the transition point: still straight, tracking north
        let (dems, report) = guidance.proc(&state_at(500.0, 0.0)).unwrap();
        assert_eq!(report.fillet_phase, Some(FilletPhase::Straight));
        assert!(dems.unwrap().heading_deg.abs() < 1e-9);

        // Past the transition point: arc phase, nose swinging right
        let (dems, report) = guidance.proc(&state_at(910.0, 0.0)).unwrap();
        assert_eq!(report.fillet_phase, Some(FilletPhase::Arc));
        let heading_deg = dems.unwrap().heading_deg;
        assert!(heading_deg > 0.0 && heading_deg < 90.0);
    }

    #[test]
    fn test_exit_half_plane_returns_to_straight() {
        let mut guidance = Guidance::from_params(Params::default());

        let profile = Profile {
            waypoints: vec![
                wp(0.0, 0.0),
                wp(1000.0, 0.0),
                wp(1000.0, 1000.0),
                wp(0.0, 1000.0),
            ],
        };

        guidance
            .begin_fillet(&state_at(0.0, 0.0), profile, 100.0)
            .unwrap();

        // Enter the arc
        let (_, report) = guidance.proc(&state_at(910.0, 0.0)).unwrap();
        assert_eq!(report.fillet_phase, Some(FilletPhase::Arc));

        // The exit transition point sits at (1000, 100) on the outbound leg.
        // Beyond it the follower must return to straight with the corner
        // advanced.
        let (dems, report) = guidance.proc(&state_at(1000.0, 150.0)).unwrap();
        assert_eq!(report.fillet_phase, Some(FilletPhase::Straight));
        assert_eq!(report.track_id, 2);

        // Now tracking the second leg due east
        assert!((dems.unwrap().heading_deg - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_left_turn_direction() {
        let mut guidance = Guidance::from_params(Params::default());

        // Right-angle left turn at (1000, 0)
        let profile = Profile {
            waypoints: vec![
                wp(0.0, 0.0),
                wp(1000.0, 0.0),
                wp(1000.0, -1000.0),
                wp(0.0, -1000.0),
            ],
        };

        guidance
            .begin_fillet(&state_at(0.0, 0.0), profile, 100.0)
            .unwrap();

        // In the arc the demanded heading must swing left of north
        let (dems, report) = guidance.proc(&state_at(910.0, 0.0)).unwrap();
        assert_eq!(report.fillet_phase, Some(FilletPhase::Arc));
        assert!(util::maths::wrap_180(dems.unwrap().heading_deg) < 0.0);
    }

    #[test]
    fn test_fillet_requires_three_waypoints() {
        let params = Params::default();
        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(1000.0, 0.0)],
        };

        assert!(FilletFollower::new(profile, 100.0, &params).is_err());
    }
}
