//! # Profile
//!
//! This module defines the waypoint profile flown by the guidance system.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single waypoint in a profile.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    /// Northing in the local tangent plane.
    ///
    /// Units: meters
    pub north_m: f64,

    /// Easting in the local tangent plane.
    ///
    /// Units: meters
    pub east_m: f64,

    /// Altitude to fly at this waypoint.
    ///
    /// Units: meters above sea level
    pub alt_m: f64,
}

/// An ordered sequence of waypoints defining the desired path of the
/// aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub waypoints: Vec<Waypoint>,
}

/// A leg between two neighbouring profile waypoints.
#[derive(Debug, Clone)]
pub struct Leg {
    /// The start point of the leg
    pub start_m: Vector2<f64>,

    /// The target point of the leg
    pub target_m: Vector2<f64>,

    /// The length of the leg
    pub length_m: f64,

    /// The bearing of the leg, clockwise from north in [0, 360)
    pub bearing_deg: f64,

    /// Unit vector pointing in the direction of the leg
    pub direction: Vector2<f64>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The profile does not contain enough waypoints for the requested
    /// follower.
    #[error("Profile has {found} waypoints but at least {required} are required")]
    TooFewWaypoints { required: usize, found: usize },

    /// Two neighbouring waypoints are coincident, so the leg between them
    /// has no direction.
    #[error("Leg to waypoint {0} has zero length")]
    ZeroLengthLeg(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Waypoint {
    /// The waypoint's (north, east) position in the local plane.
    pub fn pos(&self) -> Vector2<f64> {
        Vector2::new(self.north_m, self.east_m)
    }
}

impl Profile {
    /// Get the number of waypoints in the profile
    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// Check that the profile can be flown by a follower requiring the given
    /// minimum number of waypoints.
    ///
    /// All legs must have a nonzero length, since a zero length leg has no
    /// bearing to track.
    pub fn validate(&self, min_waypoints: usize) -> Result<(), ProfileError> {
        if self.waypoints.len() < min_waypoints {
            return Err(ProfileError::TooFewWaypoints {
                required: min_waypoints,
                found: self.waypoints.len(),
            });
        }

        for i in 1..self.waypoints.len() {
            if self.get_leg_to_target(i).is_none() {
                return Err(ProfileError::ZeroLengthLeg(i));
            }
        }

        Ok(())
    }

    /// Returns the leg connecting the target waypoint and the previous
    /// waypoint.
    ///
    /// If no leg exists (the target is the first point in the sequence, is
    /// beyond the end of the sequence, or the leg has zero length) then
    /// `None` will be returned.
    pub fn get_leg_to_target(&self, target_index: usize) -> Option<Leg> {
        // Catch invalid targets
        if target_index == 0 || target_index >= self.waypoints.len() {
            return None;
        }

        let start_m = self.waypoints[target_index - 1].pos();
        let target_m = self.waypoints[target_index].pos();

        let diff = target_m - start_m;
        let length_m = diff.norm();

        // A zero length leg has no direction
        if length_m <= std::f64::EPSILON {
            return None;
        }

        let direction = diff / length_m;

        // Bearing is clockwise from north, (north, east) components
        let bearing_deg = maths::norm_360(diff[1].atan2(diff[0]).to_degrees());

        Some(Leg {
            start_m,
            target_m,
            length_m,
            bearing_deg,
            direction,
        })
    }

    /// Return the length of the profile in meters.
    ///
    /// If the profile has fewer than two waypoints then `None` is returned.
    pub fn get_length(&self) -> Option<f64> {
        if self.waypoints.len() < 2 {
            return None;
        }

        let mut length_m = 0f64;

        for i in 1..self.waypoints.len() {
            length_m += self.get_leg_to_target(i)?.length_m;
        }

        Some(length_m)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn wp(north_m: f64, east_m: f64) -> Waypoint {
        Waypoint {
            north_m,
            east_m,
            alt_m: 500.0,
        }
    }

    #[test]
    fn test_leg_geometry() {
        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(1000.0, 0.0), wp(1000.0, 1000.0)],
        };

        // First leg runs due north
        let leg = profile.get_leg_to_target(1).unwrap();
        assert!((leg.length_m - 1000.0).abs() < 1e-9);
        assert!((leg.bearing_deg - 0.0).abs() < 1e-9);

        // Second leg runs due east
        let leg = profile.get_leg_to_target(2).unwrap();
        assert!((leg.bearing_deg - 90.0).abs() < 1e-9);
        assert!((leg.direction[1] - 1.0).abs() < 1e-9);

        // No leg to the first waypoint or beyond the end
        assert!(profile.get_leg_to_target(0).is_none());
        assert!(profile.get_leg_to_target(3).is_none());

        assert!((profile.get_length().unwrap() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(1000.0, 0.0)],
        };
        assert!(profile.validate(2).is_ok());
        assert!(matches!(
            profile.validate(3),
            Err(ProfileError::TooFewWaypoints { .. })
        ));

        let degenerate = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(0.0, 0.0), wp(1000.0, 0.0)],
        };
        assert!(matches!(
            degenerate.validate(2),
            Err(ProfileError::ZeroLengthLeg(1))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let profile = Profile {
            waypoints: vec![wp(0.0, 0.0), wp(1000.0, 0.0)],
        };

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.num_waypoints(), 2);
        assert!((parsed.waypoints[1].north_m - 1000.0).abs() < 1e-12);
    }
}
