//! # Local navigation module
//!
//! This module provides the local tangent plane navigation utility used by
//! the guidance layer. Positions are (north, east) offsets in meters from
//! the plane origin. Bearings are measured clockwise from north, returned in
//! signed radians.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Local tangent plane navigation utility.
///
/// Holds the aircraft's current local position and, while a leg is active,
/// the local target the guidance layer is steering towards.
#[derive(Debug, Clone, Default)]
pub struct LocalNav {
    /// Current aircraft position in the local plane (north, east).
    pos_m: Vector2<f64>,

    /// Current local target, if one is set.
    target_m: Option<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors raised by the navigation utility.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A target-relative query was made while no local target is set.
    #[error("No local target is set")]
    NoTarget,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LocalNav {
    /// Create a new navigation utility with no target set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the aircraft's current local position.
    ///
    /// This must be called once per cycle before any of the target-relative
    /// queries.
    pub fn set_pos(&mut self, north_m: f64, east_m: f64) {
        self.pos_m = Vector2::new(north_m, east_m);
    }

    /// Set the local target from a (north, east) offset.
    pub fn set_local_target(&mut self, north_m: f64, east_m: f64) {
        self.target_m = Some(Vector2::new(north_m, east_m));
    }

    /// Clear the local target, invalidating target-relative queries.
    pub fn clear_target(&mut self) {
        self.target_m = None;
    }

    /// Get the aircraft's current local position as a (north, east) vector.
    pub fn get_local_pos(&self) -> Vector2<f64> {
        self.pos_m
    }

    /// Get the bearing from the current position to the target.
    ///
    /// The bearing is measured clockwise from north and returned in signed
    /// radians in the (-pi, pi] domain.
    pub fn bearing(&self) -> Result<f64, NavError> {
        let target = self.target_m.ok_or(NavError::NoTarget)?;
        let diff = target - self.pos_m;
        Ok(diff[1].atan2(diff[0]))
    }

    /// Get the distance from the current position to the target in meters.
    pub fn distance(&self) -> Result<f64, NavError> {
        let target = self.target_m.ok_or(NavError::NoTarget)?;
        Ok((target - self.pos_m).norm())
    }

    /// Get the signed projection of the remaining distance onto the track
    /// direction.
    ///
    /// The projection is negative once the aircraft has passed abeam the
    /// target (off track angle beyond 90 deg).
    pub fn distance_to_go(&self, distance_m: f64, off_track_rad: f64) -> f64 {
        distance_m * off_track_rad.cos()
    }

    /// Get the unit vector pointing from `p` to `q`.
    ///
    /// Returns `None` if the points are coincident.
    pub fn unit_dir_vector(p: &Vector2<f64>, q: &Vector2<f64>) -> Option<Vector2<f64>> {
        let diff = q - p;
        let length = diff.norm();

        if length <= std::f64::EPSILON {
            return None;
        }

        Some(diff / length)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_bearing_and_distance() {
        let mut nav = LocalNav::new();
        nav.set_pos(0.0, 0.0);
        nav.set_local_target(1000.0, 0.0);

        // Due north
        assert!((nav.bearing().unwrap() - 0.0).abs() < 1e-9);
        assert!((nav.distance().unwrap() - 1000.0).abs() < 1e-9);

        // Due east
        nav.set_local_target(0.0, 500.0);
        assert!((nav.bearing().unwrap() - PI / 2.0).abs() < 1e-9);
        assert!((nav.distance().unwrap() - 500.0).abs() < 1e-9);

        // South-west quadrant gives a negative bearing
        nav.set_local_target(-100.0, -100.0);
        assert!((nav.bearing().unwrap() + 3.0 * PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_target_errors() {
        let nav = LocalNav::new();
        assert!(nav.bearing().is_err());
        assert!(nav.distance().is_err());
    }

    #[test]
    fn test_distance_to_go() {
        let nav = LocalNav::new();

        // On track the projection is the full distance
        assert!((nav.distance_to_go(1000.0, 0.0) - 1000.0).abs() < 1e-9);

        // Abeam the target the projection vanishes
        assert!(nav.distance_to_go(1000.0, PI / 2.0).abs() < 1e-9);

        // Past the target the projection is negative
        assert!(nav.distance_to_go(1000.0, PI) < 0.0);
    }

    #[test]
    fn test_unit_dir_vector() {
        let p = Vector2::new(0.0, 0.0);
        let q = Vector2::new(3.0, 4.0);

        let unit = LocalNav::unit_dir_vector(&p, &q).unwrap();
        assert!((unit.norm() - 1.0).abs() < 1e-9);
        assert!((unit[0] - 0.6).abs() < 1e-9);
        assert!((unit[1] - 0.8).abs() < 1e-9);

        // Coincident points have no direction
        assert!(LocalNav::unit_dir_vector(&p, &p).is_none());
    }
}
