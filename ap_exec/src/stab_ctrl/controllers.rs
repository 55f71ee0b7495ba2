//! # Stabilisation controllers module
//!
//! This module provides the PID controller primitive used by the
//! stabilisation loops.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller.
///
/// Controllers are long lived: one instance exists per control loop, with
/// the integral accumulating over the life of the current mode. Callers must
/// invoke [`PidController::reset`] when a new goal is accepted so that stale
/// integral from the previous mode cannot bias the new one.
#[derive(Debug, Serialize, Clone, Default)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral: 0f64,
            prev_error: None,
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// The executable runs a fixed-step cycle, so the step duration is passed
    /// in explicitly rather than measured, keeping the loops deterministic.
    pub fn update(&mut self, error: f64, dt_s: f64) -> f64 {
        // Accumulate the integral term.
        //
        // A zero or negative dt means no time has passed, in which case we
        // don't accumulate. Adding the raw error instead would produce a
        // spike in the integral compared to normal operation.
        if dt_s > 0f64 {
            self.integral += error * dt_s;
        }

        // Calculate the derivative.
        //
        // With no previous error, or no time difference, we assume no
        // derivative for the same reasons as for the integral.
        let deriv = match self.prev_error {
            Some(e) if dt_s > 0f64 => (error - e) / dt_s,
            _ => 0f64,
        };

        // Remember the previous error
        self.prev_error = Some(error);

        // Calculate the output
        self.k_p * error + self.k_i * self.integral + self.k_d * deriv
    }

    /// Clear the accumulated integral and error memory.
    ///
    /// Called when the mode owning this controller changes, so each goal
    /// starts from clean controller state.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proportional_only() {
        let mut ctrl = PidController::new(2.0, 0.0, 0.0);
        assert_eq!(ctrl.update(3.0, 0.1), 6.0);
        assert_eq!(ctrl.update(-1.5, 0.1), -3.0);
    }

    #[test]
    fn test_integral_accumulates_and_resets() {
        let mut ctrl = PidController::new(0.0, 1.0, 0.0);

        // 1.0 error over two 0.5 s steps integrates to 1.0
        ctrl.update(1.0, 0.5);
        let out = ctrl.update(1.0, 0.5);
        assert!((out - 1.0).abs() < 1e-9);

        // Reset clears the accumulation
        ctrl.reset();
        let out = ctrl.update(1.0, 0.5);
        assert!((out - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_derivative_from_error_history() {
        let mut ctrl = PidController::new(0.0, 0.0, 1.0);

        // First update has no history so no derivative
        assert_eq!(ctrl.update(1.0, 0.1), 0.0);

        // Error rising by 1.0 over 0.1 s gives a derivative of 10.0
        let out = ctrl.update(2.0, 0.1);
        assert!((out - 10.0).abs() < 1e-9);
    }
}
