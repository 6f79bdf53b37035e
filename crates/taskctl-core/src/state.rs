//! Per-controller bookkeeping: gain, error history, and the stability latch.

use nalgebra::DVector;

/// Mutable state owned by one controller instance.
///
/// Mutated only by that instance's control-signal operations, once per
/// control cycle. The error/command history starts empty (`None`): before
/// the first successful solve there is no "last" signal, and the first
/// stability check has no delta to measure.
#[derive(Debug, Clone)]
pub struct ControllerState {
    gain: f64,
    stability_threshold: f64,
    last_error_signal: Option<DVector<f64>>,
    last_control_signal: Option<DVector<f64>>,
    is_stable: bool,
}

impl ControllerState {
    /// Fresh state with the given gain and convergence tolerance.
    pub fn new(gain: f64, stability_threshold: f64) -> Self {
        Self {
            gain,
            stability_threshold,
            last_error_signal: None,
            last_control_signal: None,
            is_stable: false,
        }
    }

    /// Proportional feedback gain.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Convergence tolerance on the error delta.
    pub fn stability_threshold(&self) -> f64 {
        self.stability_threshold
    }

    /// Task error recorded by the most recent successful solve.
    pub fn last_error_signal(&self) -> Option<&DVector<f64>> {
        self.last_error_signal.as_ref()
    }

    /// Command recorded by the most recent successful solve.
    pub fn last_control_signal(&self) -> Option<&DVector<f64>> {
        self.last_control_signal.as_ref()
    }

    /// Whether the stability latch has tripped.
    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    /// Compare the new task error against the previous one and latch
    /// `is_stable` once the change drops below the threshold.
    ///
    /// One-way latch: nothing in this crate resets it; the surrounding
    /// control loop owns any reset. The first call after construction has
    /// no previous error and never latches.
    pub fn verify_stability(&mut self, error: &DVector<f64>) {
        if let Some(previous) = &self.last_error_signal {
            if (previous - error).norm() < self.stability_threshold {
                self.is_stable = true;
            }
        }
    }

    /// Overwrite the error/command history after a successful solve.
    ///
    /// Failed solves must not call this: the spec requires a rejected QP to
    /// leave the previously recorded command visible to the caller.
    pub fn record_signals(&mut self, control: DVector<f64>, error: DVector<f64>) {
        self.last_control_signal = Some(control);
        self.last_error_signal = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(values: &[f64]) -> DVector<f64> {
        DVector::from_row_slice(values)
    }

    #[test]
    fn starts_with_no_history_and_unstable() {
        let state = ControllerState::new(2.0, 1e-3);
        assert_eq!(state.gain(), 2.0);
        assert!(state.last_error_signal().is_none());
        assert!(state.last_control_signal().is_none());
        assert!(!state.is_stable());
    }

    #[test]
    fn first_sample_never_latches() {
        let mut state = ControllerState::new(1.0, 1e3);
        // Huge threshold, but no previous error to compare against.
        state.verify_stability(&error(&[0.0, 0.0]));
        assert!(!state.is_stable());
    }

    #[test]
    fn latches_when_error_stops_moving() {
        let mut state = ControllerState::new(1.0, 1e-3);
        state.record_signals(error(&[0.0]), error(&[0.5]));

        state.verify_stability(&error(&[0.4]));
        assert!(!state.is_stable(), "delta 0.1 is above threshold");

        state.record_signals(error(&[0.0]), error(&[0.4]));
        state.verify_stability(&error(&[0.4 + 1e-5]));
        assert!(state.is_stable());
    }

    #[test]
    fn latch_is_monotonic() {
        let mut state = ControllerState::new(1.0, 1e-3);
        state.record_signals(error(&[0.0]), error(&[0.5]));
        state.verify_stability(&error(&[0.5]));
        assert!(state.is_stable());

        // A large error change afterwards must not clear the latch.
        state.record_signals(error(&[0.0]), error(&[0.5]));
        state.verify_stability(&error(&[100.0]));
        assert!(state.is_stable());
    }

    #[test]
    fn delta_equal_to_threshold_does_not_latch() {
        let mut state = ControllerState::new(1.0, 0.1);
        state.record_signals(error(&[0.0]), error(&[0.0]));
        state.verify_stability(&error(&[0.1]));
        assert!(!state.is_stable(), "comparison is strict");
    }

    #[test]
    fn record_overwrites_history() {
        let mut state = ControllerState::new(1.0, 1e-3);
        state.record_signals(error(&[1.0]), error(&[2.0]));
        state.record_signals(error(&[3.0]), error(&[4.0]));
        assert_eq!(state.last_control_signal().unwrap()[0], 3.0);
        assert_eq!(state.last_error_signal().unwrap()[0], 4.0);
    }
}
