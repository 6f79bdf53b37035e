//! QP objective construction.
//!
//! The QP law minimizes `0.5 uᵀHu + fᵀu`; what `H` and `f` encode is the
//! control objective itself (pure tracking, tracking with regularization,
//! multi-objective blends). That choice is pluggable: each objective
//! implements [`ObjectiveBuilder`] and the solve pipeline stays unchanged.

use nalgebra::{DMatrix, DVector};

/// Builds the quadratic objective of the QP law from the task Jacobian and
/// the task error (`error = variable − reference`, the QP convention).
///
/// Contract, with `n` = Jacobian column count (the control-input
/// dimension): `symmetric_matrix` returns a symmetric `n × n` matrix,
/// `linear_component` a length-`n` vector. Both are pure functions of
/// their arguments.
pub trait ObjectiveBuilder {
    /// Quadratic penalty `H` on the velocity command.
    fn symmetric_matrix(&self, jacobian: &DMatrix<f64>, error: &DVector<f64>) -> DMatrix<f64>;

    /// Linear penalty `f` on the velocity command.
    fn linear_component(&self, jacobian: &DMatrix<f64>, error: &DVector<f64>) -> DVector<f64>;
}

/// Damped-least-squares tracking objective.
///
/// `H = JᵀJ + λ²I`, `f = gain · Jᵀ e`. With no constraints the minimizer
/// is `u = −gain (JᵀJ + λ²I)⁻¹ Jᵀ e`, the damped pseudo-inverse update;
/// the damping keeps `H` positive definite near singular configurations.
#[derive(Debug, Clone)]
pub struct ClassicTracking {
    /// Proportional feedback gain.
    pub gain: f64,
    /// Damping factor (lambda).
    pub damping: f64,
}

impl ClassicTracking {
    /// Objective with the given gain and damping.
    pub const fn new(gain: f64, damping: f64) -> Self {
        Self { gain, damping }
    }
}

impl ObjectiveBuilder for ClassicTracking {
    fn symmetric_matrix(&self, jacobian: &DMatrix<f64>, _error: &DVector<f64>) -> DMatrix<f64> {
        let n = jacobian.ncols();
        jacobian.transpose() * jacobian + DMatrix::identity(n, n) * (self.damping * self.damping)
    }

    fn linear_component(&self, jacobian: &DMatrix<f64>, error: &DVector<f64>) -> DVector<f64> {
        jacobian.transpose() * error * self.gain
    }
}
