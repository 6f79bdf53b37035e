//! QP-based setpoint controller.

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use taskctl_core::{
    ConstraintSet, ControlConfig, ControlError, ControlOutput, ControllerState,
    KinematicsProvider,
};

use crate::objective::{ClassicTracking, ObjectiveBuilder};
use crate::solver::solve_qp;

/// Task-space velocity controller solving one convex QP per control cycle.
///
/// Error convention: `e = task_variable(q) − reference`. The pseudo-inverse
/// law uses the opposite sign; the two are distinct laws and are kept so.
///
/// Constraints set through [`set_equality_constraint`] /
/// [`set_inequality_constraint`] persist across cycles and are replaced
/// wholesale on each call; they are validated against the Jacobian column
/// count before every solve.
///
/// [`set_equality_constraint`]: Self::set_equality_constraint
/// [`set_inequality_constraint`]: Self::set_inequality_constraint
pub struct QpVelocityController<K> {
    kinematics: K,
    objective: Box<dyn ObjectiveBuilder>,
    constraints: ConstraintSet,
    state: ControllerState,
    max_solver_iters: u32,
}

impl<K: KinematicsProvider> QpVelocityController<K> {
    /// Controller with a caller-supplied objective.
    pub fn new(kinematics: K, objective: Box<dyn ObjectiveBuilder>, config: &ControlConfig) -> Self {
        Self {
            kinematics,
            objective,
            constraints: ConstraintSet::default(),
            state: ControllerState::new(config.gain, config.stability_threshold),
            max_solver_iters: config.max_solver_iters,
        }
    }

    /// Controller with the damped-least-squares tracking objective, using
    /// the config's gain and damping.
    pub fn classic(kinematics: K, config: &ControlConfig) -> Self {
        let objective = Box::new(ClassicTracking::new(config.gain, config.damping));
        Self::new(kinematics, objective, config)
    }

    /// Replace the equality constraint block: `aeq * u = beq`.
    pub fn set_equality_constraint(&mut self, aeq: DMatrix<f64>, beq: DVector<f64>) {
        self.constraints.set_equality(aeq, beq);
    }

    /// Replace the inequality constraint block: `a * u <= b`.
    pub fn set_inequality_constraint(&mut self, a: DMatrix<f64>, b: DVector<f64>) {
        self.constraints.set_inequality(a, b);
    }

    /// Current constraint set.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// The kinematics provider this controller queries.
    pub fn kinematics(&self) -> &K {
        &self.kinematics
    }

    /// Command recorded by the most recent successful solve.
    pub fn last_control_signal(&self) -> Option<&DVector<f64>> {
        self.state.last_control_signal()
    }

    /// Task error recorded by the most recent successful solve.
    pub fn last_error_signal(&self) -> Option<&DVector<f64>> {
        self.state.last_error_signal()
    }

    /// Whether the stability latch has tripped.
    pub fn is_stable(&self) -> bool {
        self.state.is_stable()
    }

    /// Regulate the task variable toward a fixed reference.
    ///
    /// Returns [`ControlOutput::Idle`] without touching any state when the
    /// provider reports itself unconfigured. Otherwise computes
    /// `e = task_variable(q) − reference`, builds the objective, solves
    /// the constrained QP, updates the stability latch and bookkeeping,
    /// and returns the command.
    ///
    /// # Errors
    ///
    /// Shape errors ([`ControlError::DimensionMismatch`]) are caught before
    /// the solver runs; solver failures propagate as-is. In every error
    /// case the previously recorded signals stay untouched.
    pub fn compute_setpoint_control_signal(
        &mut self,
        q: &DVector<f64>,
        reference: &DVector<f64>,
    ) -> Result<ControlOutput, ControlError> {
        if !self.kinematics.is_set() {
            return Ok(ControlOutput::Idle);
        }

        let variable = self.kinematics.task_variable(q);
        let jacobian = self.kinematics.jacobian(q);
        if reference.nrows() != variable.nrows() {
            return Err(ControlError::DimensionMismatch {
                name: "task reference",
                expected: variable.nrows(),
                got: reference.nrows(),
                unit: "rows",
            });
        }

        let error = variable - reference;
        let n = jacobian.ncols();
        self.constraints.validate(n)?;

        let h = self.objective.symmetric_matrix(&jacobian, &error);
        let f = self.objective.linear_component(&jacobian, &error);
        assert_eq!(h.shape(), (n, n), "objective matrix shape contract");
        assert_eq!(f.nrows(), n, "objective vector length contract");

        let u = solve_qp(&h, &f, &self.constraints, self.max_solver_iters)?;

        self.state.verify_stability(&error);
        self.state.record_signals(u.clone(), error);
        Ok(ControlOutput::Signal(u))
    }

    /// Track a moving reference with a feedforward term.
    ///
    /// Feedforward tracking is not implemented: the feedforward is ignored
    /// and the setpoint law runs instead. The degradation is surfaced both
    /// as a warning and as the
    /// [`ControlOutput::SignalWithoutFeedforward`] variant.
    pub fn compute_tracking_control_signal(
        &mut self,
        q: &DVector<f64>,
        reference: &DVector<f64>,
        feedforward: &DVector<f64>,
    ) -> Result<ControlOutput, ControlError> {
        let _ = feedforward;
        warn!("feedforward tracking is not implemented; ignoring feedforward and applying the setpoint law");

        match self.compute_setpoint_control_signal(q, reference)? {
            ControlOutput::Signal(u) => Ok(ControlOutput::SignalWithoutFeedforward(u)),
            other => Ok(other),
        }
    }

    /// Update the stability latch against a task error computed elsewhere.
    pub fn verify_stability(&mut self, error: &DVector<f64>) {
        self.state.verify_stability(error);
    }
}
