//! Classical pseudo-inverse setpoint controller.

use nalgebra::{DMatrix, DVector};

use taskctl_core::{
    ControlConfig, ControlError, ControlOutput, ControllerState, KinematicsProvider,
    TaskPrimitive,
};

/// Unconstrained task-space velocity controller:
/// `u = pinv(J) · gain · e` with `e = reference − task_variable(q)`.
///
/// The Moore-Penrose pseudo-inverse gives the minimum-norm least-squares
/// command when the Jacobian is redundant or rank-deficient. Note the error
/// sign is the reverse of the QP law's; the two conventions are distinct
/// and deliberately not unified.
pub struct PinvVelocityController<K> {
    kinematics: K,
    state: ControllerState,
    svd_tolerance: f64,
}

impl<K: KinematicsProvider> PinvVelocityController<K> {
    /// Controller with the config's gain, threshold, and SVD tolerance.
    pub fn new(kinematics: K, config: &ControlConfig) -> Self {
        Self {
            kinematics,
            state: ControllerState::new(config.gain, config.stability_threshold),
            svd_tolerance: config.svd_tolerance,
        }
    }

    /// The kinematics provider this controller queries.
    pub fn kinematics(&self) -> &K {
        &self.kinematics
    }

    /// Command recorded by the most recent successful computation.
    pub fn last_control_signal(&self) -> Option<&DVector<f64>> {
        self.state.last_control_signal()
    }

    /// Task error recorded by the most recent successful computation.
    pub fn last_error_signal(&self) -> Option<&DVector<f64>> {
        self.state.last_error_signal()
    }

    /// Whether the stability latch has tripped.
    pub fn is_stable(&self) -> bool {
        self.state.is_stable()
    }

    /// Regulate the full task variable toward `reference`.
    pub fn compute_control_signal(
        &mut self,
        q: &DVector<f64>,
        reference: &DVector<f64>,
    ) -> Result<ControlOutput, ControlError> {
        self.compute(q, reference, None)
    }

    /// Regulate one primitive of a composite task toward `reference`.
    ///
    /// The selector is passed through to both kinematics queries, so the
    /// task variable and the Jacobian describe the same sub-task.
    pub fn compute_control_signal_for(
        &mut self,
        q: &DVector<f64>,
        reference: &DVector<f64>,
        primitive: TaskPrimitive,
    ) -> Result<ControlOutput, ControlError> {
        self.compute(q, reference, Some(primitive))
    }

    /// Update the stability latch against a task error computed elsewhere.
    pub fn verify_stability(&mut self, error: &DVector<f64>) {
        self.state.verify_stability(error);
    }

    fn compute(
        &mut self,
        q: &DVector<f64>,
        reference: &DVector<f64>,
        primitive: Option<TaskPrimitive>,
    ) -> Result<ControlOutput, ControlError> {
        if !self.kinematics.is_set() {
            return Ok(ControlOutput::Idle);
        }

        let (variable, jacobian) = match primitive {
            Some(p) => (
                self.kinematics.task_variable_for(q, p),
                self.kinematics.jacobian_for(q, p),
            ),
            None => (self.kinematics.task_variable(q), self.kinematics.jacobian(q)),
        };
        if reference.nrows() != variable.nrows() {
            return Err(ControlError::DimensionMismatch {
                name: "task reference",
                expected: variable.nrows(),
                got: reference.nrows(),
                unit: "rows",
            });
        }

        // Reversed sign relative to the QP law.
        let error = reference - variable;
        let pinv = jacobian
            .svd(true, true)
            .pseudo_inverse(self.svd_tolerance)
            .map_err(|msg| ControlError::SolverFailure(msg.to_string()))?;
        let u = pinv * (&error * self.state.gain());

        self.state.verify_stability(&error);
        self.state.record_signals(u.clone(), error);
        Ok(ControlOutput::Signal(u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Fixed linear task map: variable = map * q, Jacobian = map.
    struct LinearTask {
        map: DMatrix<f64>,
        configured: bool,
    }

    impl KinematicsProvider for LinearTask {
        fn is_set(&self) -> bool {
            self.configured
        }

        fn task_variable(&self, q: &DVector<f64>) -> DVector<f64> {
            &self.map * q
        }

        fn jacobian(&self, _q: &DVector<f64>) -> DMatrix<f64> {
            self.map.clone()
        }

        // One primitive per row of the task map.
        fn task_variable_for(&self, q: &DVector<f64>, primitive: TaskPrimitive) -> DVector<f64> {
            let value = (self.map.row(primitive.0) * q)[(0, 0)];
            DVector::from_row_slice(&[value])
        }

        fn jacobian_for(&self, _q: &DVector<f64>, primitive: TaskPrimitive) -> DMatrix<f64> {
            let row = self.map.row(primitive.0);
            DMatrix::from_fn(1, self.map.ncols(), |_, j| row[j])
        }
    }

    fn linear(rows: usize, cols: usize, data: &[f64]) -> LinearTask {
        LinearTask {
            map: DMatrix::from_row_slice(rows, cols, data),
            configured: true,
        }
    }

    #[test]
    fn identity_task_with_unit_gain_returns_the_error() {
        // J = I, gain = 1, r = [1,1], v = [0,0]  =>  u = [1,1]
        let mut ctrl = PinvVelocityController::new(
            linear(2, 2, &[1.0, 0.0, 0.0, 1.0]),
            &ControlConfig::with_gain(1.0),
        );

        let out = ctrl
            .compute_control_signal(
                &DVector::from_row_slice(&[0.0, 0.0]),
                &DVector::from_row_slice(&[1.0, 1.0]),
            )
            .unwrap();
        let u = out.signal().unwrap();
        assert_relative_eq!(u[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(u[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn square_full_rank_jacobian_matches_the_explicit_inverse() {
        // For invertible J the pseudo-inverse is the inverse:
        // u = J^-1 * gain * (r - v).
        let mut ctrl = PinvVelocityController::new(
            linear(2, 2, &[2.0, 0.0, 0.0, 4.0]),
            &ControlConfig::with_gain(1.0),
        );

        let out = ctrl
            .compute_control_signal(
                &DVector::from_row_slice(&[0.0, 0.0]),
                &DVector::from_row_slice(&[2.0, 4.0]),
            )
            .unwrap();
        let u = out.signal().unwrap();
        assert_relative_eq!(u[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(u[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn redundant_jacobian_gives_the_minimum_norm_solution() {
        // J = [1, 1]: infinitely many u with J u = e; pinv picks the
        // minimum-norm one, which splits the rate evenly.
        let mut ctrl =
            PinvVelocityController::new(linear(1, 2, &[1.0, 1.0]), &ControlConfig::with_gain(1.0));

        let out = ctrl
            .compute_control_signal(
                &DVector::from_row_slice(&[0.0, 0.0]),
                &DVector::from_row_slice(&[1.0]),
            )
            .unwrap();
        let u = out.signal().unwrap();
        assert_relative_eq!(u[0], 0.5, epsilon = 1e-10);
        assert_relative_eq!(u[1], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn error_uses_the_reference_minus_variable_convention() {
        // v = [1], r = [0]: the QP law would record e = +1; this law
        // records e = -1 and commands a negative rate.
        let mut ctrl =
            PinvVelocityController::new(linear(1, 1, &[1.0]), &ControlConfig::with_gain(1.0));

        ctrl.compute_control_signal(
            &DVector::from_row_slice(&[1.0]),
            &DVector::from_row_slice(&[0.0]),
        )
        .unwrap();

        assert_relative_eq!(ctrl.last_error_signal().unwrap()[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(ctrl.last_control_signal().unwrap()[0], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn gain_scales_the_command() {
        let mut ctrl =
            PinvVelocityController::new(linear(1, 1, &[1.0]), &ControlConfig::with_gain(10.0));

        ctrl.compute_control_signal(
            &DVector::from_row_slice(&[0.0]),
            &DVector::from_row_slice(&[0.5]),
        )
        .unwrap();
        assert_relative_eq!(ctrl.last_control_signal().unwrap()[0], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn primitive_selector_reaches_both_queries() {
        // Row 0 controls joint 0, row 1 controls joint 1. Selecting row 1
        // must produce motion only in joint 1.
        let mut ctrl = PinvVelocityController::new(
            linear(2, 2, &[1.0, 0.0, 0.0, 2.0]),
            &ControlConfig::with_gain(1.0),
        );

        let out = ctrl
            .compute_control_signal_for(
                &DVector::from_row_slice(&[0.0, 0.0]),
                &DVector::from_row_slice(&[4.0]),
                TaskPrimitive(1),
            )
            .unwrap();
        let u = out.signal().unwrap();
        assert_relative_eq!(u[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(u[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn unconfigured_controller_stays_idle() {
        let mut provider = linear(1, 1, &[1.0]);
        provider.configured = false;
        let mut ctrl = PinvVelocityController::new(provider, &ControlConfig::default());

        let out = ctrl
            .compute_control_signal(
                &DVector::from_row_slice(&[0.0]),
                &DVector::from_row_slice(&[1.0]),
            )
            .unwrap();
        assert!(out.is_idle());
        assert!(ctrl.last_control_signal().is_none());
    }

    #[test]
    fn stability_latches_once_the_error_settles() {
        let mut ctrl =
            PinvVelocityController::new(linear(1, 1, &[1.0]), &ControlConfig::with_gain(1.0));
        let q = DVector::from_row_slice(&[0.0]);
        let r = DVector::from_row_slice(&[1.0]);

        ctrl.compute_control_signal(&q, &r).unwrap();
        assert!(!ctrl.is_stable());
        ctrl.compute_control_signal(&q, &r).unwrap();
        assert!(ctrl.is_stable());
    }
}
