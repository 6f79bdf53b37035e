//! The kinematics seam between the control laws and the robot model.
//!
//! Controllers never compute forward kinematics or Jacobians themselves;
//! they query a [`KinematicsProvider`] supplied by the caller. The provider
//! maps a joint configuration `q` to the controlled task variable and to
//! the Jacobian relating joint velocities to task-variable rates.

use nalgebra::{DMatrix, DVector};

/// Selector for a sub-variant inside a composite task type.
///
/// Some task types bundle several geometric primitives (e.g. the planes or
/// lines of a multi-plane task); a `TaskPrimitive` names which one a query
/// refers to. Providers with a single task variable ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskPrimitive(pub usize);

/// Source of task variables and Jacobians for a joint configuration.
///
/// Implementations own the robot model and the task-type selection; the
/// control laws in `taskctl-control` are generic over this trait.
pub trait KinematicsProvider {
    /// Whether a task type and gain have been configured.
    ///
    /// Control-signal computations on an unconfigured provider produce no
    /// command (the controller reports itself idle rather than erroring).
    fn is_set(&self) -> bool;

    /// Task variable `f(q)` for the configured task type.
    fn task_variable(&self, q: &DVector<f64>) -> DVector<f64>;

    /// Task Jacobian `J(q)`: rows match the task variable, columns match
    /// the joint-space dimension of `q`.
    fn jacobian(&self, q: &DVector<f64>) -> DMatrix<f64>;

    /// Task variable restricted to one primitive of a composite task.
    ///
    /// The default ignores the selector and returns the full task variable.
    fn task_variable_for(&self, q: &DVector<f64>, primitive: TaskPrimitive) -> DVector<f64> {
        let _ = primitive;
        self.task_variable(q)
    }

    /// Jacobian restricted to one primitive of a composite task.
    fn jacobian_for(&self, q: &DVector<f64>, primitive: TaskPrimitive) -> DMatrix<f64> {
        let _ = primitive;
        self.jacobian(q)
    }
}
