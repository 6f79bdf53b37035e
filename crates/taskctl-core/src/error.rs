use thiserror::Error;

/// Errors produced by the control-signal pipelines.
///
/// An unconfigured controller is *not* an error: those calls return
/// [`ControlOutput::Idle`](crate::ControlOutput::Idle) and leave all
/// bookkeeping untouched. Errors here are the cases the control loop must
/// react to — a solve that produced no usable command.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The constraint set admits no feasible velocity command.
    ///
    /// Never retried internally; the caller's control loop owns any
    /// constraint-relaxation strategy.
    #[error("QP infeasible: constraint set admits no feasible point")]
    Infeasible,

    /// The QP objective is unbounded below over the feasible region.
    #[error("QP unbounded: objective decreases without bound over the feasible region")]
    Unbounded,

    /// The QP solver stopped without a solution (iteration limit, numerical
    /// trouble). Carries the solver's terminal status verbatim.
    #[error("QP solver failed: {0}")]
    SolverFailure(String),

    /// A matrix or vector passed to a control operation does not match the
    /// dimensions implied by the task Jacobian.
    #[error("{name}: expected {expected} {unit}, got {got}")]
    DimensionMismatch {
        /// Which input is inconsistent ("equality constraint matrix", ...).
        name: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        got: usize,
        /// What is being counted ("columns" or "rows").
        unit: &'static str,
    },
}
