//! Typed outcome of a control-signal computation.

use nalgebra::DVector;

/// What a control-signal operation produced.
///
/// "No command" and "degraded command" are explicit variants rather than
/// sentinel vectors, so the control loop (and tests) can branch on them.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutput {
    /// A joint-velocity command.
    Signal(DVector<f64>),

    /// A joint-velocity command computed by the tracking path with the
    /// feedforward term ignored (feedforward tracking is unimplemented;
    /// the setpoint law was used instead).
    SignalWithoutFeedforward(DVector<f64>),

    /// The controller has no task type or gain configured; no command was
    /// issued and no bookkeeping was updated.
    Idle,
}

impl ControlOutput {
    /// The command, if one was produced.
    pub fn signal(&self) -> Option<&DVector<f64>> {
        match self {
            Self::Signal(u) | Self::SignalWithoutFeedforward(u) => Some(u),
            Self::Idle => None,
        }
    }

    /// Whether the controller declined to act.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
