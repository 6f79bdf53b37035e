//! Controller configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_gain() -> f64 {
    1.0
}
const fn default_stability_threshold() -> f64 {
    1e-4
}
const fn default_damping() -> f64 {
    0.01
}
const fn default_svd_tolerance() -> f64 {
    1e-10
}
const fn default_max_solver_iters() -> u32 {
    200
}

/// Shared configuration for the task-space control laws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Proportional feedback gain applied to the task error.
    #[serde(default = "default_gain")]
    pub gain: f64,

    /// Convergence tolerance: once the norm of the change between
    /// consecutive task errors drops below this, the controller latches
    /// stable.
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: f64,

    /// Damping factor (lambda) of the tracking objective. Higher = more
    /// robust near singularities, but slower convergence.
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Singular-value cutoff for the Moore-Penrose pseudo-inverse.
    #[serde(default = "default_svd_tolerance")]
    pub svd_tolerance: f64,

    /// Maximum QP solver iterations per control cycle.
    #[serde(default = "default_max_solver_iters")]
    pub max_solver_iters: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            stability_threshold: default_stability_threshold(),
            damping: default_damping(),
            svd_tolerance: default_svd_tolerance(),
            max_solver_iters: default_max_solver_iters(),
        }
    }
}

impl ControlConfig {
    /// Config with a given gain, everything else at defaults.
    pub fn with_gain(gain: f64) -> Self {
        Self {
            gain,
            ..Self::default()
        }
    }
}
