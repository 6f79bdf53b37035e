// taskctl-core: Types, traits, config, and errors for task-space kinematic control.

pub mod config;
pub mod constraints;
pub mod error;
pub mod kinematics;
pub mod output;
pub mod state;

pub use config::ControlConfig;
pub use constraints::{ConstraintSet, LinearConstraint};
pub use error::ControlError;
pub use kinematics::{KinematicsProvider, TaskPrimitive};
pub use output::ControlOutput;
pub use state::ControllerState;
