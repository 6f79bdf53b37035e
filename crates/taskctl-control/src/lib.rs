//! Task-space feedback control laws for redundant manipulators.
//!
//! Given a joint configuration and a desired task reference, both laws in
//! this crate produce a joint-velocity command that drives the task error
//! toward zero:
//!
//! 1. **QP law** ([`QpVelocityController`]) — casts velocity selection as a
//!    convex quadratic program `min 0.5 uᵀHu + fᵀu` subject to optional
//!    linear equality/inequality constraints (joint limits, obstacle
//!    planes), solved with Clarabel. The objective `H, f` comes from a
//!    pluggable [`ObjectiveBuilder`].
//! 2. **Pseudo-inverse law** ([`PinvVelocityController`]) — the classical
//!    unconstrained solution `u = pinv(J) · gain · e` via the Moore-Penrose
//!    pseudo-inverse.
//!
//! Both laws share the stability latch and bookkeeping of
//! [`taskctl_core::ControllerState`] and query the robot through the
//! [`KinematicsProvider`](taskctl_core::KinematicsProvider) seam; neither
//! computes kinematics itself.
//!
//! Note the deliberate sign split between the laws: the QP law defines the
//! task error as `variable − reference`, the pseudo-inverse law as
//! `reference − variable`. Each controller documents its own convention.

pub mod objective;
pub mod pinv;
pub mod qp;
pub mod solver;

pub use objective::{ClassicTracking, ObjectiveBuilder};
pub use pinv::PinvVelocityController;
pub use qp::QpVelocityController;
pub use solver::solve_qp;
