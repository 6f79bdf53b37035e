//! Clarabel bridge: one convex QP per control cycle.
//!
//! Clarabel takes a single constraint system `A z + s = b, s ∈ K`; the
//! equality block maps to a `ZeroConeT` and the inequality block to a
//! `NonnegativeConeT`, equalities stacked first. Absent blocks become
//! zero-row cones, so the unconstrained case needs no special path.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT::{NonnegativeConeT, ZeroConeT},
};
use nalgebra::{DMatrix, DVector};

use taskctl_core::{ConstraintSet, ControlError};

/// Values below this are treated as structural zeros in the CSC conversion.
const SPARSE_EPS: f64 = 1e-15;

/// Minimize `0.5 uᵀHu + fᵀu` subject to the blocks in `constraints`.
///
/// `h` must be symmetric positive semidefinite (the objective-builder
/// contract) and `constraints` must already be validated against
/// `f.len()`. Solver diagnostics are suppressed; the solve is expected to
/// return within one control cycle.
///
/// # Errors
///
/// [`ControlError::Infeasible`] when the constraint set admits no point,
/// [`ControlError::Unbounded`] when the objective has no minimum over the
/// feasible region, and [`ControlError::SolverFailure`] for any other
/// terminal status (iteration limit, numerical error).
pub fn solve_qp(
    h: &DMatrix<f64>,
    f: &DVector<f64>,
    constraints: &ConstraintSet,
    max_iters: u32,
) -> Result<DVector<f64>, ControlError> {
    let n = f.len();
    assert_eq!(h.nrows(), n, "objective matrix rows must match f");
    assert_eq!(h.ncols(), n, "objective matrix columns must match f");

    let n_eq = constraints.equality().map_or(0, |eq| eq.matrix.nrows());
    let n_ineq = constraints.inequality().map_or(0, |iq| iq.matrix.nrows());

    let mut a = DMatrix::zeros(n_eq + n_ineq, n);
    let mut b = DVector::zeros(n_eq + n_ineq);
    if let Some(eq) = constraints.equality() {
        a.view_mut((0, 0), (n_eq, n)).copy_from(&eq.matrix);
        b.rows_mut(0, n_eq).copy_from(&eq.rhs);
    }
    if let Some(iq) = constraints.inequality() {
        a.view_mut((n_eq, 0), (n_ineq, n)).copy_from(&iq.matrix);
        b.rows_mut(n_eq, n_ineq).copy_from(&iq.rhs);
    }

    let p_csc = to_csc_upper_triangle(h);
    let a_csc = to_csc(&a);
    let cones = [ZeroConeT(n_eq), NonnegativeConeT(n_ineq)];

    let settings = DefaultSettingsBuilder::default()
        .max_iter(max_iters)
        .verbose(false)
        .build()
        .expect("valid solver settings");

    let f_slice: Vec<f64> = f.iter().copied().collect();
    let b_slice: Vec<f64> = b.iter().copied().collect();

    let mut solver = DefaultSolver::new(&p_csc, &f_slice, &a_csc, &b_slice, &cones, settings)
        .map_err(|e| ControlError::SolverFailure(format!("{e:?}")))?;
    solver.solve();

    match solver.solution.status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => {
            Ok(DVector::from_row_slice(&solver.solution.x))
        }
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            Err(ControlError::Infeasible)
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            Err(ControlError::Unbounded)
        }
        status => Err(ControlError::SolverFailure(format!("{status:?}"))),
    }
}

/// Dense nalgebra matrix to Clarabel CSC, dropping structural zeros.
fn to_csc(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..nrows {
            let v = m[(i, j)];
            if v.abs() > SPARSE_EPS {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}

/// Upper triangle of a symmetric matrix in CSC form (Clarabel's P layout).
fn to_csc_upper_triangle(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..=j {
            let v = m[(i, j)];
            if v.abs() > SPARSE_EPS {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}
