//! Linear constraint storage for the QP control law.

use nalgebra::{DMatrix, DVector};

use crate::error::ControlError;

/// One linear constraint block: `matrix * u (= | <=) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Coefficient matrix; columns must match the control-input dimension.
    pub matrix: DMatrix<f64>,
    /// Right-hand side; one entry per constraint row.
    pub rhs: DVector<f64>,
}

impl LinearConstraint {
    fn validate(&self, name: &'static str, rhs_name: &'static str, dim: usize) -> Result<(), ControlError> {
        if self.matrix.ncols() != dim {
            return Err(ControlError::DimensionMismatch {
                name,
                expected: dim,
                got: self.matrix.ncols(),
                unit: "columns",
            });
        }
        if self.rhs.nrows() != self.matrix.nrows() {
            return Err(ControlError::DimensionMismatch {
                name: rhs_name,
                expected: self.matrix.nrows(),
                got: self.rhs.nrows(),
                unit: "rows",
            });
        }
        Ok(())
    }
}

/// At most one equality block and one inequality block.
///
/// Each `set_*` call replaces the whole block; constraints are never
/// accumulated across calls. An absent block means the solver is invoked
/// with that block empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    equality: Option<LinearConstraint>,
    inequality: Option<LinearConstraint>,
}

impl ConstraintSet {
    /// Replace the equality block: `aeq * u = beq`.
    pub fn set_equality(&mut self, aeq: DMatrix<f64>, beq: DVector<f64>) {
        self.equality = Some(LinearConstraint {
            matrix: aeq,
            rhs: beq,
        });
    }

    /// Replace the inequality block: `a * u <= b`.
    pub fn set_inequality(&mut self, a: DMatrix<f64>, b: DVector<f64>) {
        self.inequality = Some(LinearConstraint { matrix: a, rhs: b });
    }

    /// Drop the equality block.
    pub fn clear_equality(&mut self) {
        self.equality = None;
    }

    /// Drop the inequality block.
    pub fn clear_inequality(&mut self) {
        self.inequality = None;
    }

    /// Current equality block, if set.
    pub fn equality(&self) -> Option<&LinearConstraint> {
        self.equality.as_ref()
    }

    /// Current inequality block, if set.
    pub fn inequality(&self) -> Option<&LinearConstraint> {
        self.inequality.as_ref()
    }

    /// Check both blocks against the control-input dimension `dim` before
    /// handing them to the solver.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` naming the offending matrix or right-hand side.
    pub fn validate(&self, dim: usize) -> Result<(), ControlError> {
        if let Some(eq) = &self.equality {
            eq.validate(
                "equality constraint matrix",
                "equality constraint right-hand side",
                dim,
            )?;
        }
        if let Some(ineq) = &self.inequality {
            ineq.validate(
                "inequality constraint matrix",
                "inequality constraint right-hand side",
                dim,
            )?;
        }
        Ok(())
    }
}
