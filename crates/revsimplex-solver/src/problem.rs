use thiserror::Error;

use crate::matrix::Matrix;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Constraint matrix has {rows} rows but right-hand side has {rhs} entries")]
    RowMismatch { rows: usize, rhs: usize },
    #[error("Constraint row {row} has {found} columns, expected {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

/// A linear program in standard form:
///
/// minimize c^T x subject to A x = b, x >= 0
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    objective: Vec<f64>,
    constraints: Vec<Vec<f64>>,
    rhs: Vec<f64>,
}

impl LinearProgram {
    /// Build a program, checking that `constraints` is `rhs.len()` rows of
    /// `objective.len()` columns each.
    pub fn new(
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
    ) -> Result<Self, ProblemError> {
        if constraints.len() != rhs.len() {
            return Err(ProblemError::RowMismatch {
                rows: constraints.len(),
                rhs: rhs.len(),
            });
        }
        for (row, coefficients) in constraints.iter().enumerate() {
            if coefficients.len() != objective.len() {
                return Err(ProblemError::ColumnMismatch {
                    row,
                    expected: objective.len(),
                    found: coefficients.len(),
                });
            }
        }

        if !objective.iter().all(|v| v.is_finite()) {
            return Err(ProblemError::NonFinite("objective"));
        }
        if !constraints.iter().flatten().all(|v| v.is_finite()) {
            return Err(ProblemError::NonFinite("constraint matrix"));
        }
        if !rhs.iter().all(|v| v.is_finite()) {
            return Err(ProblemError::NonFinite("right-hand side"));
        }

        Ok(Self {
            objective,
            constraints,
            rhs,
        })
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Vec<f64>] {
        &self.constraints
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }
}

/// The program with one identity column appended per constraint row.
///
/// Columns `0..n` are structural, columns `n..n + m` are slack columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedProblem {
    /// `[A | I]`, m x (n + m)
    pub constraints: Matrix,
    /// `b`, unchanged
    pub rhs: Vec<f64>,
    /// `[c | 0]`
    pub costs: Vec<f64>,
    pub num_constraints: usize,
    pub num_variables: usize,
}

impl AugmentedProblem {
    pub fn num_columns(&self) -> usize {
        self.num_variables + self.num_constraints
    }

    /// Index of the slack column attached to `row`.
    pub fn slack_column(&self, row: usize) -> usize {
        self.num_variables + row
    }
}

pub fn standardize(program: &LinearProgram) -> AugmentedProblem {
    let m = program.num_constraints();
    let n = program.num_variables();

    let rows = program
        .constraints()
        .iter()
        .enumerate()
        .map(|(i, coefficients)| {
            let mut row = Vec::with_capacity(n + m);
            row.extend_from_slice(coefficients);
            row.extend((0..m).map(|j| if i == j { 1.0 } else { 0.0 }));
            row
        })
        .collect();

    let mut costs = Vec::with_capacity(n + m);
    costs.extend_from_slice(program.objective());
    costs.resize(n + m, 0.0);

    AugmentedProblem {
        constraints: Matrix::from_rows(rows, n + m),
        rhs: program.rhs().to_vec(),
        costs,
        num_constraints: m,
        num_variables: n,
    }
}
