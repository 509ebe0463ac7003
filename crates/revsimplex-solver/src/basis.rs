use crate::matrix::Matrix;
use crate::problem::AugmentedProblem;

/// The current basis of a solve.
///
/// `basis_matrix` column `i` and `basic_costs[i]` always describe augmented
/// column `basis_indices[i]`. Both are rebuilt from the indices whenever the
/// indices change, so row positions carry no state of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisState {
    basis_indices: Vec<usize>,
    basis_matrix: Matrix,
    basic_costs: Vec<f64>,
}

impl BasisState {
    /// Slack column `n + i` basic for row `i`; the basis matrix is the identity.
    pub fn initial(problem: &AugmentedProblem) -> Self {
        let m = problem.num_constraints;
        let mut basis = Self {
            basis_indices: (0..m).map(|row| problem.slack_column(row)).collect(),
            basis_matrix: Matrix::zeros(m, m),
            basic_costs: vec![0.0; m],
        };
        basis.rebuild(problem);
        basis
    }

    pub fn indices(&self) -> &[usize] {
        &self.basis_indices
    }

    pub fn matrix(&self) -> &Matrix {
        &self.basis_matrix
    }

    pub fn basic_costs(&self) -> &[f64] {
        &self.basic_costs
    }

    pub fn contains(&self, column: usize) -> bool {
        self.basis_indices.contains(&column)
    }

    /// Make `entering` basic in place of the column held by `leaving_row`.
    ///
    /// The indices are re-sorted ascending afterwards, which reorders rows;
    /// the matrix and costs are rebuilt to match.
    pub fn replace(&mut self, leaving_row: usize, entering: usize, problem: &AugmentedProblem) {
        self.basis_indices[leaving_row] = entering;
        self.basis_indices.sort_unstable();
        self.rebuild(problem);
    }

    fn rebuild(&mut self, problem: &AugmentedProblem) {
        for (i, &column) in self.basis_indices.iter().enumerate() {
            self.basis_matrix
                .set_column(i, &problem.constraints.column(column));
            self.basic_costs[i] = problem.costs[column];
        }
    }

    /// Spread per-row basic values over all `len` columns, zero elsewhere.
    pub fn scatter(&self, basic_values: &[f64], len: usize) -> Vec<f64> {
        let mut values = vec![0.0; len];
        for (&column, &value) in self.basis_indices.iter().zip(basic_values) {
            values[column] = value;
        }
        values
    }
}
