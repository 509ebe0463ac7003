//! Independent tableau simplex used to cross-check [`Solver`](crate::Solver).
//!
//! Works on the equality form `A'x = b', x >= 0` of the augmented problem with
//! a true two-phase method: negative right-hand sides are flipped, every row
//! gets an artificial column, and Phase 1 drives the artificials to zero
//! before Phase 2 optimizes the real costs. Pivoting uses Bland's rule, so its
//! path is unrelated to the revised solver's.

use crate::problem::AugmentedProblem;
use crate::solution::{IterationResult, Status};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Gave up after the configured number of pivots
    IterationLimit,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSolution {
    pub status: ReferenceStatus,
    pub objective_value: f64,
    /// Values for all augmented columns; empty unless optimal
    pub values: Vec<f64>,
    /// Pivots over both phases
    pub iterations: usize,
}

impl ReferenceSolution {
    fn without_values(status: ReferenceStatus, objective_value: f64, iterations: usize) -> Self {
        Self {
            status,
            objective_value,
            values: Vec::new(),
            iterations,
        }
    }
}

/// Dense two-phase tableau solver
pub struct ReferenceSolver {
    /// Maximum pivots over both phases before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for ReferenceSolver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl ReferenceSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn solve(&self, problem: &AugmentedProblem) -> ReferenceSolution {
        let mut tableau = self.build_tableau(problem);

        match self.phase1(&mut tableau) {
            PhaseResult::Optimal => {}
            PhaseResult::IterationLimit => {
                return ReferenceSolution::without_values(
                    ReferenceStatus::IterationLimit,
                    f64::NAN,
                    tableau.iterations,
                );
            }
            // Phase 1 is bounded below by zero
            PhaseResult::Unbounded | PhaseResult::Infeasible => {
                return ReferenceSolution::without_values(
                    ReferenceStatus::Infeasible,
                    f64::INFINITY,
                    tableau.iterations,
                );
            }
        }

        self.drive_out_artificials(&mut tableau);

        match self.phase2(&mut tableau, problem) {
            PhaseResult::Optimal => self.extract_solution(&tableau, problem),
            PhaseResult::Unbounded => ReferenceSolution::without_values(
                ReferenceStatus::Unbounded,
                f64::NEG_INFINITY,
                tableau.iterations,
            ),
            PhaseResult::IterationLimit => ReferenceSolution::without_values(
                ReferenceStatus::IterationLimit,
                f64::NAN,
                tableau.iterations,
            ),
            PhaseResult::Infeasible => ReferenceSolution::without_values(
                ReferenceStatus::Infeasible,
                f64::INFINITY,
                tableau.iterations,
            ),
        }
    }

    fn build_tableau(&self, problem: &AugmentedProblem) -> Tableau {
        let m = problem.num_constraints;
        let n_cols = problem.num_columns();
        let total_cols = n_cols + m + 1; // +1 for RHS
        let rhs_col = total_cols - 1;

        let mut data = vec![vec![0.0; total_cols]; m + 1];
        for (i, row) in data.iter_mut().take(m).enumerate() {
            // Keep the RHS non-negative so the artificial basis is feasible
            let sign = if problem.rhs[i] < 0.0 { -1.0 } else { 1.0 };
            for (j, &coef) in problem.constraints.row(i).iter().enumerate() {
                row[j] = sign * coef;
            }
            row[n_cols + i] = 1.0;
            row[rhs_col] = sign * problem.rhs[i];
        }

        Tableau {
            data,
            basic_vars: (n_cols..n_cols + m).collect(),
            n_cols,
            iterations: 0,
        }
    }

    fn phase1(&self, tableau: &mut Tableau) -> PhaseResult {
        let m = tableau.basic_vars.len();
        let art_start = tableau.n_cols;
        let width = tableau.width();

        // Minimize the sum of artificials, priced out against the artificial basis
        let mut objective = vec![0.0; width];
        for j in art_start..art_start + m {
            objective[j] = 1.0;
        }
        for i in 0..m {
            for j in 0..width {
                objective[j] -= tableau.data[i][j];
            }
        }
        tableau.data[m] = objective;

        let result = self.run(tableau, art_start + m);
        if result != PhaseResult::Optimal {
            return result;
        }

        let rhs_col = tableau.rhs_col();
        let infeasibility = -tableau.data[m][rhs_col];
        let scale = 1.0
            + tableau.data[..m]
                .iter()
                .map(|row| row[rhs_col].abs())
                .fold(0.0, f64::max);
        if infeasibility > self.tolerance * scale {
            return PhaseResult::Infeasible;
        }

        PhaseResult::Optimal
    }

    /// Pivot zero-level artificials out of the basis where a real column allows it.
    ///
    /// Rows where no real column has a nonzero entry are redundant and keep
    /// their artificial, which stays at zero for the rest of the solve.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let m = tableau.basic_vars.len();
        for row in 0..m {
            if tableau.basic_vars[row] < tableau.n_cols {
                continue;
            }
            let replacement =
                (0..tableau.n_cols).find(|&j| tableau.data[row][j].abs() > self.tolerance);
            if let Some(col) = replacement {
                self.pivot(tableau, row, col);
            }
        }
    }

    fn phase2(&self, tableau: &mut Tableau, problem: &AugmentedProblem) -> PhaseResult {
        let m = tableau.basic_vars.len();
        let width = tableau.width();

        let mut objective = vec![0.0; width];
        objective[..tableau.n_cols].copy_from_slice(&problem.costs);
        for i in 0..m {
            let basic = tableau.basic_vars[i];
            let cost = if basic < tableau.n_cols {
                problem.costs[basic]
            } else {
                0.0
            };
            if cost != 0.0 {
                for j in 0..width {
                    objective[j] -= cost * tableau.data[i][j];
                }
            }
        }
        tableau.data[m] = objective;

        // Artificial columns may not re-enter
        self.run(tableau, tableau.n_cols)
    }

    fn run(&self, tableau: &mut Tableau, eligible: usize) -> PhaseResult {
        loop {
            let Some(pivot_col) = self.find_pivot_column(tableau, eligible) else {
                return PhaseResult::Optimal;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col) else {
                return PhaseResult::Unbounded;
            };
            if tableau.iterations >= self.max_iterations {
                return PhaseResult::IterationLimit;
            }
            self.pivot(tableau, pivot_row, pivot_col);
            tableau.iterations += 1;
        }
    }

    /// Bland's rule: the lowest-index column with a negative reduced cost.
    fn find_pivot_column(&self, tableau: &Tableau, eligible: usize) -> Option<usize> {
        let obj_row = tableau.basic_vars.len();
        (0..eligible).find(|&j| tableau.data[obj_row][j] < -self.tolerance)
    }

    /// Minimum ratio, ties broken by the lowest basic variable index.
    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let rhs_col = tableau.rhs_col();

        let mut min_ratio = f64::INFINITY;
        let mut min_row: Option<usize> = None;

        for (i, row) in tableau.data[..tableau.basic_vars.len()].iter().enumerate() {
            let val = row[col];
            if val > self.tolerance {
                let ratio = row[rhs_col] / val;
                let better = match min_row {
                    None => true,
                    Some(r) => {
                        ratio < min_ratio - self.tolerance
                            || (ratio <= min_ratio + self.tolerance
                                && tableau.basic_vars[i] < tableau.basic_vars[r])
                    }
                };
                if better {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_rows = tableau.data.len();
        let width = tableau.width();

        tableau.basic_vars[row] = col;

        // Scale pivot row
        let pivot_val = tableau.data[row][col];
        for j in 0..width {
            tableau.data[row][j] /= pivot_val;
        }

        // Eliminate column in other rows
        for i in 0..n_rows {
            if i != row {
                let factor = tableau.data[i][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..width {
                    tableau.data[i][j] -= factor * tableau.data[row][j];
                }
            }
        }
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &AugmentedProblem) -> ReferenceSolution {
        let rhs_col = tableau.rhs_col();

        let mut values = vec![0.0; tableau.n_cols];
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < tableau.n_cols {
                values[basic] = tableau.data[i][rhs_col];
            }
        }

        let objective_value = values
            .iter()
            .zip(&problem.costs)
            .map(|(x, c)| x * c)
            .sum();

        ReferenceSolution {
            status: ReferenceStatus::Optimal,
            objective_value,
            values,
            iterations: tableau.iterations,
        }
    }
}

struct Tableau {
    /// Constraint rows followed by the objective row
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    /// Augmented columns; artificials follow them, then the RHS
    n_cols: usize,
    iterations: usize,
}

impl Tableau {
    fn width(&self) -> usize {
        self.data[0].len()
    }

    fn rhs_col(&self) -> usize {
        self.width() - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseResult {
    Optimal,
    Unbounded,
    Infeasible,
    IterationLimit,
}

/// Comparison of a revised-simplex result against the reference solver
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCheck {
    pub status: Status,
    pub reference_status: ReferenceStatus,
    pub status_agrees: bool,
    /// `|value - reference value|` when both are optimal
    pub objective_difference: Option<f64>,
    pub agrees: bool,
}

pub fn cross_check(
    result: &IterationResult,
    reference: &ReferenceSolution,
    tolerance: f64,
) -> CrossCheck {
    let status_agrees = matches!(
        (result.status, reference.status),
        (Status::Optimal, ReferenceStatus::Optimal)
            | (Status::Infeasible, ReferenceStatus::Infeasible)
            | (Status::Unbounded, ReferenceStatus::Unbounded)
    );
    let objective_difference = (result.status == Status::Optimal
        && reference.status == ReferenceStatus::Optimal)
        .then(|| (result.optimal_value - reference.objective_value).abs());
    let agrees = status_agrees && objective_difference.is_none_or(|d| d <= tolerance);

    CrossCheck {
        status: result.status,
        reference_status: reference.status,
        status_agrees,
        objective_difference,
        agrees,
    }
}
