use crate::basis::BasisState;
use crate::matrix::{dot, Matrix};
use crate::problem::AugmentedProblem;
use crate::simplex::SolveError;
use crate::trace::{TraceEvent, TraceSink};

/// Quantities derived from one inversion of the basis matrix.
///
/// Computed once per iteration and shared by the ratio test, the reduced
/// costs and the solution update.
#[derive(Debug, Clone)]
pub struct Factorization {
    /// `B^-1`
    pub inverse: Matrix,
    /// `B^-1 A'`
    pub tableau: Matrix,
    /// `B^-1 b'`, one value per basis row
    pub basic_solution: Vec<f64>,
    /// `c' - c_B^T B^-1 A'`
    pub reduced_costs: Vec<f64>,
}

impl Factorization {
    pub fn is_feasible(&self) -> bool {
        self.basic_solution.iter().all(|&v| v >= 0.0)
    }
}

/// Running-minimum scan over the reduced costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnteringCandidate {
    /// First column reaching the minimum, if any reduced cost is negative
    pub column: Option<usize>,
    /// The minimum, starting from zero
    pub min_reduced_cost: f64,
}

impl EnteringCandidate {
    /// The entering column, when its reduced cost is below `-tolerance`.
    pub fn accepted(&self, tolerance: f64) -> Option<usize> {
        self.column.filter(|_| self.min_reduced_cost < -tolerance)
    }
}

/// Scan left to right, replacing the candidate only on strict improvement.
pub fn select_entering(reduced_costs: &[f64]) -> EnteringCandidate {
    let mut candidate = EnteringCandidate {
        column: None,
        min_reduced_cost: 0.0,
    };
    for (j, &cost) in reduced_costs.iter().enumerate() {
        if cost < candidate.min_reduced_cost {
            candidate.min_reduced_cost = cost;
            candidate.column = Some(j);
        }
    }
    candidate
}

/// Performs pivots on a [`BasisState`] over one augmented problem
pub struct IterationEngine<'a> {
    problem: &'a AugmentedProblem,
    basis: BasisState,
}

impl<'a> IterationEngine<'a> {
    pub fn new(problem: &'a AugmentedProblem) -> Self {
        Self {
            problem,
            basis: BasisState::initial(problem),
        }
    }

    pub fn basis(&self) -> &BasisState {
        &self.basis
    }

    pub fn problem(&self) -> &AugmentedProblem {
        self.problem
    }

    /// Invert the current basis matrix and derive everything a pivot needs.
    pub fn factorize(&self) -> Result<Factorization, SolveError> {
        let inverse = self
            .basis
            .matrix()
            .inverse()
            .ok_or_else(|| SolveError::SingularBasis {
                basis: self.basis.indices().to_vec(),
            })?;

        let tableau = inverse.mul(&self.problem.constraints);
        let basic_solution = inverse.mul_vec(&self.problem.rhs);
        let prices = tableau.vec_mul(self.basis.basic_costs());
        let reduced_costs = self
            .problem
            .costs
            .iter()
            .zip(&prices)
            .map(|(c, p)| c - p)
            .collect();

        Ok(Factorization {
            inverse,
            tableau,
            basic_solution,
            reduced_costs,
        })
    }

    /// Minimum ratio test on column `entering`.
    ///
    /// Only rows with a strictly positive pivot-column entry take part; on a
    /// tie the first row wins. `None` means the column is unbounded.
    pub fn ratio_test<S>(
        &self,
        factorization: &Factorization,
        entering: usize,
        sink: &mut S,
    ) -> Option<usize>
    where
        S: TraceSink + ?Sized,
    {
        let mut leaving = None;
        let mut min_ratio = f64::INFINITY;

        for row in 0..self.problem.num_constraints {
            let entry = factorization.tableau.get(row, entering);
            if entry > 0.0 {
                let ratio = factorization.basic_solution[row] / entry;
                sink.record(&TraceEvent::Ratio { row, ratio });
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(row);
                    sink.record(&TraceEvent::LeavingCandidate { row, ratio });
                }
            }
        }

        leaving
    }

    pub fn pivot(&mut self, leaving_row: usize, entering: usize) {
        self.basis.replace(leaving_row, entering, self.problem);
    }

    /// `(solution_vector, objective)` for the basis `factorization` was built from.
    pub fn solution(&self, factorization: &Factorization) -> (Vec<f64>, f64) {
        let values = self
            .basis
            .scatter(&factorization.basic_solution, self.problem.num_columns());
        let objective = dot(self.basis.basic_costs(), &factorization.basic_solution);
        (values, objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{standardize, LinearProgram};
    use crate::trace::{NoTrace, TraceLog};

    fn textbook() -> AugmentedProblem {
        let program = LinearProgram::new(
            vec![-3.0, -5.0],
            vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
            vec![4.0, 12.0, 18.0],
        )
        .unwrap();
        standardize(&program)
    }

    #[test]
    fn test_select_entering_most_negative() {
        let candidate = select_entering(&[-3.0, -5.0, 0.0, 0.0, 0.0]);
        assert_eq!(candidate.column, Some(1));
        assert_eq!(candidate.min_reduced_cost, -5.0);
        assert_eq!(candidate.accepted(1e-12), Some(1));
    }

    #[test]
    fn test_select_entering_first_on_tie() {
        let candidate = select_entering(&[0.0, -2.0, 1.0, -2.0]);
        assert_eq!(candidate.column, Some(1));
    }

    #[test]
    fn test_select_entering_none_when_nonnegative() {
        let candidate = select_entering(&[0.0, 1.0, 2.0]);
        assert_eq!(candidate.column, None);
        assert_eq!(candidate.accepted(1e-12), None);
    }

    #[test]
    fn test_select_entering_within_tolerance_is_rejected() {
        let candidate = select_entering(&[1.0, -1e-14]);
        assert_eq!(candidate.column, Some(1));
        assert_eq!(candidate.accepted(1e-12), None);
    }

    #[test]
    fn test_initial_factorization() {
        let problem = textbook();
        let engine = IterationEngine::new(&problem);
        let factorization = engine.factorize().unwrap();

        assert_eq!(factorization.inverse, Matrix::identity(3));
        assert_eq!(factorization.basic_solution, vec![4.0, 12.0, 18.0]);
        assert_eq!(factorization.reduced_costs, vec![-3.0, -5.0, 0.0, 0.0, 0.0]);
        assert!(factorization.is_feasible());
    }

    #[test]
    fn test_ratio_test_picks_min_ratio() {
        let problem = textbook();
        let engine = IterationEngine::new(&problem);
        let factorization = engine.factorize().unwrap();
        let mut log = TraceLog::new();

        // Column 1: ratios 12/2 = 6 (row 1) and 18/2 = 9 (row 2)
        let leaving = engine.ratio_test(&factorization, 1, &mut log);
        assert_eq!(leaving, Some(1));
        assert_eq!(
            log.events,
            vec![
                TraceEvent::Ratio { row: 1, ratio: 6.0 },
                TraceEvent::LeavingCandidate { row: 1, ratio: 6.0 },
                TraceEvent::Ratio { row: 2, ratio: 9.0 },
            ]
        );
    }

    #[test]
    fn test_ratio_test_tie_keeps_first_row() {
        let program = LinearProgram::new(
            vec![-1.0],
            vec![vec![1.0], vec![2.0]],
            vec![2.0, 4.0],
        )
        .unwrap();
        let problem = standardize(&program);
        let engine = IterationEngine::new(&problem);
        let factorization = engine.factorize().unwrap();
        assert_eq!(engine.ratio_test(&factorization, 0, &mut NoTrace), Some(0));
    }

    #[test]
    fn test_ratio_test_unbounded_column() {
        let program = LinearProgram::new(vec![-1.0], vec![vec![-1.0]], vec![1.0]).unwrap();
        let problem = standardize(&program);
        let engine = IterationEngine::new(&problem);
        let factorization = engine.factorize().unwrap();
        assert_eq!(engine.ratio_test(&factorization, 0, &mut NoTrace), None);
    }

    #[test]
    fn test_pivot_updates_solution() {
        let problem = textbook();
        let mut engine = IterationEngine::new(&problem);
        engine.pivot(1, 1);

        let factorization = engine.factorize().unwrap();
        let (values, objective) = engine.solution(&factorization);
        assert_eq!(engine.basis().indices(), &[1, 2, 4]);
        assert!((values[1] - 6.0).abs() < 1e-12);
        assert!((values[2] - 4.0).abs() < 1e-12);
        assert!((values[4] - 6.0).abs() < 1e-12);
        assert_eq!(values[0], 0.0);
        assert!((objective + 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_basis_is_fatal() {
        // Column 0 duplicates slack 2, so swapping it for slack 3 leaves two equal columns
        let program = LinearProgram::new(
            vec![-1.0, 0.0],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
            vec![1.0, 1.0],
        )
        .unwrap();
        let problem = standardize(&program);
        let mut engine = IterationEngine::new(&problem);
        engine.pivot(1, 0);

        let err = engine.factorize().unwrap_err();
        assert_eq!(err, SolveError::SingularBasis { basis: vec![0, 2] });
    }
}
