use thiserror::Error;

use crate::iteration::{select_entering, IterationEngine};
use crate::problem::{standardize, LinearProgram, ProblemError};
use crate::solution::{IterationResult, Status};
use crate::trace::{NoTrace, TraceEvent, TraceSink};

/// Default reduced cost tolerance for accepting an entering column
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Conditions that abort a solve. These are never a [`Status`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(#[from] ProblemError),
    #[error("Basis matrix is singular for basis {basis:?}")]
    SingularBasis { basis: Vec<usize> },
    #[error("No terminal status after {0} iterations")]
    IterationLimit(usize),
}

/// Revised simplex solver over the slack-augmented problem
#[derive(Debug, Clone)]
pub struct Solver {
    /// Entering columns need a reduced cost below `-tolerance`
    tolerance: f64,
    /// Optional cap on the number of pivots
    max_iterations: Option<usize>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn solve(&self, program: &LinearProgram) -> Result<IterationResult, SolveError> {
        self.solve_with_trace(program, &mut NoTrace)
    }

    /// Solve, reporting every step to `sink`.
    pub fn solve_with_trace<S>(
        &self,
        program: &LinearProgram,
        sink: &mut S,
    ) -> Result<IterationResult, SolveError>
    where
        S: TraceSink + ?Sized,
    {
        let problem = standardize(program);
        let mut engine = IterationEngine::new(&problem);
        sink.record(&TraceEvent::Initialized {
            basis: engine.basis().indices().to_vec(),
        });

        // The slack basis is the only feasibility gate
        let mut factorization = engine.factorize()?;
        if !factorization.is_feasible() {
            sink.record(&TraceEvent::Infeasible {
                basic_solution: factorization.basic_solution.clone(),
            });
            return Ok(IterationResult::infeasible(problem.num_variables));
        }

        let (mut solution_vector, mut optimal_value) = engine.solution(&factorization);
        let mut iteration_count = 0;

        loop {
            let candidate = select_entering(&factorization.reduced_costs);
            sink.record(&TraceEvent::ReducedCosts {
                min_reduced_cost: candidate.min_reduced_cost,
                reduced_costs: factorization.reduced_costs.clone(),
            });

            let Some(entering) = candidate.accepted(self.tolerance) else {
                sink.record(&TraceEvent::Optimal {
                    iteration_count,
                    optimal_value,
                });
                return Ok(IterationResult {
                    status: Status::Optimal,
                    optimal_value,
                    solution_vector,
                    reduced_costs: factorization.reduced_costs,
                    iteration_count,
                    num_variables: problem.num_variables,
                });
            };

            if self.max_iterations.is_some_and(|max| iteration_count >= max) {
                return Err(SolveError::IterationLimit(iteration_count));
            }

            iteration_count += 1;
            sink.record(&TraceEvent::IterationStarted {
                iteration: iteration_count,
                entering,
            });

            let Some(leaving_row) = engine.ratio_test(&factorization, entering, &mut *sink) else {
                sink.record(&TraceEvent::Unbounded {
                    iteration: iteration_count,
                });
                // Values from the last completed pivot
                return Ok(IterationResult {
                    status: Status::Unbounded,
                    optimal_value,
                    solution_vector,
                    reduced_costs: factorization.reduced_costs,
                    iteration_count,
                    num_variables: problem.num_variables,
                });
            };

            engine.pivot(leaving_row, entering);
            sink.record(&TraceEvent::BasisUpdated {
                iteration: iteration_count,
                leaving_row,
                basis: engine.basis().indices().to_vec(),
            });

            factorization = engine.factorize()?;
            (solution_vector, optimal_value) = engine.solution(&factorization);
        }
    }
}

/// Validate `(c, A, b)` and solve it with the default [`Solver`].
pub fn solve(
    objective: Vec<f64>,
    constraints: Vec<Vec<f64>>,
    rhs: Vec<f64>,
) -> Result<IterationResult, SolveError> {
    let program = LinearProgram::new(objective, constraints, rhs)?;
    Solver::new().solve(&program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::standardize;
    use crate::reference::{ReferenceSolver, ReferenceStatus};
    use crate::trace::TraceLog;

    fn program(c: Vec<f64>, a: Vec<Vec<f64>>, b: Vec<f64>) -> LinearProgram {
        LinearProgram::new(c, a, b).unwrap()
    }

    fn textbook() -> LinearProgram {
        program(
            vec![-3.0, -5.0],
            vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
            vec![4.0, 12.0, 18.0],
        )
    }

    #[test]
    fn test_textbook_instance() {
        let result = Solver::new().solve(&textbook()).unwrap();

        println!("Status: {:?}", result.status);
        println!("Values: {:?}", result.solution_vector);
        println!("Objective: {}", result.optimal_value);

        assert_eq!(result.status, Status::Optimal);
        assert!((result.optimal_value + 36.0).abs() < 1e-9, "obj = {} (expected -36)", result.optimal_value);
        let x = result.structural_solution();
        assert!((x[0] - 2.0).abs() < 1e-9, "x = {} (expected 2)", x[0]);
        assert!((x[1] - 6.0).abs() < 1e-9, "y = {} (expected 6)", x[1]);
        assert_eq!(result.iteration_count, 2);
        assert_eq!(result.solution_vector.len(), 5);
        assert_eq!(result.reduced_costs.len(), 5);
    }

    #[test]
    fn test_optimal_reduced_costs_nonnegative() {
        let result = Solver::new().solve(&textbook()).unwrap();
        for (j, &r) in result.reduced_costs.iter().enumerate() {
            assert!(r >= -DEFAULT_TOLERANCE, "reduced cost {} = {}", j, r);
        }
    }

    #[test]
    fn test_infeasible_negative_rhs() {
        let result = solve(
            vec![1.0, 1.0],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![-1.0, 2.0],
        )
        .unwrap();

        assert_eq!(result.status, Status::Infeasible);
        assert_eq!(result.iteration_count, 0);
        assert!(result.solution_vector.is_empty());
        assert!(result.reduced_costs.is_empty());
    }

    #[test]
    fn test_unbounded() {
        let result = solve(vec![-1.0], vec![vec![-1.0]], vec![1.0]).unwrap();
        assert_eq!(result.status, Status::Unbounded);
        assert_eq!(result.iteration_count, 1);
        // Stale values from the slack basis
        assert_eq!(result.solution_vector, vec![0.0, 1.0]);
        assert_eq!(result.reduced_costs, vec![-1.0, 0.0]);
    }

    #[test]
    fn test_unbounded_after_a_pivot() {
        // min -x - y  s.t.  x - y <= 1: x enters first, then y is unbounded
        let result = solve(vec![-1.0, -1.0], vec![vec![1.0, -1.0]], vec![1.0]).unwrap();
        assert_eq!(result.status, Status::Unbounded);
        assert_eq!(result.iteration_count, 2);
        assert_eq!(result.solution_vector, vec![1.0, 0.0, 0.0]);
        assert_eq!(result.optimal_value, -1.0);
    }

    #[test]
    fn test_already_optimal_origin() {
        let result = solve(vec![1.0, 2.0], vec![vec![1.0, 1.0]], vec![3.0]).unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.iteration_count, 0);
        assert_eq!(result.optimal_value, 0.0);
        assert_eq!(result.solution_vector, vec![0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_no_constraints() {
        let bounded = solve(vec![1.0], Vec::new(), Vec::new()).unwrap();
        assert_eq!(bounded.status, Status::Optimal);
        assert_eq!(bounded.solution_vector, vec![0.0]);

        let unbounded = solve(vec![-1.0], Vec::new(), Vec::new()).unwrap();
        assert_eq!(unbounded.status, Status::Unbounded);
    }

    #[test]
    fn test_shape_error() {
        let err = solve(vec![1.0], vec![vec![1.0, 2.0]], vec![1.0]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidProblem(_)));
    }

    #[test]
    fn test_deterministic() {
        let first = Solver::new().solve(&textbook()).unwrap();
        let second = Solver::new().solve(&textbook()).unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.optimal_value.to_bits(), second.optimal_value.to_bits());
        assert_eq!(first.iteration_count, second.iteration_count);
        for (a, b) in first.solution_vector.iter().zip(&second.solution_vector) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in first.reduced_costs.iter().zip(&second.reduced_costs) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_trace_does_not_change_result() {
        let mut log = TraceLog::new();
        let traced = Solver::new().solve_with_trace(&textbook(), &mut log).unwrap();
        let plain = Solver::new().solve(&textbook()).unwrap();
        assert_eq!(traced, plain);

        let iterations: Vec<_> = log
            .events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::IterationStarted {
                    iteration,
                    entering,
                } => Some((*iteration, *entering)),
                _ => None,
            })
            .collect();
        assert_eq!(iterations, vec![(1, 1), (2, 0)]);

        let bases: Vec<_> = log
            .events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::BasisUpdated { basis, .. } => Some(basis.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(bases, vec![vec![1, 2, 4], vec![0, 1, 2]]);
        assert_eq!(log.events.first(), Some(&TraceEvent::Initialized { basis: vec![2, 3, 4] }));
    }

    #[test]
    fn test_iteration_count_matches_pivots() {
        let mut log = TraceLog::new();
        let result = Solver::new().solve_with_trace(&textbook(), &mut log).unwrap();
        let pivots = log
            .events
            .iter()
            .filter(|e| matches!(e, TraceEvent::BasisUpdated { .. }))
            .count();
        assert_eq!(result.iteration_count, pivots);
    }

    #[test]
    fn test_iteration_limit() {
        let err = Solver::new().with_max_iterations(1).solve(&textbook()).unwrap_err();
        assert_eq!(err, SolveError::IterationLimit(1));
    }

    #[test]
    fn test_matches_reference_solver() {
        let cases = vec![
            textbook(),
            // max 3x + 2y  s.t.  x + y <= 4, x <= 3, y <= 3
            program(
                vec![-3.0, -2.0],
                vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
                vec![4.0, 3.0, 3.0],
            ),
            // max 5x + 4y + 3z
            program(
                vec![-5.0, -4.0, -3.0],
                vec![
                    vec![2.0, 3.0, 1.0],
                    vec![4.0, 1.0, 2.0],
                    vec![3.0, 4.0, 2.0],
                ],
                vec![5.0, 11.0, 8.0],
            ),
            program(
                vec![-1.0, -2.0],
                vec![vec![1.0, 1.0], vec![-1.0, 1.0]],
                vec![6.0, 2.0],
            ),
        ];

        for lp in cases {
            let result = Solver::new().solve(&lp).unwrap();
            let reference = ReferenceSolver::new().solve(&standardize(&lp));
            assert_eq!(result.status, Status::Optimal);
            assert_eq!(reference.status, ReferenceStatus::Optimal);
            assert!(
                (result.optimal_value - reference.objective_value).abs() < 1e-6,
                "revised {} vs reference {}",
                result.optimal_value,
                reference.objective_value
            );
        }
    }

    #[test]
    fn test_chvatal_example() {
        // max 5x + 4y + 3z has optimum 13 at (2, 0, 1)
        let result = solve(
            vec![-5.0, -4.0, -3.0],
            vec![
                vec![2.0, 3.0, 1.0],
                vec![4.0, 1.0, 2.0],
                vec![3.0, 4.0, 2.0],
            ],
            vec![5.0, 11.0, 8.0],
        )
        .unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert!((result.optimal_value + 13.0).abs() < 1e-9);
        let x = result.structural_solution();
        assert!((x[0] - 2.0).abs() < 1e-9);
        assert!(x[1].abs() < 1e-9);
        assert!((x[2] - 1.0).abs() < 1e-9);
    }
}
