mod basis;
mod iteration;
mod matrix;
mod problem;
mod reference;
mod simplex;
mod solution;
pub mod trace;

pub use basis::BasisState;
pub use iteration::{select_entering, EnteringCandidate, Factorization, IterationEngine};
pub use matrix::Matrix;
pub use problem::{standardize, AugmentedProblem, LinearProgram, ProblemError};
pub use reference::{cross_check, CrossCheck, ReferenceSolution, ReferenceSolver, ReferenceStatus};
pub use simplex::{solve, SolveError, Solver, DEFAULT_TOLERANCE};
pub use solution::{IterationResult, Status};
pub use trace::{NoTrace, TraceEvent, TraceLog, TraceSink, TracingSink};
