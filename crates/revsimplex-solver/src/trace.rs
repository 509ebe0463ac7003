//! Diagnostic events emitted while solving.
//!
//! A [`TraceSink`] is handed to [`Solver::solve_with_trace`](crate::Solver::solve_with_trace)
//! and receives every event synchronously. Sinks are write-only: nothing they
//! record is read back by the solver.

/// A single step of a solve, in the order the solver performs it
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Slack basis installed
    Initialized { basis: Vec<usize> },
    /// The slack basis solution has a negative component
    Infeasible { basic_solution: Vec<f64> },
    /// Reduced costs recomputed for the current basis
    ReducedCosts {
        min_reduced_cost: f64,
        reduced_costs: Vec<f64>,
    },
    IterationStarted { iteration: usize, entering: usize },
    /// A row passed the positivity check of the ratio test
    Ratio { row: usize, ratio: f64 },
    /// A row improved on the best ratio seen so far
    LeavingCandidate { row: usize, ratio: f64 },
    BasisUpdated {
        iteration: usize,
        leaving_row: usize,
        basis: Vec<usize>,
    },
    Unbounded { iteration: usize },
    Optimal {
        iteration_count: usize,
        optimal_value: f64,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: &TraceEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _event: &TraceEvent) {}
}

impl<F> TraceSink for F
where
    F: FnMut(&TraceEvent),
{
    fn record(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Keeps a copy of every event
#[derive(Debug, Default, Clone)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing`.
///
/// Iteration-level events are logged at `INFO`, per-row ratio test events at `DEBUG`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, event: &TraceEvent) {
        match event {
            TraceEvent::Initialized { basis } => {
                tracing::info!("Basis indices: {:?}", basis);
            }
            TraceEvent::Infeasible { basic_solution } => {
                tracing::info!("Initial basic solution: {:?}", basic_solution);
                tracing::info!("Problem Infeasible.");
            }
            TraceEvent::ReducedCosts {
                min_reduced_cost,
                reduced_costs,
            } => {
                tracing::debug!("Reduced costs: {:?}", reduced_costs);
                tracing::info!("Min reduced cost: {}", min_reduced_cost);
            }
            TraceEvent::IterationStarted {
                iteration,
                entering,
            } => {
                tracing::info!("=> Iteration: {}", iteration);
                tracing::info!(" Entering variable index: {}", entering);
            }
            TraceEvent::Ratio { row, ratio } => {
                tracing::debug!("  Ratio (row {}): {}", row, ratio);
            }
            TraceEvent::LeavingCandidate { row, ratio } => {
                tracing::debug!("  Leaving variable index: {}", row);
                tracing::debug!("  Min ratio: {}", ratio);
            }
            TraceEvent::BasisUpdated {
                leaving_row, basis, ..
            } => {
                tracing::info!("  Leaving variable index: {}", leaving_row);
                tracing::info!("Updated basis indices: {:?}", basis);
            }
            TraceEvent::Unbounded { iteration } => {
                tracing::info!("Problem Unbounded (iteration {}).", iteration);
            }
            TraceEvent::Optimal {
                iteration_count,
                optimal_value,
            } => {
                tracing::info!(
                    "Optimal value {} after {} iterations",
                    optimal_value,
                    iteration_count
                );
            }
        }
    }
}
