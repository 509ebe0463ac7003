use std::fmt;

/// How a solve terminated
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No reduced cost is below the negative tolerance
    Optimal,
    /// The slack basis has a negative component
    Infeasible,
    /// The entering column has no positive entry
    Unbounded,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Optimal => "optimal",
            Status::Infeasible => "infeasible",
            Status::Unbounded => "unbounded",
        };
        f.write_str(name)
    }
}

/// The result of one solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub status: Status,
    /// Objective value of the last basis; only meaningful when optimal
    pub optimal_value: f64,
    /// Values for all n + m augmented columns, zero outside the basis
    pub solution_vector: Vec<f64>,
    /// Reduced costs for all n + m augmented columns
    pub reduced_costs: Vec<f64>,
    /// Number of pivots attempted
    pub iteration_count: usize,
    /// Number of structural (non-slack) columns
    pub num_variables: usize,
}

impl IterationResult {
    pub fn infeasible(num_variables: usize) -> Self {
        Self {
            status: Status::Infeasible,
            optimal_value: f64::INFINITY,
            solution_vector: Vec::new(),
            reduced_costs: Vec::new(),
            iteration_count: 0,
            num_variables,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }

    /// Values of the original variables, without the slack columns
    pub fn structural_solution(&self) -> &[f64] {
        let end = self.num_variables.min(self.solution_vector.len());
        &self.solution_vector[..end]
    }

    /// Values of the slack columns
    pub fn slack_solution(&self) -> &[f64] {
        let start = self.num_variables.min(self.solution_vector.len());
        &self.solution_vector[start..]
    }
}
