use std::fmt::Write;

use revsimplex_solver::{CrossCheck, IterationResult, ReferenceSolution, Status};

const RULE: &str = "-------------------------------------------------------------";

/// Status headline, value when optimal, iteration count and status.
pub fn render(result: &IterationResult) -> String {
    let mut out = String::new();
    let headline = match result.status {
        Status::Optimal => "The problem is optimal.",
        Status::Infeasible => "The problem is infeasible.",
        Status::Unbounded => "The problem is unbounded.",
    };

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", headline);
    let _ = writeln!(out, "{}", RULE);
    if result.status == Status::Optimal {
        let _ = writeln!(out, "Optimal value: {}", result.optimal_value);
    }
    let _ = writeln!(out, "Number of iterations: {}", result.iteration_count);
    let _ = writeln!(out, "Status: {}", result.status);
    out
}

/// Solution vector and reduced costs, one column per line.
pub fn render_detail(result: &IterationResult) -> String {
    let mut out = String::new();
    if result.solution_vector.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:>8} {:>16} {:>16}", "column", "value", "reduced cost");
    for (j, value) in result.solution_vector.iter().enumerate() {
        let label = if j < result.num_variables {
            format!("x{}", j)
        } else {
            format!("s{}", j - result.num_variables)
        };
        let reduced = result.reduced_costs.get(j).copied().unwrap_or(0.0);
        let _ = writeln!(out, "{:>8} {:>16.6} {:>16.6}", label, value, reduced);
    }
    out
}

pub fn render_cross_check(check: &CrossCheck, reference: &ReferenceSolution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Reference solver");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Status: {:?}", reference.status);
    if !reference.values.is_empty() {
        let _ = writeln!(out, "Optimal value: {}", reference.objective_value);
    }
    let _ = writeln!(out, "Number of iterations: {}", reference.iterations);
    if let Some(difference) = check.objective_difference {
        let _ = writeln!(out, "Objective difference: {:e}", difference);
    }
    let verdict = if check.agrees {
        "Results agree."
    } else if !check.status_agrees {
        "Results disagree on status."
    } else {
        "Results disagree on the optimal value."
    };
    let _ = writeln!(out, "{}", verdict);
    out
}
