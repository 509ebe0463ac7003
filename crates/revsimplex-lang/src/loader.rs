use std::path::Path;

use revsimplex_solver::{LinearProgram, ProblemError};
use thiserror::Error;

use crate::ast::*;
use crate::lexer::Span;
use crate::parser::{ParseError, Parser};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Expected 3 assignments (objective, constraint matrix, right-hand side), found {0}")]
    AssignmentCount(usize),
    #[error("'{name}' must be a list of numbers")]
    ExpectedVector { name: String, span: Span },
    #[error("'{name}' must be a list of rows of numbers")]
    ExpectedMatrix { name: String, span: Span },
    #[error("Row {row} of '{name}' has {found} entries, expected {expected}")]
    RaggedMatrix {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Shape mismatch: {0}")]
    Shape(#[from] ProblemError),
}

/// Build a [`LinearProgram`] from parsed assignments.
///
/// Roles are positional: the first assignment is the objective `c`, the
/// second the constraint matrix `A`, the third the right-hand side `b`.
/// Names are only used in error messages.
pub fn load_program(program: &Program) -> Result<LinearProgram, LoadError> {
    let [objective, constraints, rhs] = program.assignments.as_slice() else {
        return Err(LoadError::AssignmentCount(program.assignments.len()));
    };

    let objective = vector(objective)?;
    let constraints = matrix(constraints)?;
    let rhs = vector(rhs)?;

    Ok(LinearProgram::new(objective, constraints, rhs)?)
}

pub fn load_str(source: &str) -> Result<LinearProgram, LoadError> {
    let program = Parser::parse(source)?;
    load_program(&program)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<LinearProgram, LoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|e| LoadError::IoError(format!("{}: {}", path.display(), e)))?;
    load_str(&source)
}

fn numbers(items: &[Value]) -> Option<Vec<f64>> {
    items
        .iter()
        .map(|item| match item {
            Value::Number { value, .. } => Some(*value),
            Value::List { .. } => None,
        })
        .collect()
}

fn vector(assignment: &Assignment) -> Result<Vec<f64>, LoadError> {
    let expected = || LoadError::ExpectedVector {
        name: assignment.name.clone(),
        span: assignment.value.span(),
    };
    match &assignment.value {
        Value::List { items, .. } => numbers(items).ok_or_else(expected),
        Value::Number { .. } => Err(expected()),
    }
}

fn matrix(assignment: &Assignment) -> Result<Vec<Vec<f64>>, LoadError> {
    let expected = || LoadError::ExpectedMatrix {
        name: assignment.name.clone(),
        span: assignment.value.span(),
    };
    let Value::List { items: rows, .. } = &assignment.value else {
        return Err(expected());
    };

    let mut matrix: Vec<Vec<f64>> = Vec::with_capacity(rows.len());
    for row in rows {
        let Value::List { items, .. } = row else {
            return Err(expected());
        };
        let values = numbers(items).ok_or_else(expected)?;
        if let Some(first) = matrix.first() {
            if values.len() != first.len() {
                return Err(LoadError::RaggedMatrix {
                    name: assignment.name.clone(),
                    row: matrix.len(),
                    expected: first.len(),
                    found: values.len(),
                });
            }
        }
        matrix.push(values);
    }

    Ok(matrix)
}
