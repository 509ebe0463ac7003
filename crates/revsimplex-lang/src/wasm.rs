//! WASM bindings for revsimplex
//!
//! JavaScript-friendly entry points for editing and solving input files in
//! the browser.

use wasm_bindgen::prelude::*;

use crate::lexer::Lexer;
use crate::loader::{load_program, LoadError};
use crate::parser::Parser;
use revsimplex_solver::{cross_check, standardize, ReferenceSolver, Solver};

/// Parse source code and return the assignments as JSON
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&program).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tokenize source code and return tokens as JSON
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsValue> {
    let tokens: Vec<TokenInfo> = Lexer::tokenize(source)
        .into_iter()
        .map(|t| TokenInfo {
            kind: format!("{:?}", t.kind),
            text: t.text,
            start: t.span.start,
            end: t.span.end,
        })
        .collect();
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Token information for JavaScript
#[derive(serde::Serialize)]
struct TokenInfo {
    kind: String,
    text: String,
    start: usize,
    end: usize,
}

/// Validate source code and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    let diagnostics = get_diagnostics(source);
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize)]
struct Diagnostic {
    start: usize,
    end: usize,
    severity: String,
    message: String,
}

fn get_diagnostics(source: &str) -> Vec<Diagnostic> {
    let error = |start: usize, end: usize, message: String| Diagnostic {
        start,
        end,
        severity: "error".to_string(),
        message,
    };

    let program = match Parser::parse(source) {
        Ok(program) => program,
        Err(e) => return vec![error(0, source.len(), e.to_string())],
    };

    match load_program(&program) {
        Ok(_) => Vec::new(),
        Err(e) => {
            let (start, end) = match &e {
                LoadError::ExpectedVector { span, .. } | LoadError::ExpectedMatrix { span, .. } => {
                    (span.start, span.end)
                }
                _ => (0, source.len()),
            };
            vec![error(start, end, e.to_string())]
        }
    }
}

/// Solve the program and return the result, with a reference cross-check, as JSON
#[wasm_bindgen]
pub fn solve(source: &str) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let lp = load_program(&program).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let solver = Solver::new();
    let result = solver
        .solve(&lp)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let reference = ReferenceSolver::new().solve(&standardize(&lp));
    let check = cross_check(&result, &reference, 1e-6);

    let output = SolveOutput {
        result,
        reference,
        cross_check: check,
    };
    serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(serde::Serialize)]
struct SolveOutput {
    result: revsimplex_solver::IterationResult,
    reference: revsimplex_solver::ReferenceSolution,
    cross_check: revsimplex_solver::CrossCheck,
}
