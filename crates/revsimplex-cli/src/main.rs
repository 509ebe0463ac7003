mod logging;
mod report;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use revsimplex_solver::{
    cross_check, standardize, CrossCheck, IterationResult, ReferenceSolution, ReferenceSolver,
    Solver, Status, TracingSink, DEFAULT_TOLERANCE,
};

/// Maximum objective difference for the reference cross-check to agree
const CROSS_CHECK_TOLERANCE: f64 = 1e-6;

#[derive(Parser)]
#[command(name = "revsimplex")]
#[command(about = "Revised simplex solver for standard-form linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an input file and print the result
    Solve {
        /// Input file; `.txt` is appended when the name has no extension and does not exist
        file: PathBuf,
        /// Log file (defaults to <name>_output.log next to the input)
        #[arg(long)]
        log: Option<PathBuf>,
        /// Do not write a log file
        #[arg(long, conflicts_with = "log")]
        no_log: bool,
        /// Also log per-row ratio test details
        #[arg(short, long)]
        verbose: bool,
        /// Reduced cost tolerance for entering columns
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Cross-check the result against the reference tableau solver
        #[arg(short, long)]
        compare: bool,
        /// Print the solution vector and reduced costs
        #[arg(short, long)]
        detail: bool,
    },
    /// Parse an input file and output its assignments
    Parse {
        /// The file to parse
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check an input file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    result: &'a IterationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a ReferenceSolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cross_check: Option<&'a CrossCheck>,
}

/// Accept input names given without their `.txt` extension.
fn resolve_input(file: PathBuf) -> PathBuf {
    if !file.exists() && file.extension().is_none() {
        let with_txt = file.with_extension("txt");
        if with_txt.exists() {
            return with_txt;
        }
    }
    file
}

fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(2);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            log,
            no_log,
            verbose,
            tolerance,
            format,
            compare,
            detail,
        } => {
            let file = resolve_input(file);

            if !no_log {
                let log_path = log.unwrap_or_else(|| logging::default_log_path(&file));
                if let Err(e) = logging::init(&log_path, verbose) {
                    eprintln!("Failed to set up log file: {}", e);
                    std::process::exit(2);
                }
            }

            let source = read_source(&file);
            let program = match revsimplex_lang::load_str(&source) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Load error: {}", e);
                    std::process::exit(2);
                }
            };

            // Solve
            let solver = Solver::new().with_tolerance(tolerance);
            let result = match solver.solve_with_trace(&program, &mut TracingSink) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("Solver error: {}", e);
                    eprintln!("Solver error: {}", e);
                    std::process::exit(2);
                }
            };

            tracing::info!("{}", "-".repeat(61));
            tracing::info!("The problem is {}.", result.status);
            if result.status == Status::Optimal {
                tracing::info!("Optimal value: {}", result.optimal_value);
                tracing::info!("Solution vector: {:?}", result.solution_vector);
                tracing::info!("Reduced costs: {:?}", result.reduced_costs);
            }
            tracing::info!("{}", "-".repeat(61));

            // Reference comparison, never fed back into the result
            let reference = compare.then(|| ReferenceSolver::new().solve(&standardize(&program)));
            let check = reference
                .as_ref()
                .map(|r| cross_check(&result, r, CROSS_CHECK_TOLERANCE));
            if let (Some(reference), Some(check)) = (&reference, &check) {
                tracing::info!("Reference solver: {:?}", reference);
                tracing::info!("Cross-check: {:?}", check);
            }

            // Output results
            if format == "json" {
                let output = JsonOutput {
                    result: &result,
                    reference: reference.as_ref(),
                    cross_check: check.as_ref(),
                };
                match serde_json::to_string_pretty(&output) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing result: {}", e);
                        std::process::exit(2);
                    }
                }
            } else {
                print!("{}", report::render(&result));
                if detail {
                    print!("{}", report::render_detail(&result));
                }
                if let (Some(reference), Some(check)) = (&reference, &check) {
                    print!("{}", report::render_cross_check(check, reference));
                }
            }

            if result.status != Status::Optimal {
                std::process::exit(1);
            }
        }
        Commands::Parse { file, format } => {
            let file = resolve_input(file);
            let source = read_source(&file);

            match revsimplex_lang::Parser::parse(&source) {
                Ok(program) => {
                    if format == "json" {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&program).unwrap_or_else(|e| {
                                format!("Error serializing assignments: {}", e)
                            })
                        );
                    } else {
                        println!("{:#?}", program);
                    }
                }
                Err(e) => {
                    eprintln!("Parse error: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Check { file } => {
            let file = resolve_input(file);
            let source = read_source(&file);

            match revsimplex_lang::load_str(&source) {
                Ok(program) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", program.num_variables());
                    println!("  {} constraints", program.num_constraints());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(2);
                }
            }
        }
    }
}
