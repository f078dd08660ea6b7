use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use linprog_solver::{report, CanonicalForm, DualProgram, FeasibilityMode, LpProblem, SolutionStatus, Solver};

#[derive(Parser)]
#[command(name = "linprog")]
#[command(about = "Simplex solver and dual converter for small linear programs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Problem file; reads stdin when omitted or "-"
    file: Option<PathBuf>,
    /// Read the JSON request form instead of the token form
    #[arg(long)]
    json: bool,
    /// Largest accepted variable or constraint count
    #[arg(long, default_value_t = linprog_solver::DEFAULT_MAX_DIMENSION)]
    max_size: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem with the simplex method
    Solve {
        #[command(flatten)]
        input: InputArgs,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Maximum number of pivots
        #[arg(long, default_value_t = 200)]
        max_iterations: usize,
        /// Tolerance for floating point comparisons; must be positive and finite
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,
        /// Repair negative right-hand sides by flipping rows instead of running Phase 1
        #[arg(long)]
        sign_flip: bool,
        /// Only print the final result
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the dual of a problem
    Dual {
        #[command(flatten)]
        input: InputArgs,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a problem for errors
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

const EXIT_MALFORMED: i32 = 1;
const EXIT_UNBOUNDED: i32 = 2;
const EXIT_INFEASIBLE: i32 = 3;
const EXIT_ITERATION_LIMIT: i32 = 4;
const EXIT_DEGENERATE: i32 = 5;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn read_source(file: &Option<PathBuf>) -> Result<String, String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).map_err(|e| format!("Error reading {}: {}", path.display(), e))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            Ok(source)
        }
    }
}

fn load_problem(input: &InputArgs) -> Result<LpProblem, String> {
    let source = read_source(&input.file)?;

    let problem = if input.json {
        let request: linprog_lang::ProblemRequest =
            serde_json::from_str(&source).map_err(|e| format!("Invalid JSON: {}", e))?;
        request.into_problem().map_err(|e| format!("Invalid request: {}", e))?
    } else {
        linprog_lang::Parser::parse(&source).map_err(|e| format!("Parse error: {}", e))?
    };

    problem
        .validate(input.max_size)
        .map_err(|e| format!("Malformed input: {}", e))?;
    Ok(problem)
}

fn load_or_exit(input: &InputArgs) -> LpProblem {
    match load_problem(input) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_MALFORMED);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            input,
            format,
            max_iterations,
            tolerance,
            sign_flip,
            quiet,
        } => {
            let problem = load_or_exit(&input);

            let feasibility = if sign_flip {
                FeasibilityMode::SignFlip
            } else {
                FeasibilityMode::PhaseOne
            };
            let solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance)
                .with_max_dimension(input.max_size)
                .with_feasibility(feasibility);

            let solution = match solver.solve(&problem) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solver error: {}", e);
                    let code = match e {
                        linprog_solver::SolveError::MalformedInput(_) => EXIT_MALFORMED,
                        linprog_solver::SolveError::DegeneratePivot(_) => EXIT_DEGENERATE,
                    };
                    std::process::exit(code);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing solution: {}", e);
                        std::process::exit(EXIT_MALFORMED);
                    }
                }
            } else {
                if !quiet {
                    for snapshot in &solution.snapshots {
                        println!("{}", report::render_snapshot(snapshot));
                    }
                }
                print!("{}", report::render_solution(&problem, &solution));
            }

            match solution.status {
                SolutionStatus::Optimal => {}
                SolutionStatus::Unbounded => std::process::exit(EXIT_UNBOUNDED),
                SolutionStatus::Infeasible => std::process::exit(EXIT_INFEASIBLE),
                SolutionStatus::IterationLimit => std::process::exit(EXIT_ITERATION_LIMIT),
            }
        }
        Commands::Dual { input, format } => {
            let problem = load_or_exit(&input);
            let dual = DualProgram::from_canonical(&CanonicalForm::from_problem(&problem));

            if format == "json" {
                match serde_json::to_string_pretty(&dual) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing dual: {}", e);
                        std::process::exit(EXIT_MALFORMED);
                    }
                }
            } else {
                print!("{}", report::render_dual(&dual));
            }
        }
        Commands::Check { input } => match load_problem(&input) {
            Ok(problem) => {
                let canonical = CanonicalForm::from_problem(&problem);
                println!("✓ problem is valid");
                println!(
                    "  {}",
                    if problem.objective.minimize { "minimize" } else { "maximize" }
                );
                println!("  {} variables", problem.num_variables());
                println!("  {} constraints", problem.num_constraints());
                println!(
                    "  canonical form: {}",
                    if canonical.is_canonical() { "yes" } else { "no" }
                );
            }
            Err(e) => {
                eprintln!("✗ problem has errors:");
                eprintln!("  {}", e);
                std::process::exit(EXIT_MALFORMED);
            }
        },
    }
}
