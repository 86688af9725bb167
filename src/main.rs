//! # sat-phase
//!
//! Command-line driver for three textbook SAT procedures and the harness that
//! compares them on random 3-CNF formulas around the satisfiability phase
//! transition.
//!
//! 1.  **Resolution**: saturates the clause set with resolvents until the
//!     empty clause appears or nothing new can be derived.
//! 2.  **DP (Davis–Putnam)**: eliminates one variable at a time by replacing
//!     its occurrences with all their resolvents.
//! 3.  **DPLL**: backtracking search over partial assignments with
//!     simplification.
//!
//! ## Usage
//!
//! ```sh
//! sat-phase [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! -   `sat-phase <file.cnf>` or `sat-phase file --path <file.cnf>`: run the
//!     selected solvers on one file and print a statistics table per solver.
//!     A directory path is analysed like `analyze --dir`.
//! -   `sat-phase text --input "1 -2 0\n2 0"`: the same for inline DIMACS.
//! -   `sat-phase analyze --dir <benchmarks> --output results.csv --summary`:
//!     run every solver on every `.cnf` file below the directory, write the
//!     results as CSV and print the satisfiability rate per ratio.
//! -   `sat-phase generate --output <dir>`: write a random 3-CNF suite
//!     (`n{vars}_r{ratio}_i{k}.cnf`).
//! -   `sat-phase generate-mixed --output <dir>`: small mixed SAT/UNSAT files.
//! -   `sat-phase completions <shell>`: shell completion script.
//!
//! ### Common options
//!
//! -   `--solver all|resolution|dp|dpll` (default `all`).
//! -   `--timeout <secs>`, `--max-clauses <n>`: per-run budget. A solver that
//!     exceeds it is reported as exhausted instead of producing a verdict.
//! -   `-p, --print-solution`, `-s, --stats`, `-v, --verify`, `-d, --debug`.
//!
//! Diagnostics go through `tracing`; set `RUST_LOG` to change the level.

use crate::command_line::cli::{
    Cli, Commands, generate, generate_mixed, print_completions, run_analysis, solve_file,
    solve_text,
};
use clap::Parser;
use sat_phase::bench::analysis::AnalysisConfig;
use sat_phase::bench::memory::TrackingAllocator;
use sat_phase::sat::generator::SuiteConfig;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod command_line;

/// Jemalloc wrapped in a byte counter so the harness can read peak heap use.
#[global_allocator]
static GLOBAL: TrackingAllocator<tikv_jemallocator::Jemalloc> =
    TrackingAllocator::new(tikv_jemallocator::Jemalloc);

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug = cli.common.debug
        || match &cli.command {
            Some(
                Commands::File { common, .. }
                | Commands::Text { common, .. }
                | Commands::Analyze { common, .. },
            ) => common.debug,
            _ => false,
        };
    init_tracing(debug);

    let result = match cli.command {
        None => match cli.path {
            Some(path) => solve_file(&path, &cli.common),
            None => {
                eprintln!("No command provided. Use --help for more information.");
                return ExitCode::FAILURE;
            }
        },
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Text { input, common }) => solve_text(&input, &common),
        Some(Commands::Analyze {
            dir,
            output,
            long_output,
            summary,
            common,
        }) => {
            let mut config = AnalysisConfig::new(dir);
            config.output_csv = output;
            config.long_csv = long_output;
            config.summary = summary;
            run_analysis(config, &common)
        }
        Some(Commands::Generate {
            output,
            vars,
            ratios,
            instances,
            seed,
        }) => {
            let config = SuiteConfig {
                num_vars: vars,
                ratios,
                instances_per_ratio: instances,
                seed,
            };
            generate(&output, &config).map(|()| true)
        }
        Some(Commands::GenerateMixed {
            output,
            sat,
            unsat,
            seed,
        }) => generate_mixed(&output, sat, unsat, seed).map(|()| true),
        Some(Commands::Completions { shell }) => {
            print_completions(shell);
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
