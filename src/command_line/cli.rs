#![allow(clippy::cast_precision_loss)]

use sat_phase::bench::analysis::{self, AnalysisConfig};
use sat_phase::bench::harness::{Verdict, measure};
use sat_phase::bench::report::{FinalVerdict, Outcome, consolidate};
use sat_phase::error::{Error, Result};
use sat_phase::sat::cnf::Cnf;
use sat_phase::sat::dimacs::{Dimacs, parse_dimacs, parse_file};
use sat_phase::sat::generator::{DEFAULT_RATIOS, SuiteConfig, write_mixed_suite, write_phase_transition_suite};
use sat_phase::sat::solver::{Limits, SolveStats, Solver, SolverImpls, SolverType};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, error, info};

/// Defines the command-line interface of the benchmark tool.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sat-phase",
    version,
    about = "Resolution, DP and DPLL on random 3-CNF around the phase transition"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a DIMACS .cnf file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `analyze`, `generate`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are whitespace-separated and 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Run the selected solvers over every `.cnf` file below a directory.
    Analyze {
        /// Benchmark directory.
        #[arg(long)]
        dir: PathBuf,

        /// Wide CSV with one row per file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Long CSV with one row per file and algorithm.
        #[arg(long)]
        long_output: Option<PathBuf>,

        /// Print satisfiability per clause/variable ratio.
        #[arg(long, default_value_t = false)]
        summary: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write a random 3-CNF phase-transition suite.
    Generate {
        /// Target directory; created if missing.
        #[arg(short, long)]
        output: PathBuf,

        /// Variables per instance.
        #[arg(long, default_value_t = 20)]
        vars: usize,

        /// Clause/variable ratios to sample.
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_RATIOS.to_vec())]
        ratios: Vec<f64>,

        /// Instances per ratio.
        #[arg(long, default_value_t = 5)]
        instances: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Write small mixed-width SAT instances and trivial UNSAT instances.
    GenerateMixed {
        /// Target directory; created if missing.
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 5)]
        sat: usize,

        #[arg(long, default_value_t = 5)]
        unsat: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which algorithms to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum SolverSelection {
    #[default]
    All,
    Resolution,
    Dp,
    Dpll,
}

impl SolverSelection {
    pub(crate) fn solvers(self) -> Vec<SolverType> {
        match self {
            Self::All => SolverType::ALL.to_vec(),
            Self::Resolution => vec![SolverType::Resolution],
            Self::Dp => vec![SolverType::Dp],
            Self::Dpll => vec![SolverType::Dpll],
        }
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the DPLL model against the formula.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Enable printing of performance and problem statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Enable printing of the satisfying assignment (model) if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Algorithm(s) to run.
    #[arg(long, value_enum, default_value_t = SolverSelection::All)]
    pub(crate) solver: SolverSelection,

    /// Wall-clock limit per solver run, in seconds.
    #[arg(long)]
    pub(crate) timeout: Option<f64>,

    /// Abort a solver once it holds more clauses than this.
    #[arg(long)]
    pub(crate) max_clauses: Option<usize>,
}

impl CommonOptions {
    /// # Errors
    ///
    /// `Error::Config` if the timeout is negative, not finite or too large
    /// for a `Duration`.
    pub(crate) fn limits(&self) -> Result<Limits> {
        let timeout = self
            .timeout
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .map_err(|e| Error::Config(format!("--timeout {secs}: {e}")))
            })
            .transpose()?;
        Ok(Limits {
            timeout,
            max_clauses: self.max_clauses,
        })
    }
}

/// Parses a CNF file and reports on it. Returns whether the solvers agreed.
///
/// # Errors
///
/// Parse and I/O errors.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<bool> {
    if path.is_dir() {
        let mut config = AnalysisConfig::new(path);
        config.summary = true;
        return run_analysis(config, common);
    }

    let time = Instant::now();
    let dimacs = parse_file(path)?;
    let parse_time = time.elapsed();

    solve_and_report(&dimacs, common, Some(path), parse_time)
}

/// Parses inline DIMACS text and reports on it.
///
/// Accepts the two-character sequence `\n` as a line break so the formula can
/// be written on one shell line.
///
/// # Errors
///
/// Parse errors.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<bool> {
    let time = Instant::now();
    let text = input.replace("\\n", "\n");
    let dimacs = parse_dimacs(text.as_bytes())?;
    let parse_time = time.elapsed();

    solve_and_report(&dimacs, common, None, parse_time)
}

/// Runs every selected solver on `dimacs`, prints a statistics table per
/// solver and the consolidated verdict.
///
/// # Errors
///
/// Errors other than budget exhaustion from the harness.
pub(crate) fn solve_and_report(
    dimacs: &Dimacs,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<bool> {
    let cnf = &dimacs.cnf;
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    if common.debug {
        println!("CNF:\n{cnf}");
    }

    let limits = common.limits()?;
    let mut outcomes = Vec::new();
    let mut model_ok = true;

    for solver_type in common.solver.solvers() {
        let mut solver = solver_type.to_impl();
        let outcome = match measure(&mut solver, cnf, &limits) {
            Ok(m) => Outcome::Finished(m),
            Err(Error::ResourceExhausted {
                elapsed,
                peak_memory_kb,
                reason,
                ..
            }) => Outcome::Exhausted {
                elapsed,
                peak_memory_kb,
                reason,
            },
            Err(e) => return Err(e),
        };

        if common.verify {
            model_ok &= verify_model(cnf, &solver);
        }
        if common.stats {
            print_stats(parse_time, dimacs, solver_type, &outcome, &solver.stats());
        }
        if common.print_solution {
            if let SolverImpls::Dpll(dpll) = &solver {
                if let Some(model) = dpll.model() {
                    println!("Solutions: {model}");
                }
            }
        }
        outcomes.push((solver_type, outcome));
    }

    let file = label.map_or_else(|| PathBuf::from("<text>"), Path::to_path_buf);
    let verdict = match consolidate(&file, &outcomes) {
        Ok(Some(v)) => FinalVerdict::Agreed(v),
        Ok(None) => FinalVerdict::Unknown,
        Err(e) => {
            error!("{e}");
            FinalVerdict::Disagreement(e.to_string())
        }
    };

    match verdict {
        FinalVerdict::Agreed(Verdict::Sat) => println!("\nSATISFIABLE"),
        FinalVerdict::Agreed(Verdict::Unsat) => println!("\nUNSATISFIABLE"),
        FinalVerdict::Unknown => println!("\nUNKNOWN"),
        FinalVerdict::Disagreement(_) => {
            println!("\nDISAGREEMENT");
            return Ok(false);
        }
    }
    Ok(model_ok)
}

/// Only DPLL produces a model; the other solvers are checked by agreement.
fn verify_model(cnf: &Cnf, solver: &SolverImpls) -> bool {
    let SolverImpls::Dpll(dpll) = solver else {
        return true;
    };
    let Some(model) = dpll.model() else {
        return true;
    };
    let ok = cnf.verify(model);
    println!("Verified: {ok:?}");
    if !ok {
        error!(%model, "DPLL model falsifies a clause");
    }
    ok
}

/// Runs the directory analysis. Returns false when any file had a disagreement.
///
/// # Errors
///
/// See `analysis::run`.
pub(crate) fn run_analysis(mut config: AnalysisConfig, common: &CommonOptions) -> Result<bool> {
    config.limits = common.limits()?;
    config.solvers = common.solver.solvers();

    let result = analysis::run(&config)?;
    let disagreements = result.disagreements().count();
    if disagreements > 0 {
        error!(count = disagreements, "solvers disagreed on some files");
    }
    Ok(disagreements == 0)
}

/// # Errors
///
/// I/O errors while writing the suite.
pub(crate) fn generate(output: &Path, config: &SuiteConfig) -> Result<()> {
    let files = write_phase_transition_suite(output, config)?;
    println!("Generated {} files in {}", files.len(), output.display());
    Ok(())
}

/// # Errors
///
/// I/O errors while writing the suite.
pub(crate) fn generate_mixed(output: &Path, sat: usize, unsat: usize, seed: u64) -> Result<()> {
    let files = write_mixed_suite(output, sat, unsat, seed)?;
    println!("Generated {} files in {}", files.len(), output.display());
    Ok(())
}

pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Allocated and resident bytes as reported by jemalloc, in MiB.
fn memory_usage() -> Option<(f64, f64)> {
    if let Err(e) = epoch::advance() {
        debug!("jemalloc epoch unavailable: {e}");
        return None;
    }
    let allocated = stats::allocated::mib().and_then(|m| m.read()).ok()?;
    let resident = stats::resident::mib().and_then(|m| m.read()).ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints problem and search statistics for one solver run.
pub(crate) fn print_stats(
    parse_time: Duration,
    dimacs: &Dimacs,
    solver: SolverType,
    outcome: &Outcome,
    s: &SolveStats,
) {
    let (elapsed, peak_kb, verdict) = match outcome {
        Outcome::Finished(m) => (m.elapsed, m.peak_memory_kb, m.verdict.to_string()),
        Outcome::Exhausted {
            elapsed,
            peak_memory_kb,
            reason,
        } => {
            info!(solver = solver.label(), %reason, "stopped");
            (*elapsed, *peak_memory_kb, "EXHAUSTED".to_string())
        }
    };
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", dimacs.num_vars());
    stat_line("Clauses", dimacs.num_clauses());
    stat_line("Clause/variable ratio", format!("{:.2}", dimacs.ratio()));

    println!("=====================[ {:^10} Statistics ]======================", solver.label());
    stat_line("Verdict", verdict);
    stat_line_with_rate("Resolvents", s.resolvents, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line("Rounds", s.rounds);
    stat_line("Largest clause set", s.peak_clauses);
    stat_line("Peak heap growth (KB)", format!("{peak_kb:.1}"));
    if let Some((allocated, resident)) = memory_usage() {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.4}"));
    println!("=====================================================================");
}
