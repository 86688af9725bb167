//! Runs the selected solvers over every `.cnf` file of a directory tree.

use crate::bench::harness::measure;
use crate::bench::report::{
    FileReport, FinalVerdict, Outcome, print_summary, summarize, write_long_csv, write_wide_csv,
};
use crate::error::{Error, Result};
use crate::sat::dimacs::{cnf_files, parse_file};
use crate::sat::solver::{Limits, SolverType};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Explicit configuration of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input_dir: PathBuf,
    /// Wide, one-row-per-file CSV.
    pub output_csv: Option<PathBuf>,
    /// Long, one-row-per-algorithm CSV.
    pub long_csv: Option<PathBuf>,
    /// Print the per-ratio satisfiability table.
    pub summary: bool,
    pub limits: Limits,
    pub solvers: Vec<SolverType>,
}

impl AnalysisConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_csv: None,
            long_csv: None,
            summary: false,
            limits: Limits::none(),
            solvers: SolverType::ALL.to_vec(),
        }
    }
}

/// Result of a whole directory run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub reports: Vec<FileReport>,
    /// Files skipped because they could not be parsed.
    pub skipped: Vec<PathBuf>,
}

impl Analysis {
    pub fn disagreements(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.final_verdict, FinalVerdict::Disagreement(_)))
    }
}

/// Parses one file and runs every solver on it in turn.
///
/// Exhausted solvers are recorded as such; any other error propagates.
///
/// # Errors
///
/// Parse and I/O errors for the file.
pub fn analyze_file(
    path: &Path,
    root: &Path,
    solvers: &[SolverType],
    limits: &Limits,
) -> Result<FileReport> {
    let dimacs = parse_file(path)?;
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    info!(
        file = %relative.display(),
        vars = dimacs.num_vars(),
        clauses = dimacs.num_clauses(),
        ratio = dimacs.ratio(),
        "processing"
    );

    let mut outcomes = Vec::with_capacity(solvers.len());
    for &solver_type in solvers {
        let mut solver = solver_type.to_impl();
        let outcome = match measure(&mut solver, &dimacs.cnf, limits) {
            Ok(m) => {
                debug!(solver = solver_type.label(), verdict = %m.verdict, secs = m.elapsed_secs(), kb = m.peak_memory_kb);
                Outcome::Finished(m)
            }
            Err(Error::ResourceExhausted {
                elapsed,
                peak_memory_kb,
                reason,
                ..
            }) => {
                warn!(solver = solver_type.label(), %reason, "solver exhausted its budget");
                Outcome::Exhausted {
                    elapsed,
                    peak_memory_kb,
                    reason,
                }
            }
            Err(e) => return Err(e),
        };
        outcomes.push((solver_type, outcome));
    }

    let report = FileReport::new(
        path.to_path_buf(),
        relative,
        dimacs.num_vars(),
        dimacs.num_clauses(),
        dimacs.ratio(),
        outcomes,
    );
    match &report.final_verdict {
        FinalVerdict::Disagreement(message) => error!("{message}"),
        verdict => info!(file = %report.relative_path.display(), %verdict, "done"),
    }
    Ok(report)
}

/// Analyses every `.cnf` file below `config.input_dir`.
///
/// Files that fail to parse are logged and skipped.
///
/// # Errors
///
/// `Error::InvalidPath` if the input is not a directory, walk and I/O errors.
pub fn analyze_dir(config: &AnalysisConfig) -> Result<Analysis> {
    let root = &config.input_dir;
    if !root.is_dir() {
        return Err(Error::InvalidPath(format!(
            "benchmark directory not found: {}",
            root.display()
        )));
    }

    let files = cnf_files(root)?;
    if files.is_empty() {
        warn!(dir = %root.display(), "no .cnf files found");
    }

    let mut analysis = Analysis {
        reports: Vec::with_capacity(files.len()),
        skipped: Vec::new(),
    };
    for path in files {
        match analyze_file(&path, root, &config.solvers, &config.limits) {
            Ok(report) => analysis.reports.push(report),
            Err(
                e @ (Error::Parse { .. }
                | Error::MalformedHeader { .. }
                | Error::ZeroLiteral
                | Error::LiteralOutOfRange(_)),
            ) => {
                warn!(file = %path.display(), error = %e, "skipping unparsable file");
                analysis.skipped.push(path);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(analysis)
}

/// Full pipeline: analyse, write the requested CSVs, print the summary.
///
/// # Errors
///
/// See `analyze_dir`; also I/O errors while writing the CSV files.
pub fn run(config: &AnalysisConfig) -> Result<Analysis> {
    let analysis = analyze_dir(config)?;
    info!(files = analysis.reports.len(), skipped = analysis.skipped.len(), "analysis finished");

    if let Some(path) = &config.output_csv {
        write_wide_csv(BufWriter::new(File::create(path)?), &analysis.reports)?;
        info!(path = %path.display(), "wrote results");
    }
    if let Some(path) = &config.long_csv {
        write_long_csv(BufWriter::new(File::create(path)?), &analysis.reports)?;
        info!(path = %path.display(), "wrote per-algorithm results");
    }
    if config.summary {
        print_summary(&summarize(&analysis.reports));
    }

    Ok(analysis)
}
