//! Error type shared by the parser, the solvers and the benchmark harness.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between reading a formula and reporting on it.
#[derive(Debug, Error)]
pub enum Error {
    /// A literal with value `0` reached the formula builder.
    #[error("literal 0 is a clause terminator and cannot appear inside a clause")]
    ZeroLiteral,

    /// `i32::MIN` has no positive counterpart, so it names no variable.
    #[error("literal {0} is out of range: variables must be at most {max}", max = i32::MAX)]
    LiteralOutOfRange(i32),

    /// A token in a DIMACS body is not an integer.
    #[error("line {line}: cannot parse literal '{token}'")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// The `p cnf <vars> <clauses>` line is missing fields or is not numeric.
    #[error("line {line}: malformed problem line '{text}'")]
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// The problem line as read.
        text: String,
    },

    /// A solver hit the limits the harness imposed on it.
    ///
    /// Carries whatever cost figures were observed before the abort.
    #[error("{solver} exhausted its budget after {elapsed:?} ({peak_memory_kb:.1} KB peak): {reason}")]
    ResourceExhausted {
        /// Solver that was stopped.
        solver: &'static str,
        /// Wall-clock time spent before the abort.
        elapsed: Duration,
        /// Peak heap growth observed before the abort.
        peak_memory_kb: f64,
        /// Which limit was hit.
        reason: String,
    },

    /// Two solvers returned different verdicts for the same formula.
    #[error("solvers disagree on {}: {verdicts}", .file.display())]
    Disagreement {
        /// Formula on which the disagreement happened.
        file: PathBuf,
        /// Human-readable list of `solver=verdict` pairs.
        verdicts: String,
    },

    /// A path given on the command line is not usable.
    #[error("{0}")]
    InvalidPath(String),

    /// A generator or harness parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking a benchmark directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
