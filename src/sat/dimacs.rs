#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reader and writer for the DIMACS CNF file format.
//!
//! The format consists of:
//! - Comment lines starting with `c`.
//! - A problem line `p cnf <num_variables> <num_clauses>`. The counts are kept
//!   as metadata only; the formula's variables are inferred from its literals.
//! - Clauses as whitespace-separated nonzero integers, each terminated by `0`.
//!   A clause may span several lines and a line may hold several clauses.
//! - An optional `%` line marking the end of data (SATLIB benchmarks).
//!
//! A `0` with no preceding literals is an empty clause. Blank lines are
//! ignored, and a final clause missing its terminator is still accepted.

use crate::error::{Error, Result};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A parsed DIMACS file: the formula plus the counts its header declared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dimacs {
    pub cnf: Cnf,
    pub declared_vars: Option<usize>,
    pub declared_clauses: Option<usize>,
}

impl Dimacs {
    /// Variable count from the header, falling back to the largest index seen.
    pub fn num_vars(&self) -> usize {
        self.declared_vars.unwrap_or(self.cnf.num_vars)
    }

    /// Clause count from the header, falling back to the clauses read.
    pub fn num_clauses(&self) -> usize {
        self.declared_clauses.unwrap_or_else(|| self.cnf.len())
    }

    /// Clause-to-variable ratio `m / n` computed from the header counts.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        match self.num_vars() {
            0 => 0.0,
            n => self.num_clauses() as f64 / n as f64,
        }
    }
}

fn parse_header(line_no: usize, line: &str) -> Result<(usize, usize)> {
    let malformed = || Error::MalformedHeader {
        line: line_no,
        text: line.trim().to_string(),
    };
    let mut parts = line.split_whitespace().skip(1);
    if parts.next() != Some("cnf") {
        return Err(malformed());
    }
    let vars = parts.next().and_then(|s| s.parse().ok()).ok_or_else(malformed)?;
    let clauses = parts.next().and_then(|s| s.parse().ok()).ok_or_else(malformed)?;
    Ok((vars, clauses))
}

/// Parses DIMACS data from any buffered reader.
///
/// Lines are read as raw bytes. Comment lines are skipped undecoded, so
/// non-UTF-8 comments are harmless; header and clause lines must be UTF-8.
///
/// # Errors
///
/// - `Error::Io` if reading fails.
/// - `Error::MalformedHeader` if the `p` line is not `p cnf <int> <int>`.
/// - `Error::Parse` if a clause line is not UTF-8 or a token is not an `i32`.
/// - `Error::LiteralOutOfRange` for the literal `i32::MIN`.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Dimacs> {
    let mut dimacs = Dimacs::default();
    let mut clauses = Vec::new();
    let mut current: Vec<Literal> = Vec::new();

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim_ascii_start();

        match trimmed.first() {
            None | Some(b'c') => continue,
            Some(b'%') => break,
            Some(_) => {}
        }

        let text = std::str::from_utf8(trimmed).map_err(|_| Error::Parse {
            line: line_no,
            token: String::from_utf8_lossy(trimmed).trim_end().to_string(),
        })?;

        if text.starts_with('p') {
            let (vars, count) = parse_header(line_no, text)?;
            dimacs.declared_vars = Some(vars);
            dimacs.declared_clauses = Some(count);
            continue;
        }

        for token in text.split_whitespace() {
            let value: i32 = token.parse().map_err(|_| Error::Parse {
                line: line_no,
                token: token.to_string(),
            })?;
            if value == 0 {
                clauses.push(Clause::new(current.drain(..)));
            } else {
                current.push(Literal::from_i32(value)?);
            }
        }
    }

    if !current.is_empty() {
        clauses.push(Clause::new(current));
    }

    dimacs.cnf = Cnf::new(clauses);
    Ok(dimacs)
}

/// Parses a DIMACS file from disk.
///
/// # Errors
///
/// See `parse_dimacs`; additionally `Error::Io` if the file cannot be opened.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Dimacs> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

/// Writes a formula in DIMACS form: optional comment, header, one clause per line.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_dimacs<W: Write>(
    mut writer: W,
    num_vars: usize,
    clauses: &[Clause],
    comment: Option<&str>,
) -> Result<()> {
    if let Some(comment) = comment {
        writeln!(writer, "c {comment}")?;
    }
    writeln!(writer, "p cnf {num_vars} {}", clauses.len())?;
    for clause in clauses {
        writeln!(writer, "{clause}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a formula to `path`, creating or truncating the file.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    num_vars: usize,
    clauses: &[Clause],
    comment: Option<&str>,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_dimacs(io::BufWriter::new(file), num_vars, clauses, comment)
}

/// Recursively collects every `.cnf` file under `dir`, sorted by path.
///
/// # Errors
///
/// `Error::Walk` if a directory entry cannot be read.
pub fn cnf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "cnf") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
