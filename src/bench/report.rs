//! Per-file benchmark records, CSV output and the ratio summary.

use crate::bench::harness::{Measurement, Verdict};
use crate::error::{Error, Result};
use crate::sat::solver::SolverType;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened when one solver ran on one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Finished(Measurement),
    Exhausted {
        elapsed: Duration,
        peak_memory_kb: f64,
        reason: String,
    },
}

impl Outcome {
    pub const fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Finished(m) => Some(m.verdict),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Consolidated verdict for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalVerdict {
    Agreed(Verdict),
    /// No solver finished within its limits.
    Unknown,
    /// Solvers contradicted each other; see `Error::Disagreement`.
    Disagreement(String),
}

impl std::fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agreed(v) => write!(f, "{v}"),
            Self::Unknown => write!(f, "N/A"),
            Self::Disagreement(_) => write!(f, "DISAGREEMENT"),
        }
    }
}

/// Every solver that finished must agree.
///
/// Returns `Ok(None)` when no solver finished.
///
/// # Errors
///
/// `Error::Disagreement` when two finished solvers returned different verdicts.
pub fn consolidate(file: &Path, outcomes: &[(SolverType, Outcome)]) -> Result<Option<Verdict>> {
    let finished = outcomes
        .iter()
        .filter_map(|(s, o)| o.verdict().map(|v| (*s, v)))
        .collect_vec();

    if finished.iter().map(|(_, v)| v).all_equal() {
        return Ok(finished.first().map(|(_, v)| *v));
    }

    Err(Error::Disagreement {
        file: file.to_path_buf(),
        verdicts: finished
            .iter()
            .map(|(s, v)| format!("{}={v}", s.label()))
            .join(", "),
    })
}

/// All measurements for one formula file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub num_vars: usize,
    pub num_clauses: usize,
    pub ratio: f64,
    pub outcomes: Vec<(SolverType, Outcome)>,
    pub final_verdict: FinalVerdict,
}

impl FileReport {
    /// Builds the report and consolidates the verdict.
    pub fn new(
        path: PathBuf,
        relative_path: PathBuf,
        num_vars: usize,
        num_clauses: usize,
        ratio: f64,
        outcomes: Vec<(SolverType, Outcome)>,
    ) -> Self {
        let final_verdict = match consolidate(&path, &outcomes) {
            Ok(Some(v)) => FinalVerdict::Agreed(v),
            Ok(None) => FinalVerdict::Unknown,
            Err(e) => FinalVerdict::Disagreement(e.to_string()),
        };
        Self {
            path,
            relative_path,
            num_vars,
            num_clauses,
            ratio,
            outcomes,
            final_verdict,
        }
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn outcome(&self, solver: SolverType) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == solver)
            .map(|(_, o)| o)
    }
}

/// Quotes a CSV field when it contains a separator, quote or newline.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub const WIDE_HEADER: [&str; 15] = [
    "filename",
    "relative_path",
    "num_vars",
    "num_clauses",
    "ratio",
    "result_resolution",
    "time_resolution",
    "mem_resolution_kb",
    "result_dp",
    "time_dp",
    "mem_dp_kb",
    "result_dpll",
    "time_dpll",
    "mem_dpll_kb",
    "final_result",
];

/// One row per file, three columns per algorithm.
///
/// Algorithms that did not run are written as `N/A`, `-1`, `-1`; exhausted
/// runs as `EXHAUSTED` with the figures observed before the abort.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_wide_csv<W: Write>(mut writer: W, reports: &[FileReport]) -> Result<()> {
    writeln!(writer, "{}", WIDE_HEADER.join(","))?;
    for report in reports {
        let mut row = vec![
            field(&report.filename()),
            field(&report.relative_path.to_string_lossy()),
            report.num_vars.to_string(),
            report.num_clauses.to_string(),
            report.ratio.to_string(),
        ];
        for solver in SolverType::ALL {
            let cells = match report.outcome(solver) {
                Some(Outcome::Finished(m)) => [
                    m.verdict.to_string(),
                    m.elapsed_secs().to_string(),
                    m.peak_memory_kb.to_string(),
                ],
                Some(Outcome::Exhausted {
                    elapsed,
                    peak_memory_kb,
                    ..
                }) => [
                    "EXHAUSTED".to_string(),
                    elapsed.as_secs_f64().to_string(),
                    peak_memory_kb.to_string(),
                ],
                None => ["N/A".to_string(), "-1".to_string(), "-1".to_string()],
            };
            row.extend(cells);
        }
        row.push(report.final_verdict.to_string());
        writeln!(writer, "{}", row.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per (file, algorithm) with fixed-precision time and memory.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_long_csv<W: Write>(mut writer: W, reports: &[FileReport]) -> Result<()> {
    writeln!(writer, "Filename,Algorithm,Result,Time (s),Memory (KB)")?;
    for report in reports {
        let name = field(&report.filename());
        for (solver, outcome) in &report.outcomes {
            match outcome {
                Outcome::Finished(m) => writeln!(
                    writer,
                    "{name},{},{},{:.4},{:.1}",
                    solver.label(),
                    m.verdict,
                    m.elapsed_secs(),
                    m.peak_memory_kb
                )?,
                Outcome::Exhausted { reason, .. } => writeln!(
                    writer,
                    "{name},{},{},-,-",
                    solver.label(),
                    field(&format!("ERROR: {reason}"))
                )?,
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Satisfiability rate at one clause/variable ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioRow {
    pub ratio: f64,
    pub instances: usize,
    pub sat: usize,
    pub unsat: usize,
}

impl RatioRow {
    /// SAT share among instances with an agreed verdict.
    #[allow(clippy::cast_precision_loss)]
    pub fn sat_rate(&self) -> f64 {
        match self.sat + self.unsat {
            0 => 0.0,
            decided => self.sat as f64 / decided as f64,
        }
    }
}

/// Groups reports by ratio (rounded to two decimals) in ascending order.
pub fn summarize(reports: &[FileReport]) -> Vec<RatioRow> {
    let mut rows: BTreeMap<OrderedFloat<f64>, RatioRow> = BTreeMap::new();
    for report in reports {
        let key = (report.ratio * 100.0).round() / 100.0;
        let row = rows.entry(OrderedFloat(key)).or_insert(RatioRow {
            ratio: key,
            instances: 0,
            sat: 0,
            unsat: 0,
        });
        row.instances += 1;
        match report.final_verdict {
            FinalVerdict::Agreed(Verdict::Sat) => row.sat += 1,
            FinalVerdict::Agreed(Verdict::Unsat) => row.unsat += 1,
            FinalVerdict::Unknown | FinalVerdict::Disagreement(_) => {}
        }
    }
    rows.into_values().collect()
}

/// Prints the ratio summary as a table with a bar per ratio.
pub fn print_summary(rows: &[RatioRow]) {
    println!("\n=====================[ Phase Transition Summary ]=====================");
    println!("|  {:>6}  {:>9}  {:>5}  {:>5}  {:>6}  {:<24} |", "m/n", "instances", "SAT", "UNSAT", "rate", "");
    for row in rows {
        let rate = row.sat_rate();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = "#".repeat((rate * 24.0).round() as usize);
        println!(
            "|  {:>6.2}  {:>9}  {:>5}  {:>5}  {:>6.2}  {bar:<24} |",
            row.ratio, row.instances, row.sat, row.unsat, rate
        );
    }
    println!("=======================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(verdict: Verdict) -> Outcome {
        Outcome::Finished(Measurement {
            verdict,
            elapsed: Duration::from_millis(1500),
            peak_memory_kb: 12.5,
        })
    }

    fn report(name: &str, ratio: f64, outcomes: Vec<(SolverType, Outcome)>) -> FileReport {
        FileReport::new(
            PathBuf::from(format!("bench/{name}")),
            PathBuf::from(name),
            20,
            20,
            ratio,
            outcomes,
        )
    }

    #[test]
    fn test_consolidate_agreement() {
        let outcomes = vec![
            (SolverType::Resolution, finished(Verdict::Sat)),
            (SolverType::Dpll, finished(Verdict::Sat)),
        ];
        let verdict = consolidate(Path::new("a.cnf"), &outcomes).unwrap();
        assert_eq!(verdict, Some(Verdict::Sat));
    }

    #[test]
    fn test_consolidate_ignores_exhausted() {
        let outcomes = vec![
            (
                SolverType::Resolution,
                Outcome::Exhausted {
                    elapsed: Duration::from_secs(1),
                    peak_memory_kb: 1.0,
                    reason: "deadline".into(),
                },
            ),
            (SolverType::Dpll, finished(Verdict::Unsat)),
        ];
        assert_eq!(
            consolidate(Path::new("a.cnf"), &outcomes).unwrap(),
            Some(Verdict::Unsat)
        );
        assert_eq!(consolidate(Path::new("a.cnf"), &outcomes[..1]).unwrap(), None);
    }

    #[test]
    fn test_consolidate_surfaces_disagreement() {
        let outcomes = vec![
            (SolverType::Dp, finished(Verdict::Sat)),
            (SolverType::Dpll, finished(Verdict::Unsat)),
        ];
        let err = consolidate(Path::new("x.cnf"), &outcomes).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("x.cnf"));
        assert!(message.contains("DP=SAT"));
        assert!(message.contains("DPLL=UNSAT"));

        let r = report("x.cnf", 4.0, outcomes);
        assert!(matches!(r.final_verdict, FinalVerdict::Disagreement(_)));
        assert_eq!(r.final_verdict.to_string(), "DISAGREEMENT");
    }

    #[test]
    fn test_wide_csv() {
        let r = report("a,b.cnf", 1.0, vec![(SolverType::Dpll, finished(Verdict::Sat))]);
        let mut out = Vec::new();
        write_wide_csv(&mut out, &[r]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], WIDE_HEADER.join(","));
        assert_eq!(
            lines[1],
            "\"a,b.cnf\",\"a,b.cnf\",20,20,1,N/A,-1,-1,N/A,-1,-1,SAT,1.5,12.5,SAT"
        );
    }

    #[test]
    fn test_long_csv() {
        let r = report(
            "f.cnf",
            2.0,
            vec![
                (SolverType::Resolution, finished(Verdict::Unsat)),
                (
                    SolverType::Dp,
                    Outcome::Exhausted {
                        elapsed: Duration::from_secs(2),
                        peak_memory_kb: 3.0,
                        reason: "deadline of 2s passed".into(),
                    },
                ),
            ],
        );
        let mut out = Vec::new();
        write_long_csv(&mut out, &[r]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Filename,Algorithm,Result,Time (s),Memory (KB)\n\
             f.cnf,Resolution,UNSAT,1.5000,12.5\n\
             f.cnf,DP,ERROR: deadline of 2s passed,-,-\n"
        );
    }

    #[test]
    fn test_summarize_groups_by_ratio() {
        let reports = vec![
            report("a", 2.0, vec![(SolverType::Dpll, finished(Verdict::Sat))]),
            report("b", 6.0, vec![(SolverType::Dpll, finished(Verdict::Unsat))]),
            report("c", 2.0, vec![(SolverType::Dpll, finished(Verdict::Unsat))]),
            report("d", 2.0, vec![]),
        ];
        let rows = summarize(&reports);
        assert_eq!(rows.len(), 2);
        assert!((rows[0].ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(rows[0].instances, 3);
        assert_eq!(rows[0].sat, 1);
        assert!((rows[0].sat_rate() - 0.5).abs() < f64::EPSILON);
        assert!(rows[1].sat_rate().abs() < f64::EPSILON);
    }
}
