//! Times and memory-profiles a single solver invocation.
//!
//! The harness hands the solver its own copy of the formula, starts the clock
//! and the heap high-water mark, and reports the verdict with its cost. It
//! never changes what the solver computes: limits are only enforced through
//! the `Budget` the solver already polls.

use crate::bench::memory::PeakScope;
use crate::error::{Error, Result};
use crate::sat::cnf::Cnf;
use crate::sat::solver::{Budget, LimitHit, Limits, Solver};
use core::fmt::{self, Display};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Sat,
    Unsat,
}

impl From<bool> for Verdict {
    fn from(sat: bool) -> Self {
        if sat { Self::Sat } else { Self::Unsat }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sat => write!(f, "SAT"),
            Self::Unsat => write!(f, "UNSAT"),
        }
    }
}

/// Verdict plus the cost of reaching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub verdict: Verdict,
    pub elapsed: Duration,
    pub peak_memory_kb: f64,
}

impl Measurement {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Runs `solve` on a private clone of `cnf` and measures it.
///
/// # Errors
///
/// `Error::ResourceExhausted` carrying the elapsed time and peak memory seen
/// up to the abort when the solver reports a `LimitHit`.
pub fn measure_fn<F>(name: &'static str, solve: F, cnf: &Cnf, limits: &Limits) -> Result<Measurement>
where
    F: FnOnce(&Cnf, &Budget) -> std::result::Result<bool, LimitHit>,
{
    let formula = cnf.clone();

    let scope = PeakScope::start();
    let started = Instant::now();
    let budget = limits.start();
    let outcome = solve(&formula, &budget);
    let elapsed = started.elapsed();
    let peak_memory_kb = scope.peak_kb();

    debug!(solver = name, ?elapsed, peak_memory_kb, "solver returned");

    match outcome {
        Ok(sat) => Ok(Measurement {
            verdict: Verdict::from(sat),
            elapsed,
            peak_memory_kb,
        }),
        Err(hit) => Err(Error::ResourceExhausted {
            solver: name,
            elapsed,
            peak_memory_kb,
            reason: hit.to_string(),
        }),
    }
}

/// `measure_fn` for a `Solver`; its stats remain readable afterwards.
///
/// # Errors
///
/// See `measure_fn`.
pub fn measure<S: Solver>(solver: &mut S, cnf: &Cnf, limits: &Limits) -> Result<Measurement> {
    let name = solver.name();
    measure_fn(name, |f, b| solver.solve(f, b), cnf, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::dpll::Dpll;
    use crate::sat::resolution::Resolution;

    #[test]
    fn test_measure_reports_verdict() {
        let cnf = Cnf::from_dimacs(&[vec![1], vec![-1]]).unwrap();
        let m = measure(&mut Dpll::default(), &cnf, &Limits::none()).unwrap();
        assert_eq!(m.verdict, Verdict::Unsat);
        assert!(m.peak_memory_kb >= 0.0);
    }

    #[test]
    fn test_measure_fn_accepts_plain_functions() {
        let cnf = Cnf::from_dimacs(&[vec![1, 2]]).unwrap();
        let m = measure_fn("dp", |f, _| Ok(crate::sat::dp::eliminate_all(f)), &cnf, &Limits::none())
            .unwrap();
        assert_eq!(m.verdict, Verdict::Sat);
    }

    #[test]
    fn test_exhaustion_is_distinct_error() {
        let cnf = Cnf::from_dimacs(&[vec![1, 2], vec![-1, 2], vec![1, -2]]).unwrap();
        let limits = Limits {
            timeout: None,
            max_clauses: Some(1),
        };
        let err = measure(&mut Resolution::default(), &cnf, &limits).unwrap_err();
        match err {
            Error::ResourceExhausted { solver, reason, .. } => {
                assert_eq!(solver, "Resolution");
                assert!(reason.contains("cap of 1"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_solver_sees_unchanged_formula() {
        let cnf = Cnf::from_dimacs(&[vec![1, -2], vec![2]]).unwrap();
        let expected = cnf.clone();
        measure_fn(
            "probe",
            |f, _| {
                assert_eq!(f, &expected);
                Ok(true)
            },
            &cnf,
            &Limits::none(),
        )
        .unwrap();
        assert_eq!(cnf, expected);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::from(true).to_string(), "SAT");
        assert_eq!(Verdict::from(false).to_string(), "UNSAT");
    }
}
