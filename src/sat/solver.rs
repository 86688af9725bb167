//! Common interface of the three solvers and the cooperative budget they honour.

use crate::sat::cnf::Cnf;
use crate::sat::dp::Dp;
use crate::sat::dpll::Dpll;
use crate::sat::resolution::{PairOrder, Resolution};
use clap::ValueEnum;
use core::fmt::{self, Display};
use std::time::{Duration, Instant};

/// Counters a solver accumulates during one `solve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStats {
    /// Resolvents produced (Resolution, DP).
    pub resolvents: usize,
    /// Largest clause set held at once.
    pub peak_clauses: usize,
    /// Saturation rounds (Resolution) or eliminated variables (DP).
    pub rounds: usize,
    /// Branching decisions (DPLL).
    pub decisions: usize,
}

/// Which limit stopped a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitHit {
    Deadline(Duration),
    Clauses { held: usize, max: usize },
}

impl Display for LimitHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deadline(timeout) => write!(f, "deadline of {timeout:?} passed"),
            Self::Clauses { held, max } => write!(f, "{held} clauses exceed the cap of {max}"),
        }
    }
}

/// Limits configured by the caller. `Limits::none()` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    pub timeout: Option<Duration>,
    pub max_clauses: Option<usize>,
}

impl Limits {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            timeout: None,
            max_clauses: None,
        }
    }

    /// Starts the clock.
    #[must_use]
    pub fn start(&self) -> Budget {
        Budget {
            limits: *self,
            started: Instant::now(),
        }
    }
}

/// A running `Limits`, polled by the solvers at their loop heads.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    limits: Limits,
    started: Instant,
}

impl Budget {
    #[must_use]
    pub fn unlimited() -> Self {
        Limits::none().start()
    }

    /// # Errors
    ///
    /// `LimitHit` when the deadline passed or `held` exceeds the clause cap.
    pub fn check(&self, held: usize) -> Result<(), LimitHit> {
        if let Some(max) = self.limits.max_clauses {
            if held > max {
                return Err(LimitHit::Clauses { held, max });
            }
        }
        if let Some(timeout) = self.limits.timeout {
            if self.started.elapsed() > timeout {
                return Err(LimitHit::Deadline(timeout));
            }
        }
        Ok(())
    }
}

/// A satisfiability procedure over a borrowed formula.
///
/// Implementations must not mutate the formula; all work happens on private
/// copies so the same `Cnf` can be handed to every solver in turn.
pub trait Solver {
    fn name(&self) -> &'static str;

    /// Returns `Ok(true)` iff `cnf` is satisfiable.
    ///
    /// # Errors
    ///
    /// `LimitHit` if the budget ran out before a verdict was reached.
    fn solve(&mut self, cnf: &Cnf, budget: &Budget) -> Result<bool, LimitHit>;

    fn stats(&self) -> SolveStats;
}

/// Selectable algorithms, as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum SolverType {
    Resolution,
    Dp,
    Dpll,
}

impl SolverType {
    pub const ALL: [Self; 3] = [Self::Resolution, Self::Dp, Self::Dpll];

    /// Name used in reports and CSV headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resolution => "Resolution",
            Self::Dp => "DP",
            Self::Dpll => "DPLL",
        }
    }

    #[must_use]
    pub fn to_impl(self) -> SolverImpls {
        match self {
            Self::Resolution => SolverImpls::Resolution(Resolution::new(PairOrder::Sequential)),
            Self::Dp => SolverImpls::Dp(Dp::default()),
            Self::Dpll => SolverImpls::Dpll(Dpll::default()),
        }
    }
}

impl Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        write!(f, "{value}")
    }
}

/// Static dispatch over the concrete solvers.
#[derive(Debug, Clone)]
pub enum SolverImpls {
    Resolution(Resolution),
    Dp(Dp),
    Dpll(Dpll),
}

impl Solver for SolverImpls {
    fn name(&self) -> &'static str {
        match self {
            Self::Resolution(s) => s.name(),
            Self::Dp(s) => s.name(),
            Self::Dpll(s) => s.name(),
        }
    }

    fn solve(&mut self, cnf: &Cnf, budget: &Budget) -> Result<bool, LimitHit> {
        match self {
            Self::Resolution(s) => s.solve(cnf, budget),
            Self::Dp(s) => s.solve(cnf, budget),
            Self::Dpll(s) => s.solve(cnf, budget),
        }
    }

    fn stats(&self) -> SolveStats {
        match self {
            Self::Resolution(s) => s.stats(),
            Self::Dp(s) => s.stats(),
            Self::Dpll(s) => s.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget_never_trips() {
        let budget = Budget::unlimited();
        assert!(budget.check(usize::MAX).is_ok());
    }

    #[test]
    fn test_clause_cap() {
        let budget = Limits {
            timeout: None,
            max_clauses: Some(10),
        }
        .start();
        assert!(budget.check(10).is_ok());
        assert_eq!(
            budget.check(11),
            Err(LimitHit::Clauses { held: 11, max: 10 })
        );
    }

    #[test]
    fn test_zero_timeout_trips() {
        let budget = Limits {
            timeout: Some(Duration::ZERO),
            max_clauses: None,
        }
        .start();
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(budget.check(0), Err(LimitHit::Deadline(_))));
    }

    #[test]
    fn test_labels_and_names() {
        assert_eq!(SolverType::Dp.label(), "DP");
        assert_eq!(SolverType::Dpll.to_string(), "dpll");
        assert_eq!(SolverType::Resolution.to_impl().name(), "Resolution");
    }
}
