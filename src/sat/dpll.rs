//! Minimal DPLL backtracking search.
//!
//! Every call simplifies the current clause list against the assignment
//! trail, dropping satisfied clauses and falsified literals. An empty clause
//! closes the branch, an empty clause list proves the branch satisfiable.
//! Otherwise the solver branches on the first literal of the first remaining
//! clause, trying it true before trying its negation.
//!
//! There is no unit propagation and no pure-literal rule beyond what the
//! simplification step yields by itself. Recursion depth is bounded by the
//! number of variables, since every decision fixes a fresh one.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::{Clause, Simplified};
use crate::sat::cnf::Cnf;
use crate::sat::solver::{Budget, LimitHit, SolveStats, Solver};

#[derive(Debug, Clone, Default)]
pub struct Dpll {
    stats: SolveStats,
    model: Option<Solutions>,
}

impl Dpll {
    /// Model found by the last successful `solve`, if any.
    pub fn model(&self) -> Option<&Solutions> {
        self.model.as_ref()
    }

    /// Runs the search from `assignment`, leaving the satisfying trail in it
    /// on success. On failure the trail is restored to its initial contents.
    ///
    /// # Errors
    ///
    /// `LimitHit` if the budget runs out; the trail is then left mid-search.
    pub fn search(
        &mut self,
        clauses: &[Clause],
        assignment: &mut Assignment,
        budget: &Budget,
    ) -> Result<bool, LimitHit> {
        budget.check(clauses.len())?;

        let mut simplified = Vec::with_capacity(clauses.len());
        for clause in clauses {
            match clause.simplify(assignment) {
                Simplified::Satisfied => {}
                Simplified::Reduced(reduced) if reduced.is_empty() => return Ok(false),
                Simplified::Reduced(reduced) => simplified.push(reduced),
            }
        }
        self.stats.peak_clauses = self.stats.peak_clauses.max(simplified.len());

        if simplified.is_empty() {
            return Ok(true);
        }

        // Leftmost literal of the leftmost open clause.
        let lit = simplified[0][0];
        for choice in [lit, -lit] {
            self.stats.decisions += 1;
            assignment.push(choice);
            if self.search(&simplified, assignment, budget)? {
                return Ok(true);
            }
            assignment.pop();
        }

        Ok(false)
    }
}

impl Solver for Dpll {
    fn name(&self) -> &'static str {
        "DPLL"
    }

    fn solve(&mut self, cnf: &Cnf, budget: &Budget) -> Result<bool, LimitHit> {
        self.stats = SolveStats::default();
        self.model = None;

        let mut assignment = Assignment::with_capacity(cnf.variables().len());
        let sat = self.search(&cnf.clauses, &mut assignment, budget)?;
        if sat {
            self.model = Some(assignment.solutions());
        }
        Ok(sat)
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}

/// Decides `cnf` starting from `assignment` (normally empty).
///
/// On `true`, `assignment` holds a trail satisfying every clause.
pub fn dpll(cnf: &Cnf, assignment: &mut Assignment) -> bool {
    Dpll::default()
        .search(&cnf.clauses, assignment, &Budget::unlimited())
        .unwrap_or_else(|_| unreachable!("an unlimited budget never trips"))
}

/// Satisfying (partial) model of `cnf`, or `None` if it is unsatisfiable.
#[must_use]
pub fn dpll_model(cnf: &Cnf) -> Option<Solutions> {
    let mut assignment = Assignment::with_capacity(cnf.variables().len());
    dpll(cnf, &mut assignment).then(|| assignment.solutions())
}
