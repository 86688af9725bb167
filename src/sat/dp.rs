//! Davis–Putnam variable elimination.
//!
//! Variables are eliminated one at a time, smallest index first. Eliminating
//! `v` replaces every clause mentioning `v` by the pairwise resolvents over
//! `v` of its positive and negative occurrences; clauses without `v` are kept
//! as they are. Deriving the empty clause means UNSAT, running out of clauses
//! or of variables means SAT.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::{Budget, LimitHit, SolveStats, Solver};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Dp {
    stats: SolveStats,
}

/// Result of a single elimination step.
enum Step {
    Contradiction,
    Clauses(Vec<Clause>),
}

impl Dp {
    fn eliminate(
        &mut self,
        clauses: Vec<Clause>,
        var: Variable,
        budget: &Budget,
    ) -> Result<Step, LimitHit> {
        let pos = Literal::new(var, true);
        let neg = -pos;

        let mut positive = Vec::new();
        let mut negative = Vec::new();
        let mut rest = Vec::with_capacity(clauses.len());
        for clause in clauses {
            // A tautology on `var` lands in both groups.
            let (has_pos, has_neg) = (clause.contains(pos), clause.contains(neg));
            match (has_pos, has_neg) {
                (false, false) => rest.push(clause),
                (true, false) => positive.push(clause),
                (false, true) => negative.push(clause),
                (true, true) => {
                    positive.push(clause.clone());
                    negative.push(clause);
                }
            }
        }

        for p in &positive {
            for n in &negative {
                let Some(resolvent) = p.resolve(n, var) else {
                    continue;
                };
                self.stats.resolvents += 1;
                if resolvent.is_empty() {
                    return Ok(Step::Contradiction);
                }
                rest.push(resolvent);
            }
            budget.check(rest.len())?;
        }

        Ok(Step::Clauses(rest))
    }
}

impl Solver for Dp {
    fn name(&self) -> &'static str {
        "DP"
    }

    fn solve(&mut self, cnf: &Cnf, budget: &Budget) -> Result<bool, LimitHit> {
        self.stats = SolveStats::default();

        if cnf.has_empty_clause() {
            return Ok(false);
        }

        let mut vars: BTreeSet<Variable> = cnf.variables().into_iter().collect();
        let mut clauses = cnf.clauses.clone();
        self.stats.peak_clauses = clauses.len();

        while let Some(var) = vars.pop_first() {
            budget.check(clauses.len())?;
            self.stats.rounds += 1;

            clauses = match self.eliminate(clauses, var, budget)? {
                Step::Contradiction => return Ok(false),
                Step::Clauses(clauses) => clauses,
            };
            self.stats.peak_clauses = self.stats.peak_clauses.max(clauses.len());

            if clauses.is_empty() {
                return Ok(true);
            }
        }

        Ok(true)
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}

/// Decides `cnf` by eliminating every variable without any limit.
#[must_use]
pub fn eliminate_all(cnf: &Cnf) -> bool {
    let mut solver = Dp::default();
    solver
        .solve(cnf, &Budget::unlimited())
        .unwrap_or_else(|_| unreachable!("an unlimited budget never trips"))
}
