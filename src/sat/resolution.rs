//! Saturation of a clause set under the resolution rule.
//!
//! Each round resolves every unordered pair of distinct clauses in the working
//! set over every clashing literal. The procedure stops with UNSAT as soon as
//! the empty clause is derived and with SAT once a round produces nothing new.
//! Resolvents are kept verbatim: no subsumption, no tautology filtering.
//!
//! Pair enumeration order only affects running time, never the verdict, since
//! the resolution closure of a clause set is unique.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::solver::{Budget, LimitHit, SolveStats, Solver};
use itertools::{Either, Itertools};
use rustc_hash::FxHashSet;

/// Order in which clause pairs are visited within one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairOrder {
    /// Lexicographic over insertion order.
    #[default]
    Sequential,
    /// Pairs shuffled each round with a generator seeded once per solve.
    Shuffled { seed: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    order: PairOrder,
    stats: SolveStats,
}

impl Resolution {
    #[must_use]
    pub fn new(order: PairOrder) -> Self {
        Self {
            order,
            stats: SolveStats::default(),
        }
    }
}

/// Pairs `(i, j)`, `i < j`, over `0..n`. Only a shuffled order materialises
/// the list; the sequential order is generated lazily.
fn pairs(
    order: PairOrder,
    n: usize,
    rng: &mut fastrand::Rng,
) -> impl Iterator<Item = (usize, usize)> + use<> {
    match order {
        PairOrder::Sequential => Either::Left((0..n).tuple_combinations()),
        PairOrder::Shuffled { .. } => {
            let mut all = (0..n).tuple_combinations().collect_vec();
            rng.shuffle(&mut all);
            Either::Right(all.into_iter())
        }
    }
}

impl Solver for Resolution {
    fn name(&self) -> &'static str {
        "Resolution"
    }

    fn solve(&mut self, cnf: &Cnf, budget: &Budget) -> Result<bool, LimitHit> {
        self.stats = SolveStats::default();

        let mut rng = match self.order {
            PairOrder::Shuffled { seed } => fastrand::Rng::with_seed(seed),
            PairOrder::Sequential => fastrand::Rng::with_seed(0),
        };

        // Insertion-ordered working set; `seen` mirrors it for membership tests.
        let mut clauses: Vec<Clause> = Vec::with_capacity(cnf.len());
        let mut seen: FxHashSet<Clause> = FxHashSet::default();
        for clause in cnf.iter() {
            if seen.insert(clause.clone()) {
                clauses.push(clause.clone());
            }
        }

        if seen.iter().any(Clause::is_empty) {
            return Ok(false);
        }

        loop {
            self.stats.rounds += 1;
            self.stats.peak_clauses = self.stats.peak_clauses.max(clauses.len());
            budget.check(clauses.len())?;

            let mut new: FxHashSet<Clause> = FxHashSet::default();
            for (i, j) in pairs(self.order, clauses.len(), &mut rng) {
                for resolvent in clauses[i].resolvents(&clauses[j]) {
                    self.stats.resolvents += 1;
                    if resolvent.is_empty() {
                        return Ok(false);
                    }
                    new.insert(resolvent);
                }
                budget.check(clauses.len() + new.len())?;
            }

            let fresh = new
                .into_iter()
                .filter(|c| !seen.contains(c))
                .sorted_unstable()
                .collect_vec();

            if fresh.is_empty() {
                return Ok(true);
            }

            for clause in fresh {
                seen.insert(clause.clone());
                clauses.push(clause);
            }
        }
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}

/// Decides `cnf` by resolution saturation without any limit.
#[must_use]
pub fn resolve_all(cnf: &Cnf) -> bool {
    let mut solver = Resolution::default();
    solver
        .solve(cnf, &Budget::unlimited())
        .unwrap_or_else(|_| unreachable!("an unlimited budget never trips"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_orders_cover_the_same_pairs() {
        let mut rng = fastrand::Rng::with_seed(4);
        let sequential = pairs(PairOrder::Sequential, 5, &mut rng).collect_vec();
        assert_eq!(sequential.len(), 10);
        assert_eq!(sequential[0], (0, 1));
        assert_eq!(sequential[9], (3, 4));

        let shuffled = pairs(PairOrder::Shuffled { seed: 4 }, 5, &mut rng)
            .sorted()
            .collect_vec();
        assert_eq!(shuffled, sequential);
        assert_eq!(pairs(PairOrder::Sequential, 1, &mut rng).count(), 0);
    }
    use crate::sat::solver::Limits;

    fn cnf(clauses: &[&[i32]]) -> Cnf {
        Cnf::from_dimacs(clauses).unwrap()
    }

    #[test]
    fn test_empty_formula_is_sat() {
        assert!(resolve_all(&Cnf::default()));
    }

    #[test]
    fn test_contradiction() {
        assert!(!resolve_all(&cnf(&[&[1], &[-1]])));
    }

    #[test]
    fn test_trivial_sat() {
        assert!(resolve_all(&cnf(&[&[1, 2]])));
    }

    #[test]
    fn test_empty_clause_in_input_is_unsat() {
        assert!(!resolve_all(&cnf(&[&[1, 2], &[]])));
    }

    #[test]
    fn test_needs_several_rounds() {
        // All four sign combinations over two variables.
        let f = cnf(&[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]]);
        assert!(!resolve_all(&f));
    }

    #[test]
    fn test_satisfiable_chain() {
        let f = cnf(&[&[1, 2], &[-1, 3], &[-3, 4], &[-2, -4, 5]]);
        assert!(resolve_all(&f));
    }

    #[test]
    fn test_shuffled_order_same_verdict() {
        let f = cnf(&[&[1, 2, 3], &[-1, 2], &[-2, 3], &[-3, 1], &[-1, -2, -3]]);
        let baseline = resolve_all(&f);
        for seed in 0..8 {
            let mut solver = Resolution::new(PairOrder::Shuffled { seed });
            assert_eq!(solver.solve(&f, &Budget::unlimited()), Ok(baseline));
        }
    }

    #[test]
    fn test_clause_cap_reports_limit() {
        let f = cnf(&[&[1, 2, 3], &[-1, 2, 4], &[-2, 3, -4], &[-3, 1, 4], &[-1, -3, -4]]);
        let budget = Limits {
            timeout: None,
            max_clauses: Some(3),
        }
        .start();
        let mut solver = Resolution::default();
        assert!(matches!(
            solver.solve(&f, &budget),
            Err(LimitHit::Clauses { .. })
        ));
    }

    #[test]
    fn test_stats_recorded() {
        let mut solver = Resolution::default();
        solver
            .solve(&cnf(&[&[1, 2], &[-1, 2]]), &Budget::unlimited())
            .unwrap();
        let stats = solver.stats();
        assert!(stats.resolvents >= 1);
        assert!(stats.rounds >= 1);
        assert!(stats.peak_clauses >= 2);
    }
}
