#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The formula type shared by every solver.
//!
//! A `Cnf` is an ordered list of clauses. It is built once from external
//! input and never mutated by the solvers: each of them borrows it and works
//! on a private copy of the clause set.

use crate::error::Result;
use crate::sat::assignment::Solutions;
use crate::sat::clause::Clause;
use crate::sat::literal::Variable;
use core::fmt::{self, Display};
use core::ops::Index;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    pub clauses: Vec<Clause>,
    /// Largest variable index appearing in any clause.
    pub num_vars: usize,
}

impl Cnf {
    pub fn new<I: IntoIterator<Item = Clause>>(clauses: I) -> Self {
        let clauses = clauses.into_iter().collect_vec();
        let num_vars = clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|l| l.variable() as usize)
            .max()
            .unwrap_or(0);
        Self { clauses, num_vars }
    }

    /// Builds a formula from DIMACS clause vectors (terminators already stripped).
    ///
    /// # Errors
    ///
    /// `Error::ZeroLiteral` if a `0` appears inside a clause.
    pub fn from_dimacs<C: AsRef<[i32]>>(clauses: &[C]) -> Result<Self> {
        let clauses = clauses
            .iter()
            .map(|c| Clause::from_dimacs(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(clauses))
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Distinct variables that actually occur, in ascending order.
    pub fn variables(&self) -> Vec<Variable> {
        self.iter()
            .flat_map(Clause::variables)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.iter().any(Clause::is_empty)
    }

    /// Clause-to-variable ratio over the variables that occur.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        let vars = self.variables().len();
        if vars == 0 {
            0.0
        } else {
            self.len() as f64 / vars as f64
        }
    }

    /// True iff every clause has a literal made true by `solutions`.
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.iter()
            .all(|clause| clause.is_satisfied_by(solutions.as_slice()))
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl From<Vec<Clause>> for Cnf {
    fn from(clauses: Vec<Clause>) -> Self {
        Self::new(clauses)
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    #[test]
    fn test_variables_inferred_from_literals() {
        let cnf = Cnf::from_dimacs(&[vec![1, -4], vec![4, 2]]).unwrap();
        assert_eq!(cnf.num_vars, 4);
        assert_eq!(cnf.variables(), vec![1, 2, 4]);
        assert!((cnf.ratio() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_formula() {
        let cnf = Cnf::default();
        assert!(cnf.is_empty());
        assert_eq!(cnf.num_vars, 0);
        assert!(cnf.variables().is_empty());
        assert!(cnf.ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_clause_detected() {
        let cnf = Cnf::from_dimacs(&[vec![1], vec![]]).unwrap();
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_zero_literal_rejected() {
        assert!(Cnf::from_dimacs(&[vec![1, 0]]).is_err());
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::from_dimacs(&[vec![1, 2], vec![-1, 3]]).unwrap();
        let good = Solutions::new(vec![Literal::new(1, true), Literal::new(3, true)]);
        let bad = Solutions::new(vec![Literal::new(1, true), Literal::new(3, false)]);
        assert!(cnf.verify(&good));
        assert!(!cnf.verify(&bad));
    }

    #[test]
    fn test_display_is_dimacs() {
        let cnf = Cnf::from_dimacs(&[vec![1, -2], vec![2]]).unwrap();
        assert_eq!(cnf.to_string(), "p cnf 2 2\n-2 1 0\n2 0\n");
    }
}
