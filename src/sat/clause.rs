use crate::error::Result;
use crate::sat::assignment::Assignment;
use crate::sat::literal::{Literal, Variable};
use core::fmt::{self, Display};
use core::ops::Index;
use itertools::Itertools;
use smallvec::SmallVec;

/// Inline capacity; random 3-CNF clauses and most of their resolvents fit.
const INLINE: usize = 8;

/// A disjunction of literals with set semantics.
///
/// Literals are kept sorted and deduplicated so that two clauses over the same
/// literal set are equal and hash alike. Tautologies are not filtered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; INLINE]>,
}

/// Outcome of simplifying a clause under a partial assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simplified {
    /// Some literal is already true; the clause can be dropped.
    Satisfied,
    /// The literals that are not yet falsified. Empty means the clause is false.
    Reduced(Clause),
}

impl Clause {
    pub fn new<I: IntoIterator<Item = Literal>>(literals: I) -> Self {
        let mut literals: SmallVec<[Literal; INLINE]> = literals.into_iter().collect();
        literals.sort_unstable();
        literals.dedup();
        Self { literals }
    }

    /// Builds a clause from DIMACS integers.
    ///
    /// # Errors
    ///
    /// `Error::ZeroLiteral` if any value is `0`.
    pub fn from_dimacs(values: &[i32]) -> Result<Self> {
        let literals = values
            .iter()
            .map(|&v| Literal::from_i32(v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(literals))
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.binary_search(&lit).is_ok()
    }

    /// True if the clause holds some literal and its negation.
    pub fn is_tautology(&self) -> bool {
        self.iter().any(|&lit| lit.is_negated() && self.contains(-lit))
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.iter().map(|lit| lit.variable()).unique()
    }

    /// Drops the clause if a literal is true, otherwise removes falsified literals.
    pub fn simplify(&self, assignment: &Assignment) -> Simplified {
        let mut kept = SmallVec::<[Literal; INLINE]>::new();
        for &lit in &self.literals {
            if assignment.is_true(lit) {
                return Simplified::Satisfied;
            }
            if !assignment.is_true(-lit) {
                kept.push(lit);
            }
        }
        Simplified::Reduced(Self { literals: kept })
    }

    /// Resolvent of `self` and `other` over `var`.
    ///
    /// Returns `None` unless `var` occurs positively in one clause and
    /// negatively in the other. An empty resolvent is a contradiction.
    pub fn resolve(&self, other: &Self, var: Variable) -> Option<Self> {
        let pos = Literal::new(var, true);
        let neg = -pos;
        if self.contains(pos) && other.contains(neg) {
            Some(self.union_without(other, pos))
        } else if self.contains(neg) && other.contains(pos) {
            Some(self.union_without(other, neg))
        } else {
            None
        }
    }

    /// Every resolvent of the two clauses, one per clashing literal pair.
    pub fn resolvents(&self, other: &Self) -> Vec<Self> {
        self.iter()
            .filter(|&&lit| other.contains(-lit))
            .map(|&lit| self.union_without(other, lit))
            .collect()
    }

    /// `(self - {pivot}) ∪ (other - {-pivot})`
    fn union_without(&self, other: &Self, pivot: Literal) -> Self {
        Self::new(
            self.iter()
                .copied()
                .filter(|&l| l != pivot)
                .merge(other.iter().copied().filter(|&l| l != -pivot)),
        )
    }

    /// True if some literal of the clause is set to true by `model`.
    pub fn is_satisfied_by(&self, model: &[Literal]) -> bool {
        self.iter().any(|lit| model.contains(lit))
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}

impl From<&Clause> for Vec<i32> {
    fn from(clause: &Clause) -> Self {
        clause.iter().map(|l| l.to_i32()).collect()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.literals {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}
