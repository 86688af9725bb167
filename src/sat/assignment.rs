use crate::sat::literal::{Literal, Variable};
use core::fmt::{self, Display};
use rustc_hash::FxHashSet;

/// Ordered trail of literals asserted true during DPLL search.
///
/// A hash set mirrors the trail so membership tests are O(1) and memory grows
/// with the literals asserted, whatever their variable indices. A literal and
/// its negation are never both present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    trail: Vec<Literal>,
    set: FxHashSet<Literal>,
}

impl Assignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Room for `capacity` assigned variables.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trail: Vec::with_capacity(capacity),
            set: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn is_true(&self, lit: Literal) -> bool {
        self.set.contains(&lit)
    }

    pub fn is_assigned(&self, var: Variable) -> bool {
        let pos = Literal::new(var, true);
        self.is_true(pos) || self.is_true(-pos)
    }

    /// Asserts `lit`. Returns `false` and leaves the trail untouched if its
    /// negation is already asserted.
    pub fn push(&mut self, lit: Literal) -> bool {
        if self.is_true(-lit) {
            return false;
        }
        if self.set.insert(lit) {
            self.trail.push(lit);
        }
        true
    }

    /// Undoes the most recent `push`.
    pub fn pop(&mut self) -> Option<Literal> {
        let lit = self.trail.pop()?;
        self.set.remove(&lit);
        Some(lit)
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.trail.iter()
    }

    pub fn as_slice(&self) -> &[Literal] {
        &self.trail
    }

    /// Snapshot of the trail as a model, sorted by variable.
    pub fn solutions(&self) -> Solutions {
        let mut lits = self.trail.clone();
        lits.sort_unstable_by_key(|l| l.variable());
        Solutions(lits)
    }
}

/// A (possibly partial) model. Variables not mentioned are "don't care".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions(Vec<Literal>);

impl Solutions {
    #[must_use]
    pub const fn new(lits: Vec<Literal>) -> Self {
        Self(lits)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    pub fn check(&self, lit: Literal) -> bool {
        self.0.contains(&lit)
    }

    pub fn as_slice(&self) -> &[Literal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v")?;
        for lit in &self.0 {
            write!(f, " {lit}")?;
        }
        write!(f, " 0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i32) -> Literal {
        Literal::from_i32(v).unwrap()
    }

    #[test]
    fn test_push_and_lookup() {
        let mut a = Assignment::new();
        assert!(a.push(lit(3)));
        assert!(a.is_true(lit(3)));
        assert!(!a.is_true(lit(-3)));
        assert!(a.is_assigned(3));
        assert!(!a.is_assigned(2));
    }

    #[test]
    fn test_conflicting_push_refused() {
        let mut a = Assignment::with_capacity(4);
        assert!(a.push(lit(-2)));
        assert!(!a.push(lit(2)));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_pop_restores_state() {
        let mut a = Assignment::new();
        a.push(lit(1));
        a.push(lit(-5));
        assert_eq!(a.pop(), Some(lit(-5)));
        assert!(!a.is_assigned(5));
        assert!(a.push(lit(5)));
        assert_eq!(a.as_slice(), &[lit(1), lit(5)]);
    }

    #[test]
    fn test_sparse_large_indices() {
        let mut a = Assignment::with_capacity(2);
        assert!(a.push(lit(2_000_000_000)));
        assert!(a.push(lit(-1_999_999_999)));
        assert!(a.is_true(lit(2_000_000_000)));
        assert!(!a.push(lit(1_999_999_999)));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_solutions_display() {
        let mut a = Assignment::new();
        a.push(lit(2));
        a.push(lit(-1));
        assert_eq!(a.solutions().to_string(), "v -1 2 0");
    }
}
