#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::error::{Error, Result};
use core::fmt::{self, Display};
use core::num::NonZeroI32;
use core::ops::{Neg, Not};

/// 1-based variable index.
pub type Variable = u32;

/// A DIMACS literal: the magnitude is the variable, the sign is the polarity.
///
/// Backed by a `NonZeroI32`, so `0` can never be represented and
/// `Option<Literal>` costs nothing extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Builds a literal for `var` with the given polarity.
    ///
    /// # Panics
    ///
    /// If `var` is `0` or does not fit in an `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        let var = i32::try_from(var).expect("literal variable overflowed");
        let value = NonZeroI32::new(if polarity { var } else { -var })
            .expect("variable index must be nonzero");
        Self(value)
    }

    /// Converts a DIMACS integer, rejecting the clause terminator `0` and
    /// `i32::MIN`, whose negation does not fit.
    ///
    /// # Errors
    ///
    /// `Error::ZeroLiteral` when `value == 0`, `Error::LiteralOutOfRange`
    /// when `value == i32::MIN`.
    pub fn from_i32(value: i32) -> Result<Self> {
        if value == i32::MIN {
            return Err(Error::LiteralOutOfRange(value));
        }
        NonZeroI32::new(value).map(Self).ok_or(Error::ZeroLiteral)
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.get().unsigned_abs()
    }

    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.get() > 0
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self(-self.0)
    }

    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0.get()
    }
}

impl TryFrom<i32> for Literal {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::from_i32(value)
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.to_i32()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for &Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
