//! Signed literals over a flat bit space.
//!
//! A literal packs a zero-based bit index and a polarity into one nonzero
//! `i32`: bit `ix` with positive polarity is `ix + 1`, with negative polarity
//! `-(ix + 1)`. This is the same 1-based convention DIMACS uses, so literals
//! can be handed to an external solver as-is.

use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::instance::Instance;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal(i32);

impl Literal {
    /// Creates the literal for bit `index` with the given polarity.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit into the positive range of `i32`.
    pub fn new(index: usize, polarity: bool) -> Self {
        assert!(
            index < i32::MAX as usize,
            "Bit index {} is out of the literal range",
            index
        );
        let value = index as i32 + 1;
        if polarity {
            Self(value)
        } else {
            Self(-value)
        }
    }

    pub fn positive(index: usize) -> Self {
        Self::new(index, true)
    }

    pub fn negative(index: usize) -> Self {
        Self::new(index, false)
    }

    /// Creates a literal from its signed integer form.
    ///
    /// # Panics
    ///
    /// Panics if `value == 0`.
    pub fn from_dimacs(value: i32) -> Self {
        assert_ne!(value, 0, "Literal must be nonzero");
        Self(value)
    }

    /// Return the signed integer form of the literal.
    pub const fn to_dimacs(self) -> i32 {
        self.0
    }

    /// Return the zero-based bit index of the literal.
    pub const fn index(self) -> usize {
        self.0.unsigned_abs() as usize - 1
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Returns true if the instance agrees with this literal.
    pub fn eval(self, instance: &impl Instance) -> bool {
        instance.is_set(self.index()) == self.is_positive()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}",
            if self.is_negative() { "~" } else { "" },
            self.index()
        )
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::BitArray;

    #[test]
    fn test_index_and_polarity() {
        let pos = Literal::new(0, true);
        let neg = Literal::new(0, false);
        assert_eq!(pos.to_dimacs(), 1);
        assert_eq!(neg.to_dimacs(), -1);
        assert_eq!(pos.index(), 0);
        assert_eq!(neg.index(), 0);
        assert!(pos.is_positive());
        assert!(neg.is_negative());

        let lit = Literal::positive(41);
        assert_eq!(lit.to_dimacs(), 42);
        assert_eq!(lit.index(), 41);
        assert_eq!(Literal::negative(41).to_dimacs(), -42);
    }

    #[test]
    fn test_index_roundtrip() {
        for ix in [0, 1, 7, 63, 64, 1000] {
            assert_eq!(Literal::positive(ix).index(), ix);
            assert_eq!(Literal::negative(ix).index(), ix);
        }
    }

    #[test]
    fn test_negation() {
        let lit = Literal::positive(3);
        assert_eq!(-lit, Literal::negative(3));
        assert_eq!(-(-lit), lit);
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::positive(2).to_string(), "x2");
        assert_eq!(Literal::negative(2).to_string(), "~x2");
    }

    #[test]
    #[should_panic(expected = "Literal must be nonzero")]
    fn test_zero_panics() {
        Literal::from_dimacs(0);
    }

    #[test]
    fn test_eval() {
        let instance = BitArray::from_bits(4, [1]);
        assert!(Literal::positive(1).eval(&instance));
        assert!(!Literal::negative(1).eval(&instance));
        assert!(!Literal::positive(0).eval(&instance));
        assert!(Literal::negative(0).eval(&instance));
    }
}
