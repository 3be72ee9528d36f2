//! Declarative constraint descriptors.
//!
//! These are what the encoding hands to a solving backend. They are not
//! expanded into clauses here; [`Constraint::is_satisfied`] only evaluates a
//! descriptor against a complete assignment.

use std::fmt::{Display, Formatter};

use crate::instance::Instance;
use crate::literal::Literal;
use crate::value::Value;

/// Comparison used by [`Constraint::Cardinality`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Relation {
    Le,
}

impl Relation {
    /// Returns true if `count <relation> bound` holds.
    pub fn holds(self, count: usize, bound: usize) -> bool {
        match self {
            Relation::Le => count <= bound,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Constraint {
    /// At least one literal is true.
    Disjunction(Vec<Literal>),
    /// The number of true literals satisfies `relation` against `bound`.
    Cardinality {
        literals: Vec<Literal>,
        bound: usize,
        relation: Relation,
    },
    /// `literal` is true iff `constraint` is satisfied.
    ReifiedEquivalent {
        literal: Literal,
        constraint: Box<Constraint>,
    },
}

impl Constraint {
    pub fn disjunction(literals: impl IntoIterator<Item = Literal>) -> Self {
        Constraint::Disjunction(literals.into_iter().collect())
    }

    pub fn cardinality(literals: impl IntoIterator<Item = Literal>, bound: usize, relation: Relation) -> Self {
        Constraint::Cardinality {
            literals: literals.into_iter().collect(),
            bound,
            relation,
        }
    }

    pub fn reified_equivalent(literal: Literal, constraint: Constraint) -> Self {
        Constraint::ReifiedEquivalent {
            literal,
            constraint: Box::new(constraint),
        }
    }

    /// All literals mentioned by the constraint, including nested ones.
    pub fn literals(&self) -> Vec<Literal> {
        match self {
            Constraint::Disjunction(literals) => literals.clone(),
            Constraint::Cardinality { literals, .. } => literals.clone(),
            Constraint::ReifiedEquivalent { literal, constraint } => {
                let mut res = vec![*literal];
                res.extend(constraint.literals());
                res
            }
        }
    }

    /// Evaluates the constraint under a complete assignment.
    pub fn is_satisfied(&self, instance: &impl Instance) -> bool {
        match self {
            Constraint::Disjunction(literals) => literals.iter().any(|lit| lit.eval(instance)),
            Constraint::Cardinality {
                literals,
                bound,
                relation,
            } => {
                let count = literals.iter().filter(|lit| lit.eval(instance)).count();
                relation.holds(count, *bound)
            }
            Constraint::ReifiedEquivalent { literal, constraint } => {
                literal.eval(instance) == constraint.is_satisfied(instance)
            }
        }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn join(literals: &[Literal]) -> String {
            literals.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(", ")
        }

        match self {
            Constraint::Disjunction(literals) => write!(f, "Disjunction({})", join(literals)),
            Constraint::Cardinality {
                literals,
                bound,
                relation,
            } => write!(f, "Cardinality({}) {} {}", join(literals), relation, bound),
            Constraint::ReifiedEquivalent { literal, constraint } => {
                write!(f, "{} <=> {}", literal, constraint)
            }
        }
    }
}

/// Context in which implicit constraints are generated.
///
/// Carries the value governing the scope. Constraint generation currently
/// does not inspect it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Scope {
    reified_value: Value,
}

impl Scope {
    pub fn new(reified_value: Value) -> Self {
        Self { reified_value }
    }

    pub fn root() -> Self {
        Self::new(Value::Root)
    }

    pub fn reified_value(&self) -> Value {
        self.reified_value
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::BitArray;

    fn lits(ixs: &[usize]) -> Vec<Literal> {
        ixs.iter().map(|&ix| Literal::positive(ix)).collect()
    }

    #[test]
    fn test_relation() {
        assert!(Relation::Le.holds(1, 1));
        assert!(Relation::Le.holds(0, 1));
        assert!(!Relation::Le.holds(2, 1));
    }

    #[test]
    fn test_disjunction() {
        let c = Constraint::disjunction(lits(&[0, 1, 2]));
        assert!(!c.is_satisfied(&BitArray::new(3)));
        assert!(c.is_satisfied(&BitArray::from_bits(3, [2])));

        let implication = Constraint::disjunction([Literal::negative(0), Literal::positive(1)]);
        assert!(implication.is_satisfied(&BitArray::new(2)));
        assert!(!implication.is_satisfied(&BitArray::from_bits(2, [0])));
        assert!(implication.is_satisfied(&BitArray::from_bits(2, [0, 1])));
    }

    #[test]
    fn test_cardinality() {
        let c = Constraint::cardinality(lits(&[0, 1, 2]), 1, Relation::Le);
        assert!(c.is_satisfied(&BitArray::new(3)));
        assert!(c.is_satisfied(&BitArray::from_bits(3, [1])));
        assert!(!c.is_satisfied(&BitArray::from_bits(3, [0, 2])));
    }

    #[test]
    fn test_reified_equivalent() {
        let c = Constraint::reified_equivalent(Literal::positive(0), Constraint::disjunction(lits(&[1, 2])));
        assert!(c.is_satisfied(&BitArray::new(3)));
        assert!(c.is_satisfied(&BitArray::from_bits(3, [0, 2])));
        assert!(!c.is_satisfied(&BitArray::from_bits(3, [0])));
        assert!(!c.is_satisfied(&BitArray::from_bits(3, [1])));
    }

    #[test]
    fn test_literals_and_display() {
        let c = Constraint::reified_equivalent(Literal::positive(0), Constraint::disjunction(lits(&[1, 2])));
        assert_eq!(c.literals(), lits(&[0, 1, 2]));
        assert_eq!(c.to_string(), "x0 <=> Disjunction(x1, x2)");
        let card = Constraint::cardinality(lits(&[1, 2]), 1, Relation::Le);
        assert_eq!(card.to_string(), "Cardinality(x1, x2) <= 1");
    }
}
