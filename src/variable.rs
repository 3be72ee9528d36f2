//! The variable hierarchy: shared interface, [`Root`] and [`Flag`].
//!
//! Variables form a tree through their `parent` handles. Whether a subtree is
//! active is decided by the [reified value][Variable::reified_value] of a
//! variable: the variable itself when optional (it owns an activation bit),
//! otherwise its parent.

use std::fmt::{Display, Formatter};

use log::trace;
use num_bigint::BigUint;

use crate::constraint::{Constraint, Scope};
use crate::index::VariableIndex;
use crate::instance::Instance;
use crate::literal::Literal;
use crate::value::{VarId, VarRef, Value};

/// A decision variable of the model.
pub trait Variable {
    /// Diagnostic name. Not required to be unique.
    fn name(&self) -> &str;

    /// Handle used to refer to this variable in expressions.
    fn as_value(&self) -> Value;

    /// The value this variable is nested under.
    fn parent(&self) -> Value;

    /// Optional variables own an activation bit; mandatory ones are active
    /// whenever their parent is.
    fn optional(&self) -> bool;

    /// Number of bits reserved for this variable.
    fn nbr_values(&self) -> usize;

    /// Identity in the [`VariableIndex`], `None` for Root.
    fn id(&self) -> Option<VarId> {
        match self.as_value() {
            Value::Variable(var) => Some(var.id()),
            _ => None,
        }
    }

    /// The value that governs whether this variable is set.
    fn reified_value(&self) -> Value {
        if self.optional() {
            self.as_value()
        } else {
            self.parent()
        }
    }

    /// Literal of the activation bit, or of the parent for mandatory variables.
    fn to_literal(&self, index: &VariableIndex) -> Literal {
        self.as_value().to_literal(index)
    }

    /// Literal of the governing parent, `None` when the parent is always active.
    fn parent_literal(&self, index: &VariableIndex) -> Option<Literal> {
        let anchor = self.parent().anchor();
        if anchor.is_root() {
            None
        } else {
            Some(anchor.to_literal(index))
        }
    }

    /// Constraints that make the bit layout represent this variable faithfully.
    fn implicit_constraints(&self, _scope: &Scope, _index: &VariableIndex) -> Vec<Constraint> {
        Vec::new()
    }
}

/// Reconstruction of a typed value from a flat assignment.
pub trait Decode {
    type Output;

    /// Decodes the value stored at `offset`, or `None` if the variable is not
    /// chosen in this assignment.
    fn value_of(
        &self,
        instance: &impl Instance,
        offset: usize,
        parent_literal: Option<Literal>,
    ) -> Option<Self::Output>;
}

/// Shared activation test for decoding.
///
/// Inactive when the instance disagrees with the governing parent literal, or
/// when the variable is optional and its activation bit at `offset` is unset.
pub(crate) fn is_active(
    instance: &impl Instance,
    offset: usize,
    parent_literal: Option<Literal>,
    optional: bool,
) -> bool {
    if let Some(lit) = parent_literal {
        if instance.literal(lit.index()) != lit {
            return false;
        }
    }
    !optional || instance.is_set(offset)
}

/// Top of the variable hierarchy. Takes up no bits.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Root {
    name: String,
}

impl Root {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Handle used as the parent of top-level variables.
    pub fn as_value(&self) -> Value {
        Value::Root
    }

    pub fn rebase(&self, _parent: Value) -> Root {
        panic!("Root cannot be rebased.")
    }

    pub fn value(&self) -> Value {
        panic!("Root cannot be used as a value.")
    }
}

impl Variable for Root {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_value(&self) -> Value {
        Value::Root
    }

    fn parent(&self) -> Value {
        panic!("Root does not have a parent.")
    }

    fn optional(&self) -> bool {
        false
    }

    fn nbr_values(&self) -> usize {
        0
    }

    fn reified_value(&self) -> Value {
        Value::Root
    }

    fn parent_literal(&self, _index: &VariableIndex) -> Option<Literal> {
        None
    }
}

impl Decode for Root {
    type Output = ();

    fn value_of(&self, _instance: &impl Instance, _offset: usize, _parent_literal: Option<Literal>) -> Option<()> {
        Some(())
    }
}

impl Display for Root {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Root({})", self.name)
    }
}

/// A single bit carrying a fixed payload when set, and nothing otherwise.
///
/// Flags are always optional.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Flag<T> {
    name: String,
    payload: T,
    parent: Value,
    this: VarRef,
}

impl<T> Flag<T> {
    pub fn new(id: VarId, name: impl Into<String>, payload: T, parent: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            parent,
            this: VarRef::new(id, true, parent),
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Flags have no enumerable domain; looking up a value is a contract violation.
    pub fn value(&self, _value: &T) -> Value {
        panic!("Flag {} has no domain to look up values in.", self.name)
    }

    /// Copy of this flag under a new identity and parent.
    pub fn rebase(&self, id: VarId, parent: Value) -> Self
    where
        T: Clone,
    {
        Flag::new(id, self.name.clone(), self.payload.clone(), parent)
    }

    /// Number of distinct decoded results, absence included.
    pub fn outcomes(&self) -> BigUint {
        BigUint::from(2u32)
    }
}

impl<T> Variable for Flag<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_value(&self) -> Value {
        Value::Variable(self.this)
    }

    fn parent(&self) -> Value {
        self.parent
    }

    fn optional(&self) -> bool {
        true
    }

    fn nbr_values(&self) -> usize {
        1
    }
}

impl<T: Clone> Decode for Flag<T> {
    type Output = T;

    fn value_of(&self, instance: &impl Instance, offset: usize, parent_literal: Option<Literal>) -> Option<T> {
        let active = is_active(instance, offset, parent_literal, true);
        trace!("value_of({}) at {} -> {}", self, offset, active);
        active.then(|| self.payload.clone())
    }
}

impl<T> Display for Flag<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Flag({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::BitArray;

    use test_log::test;

    fn flag<T>(id: u32, payload: T, parent: Value) -> Flag<T> {
        Flag::new(VarId::new(id), format!("f{}", id), payload, parent)
    }

    #[test]
    fn test_flag_index() {
        let f = flag(0, true, Root::new("").as_value());
        let mut index = VariableIndex::new();
        index.register(&f).unwrap();
        assert_eq!(index.offset_of(VarId::new(0)), 0);
        assert_eq!(f.nbr_values(), 1);
        assert!(f.optional());
    }

    #[test]
    fn test_flag_value_of() {
        let f = flag(0, true, Value::Root);
        let mut instance = BitArray::new(1);
        assert_eq!(f.value_of(&instance, 0, None), None);
        instance.set(0, true);
        assert_eq!(f.value_of(&instance, 0, None), Some(true));
    }

    #[test]
    fn test_flag_value_of_ignores_other_bits() {
        let f = flag(0, "on", Value::Root);
        let instance = BitArray::from_bits(8, [0, 1, 2, 5, 7]);
        assert_eq!(f.value_of(&instance, 3, None), None);
        assert_eq!(f.value_of(&instance, 5, None), Some("on"));
    }

    #[test]
    fn test_flag_value_of_inactive_parent() {
        let f = flag(1, 42, Value::Root);
        let instance = BitArray::from_bits(2, [1]);
        assert_eq!(f.value_of(&instance, 1, Some(Literal::positive(0))), None);
        let instance = BitArray::from_bits(2, [0, 1]);
        assert_eq!(f.value_of(&instance, 1, Some(Literal::positive(0))), Some(42));
    }

    #[test]
    fn test_flag_to_literal() {
        let f = flag(0, 1, Value::Root);
        let mut index = VariableIndex::new();
        index.register(&f).unwrap();
        assert_eq!(f.to_literal(&index), Literal::from_dimacs(1));
    }

    #[test]
    fn test_flag_to_literal_after_other() {
        let g = flag(0, 1, Value::Root);
        let h = flag(1, 2, Value::Root);
        let f = flag(2, 3, Value::Root);
        let mut index = VariableIndex::new();
        index.register(&g).unwrap();
        index.register(&h).unwrap();
        index.register(&f).unwrap();
        assert_eq!(f.to_literal(&index), Literal::from_dimacs(3));
    }

    #[test]
    fn test_flag_reified_value_is_itself() {
        let f = flag(0, (), Value::Root);
        assert_eq!(f.reified_value(), f.as_value());
        let mut index = VariableIndex::new();
        index.register(&f).unwrap();
        assert_eq!(f.parent_literal(&index), None);
        assert!(f.implicit_constraints(&Scope::root(), &index).is_empty());
    }

    #[test]
    fn test_flag_parent_literal() {
        let p = flag(0, (), Value::Root);
        let f = flag(1, (), p.as_value());
        let mut index = VariableIndex::new();
        index.register(&p).unwrap();
        index.register(&f).unwrap();
        assert_eq!(f.parent_literal(&index), Some(Literal::positive(0)));
        assert_eq!(f.to_literal(&index), Literal::positive(1));
    }

    #[test]
    fn test_flag_rebase() {
        let p = flag(0, (), Value::Root);
        let f = flag(1, 'x', Value::Root);
        let g = f.rebase(VarId::new(2), p.as_value());
        assert_eq!(g.name(), f.name());
        assert_eq!(g.payload(), &'x');
        assert_eq!(g.parent(), p.as_value());
        assert_eq!(g.id(), Some(VarId::new(2)));
        assert_eq!(f.parent(), Value::Root);
    }

    #[test]
    fn test_flag_outcomes() {
        assert_eq!(flag(0, (), Value::Root).outcomes(), BigUint::from(2u32));
    }

    #[test]
    #[should_panic(expected = "has no domain")]
    fn test_flag_value_lookup_panics() {
        flag(0, true, Value::Root).value(&true);
    }

    #[test]
    fn test_root() {
        let root = Root::new("r");
        assert_eq!(root.nbr_values(), 0);
        assert!(!root.optional());
        assert_eq!(root.id(), None);
        assert_eq!(root.reified_value(), Value::Root);
        assert_eq!(root.value_of(&BitArray::new(0), 0, None), Some(()));
        assert_eq!(root.to_string(), "Root(r)");
    }

    #[test]
    fn test_root_as_value_is_inherent() {
        let root = Root::new("r");
        assert_eq!(Root::as_value(&root), Value::Root);
        assert_eq!(<Root as Variable>::as_value(&root), Root::as_value(&root));
    }

    #[test]
    #[should_panic(expected = "Root cannot be used in an expression")]
    fn test_root_to_literal_panics() {
        Root::new("").to_literal(&VariableIndex::new());
    }

    #[test]
    #[should_panic(expected = "Root cannot be rebased")]
    fn test_root_rebase_panics() {
        Root::new("").rebase(Value::Root);
    }

    #[test]
    #[should_panic(expected = "Root cannot be used as a value")]
    fn test_root_value_panics() {
        Root::new("").value();
    }

    #[test]
    #[should_panic(expected = "Root does not have a parent")]
    fn test_root_parent_panics() {
        Root::new("").parent();
    }
}
