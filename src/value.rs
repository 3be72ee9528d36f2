//! Handles for anything a literal can refer to.
//!
//! A [`Value`] is a small `Copy` handle: the Root sentinel, a variable, or a
//! single option of a [`Select`][crate::select::Select]. Handles never own the
//! node they describe; options refer to their owner by [`VarId`].
//!
//! Each handle knows its [`Anchor`], the bit its literal resolves to. An
//! optional variable anchors at its own activation bit, an option at its
//! option bit, and a mandatory variable inherits the anchor of its parent.
//! Resolving anchors once at construction is what makes reification
//! transitive through arbitrarily deep mandatory chains.
//!
//! Handles cannot be rebased: moving a node under another parent needs the
//! node itself. [`Flag::rebase`][crate::variable::Flag::rebase] and
//! [`Select::rebase`][crate::select::Select::rebase] take a fresh [`VarId`]
//! and the new parent and return a new node. An option is rebased by looking
//! its value up in the rebased select with
//! [`SelectOption::rebase`][crate::select::SelectOption::rebase]. Root cannot
//! be rebased at all.

use std::fmt::{Display, Formatter};

use crate::index::VariableIndex;
use crate::literal::Literal;

/// Identity of a registered variable, unique within one build session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarId(u32);

impl VarId {
    pub const fn new(id: u32) -> Self {
        VarId(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The bit a literal resolves to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Anchor {
    /// Always active; has no bit of its own.
    Root,
    /// Bit `position` of the range reserved for `owner`.
    Bit { owner: VarId, position: usize },
}

impl Anchor {
    pub fn is_root(self) -> bool {
        matches!(self, Anchor::Root)
    }

    /// Resolves the anchor to a positive literal.
    ///
    /// # Panics
    ///
    /// Panics if the anchor is [`Anchor::Root`] or the owner is not registered.
    pub fn to_literal(self, index: &VariableIndex) -> Literal {
        match self {
            Anchor::Root => panic!(
                "Root cannot be used in an expression. \
                 This is likely caused by using a mandatory variable defined in the root scope in an expression."
            ),
            Anchor::Bit { owner, position } => Literal::positive(index.offset_of(owner) + position),
        }
    }
}

/// Handle to a variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VarRef {
    id: VarId,
    optional: bool,
    anchor: Anchor,
}

impl VarRef {
    /// Creates the handle of a variable with the given parent.
    pub fn new(id: VarId, optional: bool, parent: Value) -> Self {
        let anchor = if optional {
            Anchor::Bit { owner: id, position: 0 }
        } else {
            parent.anchor()
        };
        Self { id, optional, anchor }
    }

    pub fn id(self) -> VarId {
        self.id
    }

    pub fn optional(self) -> bool {
        self.optional
    }
}

/// Handle to one option of a Select.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct OptionRef {
    owner: VarRef,
    index: usize,
}

impl OptionRef {
    pub fn new(owner: VarRef, index: usize) -> Self {
        Self { owner, index }
    }

    pub fn owner(self) -> VarRef {
        self.owner
    }

    /// Position of the option within its owner's domain.
    pub fn index(self) -> usize {
        self.index
    }

    /// Position of the option bit within its owner's reserved range.
    pub fn position(self) -> usize {
        self.index + self.owner.optional as usize
    }
}

/// Anything referenceable by a literal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Value {
    Root,
    Variable(VarRef),
    Option(OptionRef),
}

impl Value {
    pub fn is_root(self) -> bool {
        matches!(self, Value::Root)
    }

    pub fn anchor(self) -> Anchor {
        match self {
            Value::Root => Anchor::Root,
            Value::Variable(var) => var.anchor,
            Value::Option(option) => Anchor::Bit {
                owner: option.owner.id,
                position: option.position(),
            },
        }
    }

    /// The variable this value belongs to: itself, or the owner of an option.
    pub fn canonical_variable(self) -> Value {
        match self {
            Value::Option(option) => Value::Variable(option.owner),
            other => other,
        }
    }

    /// Returns the positive literal of this value.
    ///
    /// # Panics
    ///
    /// Panics if the value is Root, or a mandatory variable whose chain of
    /// parents ends at Root without passing an optional variable.
    pub fn to_literal(self, index: &VariableIndex) -> Literal {
        self.anchor().to_literal(index)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Root => write!(f, "Root"),
            Value::Variable(var) => write!(f, "{}", var.id),
            Value::Option(option) => write!(f, "{}[{}]", option.owner.id, option.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_anchors_at_itself() {
        let var = VarRef::new(VarId::new(3), true, Value::Root);
        assert_eq!(
            Value::Variable(var).anchor(),
            Anchor::Bit {
                owner: VarId::new(3),
                position: 0
            }
        );
    }

    #[test]
    fn test_mandatory_inherits_anchor() {
        let top = VarRef::new(VarId::new(0), false, Value::Root);
        assert!(Value::Variable(top).anchor().is_root());

        let optional = VarRef::new(VarId::new(1), true, Value::Variable(top));
        let middle = VarRef::new(VarId::new(2), false, Value::Variable(optional));
        let leaf = VarRef::new(VarId::new(3), false, Value::Variable(middle));
        assert_eq!(Value::Variable(leaf).anchor(), Value::Variable(optional).anchor());
    }

    #[test]
    fn test_option_position() {
        let mandatory = VarRef::new(VarId::new(0), false, Value::Root);
        let optional = VarRef::new(VarId::new(1), true, Value::Root);
        assert_eq!(OptionRef::new(mandatory, 2).position(), 2);
        assert_eq!(OptionRef::new(optional, 2).position(), 3);
    }

    #[test]
    fn test_mandatory_under_option_anchors_at_option() {
        let owner = VarRef::new(VarId::new(0), true, Value::Root);
        let option = Value::Option(OptionRef::new(owner, 1));
        let child = VarRef::new(VarId::new(1), false, option);
        assert_eq!(
            Value::Variable(child).anchor(),
            Anchor::Bit {
                owner: VarId::new(0),
                position: 2
            }
        );
    }

    #[test]
    fn test_canonical_variable() {
        let owner = VarRef::new(VarId::new(0), false, Value::Root);
        let option = Value::Option(OptionRef::new(owner, 1));
        assert_eq!(option.canonical_variable(), Value::Variable(owner));
        assert_eq!(Value::Variable(owner).canonical_variable(), Value::Variable(owner));
        assert_eq!(Value::Root.canonical_variable(), Value::Root);
    }

    #[test]
    #[should_panic(expected = "Root cannot be used in an expression")]
    fn test_root_literal_panics() {
        Value::Root.to_literal(&VariableIndex::new());
    }
}
