//! Structured selections over a finite domain.
//!
//! A [`Select`] is either [`SelectKind::Nominal`] (exactly one option when
//! active) or [`SelectKind::Multiple`] (any non-empty subset when active). Its
//! reserved range is laid out as
//!
//! ```text
//! [start]            activation bit, present only when optional
//! [start + opt + i]  bit of option i, in declaration order
//! ```
//!
//! where `opt` is 1 for optional selects and 0 otherwise.

use std::fmt::{Debug, Display, Formatter};

use log::{debug, trace};
use num_bigint::BigUint;

use crate::constraint::{Constraint, Relation, Scope};
use crate::error::{EncodingError, Result};
use crate::index::VariableIndex;
use crate::instance::Instance;
use crate::literal::Literal;
use crate::value::{OptionRef, VarId, VarRef, Value};
use crate::variable::{is_active, Decode, Variable};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SelectKind {
    /// Options are mutually exclusive.
    Nominal,
    /// Options are not mutually exclusive.
    Multiple,
}

/// One declared value of a [`Select`], usable directly in expressions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectOption<V> {
    this: OptionRef,
    value: V,
}

impl<V> SelectOption<V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Position in the owner's domain.
    pub fn index(&self) -> usize {
        self.this.index()
    }

    pub fn as_value(&self) -> Value {
        Value::Option(self.this)
    }

    /// Handle of the owning select.
    pub fn canonical_variable(&self) -> Value {
        Value::Variable(self.this.owner())
    }

    pub fn to_literal(&self, index: &VariableIndex) -> Literal {
        self.as_value().to_literal(index)
    }

    /// The option with the same value in `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` does not declare this option's value.
    pub fn rebase<'a>(&self, target: &'a Select<V>) -> &'a SelectOption<V>
    where
        V: PartialEq + Debug,
    {
        target.value(&self.value)
    }
}

/// Decoded value of a [`Select`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Selection<V> {
    One(V),
    Many(Vec<V>),
}

impl<V> Selection<V> {
    pub fn into_one(self) -> Option<V> {
        match self {
            Selection::One(v) => Some(v),
            Selection::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Vec<V> {
        match self {
            Selection::One(v) => vec![v],
            Selection::Many(vs) => vs,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Select<V> {
    name: String,
    kind: SelectKind,
    parent: Value,
    this: VarRef,
    options: Box<[SelectOption<V>]>,
}

impl<V> Select<V> {
    /// Creates a select over `values`, kept in the given order.
    ///
    /// Fails if `values` is empty or contains the same value twice.
    pub fn new(
        kind: SelectKind,
        id: VarId,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        V: PartialEq + Debug,
    {
        let name = name.into();
        let values: Vec<V> = values.into_iter().collect();
        if values.is_empty() {
            return Err(EncodingError::EmptyDomain { name });
        }
        for (i, v) in values.iter().enumerate() {
            if values[..i].contains(v) {
                return Err(EncodingError::DuplicateValue {
                    name,
                    value: format!("{:?}", v),
                });
            }
        }
        Ok(Self::from_values(kind, id, name, optional, parent, values))
    }

    pub fn nominal(
        id: VarId,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        V: PartialEq + Debug,
    {
        Self::new(SelectKind::Nominal, id, name, optional, parent, values)
    }

    pub fn multiple(
        id: VarId,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        V: PartialEq + Debug,
    {
        Self::new(SelectKind::Multiple, id, name, optional, parent, values)
    }

    fn from_values(kind: SelectKind, id: VarId, name: String, optional: bool, parent: Value, values: Vec<V>) -> Self {
        let this = VarRef::new(id, optional, parent);
        let options = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| SelectOption {
                this: OptionRef::new(this, i),
                value,
            })
            .collect();
        Self {
            name,
            kind,
            parent,
            this,
            options,
        }
    }

    pub fn kind(&self) -> SelectKind {
        self.kind
    }

    pub fn options(&self) -> &[SelectOption<V>] {
        &self.options
    }

    pub fn domain_size(&self) -> usize {
        self.options.len()
    }

    /// Looks up the option declaring `value`.
    pub fn try_value(&self, value: &V) -> Result<&SelectOption<V>>
    where
        V: PartialEq + Debug,
    {
        self.options.iter().find(|o| o.value == *value).ok_or_else(|| {
            let domain = self
                .options
                .iter()
                .map(|o| format!("{:?}", o.value))
                .collect::<Vec<_>>()
                .join(", ");
            EncodingError::ValueMissing {
                name: self.name.clone(),
                value: format!("{:?}", value),
                domain,
            }
        })
    }

    /// Looks up the option declaring `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the domain; the message lists the domain.
    pub fn value(&self, value: &V) -> &SelectOption<V>
    where
        V: PartialEq + Debug,
    {
        self.try_value(value).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Copy of this select with the same domain under a new identity and parent.
    pub fn rebase(&self, id: VarId, parent: Value) -> Self
    where
        V: Clone,
    {
        let values = self.options.iter().map(|o| o.value.clone()).collect();
        Self::from_values(self.kind, id, self.name.clone(), self.optional(), parent, values)
    }

    /// Number of distinct decoded results, absence included.
    pub fn outcomes(&self) -> BigUint {
        let n = self.options.len();
        let active = match self.kind {
            SelectKind::Nominal => BigUint::from(n),
            SelectKind::Multiple => (BigUint::from(1u32) << n) - 1u32,
        };
        active + self.optional() as u32
    }

    /// First bit of the option window relative to the range start.
    fn first_option(&self) -> usize {
        self.optional() as usize
    }
}

impl<V> Variable for Select<V> {
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
        self.this.optional()
    }

    fn nbr_values(&self) -> usize {
        self.options.len() + self.optional() as usize
    }

    fn implicit_constraints(&self, _scope: &Scope, index: &VariableIndex) -> Vec<Constraint> {
        let literals: Vec<Literal> = self.options.iter().map(|o| o.to_literal(index)).collect();
        let disjunction = Constraint::disjunction(literals.iter().copied());

        let reified = self.reified_value();
        let mut res = vec![if reified.anchor().is_root() {
            disjunction
        } else {
            Constraint::reified_equivalent(reified.to_literal(index), disjunction)
        }];
        match self.kind {
            SelectKind::Nominal => res.push(Constraint::cardinality(literals, 1, Relation::Le)),
            SelectKind::Multiple => {}
        }

        debug!("implicit_constraints({}) -> {} constraints", self, res.len());
        res
    }
}

impl<V: Clone> Decode for Select<V> {
    type Output = Selection<V>;

    fn value_of(
        &self,
        instance: &impl Instance,
        offset: usize,
        parent_literal: Option<Literal>,
    ) -> Option<Selection<V>> {
        if !is_active(instance, offset, parent_literal, self.optional()) {
            trace!("value_of({}) at {} -> inactive", self, offset);
            return None;
        }

        let start = offset + self.first_option();
        let end = start + self.options.len();
        let res = match self.kind {
            SelectKind::Nominal => match instance.first_set(start, end) {
                Some(i) => Selection::One(self.options[i].value.clone()),
                None => panic!("Inconsistent instance, should have something set for {}.", self),
            },
            SelectKind::Multiple => {
                let mut values = Vec::new();
                let mut i = 0;
                while i < self.options.len() {
                    let Some(rel) = instance.first_set(start + i, end) else {
                        break;
                    };
                    i += rel;
                    values.push(self.options[i].value.clone());
                    i += 1;
                }
                if values.is_empty() {
                    panic!("Inconsistent instance, should have something set for {}.", self);
                }
                Selection::Many(values)
            }
        };
        trace!("value_of({}) at {} -> active", self, offset);
        Some(res)
    }
}

impl<V> Display for Select<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SelectKind::Nominal => write!(f, "Nominal({})", self.name),
            SelectKind::Multiple => write!(f, "Multiple({})", self.name),
        }
    }
}
