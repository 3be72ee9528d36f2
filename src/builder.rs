//! Model assembly.
//!
//! A [`Builder`] is one model-construction session: it hands out variable
//! identities and default names, registers every variable it creates in its
//! [`VariableIndex`], and collects the constraints the encoding needs. Once
//! assembly is done, [`Builder::build`] freezes everything into a [`Model`]
//! that can be shared read-only with solving and decoding code.

use std::fmt::Debug;

use log::debug;

use crate::constraint::{Constraint, Scope};
use crate::error::Result;
use crate::index::VariableIndex;
use crate::instance::Instance;
use crate::literal::Literal;
use crate::select::{Select, SelectKind};
use crate::value::{VarId, Value};
use crate::variable::{Decode, Flag, Root, Variable};

#[derive(Debug)]
pub struct Builder {
    root: Root,
    counter: u32,
    index: VariableIndex,
    constraints: Vec<Constraint>,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: Root::new(name),
            counter: 0,
            index: VariableIndex::new(),
            constraints: Vec::new(),
        }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn index(&self) -> &VariableIndex {
        &self.index
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn next_id(&mut self) -> VarId {
        let id = VarId::new(self.counter);
        self.counter += 1;
        id
    }

    /// Synthesizes a fresh name, unique within this session.
    pub fn default_name(&mut self) -> String {
        format!("$x_{}", self.next_id().id())
    }

    fn name_or_default(&mut self, name: impl Into<String>) -> String {
        let name = name.into();
        if name.is_empty() {
            self.default_name()
        } else {
            name
        }
    }

    /// Adds a constraint not derived from any variable.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        debug!("add_constraint({})", constraint);
        self.constraints.push(constraint);
    }

    /// Registers a variable and records the constraints tying it into its scope.
    fn add<V: Variable>(&mut self, variable: &V) -> Result<()> {
        self.index.register(variable)?;

        let scope = Scope::new(variable.parent());
        self.constraints
            .extend(variable.implicit_constraints(&scope, &self.index));

        // An optional variable can only be set when its parent is.
        if variable.optional() {
            if let Some(parent) = variable.parent_literal(&self.index) {
                let own = variable.to_literal(&self.index);
                self.constraints.push(Constraint::disjunction([-own, parent]));
            }
        }
        Ok(())
    }

    /// Creates and registers a flag. An empty name is replaced by a default one.
    pub fn flag<T>(&mut self, name: impl Into<String>, payload: T, parent: Value) -> Result<Flag<T>> {
        let name = self.name_or_default(name);
        let flag = Flag::new(self.next_id(), name, payload, parent);
        self.add(&flag)?;
        Ok(flag)
    }

    pub fn select<V>(
        &mut self,
        kind: SelectKind,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Select<V>>
    where
        V: PartialEq + Debug,
    {
        let name = self.name_or_default(name);
        let select = Select::new(kind, self.next_id(), name, optional, parent, values)?;
        self.add(&select)?;
        Ok(select)
    }

    pub fn nominal<V>(
        &mut self,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Select<V>>
    where
        V: PartialEq + Debug,
    {
        self.select(SelectKind::Nominal, name, optional, parent, values)
    }

    pub fn multiple<V>(
        &mut self,
        name: impl Into<String>,
        optional: bool,
        parent: Value,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Select<V>>
    where
        V: PartialEq + Debug,
    {
        self.select(SelectKind::Multiple, name, optional, parent, values)
    }

    /// Registers a copy of `flag` bound to `parent`.
    pub fn rebase_flag<T: Clone>(&mut self, flag: &Flag<T>, parent: Value) -> Result<Flag<T>> {
        let rebased = flag.rebase(self.next_id(), parent);
        self.add(&rebased)?;
        Ok(rebased)
    }

    /// Registers a copy of `select` bound to `parent`.
    pub fn rebase_select<V: Clone>(&mut self, select: &Select<V>, parent: Value) -> Result<Select<V>> {
        let rebased = select.rebase(self.next_id(), parent);
        self.add(&rebased)?;
        Ok(rebased)
    }

    pub fn build(self) -> Model {
        debug!(
            "build({}) -> {} variables, {} bits, {} constraints",
            self.root,
            self.index.len(),
            self.index.nbr_bits(),
            self.constraints.len()
        );
        Model {
            root: self.root,
            index: self.index,
            constraints: self.constraints,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new("")
    }
}

/// A frozen model: bit layout plus the constraints over it.
#[derive(Debug, Clone)]
pub struct Model {
    root: Root,
    index: VariableIndex,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn index(&self) -> &VariableIndex {
        &self.index
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Width of the assignments this model expects.
    pub fn nbr_bits(&self) -> usize {
        self.index.nbr_bits()
    }

    /// Returns true if the instance satisfies every constraint of the model.
    pub fn is_satisfied(&self, instance: &impl Instance) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(instance))
    }

    /// Decodes the value of a registered variable.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is not registered in this model, or if the
    /// instance is narrower than the model.
    pub fn value_of<D>(&self, variable: &D, instance: &impl Instance) -> Option<D::Output>
    where
        D: Variable + Decode,
    {
        assert!(
            instance.len() >= self.nbr_bits(),
            "Instance of {} bits is narrower than the model's {} bits",
            instance.len(),
            self.nbr_bits()
        );
        let offset = match variable.id() {
            Some(id) => self.index.offset_of(id),
            None => 0,
        };
        let parent_literal: Option<Literal> = variable.parent_literal(&self.index);
        variable.value_of(instance, offset, parent_literal)
    }
}
