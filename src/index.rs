//! Append-only allocator of bit ranges.
//!
//! Every registered variable reserves a contiguous, half-open range of bit
//! positions sized by its [`nbr_values`][crate::variable::Variable::nbr_values].
//! Ranges are handed out in registration order and never overlap, so together
//! they partition `[0, nbr_bits)` without gaps.

use std::collections::HashMap;
use std::ops::Range;

use log::debug;

use crate::error::{EncodingError, Result};
use crate::value::VarId;
use crate::variable::Variable;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Entry {
    id: VarId,
    start: usize,
    len: usize,
}

impl Entry {
    fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

#[derive(Debug, Default, Clone)]
pub struct VariableIndex {
    entries: Vec<Entry>,
    positions: HashMap<VarId, usize>,
    nbr_bits: usize,
}

impl VariableIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next range of bits for `variable` and returns it.
    ///
    /// Registering Root reserves nothing and returns an empty range at the
    /// current end of the bit space. Registering the same variable twice is
    /// rejected.
    pub fn register<V>(&mut self, variable: &V) -> Result<Range<usize>>
    where
        V: Variable + ?Sized,
    {
        let Some(id) = variable.id() else {
            return Ok(self.nbr_bits..self.nbr_bits);
        };
        if self.positions.contains_key(&id) {
            return Err(EncodingError::AlreadyRegistered { id });
        }

        let entry = Entry {
            id,
            start: self.nbr_bits,
            len: variable.nbr_values(),
        };
        debug!(
            "register({} '{}') -> [{}, {})",
            id,
            variable.name(),
            entry.start,
            entry.start + entry.len
        );
        self.positions.insert(id, self.entries.len());
        self.entries.push(entry);
        self.nbr_bits += entry.len;
        Ok(entry.range())
    }

    fn entry(&self, id: VarId) -> Result<&Entry> {
        self.positions
            .get(&id)
            .map(|&pos| &self.entries[pos])
            .ok_or(EncodingError::NotRegistered { id })
    }

    /// Returns the start of the range reserved for `id`.
    pub fn try_offset_of(&self, id: VarId) -> Result<usize> {
        self.entry(id).map(|e| e.start)
    }

    /// Returns the start of the range reserved for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn offset_of(&self, id: VarId) -> usize {
        self.try_offset_of(id).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn range_of(&self, id: VarId) -> Result<Range<usize>> {
        self.entry(id).map(Entry::range)
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Total number of bits reserved so far.
    pub fn nbr_bits(&self) -> usize {
        self.nbr_bits
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the reserved ranges in registration order.
    pub fn ranges(&self) -> impl Iterator<Item = (VarId, Range<usize>)> + '_ {
        self.entries.iter().map(|e| (e.id, e.range()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::variable::{Flag, Root};

    use test_log::test;

    #[test]
    fn test_sequential_ranges() {
        let root = Root::new("");
        let f = Flag::new(VarId::new(0), "f", true, root.as_value());
        let g = Flag::new(VarId::new(1), "g", true, root.as_value());

        let mut index = VariableIndex::new();
        assert_eq!(index.register(&f), Ok(0..1));
        assert_eq!(index.register(&g), Ok(1..2));
        assert_eq!(index.offset_of(VarId::new(0)), 0);
        assert_eq!(index.offset_of(VarId::new(1)), 1);
        assert_eq!(index.nbr_bits(), 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_root_reserves_nothing() {
        let root = Root::new("root");
        let mut index = VariableIndex::new();
        assert_eq!(index.register(&root), Ok(0..0));
        assert_eq!(index.nbr_bits(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_register_twice_rejected() {
        let f = Flag::new(VarId::new(7), "f", (), Value::Root);
        let mut index = VariableIndex::new();
        index.register(&f).unwrap();
        assert_eq!(
            index.register(&f),
            Err(EncodingError::AlreadyRegistered { id: VarId::new(7) })
        );
        assert_eq!(index.nbr_bits(), 1);
    }

    #[test]
    fn test_unregistered() {
        let index = VariableIndex::new();
        assert_eq!(
            index.try_offset_of(VarId::new(3)),
            Err(EncodingError::NotRegistered { id: VarId::new(3) })
        );
        assert!(!index.contains(VarId::new(3)));
    }

    #[test]
    #[should_panic(expected = "Variable v3 is not registered")]
    fn test_offset_of_unregistered_panics() {
        VariableIndex::new().offset_of(VarId::new(3));
    }
}
