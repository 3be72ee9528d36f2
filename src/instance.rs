//! Flat boolean assignments.
//!
//! An [`Instance`] is what an external solver hands back: one truth value per
//! bit of the global bit space laid out by the [`VariableIndex`][crate::index::VariableIndex].
//! [`BitArray`] is a compact, word-backed implementation.

use crate::literal::Literal;

/// Read-only view of a flat boolean assignment.
pub trait Instance {
    /// Number of bits in the assignment.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the bit at `index` is set.
    fn is_set(&self, index: usize) -> bool;

    /// Returns the literal recorded at `index`, i.e. the literal of that bit
    /// with the polarity the assignment gives it.
    fn literal(&self, index: usize) -> Literal {
        Literal::new(index, self.is_set(index))
    }

    /// Finds the lowest set bit in `[from, to)`.
    ///
    /// The result is the offset *relative to `from`*, or `None` if no bit in
    /// the range is set. An empty range yields `None`.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty range ends past the last bit.
    fn first_set(&self, from: usize, to: usize) -> Option<usize> {
        if from >= to {
            return None;
        }
        check_range(to, self.len());
        (from..to).position(|ix| self.is_set(ix))
    }
}

#[inline]
fn check_range(to: usize, len: usize) {
    assert!(
        to <= len,
        "Bit range ending at {} out of bounds for instance of {} bits",
        to,
        len
    );
}

/// A fixed-width bit array backed by a vector of u64 words.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitArray {
    words: Vec<u64>,
    len: usize,
}

impl BitArray {
    const BITS_PER_WORD: usize = 64;

    /// Creates an all-false array of `len` bits.
    pub fn new(len: usize) -> Self {
        let num_words = len.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            len,
        }
    }

    /// Creates an array of `len` bits with exactly the given bits set.
    pub fn from_bits(len: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut array = Self::new(len);
        for ix in bits {
            array.set(ix, true);
        }
        array
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    #[inline]
    fn check_bounds(&self, index: usize) {
        assert!(
            index < self.len,
            "Bit index {} out of bounds for instance of {} bits",
            index,
            self.len
        );
    }

    /// Sets the bit at `index` to `value`.
    pub fn set(&mut self, index: usize, value: bool) {
        self.check_bounds(index);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        if value {
            self.words[word_idx] |= mask;
        } else {
            self.words[word_idx] &= !mask;
        }
    }

    /// Flips the bit at `index`.
    pub fn flip(&mut self, index: usize) {
        self.check_bounds(index);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        self.words[word_idx] ^= 1u64 << bit_idx;
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns an iterator over all set bit indices, in ascending order.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones { array: self, next: 0 }
    }
}

impl Instance for BitArray {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn is_set(&self, index: usize) -> bool {
        self.check_bounds(index);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] >> bit_idx) & 1 == 1
    }

    fn first_set(&self, from: usize, to: usize) -> Option<usize> {
        if from >= to {
            return None;
        }
        check_range(to, self.len);

        let (mut word_idx, bit_idx) = Self::word_and_bit(from);
        // Mask off the bits below `from` in the first word
        let mut word = self.words[word_idx] & (!0u64 << bit_idx);
        loop {
            if word != 0 {
                let ix = word_idx * Self::BITS_PER_WORD + word.trailing_zeros() as usize;
                return if ix < to { Some(ix - from) } else { None };
            }
            word_idx += 1;
            if word_idx * Self::BITS_PER_WORD >= to {
                return None;
            }
            word = self.words[word_idx];
        }
    }
}

/// Iterator over set bits in a [`BitArray`].
pub struct Ones<'a> {
    array: &'a BitArray,
    next: usize,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let ix = self.next + self.array.first_set(self.next, self.array.len)?;
        self.next = ix + 1;
        Some(ix)
    }
}
