//! Heap-allocated flag set sized at runtime.
//!
//! Bits live in `u64` words. Padding bits (indices at or beyond `len`) are
//! always zero, so `count`, `highest_set`, and iteration never report
//! phantom flags.

/// Number of `u64` words needed to store `n` bits.
pub const fn words_for_bits(n: usize) -> usize {
    n.div_ceil(64)
}

/// Fixed-length set of boolean flags.
///
/// The length is chosen at construction and never changes; `clear` resets
/// every flag without reallocating. All indexing operations panic when
/// `idx >= len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagSet {
    words: Vec<u64>,
    len: usize,
}

impl FlagSet {
    /// Creates a set of `len` cleared flags. `len` may be zero.
    pub fn empty(len: usize) -> Self {
        Self {
            words: vec![0u64; words_for_bits(len)],
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        assert!(idx < self.len, "flag index out of bounds");
        (self.words[idx / 64] >> (idx % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, idx: usize) {
        assert!(idx < self.len, "flag index out of bounds");
        self.words[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Clears every flag.
    #[inline]
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Highest set flag, if any.
    pub fn highest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &w)| w != 0)
            .map(|(i, &w)| i * 64 + (63 - w.leading_zeros() as usize))
    }

    /// Iterates set flags in ascending order.
    pub fn iter(&self) -> FlagSetIter<'_> {
        FlagSetIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

/// Ascending iterator over set flags.
pub struct FlagSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for FlagSetIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current.wrapping_sub(1);
                return Some(self.word_idx * 64 + bit);
            }
            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn zero_length_set_is_empty() {
        let flags = FlagSet::empty(0);
        assert!(flags.is_empty());
        assert_eq!(flags.iter().next(), None);
        assert_eq!(flags.highest_set(), None);
    }

    #[test]
    fn highest_set_crosses_words() {
        let mut flags = FlagSet::empty(130);
        flags.set(3);
        flags.set(64);
        assert_eq!(flags.highest_set(), Some(64));
        flags.set(129);
        assert_eq!(flags.highest_set(), Some(129));
        flags.clear();
        assert_eq!(flags.highest_set(), None);
    }

    #[test]
    #[should_panic(expected = "flag index out of bounds")]
    fn set_past_len_panics() {
        FlagSet::empty(10).set(10);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(
            crate::test_utils::proptest_cases(32)
        ))]

        #[test]
        fn iter_matches_model(len in 1usize..300, idxs in proptest::collection::vec(any::<usize>(), 0..64)) {
            let mut flags = FlagSet::empty(len);
            let mut model = BTreeSet::new();
            for i in idxs {
                let i = i % len;
                flags.set(i);
                model.insert(i);
            }
            prop_assert_eq!(flags.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(flags.count(), model.len());
            prop_assert_eq!(flags.highest_set(), model.iter().next_back().copied());
        }
    }
}
