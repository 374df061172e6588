//! Simple BitSet implementation backed by a Vec<u64>.
//! Used as the per-entity component presence mask and as a query's required set.
//!
//! The word vector never ends in a zero word, so structurally equal sets compare
//! and hash equal regardless of how they were built.

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Build a set from bit indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = Self::default();
        for index in indices {
            set.set(index);
        }
        set
    }

    /// Set the bit at `index` to true.
    /// Resizes automatically if index is out of bounds.
    pub fn set(&mut self, index: usize) {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        self.words[word_idx] |= 1 << bit_idx;
    }

    /// Clear the bit at `index`. Returns whether it was set.
    pub fn unset(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        let Some(word) = self.words.get_mut(word_idx) else {
            return false;
        };
        let was_set = (*word & (1 << bit_idx)) != 0;
        *word &= !(1 << bit_idx);
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
        was_set
    }

    /// Check if the bit at `index` is set.
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            return false;
        }
        (self.words[word_idx] & (1 << bit_idx)) != 0
    }

    /// Returns true if every bit set in `other` is also set here.
    pub fn contains_all(&self, other: &Self) -> bool {
        other.words.iter().enumerate().all(|(i, &word)| {
            let mine = self.words.get(i).copied().unwrap_or(0);
            mine & word == word
        })
    }

    /// Returns true if this set shares any set bits with `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of set bits.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Returns iterator over indices of set bits
    pub fn ones(&self) -> OnesIter<'_> {
        OnesIter {
            bitset: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

pub struct OnesIter<'a> {
    bitset: &'a BitSet,
    word_idx: usize,
    current_word: u64,
}

impl<'a> Iterator for OnesIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let trailing = self.current_word.trailing_zeros();
                self.current_word &= !(1 << trailing); // Clear the bit we just found
                return Some(self.word_idx * 64 + trailing as usize);
            }

            self.word_idx += 1;
            if self.word_idx >= self.bitset.words.len() {
                return None;
            }
            self.current_word = self.bitset.words[self.word_idx];
        }
    }
}
