//! Fixed-width candidate bitsets.
//!
//! The propagation rules spend most of their time adding and removing
//! candidate values, so candidates are stored as a bitmask rather than a
//! growable collection. Bit `v` of the backing integer stands for the
//! value `v`; values are `1..=16` at most.

/// Set of candidate values for one cell, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSet(u32);

impl ValueSet {
    /// The empty set.
    pub const NONE: ValueSet = ValueSet(0);

    /// Set containing every value of `1..=size`.
    pub fn full(size: u8) -> ValueSet {
        debug_assert!(size >= 1 && size <= 16);
        ValueSet(((1 << size) - 1) << 1)
    }

    /// Adds `value` to the set.
    pub fn insert(&mut self, value: u8) {
        self.0 |= 1 << value;
    }

    /// Deletes `value` from the set. Returns `true` if it was present.
    pub fn remove(&mut self, value: u8) -> bool {
        let present = self.contains(value);
        self.0 &= !(1 << value);
        present
    }

    /// Checks whether `value` is in the set.
    pub fn contains(self, value: u8) -> bool {
        self.0 & (1 << value) != 0
    }

    /// Returns the number of values in the set.
    pub fn len(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Checks whether the set contains any value.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the set of values in this set that aren't present in `other`.
    pub fn without(self, other: ValueSet) -> ValueSet {
        ValueSet(self.0 & !other.0)
    }

    /// Returns the only value in the set, iff exactly 1 value exists.
    pub fn unique(self) -> Option<u8> {
        if self.len() == 1 {
            self.min()
        } else {
            None
        }
    }

    /// Returns the smallest value in the set.
    pub fn min(self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Returns the largest value in the set.
    pub fn max(self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some((31 - self.0.leading_zeros()) as u8)
        }
    }

    /// Deletes every value `>= bound`. Returns `true` if the set changed.
    pub fn remove_at_or_above(&mut self, bound: u8) -> bool {
        let before = self.0;
        self.0 &= (1 << bound) - 1;
        self.0 != before
    }

    /// Deletes every value `<= bound`. Returns `true` if the set changed.
    pub fn remove_at_or_below(&mut self, bound: u8) -> bool {
        let before = self.0;
        self.0 &= !((1u32 << (bound + 1)) - 1);
        self.0 != before
    }
}

/// Iterator over the values of a [`ValueSet`], in ascending order.
#[derive(Debug, Clone)]
pub struct Iter(u32);

impl Iterator for Iter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let value = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(value)
    }
}

impl IntoIterator for ValueSet {
    type Item = u8;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_set() {
        let set = ValueSet::full(4);
        assert_eq!(set.len(), 4);
        assert!(!set.contains(0));
        for value in 1..=4 {
            assert!(set.contains(value));
        }
        assert!(!set.contains(5));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn insert_remove() {
        let mut set = ValueSet::NONE;
        set.insert(3);
        set.insert(3);
        assert_eq!(set.len(), 1);
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert!(set.is_empty());
    }

    #[test]
    fn unique() {
        assert_eq!(ValueSet::NONE.unique(), None);
        assert_eq!(ValueSet::full(4).unique(), None);
        let mut set = ValueSet::NONE;
        set.insert(2);
        assert_eq!(set.unique(), Some(2));
    }

    #[test]
    fn min_max() {
        let mut set = ValueSet::NONE;
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
        set.insert(2);
        set.insert(5);
        assert_eq!(set.min(), Some(2));
        assert_eq!(set.max(), Some(5));
    }

    #[test]
    fn bound_trimming() {
        let mut set = ValueSet::full(5);
        assert!(set.remove_at_or_above(4));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!set.remove_at_or_above(4));

        let mut set = ValueSet::full(5);
        assert!(set.remove_at_or_below(2));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(!set.remove_at_or_below(2));
    }
}
