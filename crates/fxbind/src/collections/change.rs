//! Structured change descriptions delivered to content listeners.
//!
//! A [`ListChange`] may bundle several records and is read with a cursor
//! (`next()` then the accessors), so listeners can walk compound changes in
//! order. Set, map, and array changes describe a single element or range.

use std::cell::Cell;

use super::ChangeEvent;

/// One contiguous edit of a list.
///
/// `from..to` is the range in the list *after* the edit that holds the added
/// (or permuted) elements. A pure removal has `from == to`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListChangeRecord<E> {
    from: usize,
    to: usize,
    removed: Vec<E>,
    added: Vec<E>,
    permutation: Vec<usize>,
}

impl<E> ListChangeRecord<E> {
    #[must_use]
    pub fn added(from: usize, added: Vec<E>) -> Self {
        Self::replaced(from, Vec::new(), added)
    }

    #[must_use]
    pub fn removed(from: usize, removed: Vec<E>) -> Self {
        Self::replaced(from, removed, Vec::new())
    }

    #[must_use]
    pub fn replaced(from: usize, removed: Vec<E>, added: Vec<E>) -> Self {
        Self {
            from,
            to: from + added.len(),
            removed,
            added,
            permutation: Vec::new(),
        }
    }

    /// `permutation[i]` is the new index of the element previously at
    /// `from + i`.
    #[must_use]
    pub fn permuted(from: usize, permutation: Vec<usize>) -> Self {
        Self {
            from,
            to: from + permutation.len(),
            removed: Vec::new(),
            added: Vec::new(),
            permutation,
        }
    }

    #[must_use]
    pub fn from(&self) -> usize {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> usize {
        self.to
    }

    #[must_use]
    pub fn was_added(&self) -> bool {
        !self.added.is_empty()
    }

    #[must_use]
    pub fn was_removed(&self) -> bool {
        !self.removed.is_empty()
    }

    #[must_use]
    pub fn was_replaced(&self) -> bool {
        self.was_added() && self.was_removed()
    }

    #[must_use]
    pub fn was_permutated(&self) -> bool {
        !self.permutation.is_empty()
    }

    #[must_use]
    pub fn added_sublist(&self) -> &[E] {
        &self.added
    }

    #[must_use]
    pub fn removed_elements(&self) -> &[E] {
        &self.removed
    }

    #[must_use]
    pub fn added_size(&self) -> usize {
        self.added.len()
    }

    #[must_use]
    pub fn removed_size(&self) -> usize {
        self.removed.len()
    }

    /// New position of the element that was at `old_index`.
    #[must_use]
    pub fn permutation(&self, old_index: usize) -> Option<usize> {
        old_index
            .checked_sub(self.from)
            .and_then(|offset| self.permutation.get(offset).copied())
    }
}

/// A list change: one or more records read through a cursor.
///
/// Before the first `next()` and after the last record, the accessors
/// return neutral values (`0`, `false`, empty slices).
#[derive(Debug)]
pub struct ListChange<E> {
    records: Vec<ListChangeRecord<E>>,
    cursor: Cell<Option<usize>>,
}

impl<E> ListChange<E> {
    #[must_use]
    pub fn new(records: Vec<ListChangeRecord<E>>) -> Self {
        Self {
            records,
            cursor: Cell::new(None),
        }
    }

    #[must_use]
    pub fn single(record: ListChangeRecord<E>) -> Self {
        Self::new(vec![record])
    }

    /// Advance to the next record; `false` once all records were visited.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> bool {
        let next = self.cursor.get().map_or(0, |c| (c + 1).min(self.records.len()));
        self.cursor.set(Some(next));
        next < self.records.len()
    }

    /// Rewind to before the first record.
    pub fn reset(&self) {
        self.cursor.set(None);
    }

    /// The record under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&ListChangeRecord<E>> {
        self.cursor.get().and_then(|c| self.records.get(c))
    }

    #[must_use]
    pub fn records(&self) -> &[ListChangeRecord<E>] {
        &self.records
    }

    #[must_use]
    pub fn from(&self) -> usize {
        self.current().map_or(0, ListChangeRecord::from)
    }

    #[must_use]
    pub fn to(&self) -> usize {
        self.current().map_or(0, ListChangeRecord::to)
    }

    #[must_use]
    pub fn was_added(&self) -> bool {
        self.current().is_some_and(ListChangeRecord::was_added)
    }

    #[must_use]
    pub fn was_removed(&self) -> bool {
        self.current().is_some_and(ListChangeRecord::was_removed)
    }

    #[must_use]
    pub fn was_replaced(&self) -> bool {
        self.current().is_some_and(ListChangeRecord::was_replaced)
    }

    #[must_use]
    pub fn was_permutated(&self) -> bool {
        self.current().is_some_and(ListChangeRecord::was_permutated)
    }

    #[must_use]
    pub fn added_sublist(&self) -> &[E] {
        self.current().map_or(&[][..], ListChangeRecord::added_sublist)
    }

    #[must_use]
    pub fn removed_elements(&self) -> &[E] {
        self.current().map_or(&[][..], ListChangeRecord::removed_elements)
    }

    #[must_use]
    pub fn added_size(&self) -> usize {
        self.current().map_or(0, ListChangeRecord::added_size)
    }

    #[must_use]
    pub fn removed_size(&self) -> usize {
        self.current().map_or(0, ListChangeRecord::removed_size)
    }

    #[must_use]
    pub fn permutation(&self, old_index: usize) -> Option<usize> {
        self.current().and_then(|r| r.permutation(old_index))
    }
}

impl<E> ChangeEvent for ListChange<E> {
    fn reset(&self) {
        ListChange::reset(self);
    }
}

/// A single-element set mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetChange<E> {
    Added(E),
    Removed(E),
}

impl<E> SetChange<E> {
    #[must_use]
    pub fn was_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    #[must_use]
    pub fn was_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    #[must_use]
    pub fn element_added(&self) -> Option<&E> {
        match self {
            Self::Added(e) => Some(e),
            Self::Removed(_) => None,
        }
    }

    #[must_use]
    pub fn element_removed(&self) -> Option<&E> {
        match self {
            Self::Removed(e) => Some(e),
            Self::Added(_) => None,
        }
    }
}

impl<E> ChangeEvent for SetChange<E> {}

/// A single-key map mutation. Both values present means a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapChange<K, V> {
    key: K,
    added: Option<V>,
    removed: Option<V>,
}

impl<K, V> MapChange<K, V> {
    #[must_use]
    pub fn new(key: K, removed: Option<V>, added: Option<V>) -> Self {
        Self { key, added, removed }
    }

    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[must_use]
    pub fn was_added(&self) -> bool {
        self.added.is_some()
    }

    #[must_use]
    pub fn was_removed(&self) -> bool {
        self.removed.is_some()
    }

    #[must_use]
    pub fn was_replaced(&self) -> bool {
        self.was_added() && self.was_removed()
    }

    #[must_use]
    pub fn value_added(&self) -> Option<&V> {
        self.added.as_ref()
    }

    #[must_use]
    pub fn value_removed(&self) -> Option<&V> {
        self.removed.as_ref()
    }
}

impl<K, V> ChangeEvent for MapChange<K, V> {}

/// A primitive-array mutation over `from..to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayChange {
    pub size_changed: bool,
    pub from: usize,
    pub to: usize,
}

impl ChangeEvent for ArrayChange {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_records_then_stops() {
        let change = ListChange::new(vec![
            ListChangeRecord::added(0, vec!['a']),
            ListChangeRecord::removed(3, vec!['x', 'y']),
        ]);
        assert_eq!(change.from(), 0);
        assert!(!change.was_added());
        assert!(change.next());
        assert!(change.was_added());
        assert_eq!(change.added_sublist(), &['a']);
        assert!(change.next());
        assert!(change.was_removed());
        assert_eq!(change.from(), 3);
        assert_eq!(change.to(), 3);
        assert!(!change.next());
        assert!(!change.next());
        assert_eq!(change.removed_size(), 0);
        change.reset();
        assert!(change.next());
        assert_eq!(change.added_size(), 1);
    }

    #[test]
    fn replace_record_flags() {
        let r = ListChangeRecord::replaced(1, vec![1, 2], vec![3]);
        assert!(r.was_replaced());
        assert_eq!((r.from(), r.to()), (1, 2));
    }

    #[test]
    fn permutation_lookup() {
        let r: ListChangeRecord<i32> = ListChangeRecord::permuted(2, vec![4, 2, 3]);
        assert!(r.was_permutated());
        assert_eq!(r.permutation(2), Some(4));
        assert_eq!(r.permutation(4), Some(3));
        assert_eq!(r.permutation(1), None);
        assert_eq!(r.permutation(5), None);
    }

    #[test]
    fn set_and_map_changes() {
        let s = SetChange::Added(3);
        assert!(s.was_added());
        assert_eq!(s.element_removed(), None);
        let m = MapChange::new("k", Some(1), Some(2));
        assert!(m.was_replaced());
        assert_eq!(m.value_removed(), Some(&1));
    }
}
