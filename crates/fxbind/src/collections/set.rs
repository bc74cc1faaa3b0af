//! Observable set storage (insertion ordered).

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexSet;

use super::change::SetChange;
use super::{CollectionListeners, ContentListener, HasSize, ObservableCollection, collection_handle, observable_core};
use crate::reactive::Value;

/// A shared, observable set that iterates in insertion order.
pub struct ObservableSet<E: Value + Hash + Eq> {
    core: Rc<SetCore<E>>,
}

pub(crate) struct SetCore<E> {
    items: RefCell<IndexSet<E>>,
    listeners: CollectionListeners<SetChange<E>>,
}

observable_core!(SetCore<E> where E: Value + Hash + Eq);
collection_handle!(ObservableSet<E> where E: Value + Hash + Eq);

impl<E: Value + Hash + Eq> Default for ObservableSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Value + Hash + Eq> FromIterator<E> for ObservableSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            core: Rc::new(SetCore {
                items: RefCell::new(iter.into_iter().collect()),
                listeners: CollectionListeners::default(),
            }),
        }
    }
}

impl<E: Value + Hash + Eq> ObservableSet<E> {
    #[must_use]
    pub fn new() -> Self {
        std::iter::empty().collect()
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.core.items.borrow().contains(element)
    }

    #[must_use]
    pub fn contains_all(&self, elements: &[E]) -> bool {
        self.contains_all_iter(elements)
    }

    pub fn contains_all_iter<'a>(&self, elements: impl IntoIterator<Item = &'a E>) -> bool
    where
        E: 'a,
    {
        let items = self.core.items.borrow();
        elements.into_iter().all(|e| items.contains(e))
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.core.items.borrow().iter().cloned().collect()
    }

    /// Insert `element`; `false` (and no event) if it was already present.
    pub fn insert(&self, element: E) -> bool {
        let inserted = self.core.items.borrow_mut().insert(element.clone());
        if inserted {
            self.fire(&[SetChange::Added(element)]);
        }
        inserted
    }

    pub fn remove(&self, element: &E) -> bool {
        let removed = self.core.items.borrow_mut().shift_remove(element);
        if removed {
            self.fire(&[SetChange::Removed(element.clone())]);
        }
        removed
    }

    /// Insert every new element; one change per element actually added.
    pub fn extend(&self, elements: impl IntoIterator<Item = E>) {
        let changes: Vec<SetChange<E>> = {
            let mut items = self.core.items.borrow_mut();
            elements
                .into_iter()
                .filter_map(|e| items.insert(e.clone()).then_some(SetChange::Added(e)))
                .collect()
        };
        self.fire(&changes);
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.core.items.borrow_mut());
        let changes: Vec<SetChange<E>> = removed.into_iter().map(SetChange::Removed).collect();
        self.fire(&changes);
    }

    fn fire(&self, changes: &[SetChange<E>]) {
        self.core.listeners.notify(&*self.core, changes);
    }
}

impl<E: Value + Hash + Eq> HasSize for ObservableSet<E> {
    fn len(&self) -> usize {
        self.core.items.borrow().len()
    }
}

impl<E: Value + Hash + Eq> ObservableCollection for ObservableSet<E> {
    type Change = SetChange<E>;

    fn add_content_listener(&self, listener: &Rc<dyn ContentListener<SetChange<E>>>) {
        self.core.listeners.add_content(listener);
    }

    fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<SetChange<E>>>) {
        self.core.listeners.remove_content(listener);
    }

    /// Elements only in the old set are removed, then elements only in the
    /// new set are added. Shared elements are not reported.
    fn replacement(old: Option<&Self>, new: Option<&Self>) -> Vec<SetChange<E>> {
        let old_items: IndexSet<E> = old.map(Self::to_vec).unwrap_or_default().into_iter().collect();
        let new_items: IndexSet<E> = new.map(Self::to_vec).unwrap_or_default().into_iter().collect();
        old_items
            .difference(&new_items)
            .cloned()
            .map(SetChange::Removed)
            .chain(new_items.difference(&old_items).cloned().map(SetChange::Added))
            .collect()
    }
}

impl<E: Value + Hash + Eq + fmt::Debug> fmt::Debug for ObservableSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.core.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::content_listener;

    fn record(set: &ObservableSet<&'static str>) -> (Rc<RefCell<Vec<SetChange<&'static str>>>>, Rc<dyn ContentListener<SetChange<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let listener = content_listener(move |c: &SetChange<&'static str>| l.borrow_mut().push(c.clone()));
        set.add_content_listener(&listener);
        (log, listener)
    }

    #[test]
    fn insert_and_remove_emit_single_element_changes() {
        let set = ObservableSet::new();
        let (log, _l) = record(&set);
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert!(set.remove(&"a"));
        assert!(!set.remove(&"a"));
        assert_eq!(*log.borrow(), vec![SetChange::Added("a"), SetChange::Removed("a")]);
    }

    #[test]
    fn extend_and_clear() {
        let set: ObservableSet<&'static str> = ["x"].into_iter().collect();
        let (log, _l) = record(&set);
        set.extend(["x", "y", "z"]);
        assert_eq!(log.borrow().len(), 2);
        set.clear();
        assert_eq!(log.borrow().len(), 4);
        assert!(set.is_empty());
    }

    #[test]
    fn insertion_order_is_kept() {
        let set: ObservableSet<i32> = [3, 1, 2].into_iter().collect();
        set.remove(&1);
        set.insert(0);
        assert_eq!(set.to_vec(), vec![3, 2, 0]);
        assert!(set.contains_all(&[0, 3]));
    }

    #[test]
    fn replacement_removes_then_adds() {
        let old: ObservableSet<i32> = [1].into_iter().collect();
        let new: ObservableSet<i32> = [2, 3].into_iter().collect();
        let changes = ObservableSet::replacement(Some(&old), Some(&new));
        assert_eq!(
            changes,
            vec![SetChange::Removed(1), SetChange::Added(2), SetChange::Added(3)]
        );
    }

    #[test]
    fn replacement_skips_shared_elements() {
        let old: ObservableSet<&str> = ["a", "b"].into_iter().collect();
        let new: ObservableSet<&str> = ["a", "c"].into_iter().collect();
        assert_eq!(
            ObservableSet::replacement(Some(&old), Some(&new)),
            vec![SetChange::Removed("b"), SetChange::Added("c")]
        );
        assert!(ObservableSet::replacement(Some(&old), Some(&old)).is_empty());
        assert_eq!(ObservableSet::replacement(None, Some(&new)), vec![SetChange::Added("a"), SetChange::Added("c")]);
    }
}
