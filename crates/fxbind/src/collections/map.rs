//! Observable map storage (insertion ordered).

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;

use super::change::MapChange;
use super::{
    CollectionListeners, ContentListener, HasSize, KeyedSource, ObservableCollection, collection_handle,
    observable_core,
};
use crate::reactive::Value;

/// A shared, observable map that iterates in insertion order.
pub struct ObservableMap<K: Value + Hash + Eq, V: Value> {
    core: Rc<MapCore<K, V>>,
}

pub(crate) struct MapCore<K, V> {
    entries: RefCell<IndexMap<K, V>>,
    listeners: CollectionListeners<MapChange<K, V>>,
}

observable_core!(MapCore<K, V> where K: Value + Hash + Eq, V: Value);
collection_handle!(ObservableMap<K, V> where K: Value + Hash + Eq, V: Value);

impl<K: Value + Hash + Eq, V: Value> Default for ObservableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Value + Hash + Eq, V: Value> FromIterator<(K, V)> for ObservableMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            core: Rc::new(MapCore {
                entries: RefCell::new(iter.into_iter().collect()),
                listeners: CollectionListeners::default(),
            }),
        }
    }
}

impl<K: Value + Hash + Eq, V: Value> ObservableMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        std::iter::empty().collect()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.core.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.core.entries.borrow().contains_key(key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.core.entries.borrow().keys().cloned().collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.core.entries.borrow().values().cloned().collect()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)> {
        self.core
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert or replace; returns the previous value. Storing a value equal
    /// to the present one fires nothing.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let previous = self.core.entries.borrow_mut().insert(key.clone(), value.clone());
        if previous.as_ref() != Some(&value) {
            self.fire(&[MapChange::new(key, previous.clone(), Some(value))]);
        }
        previous
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.core.entries.borrow_mut().shift_remove(key);
        if let Some(value) = &removed {
            self.fire(&[MapChange::new(key.clone(), Some(value.clone()), None)]);
        }
        removed
    }

    /// Insert all entries; one change per entry that actually changed.
    pub fn extend(&self, entries: impl IntoIterator<Item = (K, V)>) {
        let changes: Vec<MapChange<K, V>> = {
            let mut map = self.core.entries.borrow_mut();
            entries
                .into_iter()
                .filter_map(|(k, v)| {
                    let previous = map.insert(k.clone(), v.clone());
                    (previous.as_ref() != Some(&v)).then(|| MapChange::new(k, previous, Some(v)))
                })
                .collect()
        };
        self.fire(&changes);
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.core.entries.borrow_mut());
        let changes: Vec<MapChange<K, V>> = removed
            .into_iter()
            .map(|(k, v)| MapChange::new(k, Some(v), None))
            .collect();
        self.fire(&changes);
    }

    fn fire(&self, changes: &[MapChange<K, V>]) {
        self.core.listeners.notify(&*self.core, changes);
    }
}

impl<K: Value + Hash + Eq, V: Value> HasSize for ObservableMap<K, V> {
    fn len(&self) -> usize {
        self.core.entries.borrow().len()
    }
}

impl<K: Value + Hash + Eq, V: Value> ObservableCollection for ObservableMap<K, V> {
    type Change = MapChange<K, V>;

    fn add_content_listener(&self, listener: &Rc<dyn ContentListener<MapChange<K, V>>>) {
        self.core.listeners.add_content(listener);
    }

    fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<MapChange<K, V>>>) {
        self.core.listeners.remove_content(listener);
    }

    /// Per-key diff: removals for vanished keys, replacements for keys whose
    /// value differs, additions for new keys. Equal entries are skipped.
    fn replacement(old: Option<&Self>, new: Option<&Self>) -> Vec<MapChange<K, V>> {
        let old_entries = old.map(Self::entries).unwrap_or_default();
        let new_map: IndexMap<K, V> = new.map(Self::entries).unwrap_or_default().into_iter().collect();
        let old_map: IndexMap<K, V> = old_entries.into_iter().collect();

        let mut changes = Vec::new();
        for (key, value) in &old_map {
            match new_map.get(key) {
                None => changes.push(MapChange::new(key.clone(), Some(value.clone()), None)),
                Some(next) if next != value => {
                    changes.push(MapChange::new(key.clone(), Some(value.clone()), Some(next.clone())));
                }
                Some(_) => {}
            }
        }
        for (key, value) in &new_map {
            if !old_map.contains_key(key) {
                changes.push(MapChange::new(key.clone(), None, Some(value.clone())));
            }
        }
        changes
    }
}

impl<K: Value + Hash + Eq, V: Value> KeyedSource<K, V> for ObservableMap<K, V> {
    fn lookup(&self, key: &K) -> Option<V> {
        self.get(key)
    }
}

impl<K: Value + Hash + Eq + fmt::Debug, V: Value + fmt::Debug> fmt::Debug for ObservableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.core.entries.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::content_listener;

    type Changes = Rc<RefCell<Vec<MapChange<&'static str, i32>>>>;

    fn record(map: &ObservableMap<&'static str, i32>) -> (Changes, Rc<dyn ContentListener<MapChange<&'static str, i32>>>) {
        let log: Changes = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let listener = content_listener(move |c: &MapChange<&'static str, i32>| l.borrow_mut().push(c.clone()));
        map.add_content_listener(&listener);
        (log, listener)
    }

    #[test]
    fn insert_replace_remove() {
        let map = ObservableMap::new();
        let (log, _l) = record(&map);
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("a", 1), Some(1));
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.remove(&"a"), Some(2));
        assert_eq!(map.remove(&"a"), None);
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(log[0].was_added() && !log[0].was_removed());
        assert!(log[1].was_replaced());
        assert!(log[2].was_removed() && !log[2].was_added());
    }

    #[test]
    fn clear_emits_one_removal_per_key() {
        let map: ObservableMap<&'static str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let (log, _l) = record(&map);
        map.clear();
        assert_eq!(log.borrow().len(), 2);
        assert!(map.is_empty());
    }

    #[test]
    fn replacement_diffs_per_key() {
        let old: ObservableMap<&'static str, i32> = [("keep", 1), ("change", 2), ("drop", 3)].into_iter().collect();
        let new: ObservableMap<&'static str, i32> = [("keep", 1), ("change", 20), ("add", 4)].into_iter().collect();
        let changes = ObservableMap::replacement(Some(&old), Some(&new));
        assert_eq!(
            changes,
            vec![
                MapChange::new("change", Some(2), Some(20)),
                MapChange::new("drop", Some(3), None),
                MapChange::new("add", None, Some(4)),
            ]
        );
    }
}
