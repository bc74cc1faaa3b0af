//! Observable list storage.
//!
//! Every mutating call fires invalidation listeners once and delivers a
//! single [`ListChange`] to content listeners. Calls that change nothing
//! (empty `extend`, `clear` on an empty list, an identity sort) fire
//! nothing.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use super::change::{ListChange, ListChangeRecord};
use super::{
    CollectionListeners, ContentListener, HasSize, IndexedSource, ObservableCollection,
    collection_handle, observable_core,
};
use crate::error::BindError;
use crate::reactive::Value;

/// A shared, observable `Vec`.
pub struct ObservableList<E: Value> {
    core: Rc<ListCore<E>>,
}

pub(crate) struct ListCore<E> {
    items: RefCell<Vec<E>>,
    listeners: CollectionListeners<ListChange<E>>,
}

observable_core!(ListCore<E> where E: Value);
collection_handle!(ObservableList<E> where E: Value);

impl<E: Value> Default for ObservableList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Value> From<Vec<E>> for ObservableList<E> {
    fn from(items: Vec<E>) -> Self {
        Self {
            core: Rc::new(ListCore {
                items: RefCell::new(items),
                listeners: CollectionListeners::default(),
            }),
        }
    }
}

impl<E: Value> FromIterator<E> for ObservableList<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<E: Value> ObservableList<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<E> {
        self.core.items.borrow().get(index).cloned()
    }

    /// Borrow the elements for the duration of `f`.
    ///
    /// Mutating the list from inside `f` panics.
    pub fn with<R>(&self, f: impl FnOnce(&[E]) -> R) -> R {
        f(&self.core.items.borrow())
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.core.items.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.core.items.borrow().contains(element)
    }

    #[must_use]
    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.core.items.borrow().iter().position(|e| e == element)
    }

    /// Whether every element of `elements` is present.
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

    pub fn push(&self, element: E) {
        let from = self.len();
        self.core.items.borrow_mut().push(element.clone());
        self.fire(ListChangeRecord::added(from, vec![element]));
    }

    pub fn insert(&self, index: usize, element: E) -> Result<(), BindError> {
        let len = self.len();
        if index > len {
            return Err(BindError::IndexOutOfBounds { index, len });
        }
        self.core.items.borrow_mut().insert(index, element.clone());
        self.fire(ListChangeRecord::added(index, vec![element]));
        Ok(())
    }

    /// Append all elements as one change.
    pub fn extend(&self, elements: impl IntoIterator<Item = E>) {
        let added: Vec<E> = elements.into_iter().collect();
        if added.is_empty() {
            return;
        }
        let from = self.len();
        self.core.items.borrow_mut().extend(added.iter().cloned());
        self.fire(ListChangeRecord::added(from, added));
    }

    pub fn remove(&self, index: usize) -> Result<E, BindError> {
        let len = self.len();
        if index >= len {
            return Err(BindError::IndexOutOfBounds { index, len });
        }
        let removed = self.core.items.borrow_mut().remove(index);
        self.fire(ListChangeRecord::removed(index, vec![removed.clone()]));
        Ok(removed)
    }

    /// Remove the first occurrence of `element`.
    pub fn remove_item(&self, element: &E) -> bool {
        match self.index_of(element) {
            Some(index) => self.remove(index).is_ok(),
            None => false,
        }
    }

    /// Remove `from..to` as one change.
    pub fn remove_range(&self, from: usize, to: usize) -> Result<(), BindError> {
        let len = self.len();
        if from > to || to > len {
            return Err(BindError::InvalidRange { from, to, len });
        }
        if from == to {
            return Ok(());
        }
        let removed: Vec<E> = self.core.items.borrow_mut().drain(from..to).collect();
        self.fire(ListChangeRecord::removed(from, removed));
        Ok(())
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&self, index: usize, element: E) -> Result<E, BindError> {
        let len = self.len();
        if index >= len {
            return Err(BindError::IndexOutOfBounds { index, len });
        }
        let previous = std::mem::replace(&mut self.core.items.borrow_mut()[index], element.clone());
        self.fire(ListChangeRecord::replaced(index, vec![previous.clone()], vec![element]));
        Ok(previous)
    }

    /// Replace the whole contents as one change.
    pub fn set_all(&self, elements: impl IntoIterator<Item = E>) {
        let added: Vec<E> = elements.into_iter().collect();
        let removed = std::mem::replace(&mut *self.core.items.borrow_mut(), added.clone());
        if removed.is_empty() && added.is_empty() {
            return;
        }
        self.fire(ListChangeRecord::replaced(0, removed, added));
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.core.items.borrow_mut());
        if removed.is_empty() {
            return;
        }
        self.fire(ListChangeRecord::removed(0, removed));
    }

    /// Stable sort, reported as a permutation.
    pub fn sort_by(&self, mut compare: impl FnMut(&E, &E) -> Ordering) {
        let permutation = {
            let mut items = self.core.items.borrow_mut();
            let mut order: Vec<usize> = (0..items.len()).collect();
            order.sort_by(|&a, &b| compare(&items[a], &items[b]));
            if order.iter().enumerate().all(|(i, &o)| i == o) {
                return;
            }
            let mut permutation = vec![0; order.len()];
            for (new_index, &old_index) in order.iter().enumerate() {
                permutation[old_index] = new_index;
            }
            let sorted: Vec<E> = order.iter().map(|&i| items[i].clone()).collect();
            *items = sorted;
            permutation
        };
        self.fire(ListChangeRecord::permuted(0, permutation));
    }

    pub fn sort(&self)
    where
        E: Ord,
    {
        self.sort_by(Ord::cmp);
    }

    fn fire(&self, record: ListChangeRecord<E>) {
        let change = ListChange::single(record);
        self.core.listeners.notify(&*self.core, std::slice::from_ref(&change));
    }
}

impl<E: Value> HasSize for ObservableList<E> {
    fn len(&self) -> usize {
        self.core.items.borrow().len()
    }
}

impl<E: Value> ObservableCollection for ObservableList<E> {
    type Change = ListChange<E>;

    fn add_content_listener(&self, listener: &Rc<dyn ContentListener<ListChange<E>>>) {
        self.core.listeners.add_content(listener);
    }

    fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<ListChange<E>>>) {
        self.core.listeners.remove_content(listener);
    }

    /// A single full-range replace record.
    fn replacement(old: Option<&Self>, new: Option<&Self>) -> Vec<ListChange<E>> {
        let removed = old.map(Self::to_vec).unwrap_or_default();
        let added = new.map(Self::to_vec).unwrap_or_default();
        if removed.is_empty() && added.is_empty() {
            return Vec::new();
        }
        vec![ListChange::single(ListChangeRecord::replaced(0, removed, added))]
    }
}

impl<E: Value> IndexedSource<E> for ObservableList<E> {
    fn element(&self, index: usize) -> Option<E> {
        self.get(index)
    }
}

impl<E: Value + fmt::Debug> fmt::Debug for ObservableList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.core.items.borrow().iter()).finish()
    }
}
