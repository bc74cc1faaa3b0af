//! Observable array of primitive elements.
//!
//! Changes are reported as ranges ([`ArrayChange`]) rather than element
//! lists; listeners re-read the affected slots.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::change::ArrayChange;
use super::{
    CollectionListeners, ContentListener, HasSize, IndexedSource, ObservableCollection, collection_handle,
    observable_core,
};
use crate::error::BindError;
use crate::reactive::Value;

/// A shared, observable, resizable array of `Copy` values.
pub struct ObservableArray<E: Value + Copy + Default> {
    core: Rc<ArrayCore<E>>,
}

pub(crate) struct ArrayCore<E> {
    items: RefCell<Vec<E>>,
    listeners: CollectionListeners<ArrayChange>,
}

observable_core!(ArrayCore<E> where E: Value + Copy + Default);
collection_handle!(ObservableArray<E> where E: Value + Copy + Default);

impl<E: Value + Copy + Default> Default for ObservableArray<E> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

impl<E: Value + Copy + Default> ObservableArray<E> {
    #[must_use]
    pub fn from_slice(values: &[E]) -> Self {
        Self {
            core: Rc::new(ArrayCore {
                items: RefCell::new(values.to_vec()),
                listeners: CollectionListeners::default(),
            }),
        }
    }

    /// An array of `len` default values.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::from_slice(&vec![E::default(); len])
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<E> {
        self.core.items.borrow().get(index).copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.core.items.borrow().clone()
    }

    pub fn set(&self, index: usize, value: E) -> Result<(), BindError> {
        let len = self.len();
        let mut items = self.core.items.borrow_mut();
        let slot = items.get_mut(index).ok_or(BindError::IndexOutOfBounds { index, len })?;
        *slot = value;
        drop(items);
        self.fire(false, index, index + 1);
        Ok(())
    }

    /// Overwrite `start..start + values.len()`; the range must fit.
    pub fn set_range(&self, start: usize, values: &[E]) -> Result<(), BindError> {
        let len = self.len();
        let end = start.saturating_add(values.len());
        if end > len {
            return Err(BindError::InvalidRange { from: start, to: end, len });
        }
        if values.is_empty() {
            return Ok(());
        }
        self.core.items.borrow_mut()[start..end].copy_from_slice(values);
        self.fire(false, start, end);
        Ok(())
    }

    /// Replace the whole contents.
    pub fn set_all(&self, values: &[E]) {
        let old_len = self.len();
        *self.core.items.borrow_mut() = values.to_vec();
        self.fire(old_len != values.len(), 0, values.len());
    }

    /// Append `values`.
    pub fn add_all(&self, values: &[E]) {
        if values.is_empty() {
            return;
        }
        let old_len = self.len();
        self.core.items.borrow_mut().extend_from_slice(values);
        self.fire(true, old_len, old_len + values.len());
    }

    /// Grow (with default values) or shrink to `len`.
    pub fn resize(&self, len: usize) {
        let old_len = self.len();
        if old_len == len {
            return;
        }
        self.core.items.borrow_mut().resize(len, E::default());
        self.fire(true, old_len.min(len), len);
    }

    pub fn clear(&self) {
        self.resize(0);
    }

    fn fire(&self, size_changed: bool, from: usize, to: usize) {
        let change = ArrayChange { size_changed, from, to };
        self.core.listeners.notify(&*self.core, &[change]);
    }
}

impl<E: Value + Copy + Default> HasSize for ObservableArray<E> {
    fn len(&self) -> usize {
        self.core.items.borrow().len()
    }
}

impl<E: Value + Copy + Default> ObservableCollection for ObservableArray<E> {
    type Change = ArrayChange;

    fn add_content_listener(&self, listener: &Rc<dyn ContentListener<ArrayChange>>) {
        self.core.listeners.add_content(listener);
    }

    fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<ArrayChange>>) {
        self.core.listeners.remove_content(listener);
    }

    /// A single change over the new array, flagged when the length moved.
    fn replacement(old: Option<&Self>, new: Option<&Self>) -> Vec<ArrayChange> {
        let old_len = old.map_or(0, HasSize::len);
        let new_len = new.map_or(0, HasSize::len);
        vec![ArrayChange {
            size_changed: old_len != new_len,
            from: 0,
            to: new_len,
        }]
    }
}

impl<E: Value + Copy + Default> IndexedSource<E> for ObservableArray<E> {
    fn element(&self, index: usize) -> Option<E> {
        self.get(index)
    }
}

impl<E: Value + Copy + Default + fmt::Debug> fmt::Debug for ObservableArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.core.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::content_listener;

    fn record(array: &ObservableArray<f32>) -> (Rc<RefCell<Vec<ArrayChange>>>, Rc<dyn ContentListener<ArrayChange>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let listener = content_listener(move |c: &ArrayChange| l.borrow_mut().push(*c));
        array.add_content_listener(&listener);
        (log, listener)
    }

    fn change(size_changed: bool, from: usize, to: usize) -> ArrayChange {
        ArrayChange { size_changed, from, to }
    }

    #[test]
    fn element_and_range_updates() {
        let array = ObservableArray::from_slice(&[0.0, 0.0, 0.0]);
        let (log, _l) = record(&array);
        array.set(1, 2.5).unwrap();
        array.set_range(1, &[1.0, 1.5]).unwrap();
        assert_eq!(array.to_vec(), vec![0.0, 1.0, 1.5]);
        assert_eq!(*log.borrow(), vec![change(false, 1, 2), change(false, 1, 3)]);
    }

    #[test]
    fn size_changes() {
        let array: ObservableArray<f32> = ObservableArray::with_len(2);
        let (log, _l) = record(&array);
        array.add_all(&[1.0]);
        array.resize(1);
        array.set_all(&[4.0]);
        array.clear();
        assert_eq!(
            *log.borrow(),
            vec![change(true, 2, 3), change(true, 1, 1), change(false, 0, 1), change(true, 0, 0)]
        );
    }

    #[test]
    fn bounds_are_checked() {
        let array = ObservableArray::from_slice(&[1.0f32]);
        assert_eq!(array.set(1, 0.0), Err(BindError::IndexOutOfBounds { index: 1, len: 1 }));
        assert!(matches!(array.set_range(0, &[1.0, 2.0]), Err(BindError::InvalidRange { .. })));
    }

    #[test]
    fn replacement_flags_length_change() {
        let a = ObservableArray::from_slice(&[1, 2]);
        let b = ObservableArray::from_slice(&[3, 4, 5]);
        assert_eq!(ObservableArray::replacement(Some(&a), Some(&b)), vec![change(true, 0, 3)]);
        assert_eq!(ObservableArray::replacement(Some(&a), Some(&a)), vec![change(false, 0, 2)]);
    }
}
