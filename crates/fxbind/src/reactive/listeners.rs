//! Weak listener registries shared by every observable.
//!
//! # Invariants
//!
//! 1. A listener is registered at most once (identity = `Rc` allocation).
//! 2. The registry never keeps a listener alive; dead entries are pruned
//!    whenever the list is mutated or dispatched.
//! 3. Dispatch iterates a snapshot, so listeners may add or remove
//!    listeners (including themselves) while being notified.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Listener dropped | Last `Rc` released | Silently skipped and pruned |
//! | Re-entrant fire | Listener sets its source | Nested dispatch on a fresh snapshot |

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::trace;

use super::observable::{ChangeListener, InvalidationListener, Observable, ObservableValue, Value};

/// Ordered set of weakly held listeners.
pub(crate) struct ListenerList<L: ?Sized> {
    entries: RefCell<SmallVec<[Weak<L>; 2]>>,
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(SmallVec::new()),
        }
    }
}

fn same<L: ?Sized>(entry: &Weak<L>, listener: &Rc<L>) -> bool {
    std::ptr::addr_eq(entry.as_ptr(), Rc::as_ptr(listener))
}

impl<L: ?Sized> ListenerList<L> {
    /// Register `listener`; returns `false` if it was already present.
    pub(crate) fn add(&self, listener: &Rc<L>) -> bool {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|w| w.strong_count() > 0);
        if entries.iter().any(|w| same(w, listener)) {
            return false;
        }
        entries.push(Rc::downgrade(listener));
        true
    }

    pub(crate) fn remove(&self, listener: &Rc<L>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|w| w.strong_count() > 0 && !same(w, listener));
        entries.len() != before
    }

    pub(crate) fn contains(&self, listener: &Rc<L>) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|w| w.strong_count() > 0 && same(w, listener))
    }

    /// No live listener is registered.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().iter().all(|w| w.strong_count() == 0)
    }

    /// Upgrade the live listeners, pruning the dead ones.
    pub(crate) fn snapshot(&self) -> SmallVec<[Rc<L>; 4]> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|w| w.strong_count() > 0);
        let pruned = before - entries.len();
        if pruned > 0 {
            trace!(pruned, "dropped dead listeners");
        }
        entries.iter().filter_map(Weak::upgrade).collect()
    }
}

// ---------------------------------------------------------------------------
// ValueListeners: invalidation + change dispatch for one observable value
// ---------------------------------------------------------------------------

/// Listener bookkeeping for an observable value.
///
/// Change listeners need an "old" value. It is captured when the first change
/// listener is attached and refreshed on every dispatch; change events fire
/// only when the freshly pulled value differs from it.
pub(crate) struct ValueListeners<T> {
    invalidation: ListenerList<dyn InvalidationListener>,
    change: ListenerList<dyn ChangeListener<T>>,
    observed: RefCell<Option<T>>,
}

impl<T> Default for ValueListeners<T> {
    fn default() -> Self {
        Self {
            invalidation: ListenerList::default(),
            change: ListenerList::default(),
            observed: RefCell::new(None),
        }
    }
}

impl<T: Value> ValueListeners<T> {
    pub(crate) fn add_invalidation(&self, listener: &Rc<dyn InvalidationListener>) {
        self.invalidation.add(listener);
    }

    pub(crate) fn remove_invalidation(&self, listener: &Rc<dyn InvalidationListener>) {
        self.invalidation.remove(listener);
    }

    pub(crate) fn contains_invalidation(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.invalidation.contains(listener)
    }

    /// Attach a change listener. `current` is evaluated only when this is
    /// the first live change listener.
    pub(crate) fn add_change(&self, listener: &Rc<dyn ChangeListener<T>>, current: impl FnOnce() -> T) {
        if self.change.is_empty() {
            let value = current();
            *self.observed.borrow_mut() = Some(value);
        }
        self.change.add(listener);
    }

    pub(crate) fn remove_change(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.change.remove(listener);
        if self.change.is_empty() {
            self.observed.borrow_mut().take();
        }
    }

    pub(crate) fn contains_change(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.change.contains(listener)
    }

    pub(crate) fn has_change_listeners(&self) -> bool {
        !self.change.is_empty()
    }

    /// Notify invalidation listeners only.
    pub(crate) fn fire_invalidation<S: Observable>(&self, source: &S) {
        for listener in self.invalidation.snapshot() {
            listener.invalidated(source);
        }
    }

    /// Notify invalidation listeners, then pull the value and notify change
    /// listeners if it differs from the last observed one.
    pub(crate) fn fire<S: ObservableValue<T>>(&self, source: &S) {
        self.fire_invalidation(source);
        if self.change.is_empty() {
            return;
        }
        let new = source.value();
        let old = self.observed.replace(Some(new.clone()));
        let Some(old) = old else { return };
        if old == new {
            return;
        }
        for listener in self.change.snapshot() {
            listener.changed(source, &old, &new);
        }
    }
}
