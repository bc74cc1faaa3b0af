//! Observable collections and bindings whose value is a collection.
//!
//! The storage types ([`ObservableList`], [`ObservableSet`],
//! [`ObservableMap`], [`ObservableArray`]) notify two kinds of listeners:
//! invalidation listeners once per mutation, and content listeners with a
//! structured description of what changed.
//!
//! [`CollectionBinding`] is a binding whose value is one of those
//! collections. It relays content changes of the collection it currently
//! holds, and synthesizes a "replace everything" change when the held
//! instance is swapped for another.
//!
//! Collection handles compare by identity: two handles are equal when they
//! refer to the same storage.

use std::rc::Rc;

use crate::reactive::listeners::ListenerList;
use crate::reactive::{AsDependency, InvalidationListener, Observable};

pub mod array;
pub mod binding;
pub mod change;
pub mod list;
pub mod map;
pub mod set;

pub use array::ObservableArray;
pub use binding::{ArrayBinding, CollectionBinding, ListBinding, MapBinding, SetBinding};
pub use change::{ArrayChange, ListChange, ListChangeRecord, MapChange, SetChange};
pub use list::ObservableList;
pub use map::ObservableMap;
pub use set::ObservableSet;

/// Receives structured content changes.
pub trait ContentListener<C> {
    fn on_changed(&self, change: &C);
}

impl<C, F: Fn(&C)> ContentListener<C> for F {
    fn on_changed(&self, change: &C) {
        self(change);
    }
}

/// Wrap a closure as a shareable content listener.
pub fn content_listener<C: 'static>(f: impl Fn(&C) + 'static) -> Rc<dyn ContentListener<C>> {
    Rc::new(f)
}

/// A change event that may carry a read cursor.
pub trait ChangeEvent {
    /// Rewind any cursor so the next listener reads from the start.
    fn reset(&self) {}
}

/// Anything with an element count.
pub trait HasSize {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Behaviour shared by all observable storage types.
pub trait ObservableCollection: AsDependency + HasSize + Clone + PartialEq + 'static {
    type Change: ChangeEvent + 'static;

    fn add_content_listener(&self, listener: &Rc<dyn ContentListener<Self::Change>>);
    fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<Self::Change>>);

    /// Changes describing a swap from `old` to `new` as seen by a content
    /// listener. Either side may be absent (treated as empty).
    fn replacement(old: Option<&Self>, new: Option<&Self>) -> Vec<Self::Change>;
}

/// Listener bookkeeping shared by the storage types.
pub(crate) struct CollectionListeners<C> {
    invalidation: ListenerList<dyn InvalidationListener>,
    content: ListenerList<dyn ContentListener<C>>,
}

impl<C> Default for CollectionListeners<C> {
    fn default() -> Self {
        Self {
            invalidation: ListenerList::default(),
            content: ListenerList::default(),
        }
    }
}

impl<C: ChangeEvent> CollectionListeners<C> {
    pub(crate) fn add_invalidation(&self, listener: &Rc<dyn InvalidationListener>) {
        self.invalidation.add(listener);
    }

    pub(crate) fn remove_invalidation(&self, listener: &Rc<dyn InvalidationListener>) {
        self.invalidation.remove(listener);
    }

    pub(crate) fn contains_invalidation(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.invalidation.contains(listener)
    }

    pub(crate) fn add_content(&self, listener: &Rc<dyn ContentListener<C>>) {
        self.content.add(listener);
    }

    pub(crate) fn remove_content(&self, listener: &Rc<dyn ContentListener<C>>) {
        self.content.remove(listener);
    }

    /// Fire invalidation listeners once, then each change to every content
    /// listener. Nothing fires for an empty change list.
    pub(crate) fn notify<S: Observable>(&self, source: &S, changes: &[C]) {
        if changes.is_empty() {
            return;
        }
        for listener in self.invalidation.snapshot() {
            listener.invalidated(source);
        }
        let content = self.content.snapshot();
        for change in changes {
            for listener in &content {
                change.reset();
                listener.on_changed(change);
            }
        }
    }
}

/// Implements [`Observable`] for a storage core with a `listeners` field.
macro_rules! observable_core {
    ($core:ident<$($p:ident),+> where $($bounds:tt)+) => {
        impl<$($p),+> $crate::reactive::Observable for $core<$($p),+>
        where
            $($bounds)+
        {
            fn add_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) {
                self.listeners.add_invalidation(listener);
            }

            fn remove_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) {
                self.listeners.remove_invalidation(listener);
            }

            fn contains_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) -> bool {
                self.listeners.contains_invalidation(listener)
            }
        }
    };
}

/// Implements the handle-level traits of a storage type by delegating to
/// its `core`.
macro_rules! collection_handle {
    ($handle:ident<$($p:ident),+> where $($bounds:tt)+) => {
        impl<$($p),+> Clone for $handle<$($p),+>
        where
            $($bounds)+
        {
            fn clone(&self) -> Self {
                Self {
                    core: std::rc::Rc::clone(&self.core),
                }
            }
        }

        impl<$($p),+> PartialEq for $handle<$($p),+>
        where
            $($bounds)+
        {
            fn eq(&self, other: &Self) -> bool {
                std::rc::Rc::ptr_eq(&self.core, &other.core)
            }
        }

        impl<$($p),+> $crate::reactive::Observable for $handle<$($p),+>
        where
            $($bounds)+
        {
            fn add_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) {
                self.core.listeners.add_invalidation(listener);
            }

            fn remove_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) {
                self.core.listeners.remove_invalidation(listener);
            }

            fn contains_listener(&self, listener: &std::rc::Rc<dyn $crate::reactive::InvalidationListener>) -> bool {
                self.core.listeners.contains_invalidation(listener)
            }
        }

        impl<$($p),+> $crate::reactive::AsDependency for $handle<$($p),+>
        where
            $($bounds)+
        {
            fn as_dependency(&self) -> $crate::reactive::Dependency {
                $crate::reactive::Dependency::new(
                    std::rc::Rc::clone(&self.core) as std::rc::Rc<dyn $crate::reactive::Observable>,
                )
            }
        }
    };
}

pub(crate) use {collection_handle, observable_core};

/// Collections with positional access.
pub trait IndexedSource<E>: AsDependency + HasSize + Clone + 'static {
    fn element(&self, index: usize) -> Option<E>;
}

/// Collections with keyed access.
pub trait KeyedSource<K, V>: AsDependency + Clone + 'static {
    fn lookup(&self, key: &K) -> Option<V>;
}
