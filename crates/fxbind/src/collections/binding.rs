//! Bindings whose value is an observable collection.
//!
//! A [`CollectionBinding<C>`] behaves like [`Binding<Option<C>>`] and adds:
//!
//! - **Content relay**: while valid, it listens to the collection it holds.
//!   Mutations of that collection keep `size`/`empty` current, notify the
//!   binding's invalidation listeners (the binding itself stays valid), and
//!   are forwarded to the binding's content listeners.
//! - **Replacement synthesis**: when recomputation swaps in a different
//!   collection (or none), content listeners receive the changes that turn
//!   the old contents into the new ones.
//! - **Derived `size` and `empty` properties**, owned by the binding.
//!
//! # Invariants
//!
//! 1. The relay is attached to at most one collection: the one held by the
//!    valid binding. It is detached on invalidation.
//! 2. `size` and `empty` always read through the current value; an absent
//!    collection reads as size 0, empty.
//! 3. While content listeners are registered, the binding re-validates
//!    eagerly after each invalidation so no swap goes unreported.
//!
//! [`Binding<Option<C>>`]: crate::reactive::Binding

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::{
    ChangeEvent, ContentListener, HasSize, IndexedSource, KeyedSource, ObservableArray, ObservableCollection,
    ObservableList, ObservableMap, ObservableSet,
};
use crate::reactive::binding::DependencySet;
use crate::reactive::listeners::{ListenerList, ValueListeners};
use crate::reactive::{
    AsDependency, Bean, ChangeListener, Dependency, InvalidationListener, Observable, ObservableSource,
    ObservableValue, ReadOnlyProperty, Value,
};

/// A binding producing an optional collection.
pub struct CollectionBinding<C: ObservableCollection> {
    core: Rc<CollectionCore<C>>,
}

pub type ListBinding<E> = CollectionBinding<ObservableList<E>>;
pub type SetBinding<E> = CollectionBinding<ObservableSet<E>>;
pub type MapBinding<K, V> = CollectionBinding<ObservableMap<K, V>>;
pub type ArrayBinding<E> = CollectionBinding<ObservableArray<E>>;

pub(crate) struct CollectionCore<C: ObservableCollection> {
    valid: Cell<bool>,
    value: RefCell<Option<C>>,
    compute: Box<dyn Fn() -> Option<C>>,
    dependencies: DependencySet,
    listeners: ValueListeners<Option<C>>,
    content: ListenerList<dyn ContentListener<C::Change>>,
    /// Collection last reported to content listeners.
    reported: RefCell<Option<C>>,
    /// Collection the relay is registered on.
    attached: RefCell<Option<C>>,
    relay: Rc<dyn ContentListener<C::Change>>,
    size: ReadOnlyProperty<i32>,
    empty: ReadOnlyProperty<bool>,
}

/// Forwards content changes of the held collection to the owning binding.
struct ContentRelay<C: ObservableCollection> {
    owner: Weak<CollectionCore<C>>,
}

impl<C: ObservableCollection> ContentListener<C::Change> for ContentRelay<C> {
    fn on_changed(&self, change: &C::Change) {
        if let Some(owner) = self.owner.upgrade() {
            owner.on_content_changed(change);
        }
    }
}

impl<C: ObservableCollection> Clone for CollectionBinding<C> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<C: ObservableCollection> CollectionBinding<C> {
    /// Create a binding over `dependencies`; `compute` runs on first read.
    pub fn new(dependencies: impl IntoIterator<Item = Dependency>, compute: impl Fn() -> Option<C> + 'static) -> Self {
        let core = Rc::new_cyclic(|weak: &Weak<CollectionCore<C>>| {
            let bean: Weak<dyn Any> = weak.clone();
            let for_size = weak.clone();
            let for_empty = weak.clone();
            CollectionCore {
                valid: Cell::new(false),
                value: RefCell::new(None),
                compute: Box::new(compute),
                dependencies: DependencySet::default(),
                listeners: ValueListeners::default(),
                content: ListenerList::default(),
                reported: RefCell::new(None),
                attached: RefCell::new(None),
                relay: Rc::new(ContentRelay { owner: weak.clone() }),
                size: ReadOnlyProperty::derived(Some(bean.clone()), "size", move || {
                    let len = for_size.upgrade().map_or(0, |core| core.len());
                    i32::try_from(len).unwrap_or(i32::MAX)
                }),
                empty: ReadOnlyProperty::derived(Some(bean), "empty", move || {
                    for_empty.upgrade().is_none_or(|core| core.len() == 0)
                }),
            }
        });
        let binding = Self { core };
        binding.bind(dependencies);
        binding
    }

    /// A binding that always holds `collection`.
    pub fn of(collection: C) -> Self {
        Self::new(std::iter::empty(), move || Some(collection.clone()))
    }

    /// A binding that follows an observable holding an optional collection.
    pub fn follow<S>(source: &S) -> Self
    where
        S: ObservableSource<Value = Option<C>>,
    {
        let observable = source.as_observable_value();
        Self::new([source.as_dependency()], move || observable.value())
    }

    #[must_use]
    pub fn get(&self) -> Option<C> {
        self.core.refresh()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.core.valid.get()
    }

    pub fn invalidate(&self) {
        self.core.invalidate();
    }

    pub fn bind(&self, dependencies: impl IntoIterator<Item = Dependency>) {
        self.core.dependencies.attach(&self.as_listener(), dependencies);
    }

    pub fn unbind(&self, dependencies: impl IntoIterator<Item = Dependency>) {
        self.core.dependencies.detach(&self.as_listener(), dependencies);
    }

    /// Stop observing dependencies and the held collection.
    pub fn dispose(&self) {
        self.core.dependencies.clear(&self.as_listener());
        self.core.detach_relay();
    }

    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.core.dependencies.list()
    }

    /// Element count of the current collection, as an observable.
    #[must_use]
    pub fn size_property(&self) -> &ReadOnlyProperty<i32> {
        &self.core.size
    }

    /// Whether the current collection is empty or absent, as an observable.
    #[must_use]
    pub fn empty_property(&self) -> &ReadOnlyProperty<bool> {
        &self.core.empty
    }

    /// The owner reported by `size_property().bean()`.
    #[must_use]
    pub fn as_bean(&self) -> Bean {
        Rc::clone(&self.core) as Bean
    }

    pub fn add_content_listener(&self, listener: &Rc<dyn ContentListener<C::Change>>) {
        if self.core.content.is_empty() {
            let current = self.core.refresh();
            *self.core.reported.borrow_mut() = current;
        }
        self.core.content.add(listener);
    }

    pub fn remove_content_listener(&self, listener: &Rc<dyn ContentListener<C::Change>>) {
        self.core.content.remove(listener);
        if self.core.content.is_empty() {
            self.core.reported.borrow_mut().take();
        }
    }

    fn as_listener(&self) -> Rc<dyn InvalidationListener> {
        Rc::clone(&self.core) as Rc<dyn InvalidationListener>
    }
}

impl<C: ObservableCollection> CollectionCore<C> {
    fn len(&self) -> usize {
        self.refresh().map_or(0, |c| c.len())
    }

    /// Current value, recomputing (and re-attaching the relay) if invalid.
    fn refresh(&self) -> Option<C> {
        if self.valid.get() {
            return self.value.borrow().clone();
        }
        let next = (self.compute)();
        *self.value.borrow_mut() = next.clone();
        self.valid.set(true);
        self.detach_relay();
        if let Some(collection) = &next {
            collection.add_content_listener(&self.relay);
            *self.attached.borrow_mut() = Some(collection.clone());
        }
        next
    }

    fn detach_relay(&self) {
        let attached = self.attached.borrow_mut().take();
        if let Some(collection) = attached {
            collection.remove_content_listener(&self.relay);
        }
    }

    fn invalidate(&self) {
        if !self.valid.get() {
            return;
        }
        self.valid.set(false);
        self.detach_relay();
        self.listeners.fire(self);
        self.size.fire();
        self.empty.fire();
        if !self.content.is_empty() {
            self.report_replacement();
        }
    }

    fn report_replacement(&self) {
        let next = self.refresh();
        let previous = self.reported.replace(next.clone());
        if previous == next {
            return;
        }
        let changes = C::replacement(previous.as_ref(), next.as_ref());
        trace!(changes = changes.len(), "collection replaced");
        self.dispatch(&changes);
    }

    fn on_content_changed(&self, change: &C::Change) {
        self.size.fire();
        self.empty.fire();
        self.listeners.fire_invalidation(self);
        self.dispatch(std::slice::from_ref(change));
    }

    fn dispatch(&self, changes: &[C::Change]) {
        let listeners = self.content.snapshot();
        for change in changes {
            for listener in &listeners {
                change.reset();
                listener.on_changed(change);
            }
        }
    }
}

impl<C: ObservableCollection> InvalidationListener for CollectionCore<C> {
    fn invalidated(&self, _observable: &dyn Observable) {
        self.invalidate();
    }
}

impl<C: ObservableCollection> Observable for CollectionCore<C> {
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.listeners.add_invalidation(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.listeners.remove_invalidation(listener);
    }

    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.listeners.contains_invalidation(listener)
    }
}

impl<C: ObservableCollection> ObservableValue<Option<C>> for CollectionCore<C> {
    fn value(&self) -> Option<C> {
        self.refresh()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) {
        self.listeners.add_change(listener, || self.refresh());
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) {
        self.listeners.remove_change(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) -> bool {
        self.listeners.contains_change(listener)
    }
}

impl<C: ObservableCollection> Observable for CollectionBinding<C> {
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.core.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.core.remove_listener(listener);
    }

    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.core.contains_listener(listener)
    }
}

impl<C: ObservableCollection> ObservableValue<Option<C>> for CollectionBinding<C> {
    fn value(&self) -> Option<C> {
        self.get()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) {
        self.core.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) {
        self.core.remove_change_listener(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<Option<C>>>) -> bool {
        self.core.contains_change_listener(listener)
    }
}

impl<C: ObservableCollection> AsDependency for CollectionBinding<C> {
    fn as_dependency(&self) -> Dependency {
        Dependency::new(Rc::clone(&self.core) as Rc<dyn Observable>)
    }
}

impl<C: ObservableCollection> ObservableSource for CollectionBinding<C> {
    type Value = Option<C>;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<Option<C>>> {
        Rc::clone(&self.core) as Rc<dyn ObservableValue<Option<C>>>
    }
}

impl<C: ObservableCollection> HasSize for CollectionBinding<C> {
    fn len(&self) -> usize {
        self.core.len()
    }
}

impl<C: ObservableCollection + fmt::Debug> fmt::Debug for CollectionBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionBinding")
            .field("valid", &self.core.valid.get())
            .field("value", &*self.core.value.borrow())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Pass-through queries
// ---------------------------------------------------------------------------

impl<E: Value> ListBinding<E> {
    /// Element at `index` of the current list.
    #[must_use]
    pub fn element_at(&self, index: usize) -> Option<E> {
        self.get().and_then(|list| list.get(index))
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.get().is_some_and(|list| list.contains(element))
    }

    #[must_use]
    pub fn contains_all(&self, elements: &[E]) -> bool {
        self.get().map_or(elements.is_empty(), |list| list.contains_all(elements))
    }
}

impl<E: Value + Hash + Eq> SetBinding<E> {
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.get().is_some_and(|set| set.contains(element))
    }

    #[must_use]
    pub fn contains_all(&self, elements: &[E]) -> bool {
        self.get().map_or(elements.is_empty(), |set| set.contains_all(elements))
    }
}

impl<K: Value + Hash + Eq, V: Value> MapBinding<K, V> {
    #[must_use]
    pub fn value_for(&self, key: &K) -> Option<V> {
        self.get().and_then(|map| map.get(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get().is_some_and(|map| map.contains_key(key))
    }
}

impl<E: Value + Copy + Default> ArrayBinding<E> {
    #[must_use]
    pub fn element_at(&self, index: usize) -> Option<E> {
        self.get().and_then(|array| array.get(index))
    }
}

impl<E: Value> IndexedSource<E> for ListBinding<E> {
    fn element(&self, index: usize) -> Option<E> {
        self.element_at(index)
    }
}

impl<E: Value + Copy + Default> IndexedSource<E> for ArrayBinding<E> {
    fn element(&self, index: usize) -> Option<E> {
        self.element_at(index)
    }
}

impl<K: Value + Hash + Eq, V: Value> KeyedSource<K, V> for MapBinding<K, V> {
    fn lookup(&self, key: &K) -> Option<V> {
        self.value_for(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{ListChange, SetChange, content_listener};
    use crate::reactive::{Property, invalidation_listener};

    fn counter() -> (Rc<Cell<u32>>, Rc<dyn InvalidationListener>) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, invalidation_listener(move |_| h.set(h.get() + 1)))
    }

    #[test]
    fn size_tracks_in_place_mutation_without_invalidating() {
        let list = ObservableList::from(vec![1, 2]);
        let binding = ListBinding::of(list.clone());
        assert_eq!(binding.size_property().get(), 2);
        let (hits, listener) = counter();
        binding.add_listener(&listener);
        list.push(3);
        assert!(binding.is_valid());
        assert_eq!(binding.size_property().get(), 3);
        assert!(!binding.empty_property().get());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn absent_collection_reads_empty() {
        let binding: ListBinding<i32> = ListBinding::new(std::iter::empty(), || None);
        assert_eq!(binding.size_property().get(), 0);
        assert!(binding.empty_property().get());
        assert_eq!(binding.element_at(0), None);
    }

    #[test]
    fn sub_properties_report_the_binding_as_bean() {
        let binding = ListBinding::of(ObservableList::from(vec![1]));
        let bean = binding.size_property().bean().unwrap();
        assert!(Rc::ptr_eq(&bean, &binding.as_bean()));
        assert_eq!(binding.size_property().name(), "size");
        assert_eq!(binding.empty_property().name(), "empty");
    }

    #[test]
    fn content_changes_are_relayed() {
        let list = ObservableList::from(vec![1]);
        let binding = ListBinding::of(list.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let listener = content_listener(move |change: &ListChange<i32>| {
            while change.next() {
                s.borrow_mut().push(change.added_sublist().to_vec());
            }
        });
        binding.add_content_listener(&listener);
        list.extend([2, 3]);
        assert_eq!(*seen.borrow(), vec![vec![2, 3]]);
    }

    #[test]
    fn swapping_the_collection_synthesizes_replace() {
        let first = ObservableList::from(vec![1, 2]);
        let second = ObservableList::from(vec![9]);
        let holder = Property::new(Some(first.clone()));
        let binding = ListBinding::follow(&holder);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let listener = content_listener(move |change: &ListChange<i32>| {
            while change.next() {
                s.borrow_mut().push((change.removed_elements().to_vec(), change.added_sublist().to_vec()));
            }
        });
        binding.add_content_listener(&listener);
        holder.set(Some(second.clone())).unwrap();
        assert_eq!(*seen.borrow(), vec![(vec![1, 2], vec![9])]);

        // The relay moved to the new list.
        first.push(5);
        assert_eq!(seen.borrow().len(), 1);
        second.push(10);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(binding.size_property().get(), 2);
    }

    #[test]
    fn invalidation_updates_size_listeners() {
        let holder = Property::new(Some(ObservableList::from(vec![1, 2, 3])));
        let binding = ListBinding::follow(&holder);
        let size = binding.size_property().clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let listener = crate::reactive::change_listener(move |_: &i32, new: &i32| s.borrow_mut().push(*new));
        size.add_change_listener(&listener);
        holder.set(None).unwrap();
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn set_binding_swap_reports_only_differences() {
        let holder = Property::new(Some(["a", "b"].into_iter().collect::<ObservableSet<_>>()));
        let binding = SetBinding::follow(&holder);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let listener = content_listener(move |c: &SetChange<&'static str>| s.borrow_mut().push(c.clone()));
        binding.add_content_listener(&listener);
        holder.set(Some(["a", "c"].into_iter().collect())).unwrap();
        assert_eq!(*seen.borrow(), vec![SetChange::Removed("b"), SetChange::Added("c")]);
        assert_eq!(binding.size_property().get(), 2);
    }

    #[test]
    fn dispose_detaches_relay() {
        let list = ObservableList::from(vec![1]);
        let binding = ListBinding::of(list.clone());
        binding.get();
        let (hits, listener) = counter();
        binding.add_listener(&listener);
        binding.dispose();
        list.push(2);
        assert_eq!(hits.get(), 0);
    }
}
