//! Writable observable values and their read-only derived counterpart.
//!
//! A [`Property`] owns a value, notifies on every `set`, and can follow
//! another observable:
//!
//! - **Unidirectional** ([`Property::bind`]): the property adopts the
//!   source's value immediately and re-reads it whenever the source
//!   invalidates. A bound property rejects `set`.
//! - **Bidirectional** ([`Property::bind_bidirectional`]): two properties
//!   mirror each other. The binding property adopts the other's value first.
//!
//! # Invariants
//!
//! 1. `set` fires invalidation listeners every time and change listeners
//!    only when the value actually changed.
//! 2. A bound property's value equals its source's value after every
//!    source notification.
//! 3. Bidirectional updates never echo: a write relayed from A to B is not
//!    relayed back to A.
//! 4. Neither binding direction keeps the *listening* side alive from the
//!    source; only the bound property holds its source strongly.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `set` on bound property | Unidirectional bind active | `Err(BindError::Bound)` |
//! | Bind to self | Same property on both sides | `Err(BindError::SelfBinding)` |
//! | Bind cycle | `a.bind(b)` and `b.bind(a)` | Re-entrant update is ignored |
//! | Peer dropped | Other side of a bidirectional link freed | Link goes inert |

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::listeners::ValueListeners;
use super::observable::{
    AsDependency, ChangeListener, Dependency, InvalidationListener, Observable, ObservableSource,
    ObservableValue, Value,
};
use crate::error::BindError;

/// The user-visible owner of a property (for introspection only).
pub type Bean = Rc<dyn Any>;

/// A writable, observable value.
///
/// Cloning the handle yields another reference to the same property.
pub struct Property<T: Value> {
    inner: Rc<PropertyCore<T>>,
}

pub(crate) struct PropertyCore<T> {
    bean: Option<Weak<dyn Any>>,
    name: String,
    value: RefCell<T>,
    source: RefCell<Option<BoundSource<T>>>,
    links: RefCell<Vec<Rc<BidirectionalLink<T>>>>,
    updating: Cell<bool>,
    listeners: ValueListeners<T>,
}

struct BoundSource<T> {
    value: Rc<dyn ObservableValue<T>>,
    dependency: Dependency,
}

impl<T: Value> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Value + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Value> Property<T> {
    /// Create an anonymous property without a bean.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::build(None, String::new(), value)
    }

    /// Create a property with a name used in diagnostics.
    #[must_use]
    pub fn named(name: impl Into<String>, value: T) -> Self {
        Self::build(None, name.into(), value)
    }

    /// Create a property owned by `bean`. The bean is held weakly.
    #[must_use]
    pub fn owned(bean: &Bean, name: impl Into<String>, value: T) -> Self {
        Self::build(Some(Rc::downgrade(bean)), name.into(), value)
    }

    fn build(bean: Option<Weak<dyn Any>>, name: String, value: T) -> Self {
        Self {
            inner: Rc::new(PropertyCore {
                bean,
                name,
                value: RefCell::new(value),
                source: RefCell::new(None),
                links: RefCell::new(Vec::new()),
                updating: Cell::new(false),
                listeners: ValueListeners::default(),
            }),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Apply a closure to the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Store a new value and notify listeners.
    ///
    /// Invalidation listeners fire on every call, even when the value is
    /// unchanged; change listeners only when it differs.
    pub fn set(&self, value: T) -> Result<(), BindError> {
        if self.is_bound() {
            return Err(BindError::Bound {
                name: self.inner.name.clone(),
            });
        }
        self.inner.store(value);
        Ok(())
    }

    /// Store without the bound check. Used for engine-owned properties.
    pub(crate) fn store(&self, value: T) {
        self.inner.store(value);
    }

    /// Owner of this property, if any and still alive.
    #[must_use]
    pub fn bean(&self) -> Option<Bean> {
        self.inner.bean.as_ref().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the property follows another observable (unidirectionally).
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.source.borrow().is_some()
    }

    /// Follow `source`: adopt its value now and on every invalidation.
    ///
    /// Rebinding replaces the previous source.
    pub fn bind<S>(&self, source: &S) -> Result<(), BindError>
    where
        S: ObservableSource<Value = T> + ?Sized,
    {
        let dependency = source.as_dependency();
        if dependency.is(&*self.inner) {
            return Err(BindError::SelfBinding);
        }
        if let Some(current) = self.inner.source.borrow().as_ref()
            && current.dependency.ptr_eq(&dependency)
        {
            return Ok(());
        }
        self.detach_source();
        let listener = self.as_listener();
        dependency.observable().add_listener(&listener);
        let value = source.as_observable_value();
        *self.inner.source.borrow_mut() = Some(BoundSource {
            value: Rc::clone(&value),
            dependency,
        });
        debug!(property = %self.inner.name, "bound to source");
        self.inner.store(value.value());
        Ok(())
    }

    /// Stop following the source and drop every bidirectional link.
    ///
    /// The current value is kept.
    pub fn unbind(&self) {
        self.detach_source();
        let links: Vec<_> = self.inner.links.borrow().clone();
        for link in links {
            link.detach();
        }
    }

    fn detach_source(&self) {
        let previous = self.inner.source.borrow_mut().take();
        if let Some(previous) = previous {
            previous.dependency.observable().remove_listener(&self.as_listener());
        }
    }

    fn as_listener(&self) -> Rc<dyn InvalidationListener> {
        Rc::clone(&self.inner) as Rc<dyn InvalidationListener>
    }

    /// Mirror `other`: this property adopts `other`'s value, then writes to
    /// either side are copied to the other.
    pub fn bind_bidirectional(&self, other: &Property<T>) -> Result<(), BindError> {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return Err(BindError::SelfBinding);
        }
        if self.link_to(other).is_some() {
            return Ok(());
        }
        self.set(other.get())?;

        let updating = Rc::new(Cell::new(false));
        let to_other: Rc<dyn ChangeListener<T>> = Rc::new(Mirror {
            target: Rc::downgrade(&other.inner),
            updating: Rc::clone(&updating),
        });
        let to_self: Rc<dyn ChangeListener<T>> = Rc::new(Mirror {
            target: Rc::downgrade(&self.inner),
            updating,
        });
        self.inner.listeners.add_change(&to_other, || self.get());
        other.inner.listeners.add_change(&to_self, || other.get());

        let link = Rc::new(BidirectionalLink {
            a: Rc::downgrade(&self.inner),
            b: Rc::downgrade(&other.inner),
            a_to_b: to_other,
            b_to_a: to_self,
        });
        self.inner.links.borrow_mut().push(Rc::clone(&link));
        other.inner.links.borrow_mut().push(link);
        Ok(())
    }

    /// Remove the bidirectional link with `other`, if any.
    pub fn unbind_bidirectional(&self, other: &Property<T>) {
        if let Some(link) = self.link_to(other) {
            link.detach();
        }
    }

    fn link_to(&self, other: &Property<T>) -> Option<Rc<BidirectionalLink<T>>> {
        self.inner
            .links
            .borrow()
            .iter()
            .find(|link| link.joins(&self.inner, &other.inner))
            .cloned()
    }
}

/// Marks an update in flight; cleared on drop so a panicking listener does
/// not leave the flag set.
struct UpdateGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> UpdateGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl<T: Value> PropertyCore<T> {
    fn store(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.listeners.fire(self);
    }
}

impl<T: Value> InvalidationListener for PropertyCore<T> {
    fn invalidated(&self, _observable: &dyn Observable) {
        if self.updating.get() {
            debug!(property = %self.name, "ignoring re-entrant source update");
            return;
        }
        let Some(source) = self.source.borrow().as_ref().map(|s| Rc::clone(&s.value)) else {
            return;
        };
        let _guard = UpdateGuard::enter(&self.updating);
        let value = source.value();
        self.store(value);
    }
}

impl<T: Value> Observable for PropertyCore<T> {
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

impl<T: Value> ObservableValue<T> for PropertyCore<T> {
    fn value(&self) -> T {
        self.value.borrow().clone()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.listeners.add_change(listener, || self.value());
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.listeners.remove_change(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.listeners.contains_change(listener)
    }
}

// ---------------------------------------------------------------------------
// Bidirectional links
// ---------------------------------------------------------------------------

/// Copies a changed value onto the peer unless a copy is already in flight.
struct Mirror<T> {
    target: Weak<PropertyCore<T>>,
    updating: Rc<Cell<bool>>,
}

impl<T: Value> ChangeListener<T> for Mirror<T> {
    fn changed(&self, _observable: &dyn ObservableValue<T>, _old: &T, new: &T) {
        if self.updating.get() {
            return;
        }
        let Some(target) = self.target.upgrade() else {
            return;
        };
        if target.source.borrow().is_some() {
            warn!(property = %target.name, "bidirectional peer is bound; update dropped");
            return;
        }
        let _guard = UpdateGuard::enter(&self.updating);
        target.store(new.clone());
    }
}

/// One mirrored pair. Held strongly by both properties.
struct BidirectionalLink<T> {
    a: Weak<PropertyCore<T>>,
    b: Weak<PropertyCore<T>>,
    a_to_b: Rc<dyn ChangeListener<T>>,
    b_to_a: Rc<dyn ChangeListener<T>>,
}

impl<T: Value> BidirectionalLink<T> {
    fn joins(&self, x: &Rc<PropertyCore<T>>, y: &Rc<PropertyCore<T>>) -> bool {
        let is = |w: &Weak<PropertyCore<T>>, c: &Rc<PropertyCore<T>>| std::ptr::eq(w.as_ptr(), Rc::as_ptr(c));
        (is(&self.a, x) && is(&self.b, y)) || (is(&self.a, y) && is(&self.b, x))
    }

    fn detach(self: &Rc<Self>) {
        for (side, listener) in [(&self.a, &self.a_to_b), (&self.b, &self.b_to_a)] {
            if let Some(core) = side.upgrade() {
                core.listeners.remove_change(listener);
                core.links.borrow_mut().retain(|l| !Rc::ptr_eq(l, self));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Trait plumbing for the handle
// ---------------------------------------------------------------------------

impl<T: Value> Observable for Property<T> {
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.inner.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.inner.remove_listener(listener);
    }

    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.inner.contains_listener(listener)
    }
}

impl<T: Value> ObservableValue<T> for Property<T> {
    fn value(&self) -> T {
        self.get()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.inner.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.inner.remove_change_listener(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.inner.contains_change_listener(listener)
    }
}

impl<T: Value> AsDependency for Property<T> {
    fn as_dependency(&self) -> Dependency {
        Dependency::new(Rc::clone(&self.inner) as Rc<dyn Observable>)
    }
}

impl<T: Value> ObservableSource for Property<T> {
    type Value = T;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<T>> {
        Rc::clone(&self.inner) as Rc<dyn ObservableValue<T>>
    }
}

impl<T: Value + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.borrow())
            .field("bound", &self.is_bound())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ReadOnlyProperty: read-through derived value
// ---------------------------------------------------------------------------

/// An observable value computed on every read and fired by its owner.
///
/// Used for sub-properties such as a collection binding's `size` and
/// `empty`.
pub struct ReadOnlyProperty<T: Value> {
    inner: Rc<DerivedCore<T>>,
}

pub(crate) struct DerivedCore<T> {
    bean: Option<Weak<dyn Any>>,
    name: &'static str,
    read: Box<dyn Fn() -> T>,
    listeners: ValueListeners<T>,
}

impl<T: Value> Clone for ReadOnlyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Value> ReadOnlyProperty<T> {
    pub(crate) fn derived(bean: Option<Weak<dyn Any>>, name: &'static str, read: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(DerivedCore {
                bean,
                name,
                read: Box::new(read),
                listeners: ValueListeners::default(),
            }),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.inner.read)()
    }

    #[must_use]
    pub fn bean(&self) -> Option<Bean> {
        self.inner.bean.as_ref().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Notify listeners that the underlying value may have changed.
    pub(crate) fn fire(&self) {
        self.inner.listeners.fire(&*self.inner);
    }
}

impl<T: Value> Observable for DerivedCore<T> {
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

impl<T: Value> ObservableValue<T> for DerivedCore<T> {
    fn value(&self) -> T {
        (self.read)()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.listeners.add_change(listener, || self.value());
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.listeners.remove_change(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.listeners.contains_change(listener)
    }
}

impl<T: Value> Observable for ReadOnlyProperty<T> {
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.inner.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.inner.remove_listener(listener);
    }

    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.inner.contains_listener(listener)
    }
}

impl<T: Value> ObservableValue<T> for ReadOnlyProperty<T> {
    fn value(&self) -> T {
        self.get()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.inner.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.inner.remove_change_listener(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.inner.contains_change_listener(listener)
    }
}

impl<T: Value> AsDependency for ReadOnlyProperty<T> {
    fn as_dependency(&self) -> Dependency {
        Dependency::new(Rc::clone(&self.inner) as Rc<dyn Observable>)
    }
}

impl<T: Value> ObservableSource for ReadOnlyProperty<T> {
    type Value = T;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<T>> {
        Rc::clone(&self.inner) as Rc<dyn ObservableValue<T>>
    }
}

impl<T: Value + fmt::Debug> fmt::Debug for ReadOnlyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyProperty")
            .field("name", &self.inner.name)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::observable::{change_listener, invalidation_listener};

    fn counter() -> (Rc<Cell<u32>>, Rc<dyn InvalidationListener>) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, invalidation_listener(move |_| h.set(h.get() + 1)))
    }

    #[test]
    fn set_fires_invalidation_even_when_equal() {
        let p = Property::new(3);
        let (hits, listener) = counter();
        p.add_listener(&listener);
        p.set(3).unwrap();
        p.set(3).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn change_fires_only_on_difference() {
        let p = Property::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let listener = change_listener(move |old: &i32, new: &i32| s.borrow_mut().push((*old, *new)));
        p.add_change_listener(&listener);
        p.set(1).unwrap();
        p.set(2).unwrap();
        p.set(2).unwrap();
        p.set(5).unwrap();
        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 5)]);
    }

    #[test]
    fn duplicate_listener_registration_is_noop() {
        let p = Property::new(0);
        let (hits, listener) = counter();
        p.add_listener(&listener);
        p.add_listener(&listener);
        p.set(1).unwrap();
        assert_eq!(hits.get(), 1);
        p.remove_listener(&listener);
        p.set(2).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn bind_adopts_and_follows() {
        let source = Property::new(10);
        let target = Property::new(0);
        target.bind(&source).unwrap();
        assert_eq!(target.get(), 10);
        source.set(11).unwrap();
        assert_eq!(target.get(), 11);
        assert!(target.is_bound());
    }

    #[test]
    fn set_on_bound_property_is_rejected() {
        let source = Property::new(1);
        let target = Property::named("width", 0);
        target.bind(&source).unwrap();
        assert_eq!(
            target.set(5),
            Err(BindError::Bound {
                name: "width".into()
            })
        );
        assert_eq!(target.get(), 1);
    }

    #[test]
    fn unbind_keeps_last_value() {
        let source = Property::new(1);
        let target = Property::new(0);
        target.bind(&source).unwrap();
        target.unbind();
        source.set(9).unwrap();
        assert_eq!(target.get(), 1);
        target.set(4).unwrap();
        assert_eq!(target.get(), 4);
    }

    #[test]
    fn bind_to_self_fails() {
        let p = Property::new(1);
        assert_eq!(p.bind(&p), Err(BindError::SelfBinding));
        assert_eq!(p.bind_bidirectional(&p), Err(BindError::SelfBinding));
    }

    #[test]
    fn bind_cycle_terminates() {
        let a = Property::new(1);
        let b = Property::new(2);
        a.bind(&b).unwrap();
        b.bind(&a).unwrap();
        assert_eq!(a.get(), b.get());
    }

    #[test]
    fn bidirectional_round_trip() {
        let a = Property::new(1);
        let b = Property::new(2);
        a.bind_bidirectional(&b).unwrap();
        assert_eq!(a.get(), 2);
        a.set(7).unwrap();
        assert_eq!(b.get(), 7);
        b.set(8).unwrap();
        assert_eq!(a.get(), 8);
    }

    #[test]
    fn bidirectional_does_not_echo() {
        let a = Property::new(0);
        let b = Property::new(0);
        a.bind_bidirectional(&b).unwrap();
        let (hits, listener) = counter();
        a.add_listener(&listener);
        a.set(1).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unbind_bidirectional_stops_mirroring() {
        let a = Property::new(0);
        let b = Property::new(0);
        a.bind_bidirectional(&b).unwrap();
        b.unbind_bidirectional(&a);
        a.set(3).unwrap();
        assert_eq!(b.get(), 0);
    }

    #[test]
    fn bidirectional_link_does_not_keep_peer_alive() {
        let a = Property::new(0);
        let weak = {
            let b = Property::new(5);
            a.bind_bidirectional(&b).unwrap();
            Rc::downgrade(&b.inner)
        };
        assert!(weak.upgrade().is_none());
        a.set(1).unwrap();
        assert_eq!(a.get(), 1);
    }

    fn panics_on(trigger: i32) -> Rc<dyn ChangeListener<i32>> {
        change_listener(move |_: &i32, new: &i32| assert_ne!(*new, trigger, "listener failure"))
    }

    #[test]
    fn bound_property_recovers_after_listener_panic() {
        let source = Property::new(0);
        let target = Property::new(0);
        target.bind(&source).unwrap();
        let failing = panics_on(1);
        target.add_change_listener(&failing);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| source.set(1)));
        assert!(outcome.is_err());
        drop(failing);

        source.set(2).unwrap();
        assert_eq!(target.get(), 2);
    }

    #[test]
    fn bidirectional_link_recovers_after_listener_panic() {
        let a = Property::new(0);
        let b = Property::new(0);
        a.bind_bidirectional(&b).unwrap();
        let failing = panics_on(1);
        b.add_change_listener(&failing);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| a.set(1)));
        assert!(outcome.is_err());
        drop(failing);

        a.set(5).unwrap();
        assert_eq!(b.get(), 5);
        b.set(6).unwrap();
        assert_eq!(a.get(), 6);
    }

    #[test]
    fn bean_is_weak() {
        let bean: Bean = Rc::new("owner");
        let p = Property::owned(&bean, "title", 0);
        assert!(Rc::ptr_eq(&p.bean().unwrap(), &bean));
        assert_eq!(p.name(), "title");
        drop(bean);
        assert!(p.bean().is_none());
    }

    #[test]
    fn derived_property_reads_through() {
        let backing = Rc::new(Cell::new(4));
        let b = Rc::clone(&backing);
        let derived = ReadOnlyProperty::derived(None, "size", move || b.get());
        assert_eq!(derived.get(), 4);
        backing.set(6);
        assert_eq!(derived.get(), 6);
        assert_eq!(derived.name(), "size");
    }
}
