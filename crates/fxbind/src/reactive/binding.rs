#![forbid(unsafe_code)]

//! Lazily evaluated, cached bindings over a set of dependencies.
//!
//! A [`Binding<T>`] subscribes (weakly) to its dependencies and keeps a
//! cached value plus a validity flag. A dependency notification only marks
//! the binding invalid and forwards the notification; the compute function
//! runs on the next read.
//!
//! # Usage
//!
//! ```ignore
//! use fxbind::reactive::{Binding, Property, AsDependency};
//!
//! let width = Property::new(3);
//! let w = width.clone();
//! let area = Binding::new([width.as_dependency()], move || w.get() * w.get());
//! assert_eq!(area.get(), 9);
//!
//! width.set(4)?;
//! assert!(!area.is_valid());
//! assert_eq!(area.get(), 16);
//! ```
//!
//! # Invariants
//!
//! 1. While valid, `get()` returns the cached value without recomputing.
//! 2. Invalidation is edge-triggered: a valid binding fires its listeners
//!    once and ignores further notifications until it is read again.
//! 3. Each dependency is subscribed at most once, regardless of how many
//!    times it is listed.
//! 4. Dependencies never keep the binding alive.
//!
//! # Failure Modes
//!
//! - Compute panic: propagates to the caller of `get()`; the binding stays
//!   invalid.
//! - Binding dropped while a dependency lives: the dependency prunes the dead
//!   listener on its next notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::listeners::ValueListeners;
use super::observable::{
    AsDependency, ChangeListener, Dependency, InvalidationListener, Observable, ObservableSource,
    ObservableValue, Value,
};

/// Decides whether a notification from a given dependency can affect the
/// binding's value. Used for short-circuit operators.
pub(crate) type Gate = Box<dyn Fn(&dyn Observable) -> bool>;

// ---------------------------------------------------------------------------
// DependencySet: deduplicated subscriptions
// ---------------------------------------------------------------------------

/// The observables a binding listens to.
#[derive(Default)]
pub(crate) struct DependencySet {
    deps: RefCell<Vec<Dependency>>,
}

impl DependencySet {
    /// Subscribe `listener` to every new dependency in `deps`.
    pub(crate) fn attach(&self, listener: &Rc<dyn InvalidationListener>, deps: impl IntoIterator<Item = Dependency>) {
        for dep in deps {
            if self.deps.borrow().iter().any(|d| d.ptr_eq(&dep)) {
                continue;
            }
            dep.observable().add_listener(listener);
            self.deps.borrow_mut().push(dep);
        }
    }

    /// Unsubscribe `listener` from each of `deps` that is present.
    pub(crate) fn detach(&self, listener: &Rc<dyn InvalidationListener>, deps: impl IntoIterator<Item = Dependency>) {
        for dep in deps {
            let position = self.deps.borrow().iter().position(|d| d.ptr_eq(&dep));
            if let Some(index) = position {
                let removed = self.deps.borrow_mut().remove(index);
                removed.observable().remove_listener(listener);
            }
        }
    }

    /// Unsubscribe from everything.
    pub(crate) fn clear(&self, listener: &Rc<dyn InvalidationListener>) {
        let deps = std::mem::take(&mut *self.deps.borrow_mut());
        for dep in deps {
            dep.observable().remove_listener(listener);
        }
    }

    pub(crate) fn list(&self) -> Vec<Dependency> {
        self.deps.borrow().clone()
    }
}

// ---------------------------------------------------------------------------
// Binding<T>
// ---------------------------------------------------------------------------

/// A memoized value derived from other observables.
///
/// Cloning the handle yields another reference to the same binding.
pub struct Binding<T: Value> {
    core: Rc<BindingCore<T>>,
}

pub(crate) struct BindingCore<T> {
    valid: Cell<bool>,
    value: RefCell<Option<T>>,
    compute: Box<dyn Fn() -> T>,
    gate: Option<Gate>,
    dependencies: DependencySet,
    listeners: ValueListeners<T>,
}

impl<T: Value> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T: Value> Binding<T> {
    /// Create a binding over `dependencies`. Starts invalid; `compute` runs
    /// on the first read.
    pub fn new(dependencies: impl IntoIterator<Item = Dependency>, compute: impl Fn() -> T + 'static) -> Self {
        Self::build(dependencies, None, Box::new(compute))
    }

    /// A binding with no dependencies: computed once, on first read.
    pub fn computed(compute: impl Fn() -> T + 'static) -> Self {
        Self::build(std::iter::empty(), None, Box::new(compute))
    }

    /// A binding that ignores notifications rejected by `gate`.
    pub(crate) fn gated(
        dependencies: impl IntoIterator<Item = Dependency>,
        gate: impl Fn(&dyn Observable) -> bool + 'static,
        compute: impl Fn() -> T + 'static,
    ) -> Self {
        Self::build(dependencies, Some(Box::new(gate)), Box::new(compute))
    }

    fn build(dependencies: impl IntoIterator<Item = Dependency>, gate: Option<Gate>, compute: Box<dyn Fn() -> T>) -> Self {
        let binding = Self {
            core: Rc::new(BindingCore {
                valid: Cell::new(false),
                value: RefCell::new(None),
                compute,
                gate,
                dependencies: DependencySet::default(),
                listeners: ValueListeners::default(),
            }),
        };
        binding.bind(dependencies);
        binding
    }

    /// Current value, recomputed only if the binding is invalid.
    #[must_use]
    pub fn get(&self) -> T {
        self.core.value()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.core.valid.get()
    }

    /// Mark the binding stale and notify listeners, as if a dependency had
    /// changed. No-op when already invalid.
    pub fn invalidate(&self) {
        self.core.invalidate();
    }

    /// Start observing additional dependencies.
    pub fn bind(&self, dependencies: impl IntoIterator<Item = Dependency>) {
        self.core.dependencies.attach(&self.as_listener(), dependencies);
    }

    /// Stop observing the given dependencies.
    pub fn unbind(&self, dependencies: impl IntoIterator<Item = Dependency>) {
        self.core.dependencies.detach(&self.as_listener(), dependencies);
    }

    /// Stop observing all dependencies. The cached value is kept.
    pub fn dispose(&self) {
        self.core.dependencies.clear(&self.as_listener());
    }

    /// The dependencies currently observed, in subscription order.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.core.dependencies.list()
    }

    /// Derive a new binding that transforms this one.
    pub fn then<U: Value>(&self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        let source = self.clone();
        Binding::new([self.as_dependency()], move || f(source.get()))
    }

    fn as_listener(&self) -> Rc<dyn InvalidationListener> {
        Rc::clone(&self.core) as Rc<dyn InvalidationListener>
    }
}

impl<T: Value> BindingCore<T> {
    fn invalidate(&self) {
        if !self.valid.get() {
            return;
        }
        self.valid.set(false);
        self.listeners.fire(self);
    }
}

impl<T: Value> InvalidationListener for BindingCore<T> {
    fn invalidated(&self, observable: &dyn Observable) {
        if !self.valid.get() {
            return;
        }
        if let Some(gate) = &self.gate
            && !gate(observable)
        {
            return;
        }
        self.invalidate();
    }
}

impl<T: Value> Observable for BindingCore<T> {
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

impl<T: Value> ObservableValue<T> for BindingCore<T> {
    fn value(&self) -> T {
        if self.valid.get()
            && let Some(value) = self.value.borrow().as_ref()
        {
            return value.clone();
        }
        let value = (self.compute)();
        *self.value.borrow_mut() = Some(value.clone());
        self.valid.set(true);
        value
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

impl<T: Value> Observable for Binding<T> {
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

impl<T: Value> ObservableValue<T> for Binding<T> {
    fn value(&self) -> T {
        self.get()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.core.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) {
        self.core.remove_change_listener(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool {
        self.core.contains_change_listener(listener)
    }
}

impl<T: Value> AsDependency for Binding<T> {
    fn as_dependency(&self) -> Dependency {
        Dependency::new(Rc::clone(&self.core) as Rc<dyn Observable>)
    }
}

impl<T: Value> ObservableSource for Binding<T> {
    type Value = T;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<T>> {
        Rc::clone(&self.core) as Rc<dyn ObservableValue<T>>
    }
}

impl<T: Value + fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("valid", &self.core.valid.get())
            .field("value", &*self.core.value.borrow())
            .field("dependencies", &self.core.dependencies.deps.borrow().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Create a [`Binding`] from a list of dependencies and a compute closure.
///
/// ```ignore
/// let total = binding!([price, qty], move || price.get() * qty.get());
/// ```
#[macro_export]
macro_rules! binding {
    ([$($dep:expr),* $(,)?], $compute:expr) => {
        $crate::reactive::Binding::new(
            vec![$($crate::reactive::AsDependency::as_dependency(&$dep)),*],
            $compute,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Property;
    use crate::reactive::observable::{change_listener, invalidation_listener};

    fn counter() -> (Rc<Cell<u32>>, Rc<dyn InvalidationListener>) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, invalidation_listener(move |_| h.set(h.get() + 1)))
    }

    fn tracked_sum(a: &Property<i32>, b: &Property<i32>) -> (Binding<i32>, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let (ra, rb, r) = (a.clone(), b.clone(), Rc::clone(&runs));
        let sum = binding!([a, b], move || {
            r.set(r.get() + 1);
            ra.get() + rb.get()
        });
        (sum, runs)
    }

    #[test]
    fn starts_invalid_and_computes_once() {
        let a = Property::new(1);
        let b = Property::new(2);
        let (sum, runs) = tracked_sum(&a, &b);
        assert!(!sum.is_valid());
        assert_eq!(sum.get(), 3);
        assert_eq!(sum.get(), 3);
        assert_eq!(runs.get(), 1);
        assert!(sum.is_valid());
    }

    #[test]
    fn many_mutations_one_recompute() {
        let a = Property::new(0);
        let b = Property::new(0);
        let (sum, runs) = tracked_sum(&a, &b);
        sum.get();
        for i in 0..10 {
            a.set(i).unwrap();
            b.set(i).unwrap();
        }
        assert_eq!(sum.get(), 18);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn invalidation_fires_once_until_read() {
        let a = Property::new(0);
        let b = Property::new(0);
        let (sum, _) = tracked_sum(&a, &b);
        let (hits, listener) = counter();
        sum.add_listener(&listener);
        sum.get();
        a.set(1).unwrap();
        a.set(2).unwrap();
        b.set(3).unwrap();
        assert_eq!(hits.get(), 1);
        sum.get();
        a.set(4).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn change_listener_filters_equal_results() {
        let a = Property::new(1);
        let b = Property::new(1);
        let (sum, _) = tracked_sum(&a, &b);
        let changes = Rc::new(Cell::new(0));
        let c = Rc::clone(&changes);
        let listener = change_listener(move |_: &i32, _: &i32| c.set(c.get() + 1));
        sum.add_change_listener(&listener);
        a.set(2).unwrap();
        b.set(1).unwrap();
        assert_eq!(changes.get(), 1);
        b.set(5).unwrap();
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn duplicate_dependency_subscribes_once() {
        let a = Property::new(1);
        let ra = a.clone();
        let doubled = binding!([a, a], move || ra.get() * 2);
        assert_eq!(doubled.dependencies().len(), 1);
        let (hits, listener) = counter();
        doubled.add_listener(&listener);
        doubled.get();
        a.set(2).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unbind_and_dispose_stop_tracking() {
        let a = Property::new(1);
        let b = Property::new(1);
        let (sum, _) = tracked_sum(&a, &b);
        sum.get();
        sum.unbind([a.as_dependency()]);
        a.set(10).unwrap();
        assert!(sum.is_valid());
        sum.dispose();
        b.set(10).unwrap();
        assert!(sum.is_valid());
        assert!(sum.dependencies().is_empty());
    }

    #[test]
    fn forced_invalidate_recomputes() {
        let runs = Rc::new(Cell::new(0));
        let r = Rc::clone(&runs);
        let b = Binding::computed(move || {
            r.set(r.get() + 1);
            42
        });
        b.get();
        b.invalidate();
        assert!(!b.is_valid());
        assert_eq!(b.get(), 42);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn binding_does_not_outlive_handle() {
        let a = Property::new(1);
        let weak = {
            let ra = a.clone();
            let b = binding!([a], move || ra.get());
            b.get();
            Rc::downgrade(&b.core)
        };
        assert!(weak.upgrade().is_none());
        a.set(2).unwrap();
    }

    #[test]
    fn then_chains() {
        let a = Property::new(2);
        let ra = a.clone();
        let label = binding!([a], move || ra.get()).then(|v| format!("n={v}"));
        assert_eq!(label.get(), "n=2");
        a.set(3).unwrap();
        assert_eq!(label.get(), "n=3");
    }
}
