//! Observable capabilities, listener traits, and type-erased handles.
//!
//! An [`Observable`] can tell listeners that it *may* have changed
//! (invalidation). An [`ObservableValue`] additionally carries a value and
//! reports actual changes (old and new value) to [`ChangeListener`]s.
//!
//! Listener registration is identity based: the `Rc` allocation is the
//! listener's identity, so adding the same `Rc` twice is a no-op. Every
//! observable stores its listeners as `Weak` references, so the caller owns
//! the listener and dropping the last `Rc` silently unsubscribes it.

use std::fmt;
use std::rc::Rc;

/// Values that can flow through properties and bindings.
pub trait Value: Clone + PartialEq + 'static {}

impl<T: Clone + PartialEq + 'static> Value for T {}

/// Receives "this may be stale now" notifications.
pub trait InvalidationListener {
    fn invalidated(&self, observable: &dyn Observable);
}

impl<F: Fn(&dyn Observable)> InvalidationListener for F {
    fn invalidated(&self, observable: &dyn Observable) {
        self(observable);
    }
}

/// Receives old/new value pairs when an observable value actually changes.
pub trait ChangeListener<T> {
    fn changed(&self, observable: &dyn ObservableValue<T>, old: &T, new: &T);
}

impl<T, F: Fn(&dyn ObservableValue<T>, &T, &T)> ChangeListener<T> for F {
    fn changed(&self, observable: &dyn ObservableValue<T>, old: &T, new: &T) {
        self(observable, old, new);
    }
}

/// Anything that can notify listeners when it changes.
pub trait Observable {
    /// Register `listener`. Adding an already registered listener is a no-op.
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>);
    /// Unregister `listener`. No-op if it was never added.
    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>);
    /// Whether `listener` is currently registered and alive.
    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool;
}

/// An observable that holds a current value.
pub trait ObservableValue<T>: Observable {
    /// The current value, recomputing it first if it is stale.
    fn value(&self) -> T;
    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>);
    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>);
    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<T>>) -> bool;
}

/// Wrap a closure as a shareable invalidation listener.
///
/// Keep the returned `Rc` alive for as long as the listener should fire.
pub fn invalidation_listener(f: impl Fn(&dyn Observable) + 'static) -> Rc<dyn InvalidationListener> {
    Rc::new(f)
}

/// Wrap an `(old, new)` closure as a shareable change listener.
pub fn change_listener<T: 'static>(f: impl Fn(&T, &T) + 'static) -> Rc<dyn ChangeListener<T>> {
    Rc::new(move |_: &dyn ObservableValue<T>, old: &T, new: &T| f(old, new))
}

// ---------------------------------------------------------------------------
// Dependency: type-erased observable identity
// ---------------------------------------------------------------------------

/// A shared, type-erased reference to an observable.
///
/// Bindings keep their dependencies alive through these handles; the
/// dependencies only hold the binding weakly. Two `Dependency` values are the
/// same dependency when they point at the same allocation.
#[derive(Clone)]
pub struct Dependency(Rc<dyn Observable>);

impl Dependency {
    #[must_use]
    pub fn new(observable: Rc<dyn Observable>) -> Self {
        Self(observable)
    }

    /// The underlying observable.
    #[must_use]
    pub fn observable(&self) -> &dyn Observable {
        &*self.0
    }

    /// Whether both handles refer to the same observable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `observable` (as passed to a listener) is this dependency.
    #[must_use]
    pub fn is(&self, observable: &dyn Observable) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), observable as *const dyn Observable)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dependency")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Handles that can be listed as a binding dependency.
pub trait AsDependency {
    fn as_dependency(&self) -> Dependency;
}

impl AsDependency for Dependency {
    fn as_dependency(&self) -> Dependency {
        self.clone()
    }
}

impl<T: AsDependency + ?Sized> AsDependency for &T {
    fn as_dependency(&self) -> Dependency {
        (**self).as_dependency()
    }
}

/// Handles that expose a typed observable value.
///
/// Implemented by every property and binding handle; this is what lets any
/// of them be used as an operand or a bind source.
pub trait ObservableSource: AsDependency {
    type Value: Value;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<Self::Value>>;
}

// ---------------------------------------------------------------------------
// Operand: observable or literal input to a derived binding
// ---------------------------------------------------------------------------

/// One input of a derived binding: either an observable or a constant.
///
/// Anything implementing [`ObservableSource`] converts into an operand by
/// reference, so `bindings::and(&a, &b)` and `a.and(&b)` both work.
pub struct Operand<T> {
    dependency: Option<Dependency>,
    read: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Operand<T> {
    fn clone(&self) -> Self {
        Self {
            dependency: self.dependency.clone(),
            read: Rc::clone(&self.read),
        }
    }
}

impl<T: Value> Operand<T> {
    /// A fixed value that never invalidates anything.
    pub fn constant(value: T) -> Self {
        Self {
            dependency: None,
            read: Rc::new(move || value.clone()),
        }
    }

    /// Read the current value of an observable source.
    pub fn observe<S: ObservableSource<Value = T> + ?Sized>(source: &S) -> Self {
        let observable = source.as_observable_value();
        Self {
            dependency: Some(source.as_dependency()),
            read: Rc::new(move || observable.value()),
        }
    }

    /// Transform the operand's value; the dependency is unchanged.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Operand<U> {
        let read = self.read;
        Operand {
            dependency: self.dependency,
            read: Rc::new(move || f(read())),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.read)()
    }

    /// The observable behind this operand, `None` for constants.
    #[must_use]
    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    /// Whether `observable` is the source of this operand.
    #[must_use]
    pub fn is(&self, observable: &dyn Observable) -> bool {
        self.dependency.as_ref().is_some_and(|d| d.is(observable))
    }
}

impl<S: ObservableSource> From<&S> for Operand<S::Value> {
    fn from(source: &S) -> Self {
        Operand::observe(source)
    }
}

impl From<bool> for Operand<bool> {
    fn from(value: bool) -> Self {
        Operand::constant(value)
    }
}

impl From<&str> for Operand<Option<String>> {
    fn from(value: &str) -> Self {
        Operand::constant(Some(value.to_string()))
    }
}

impl From<String> for Operand<Option<String>> {
    fn from(value: String) -> Self {
        Operand::constant(Some(value))
    }
}

macro_rules! literal_operand {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Operand<$ty> {
            fn from(value: $ty) -> Self {
                Operand::constant(value)
            }
        }
    )*};
}

literal_operand!(f64, f32, i64, i32, i16, i8);

/// Collect the dependencies of a set of operands, skipping constants.
pub(crate) fn dependencies_of<'a>(
    deps: impl IntoIterator<Item = Option<&'a Dependency>>,
) -> Vec<Dependency> {
    deps.into_iter().flatten().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Property;
    use std::cell::Cell;

    #[test]
    fn constant_operand_has_no_dependency() {
        let op = Operand::constant(5);
        assert_eq!(op.get(), 5);
        assert!(op.dependency().is_none());
    }

    #[test]
    fn observed_operand_reads_through() {
        let p = Property::new(1);
        let op = Operand::from(&p);
        p.set(7).unwrap();
        assert_eq!(op.get(), 7);
        assert!(op.dependency().unwrap().ptr_eq(&p.as_dependency()));
    }

    #[test]
    fn mapped_operand_keeps_dependency() {
        let p = Property::new(2);
        let doubled = Operand::from(&p).map(|v| v * 2);
        assert_eq!(doubled.get(), 4);
        assert!(doubled.dependency().is_some());
    }

    #[test]
    fn dependency_identity() {
        let a = Property::new(0);
        let b = Property::new(0);
        assert!(a.as_dependency().ptr_eq(&a.as_dependency()));
        assert!(!a.as_dependency().ptr_eq(&b.as_dependency()));
    }

    #[test]
    fn closure_listeners_fire() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let listener = invalidation_listener(move |_| h.set(h.get() + 1));
        let p = Property::new(0);
        p.add_listener(&listener);
        p.set(1).unwrap();
        assert_eq!(hits.get(), 1);
    }
}
