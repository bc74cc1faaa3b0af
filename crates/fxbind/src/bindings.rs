//! Free-standing constructors for derived bindings.
//!
//! Every function here accepts observables and literals interchangeably
//! (anything convertible into an [`Operand`] or [`NumberOperand`]) and
//! returns a lazily evaluated binding that lists exactly the observable
//! inputs as dependencies. The fluent traits in [`crate::reactive`] are thin
//! wrappers over these functions.
//!
//! # Degraded reads
//!
//! Collection accessors never fail once constructed. A read that cannot be
//! satisfied yields a neutral value and emits a `tracing` event:
//!
//! | Situation | Result | Event |
//! |-----------|--------|-------|
//! | `value_at` index past the end | `None` | `debug` |
//! | Observable index negative or past the end | `None` / default | `debug` / `trace` |
//! | Primitive accessor, index past the end | type default | `trace` |
//! | Primitive accessor, element present but `None` | type default | `debug` |
//! | Map key absent | `None` / default | `trace` |
//! | Format pattern fails at render time | `None` | `warn` |
//!
//! A negative *constant* index is a programming error and is rejected when
//! the binding is built.

use std::cmp::Ordering;
use std::fmt::Display;

use fxbind_i18n::{FormatArg, FormatPattern};
use tracing::{debug, trace, warn};

use crate::collections::{HasSize, IndexedSource, KeyedSource};
use crate::error::BindError;
use crate::locale::LocaleContext;
use crate::reactive::observable::dependencies_of;
use crate::reactive::{
    ArithmeticOp, AsDependency, Binding, Number, NumberBinding, NumberKind, NumberOperand, ObservableSource,
    Operand, StringOperand, Value,
};

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

fn arithmetic(op: ArithmeticOp, a: NumberOperand, b: NumberOperand) -> NumberBinding {
    let kind = NumberKind::arithmetic(a.kind(), b.kind());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    NumberBinding::new(kind, deps, move || Number::apply(op, a.get(), b.get(), kind))
}

/// `a + b`, promoted to the wider kind.
pub fn add(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithmeticOp::Add, a.into(), b.into())
}

/// `a - b`, promoted to the wider kind.
pub fn subtract(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithmeticOp::Subtract, a.into(), b.into())
}

/// `a * b`, promoted to the wider kind.
pub fn multiply(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithmeticOp::Multiply, a.into(), b.into())
}

/// `a / b`. Integer division by zero yields 0.
pub fn divide(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    arithmetic(ArithmeticOp::Divide, a.into(), b.into())
}

pub fn negate(a: impl Into<NumberOperand>) -> NumberBinding {
    let a = a.into();
    let kind = a.kind().negation();
    let deps = dependencies_of([a.dependency()]);
    NumberBinding::new(kind, deps, move || a.get().negate(kind))
}

fn extremum(a: NumberOperand, b: NumberOperand, minimum: bool) -> NumberBinding {
    let kind = NumberKind::extremum(a.kind(), b.kind());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    NumberBinding::new(kind, deps, move || Number::extremum(a.get(), b.get(), kind, minimum))
}

/// The smaller operand. Two shorts stay short, two bytes stay byte.
pub fn min(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    extremum(a.into(), b.into(), true)
}

/// The larger operand. Two shorts stay short, two bytes stay byte.
pub fn max(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> NumberBinding {
    extremum(a.into(), b.into(), false)
}

// ---------------------------------------------------------------------------
// Numeric comparison
// ---------------------------------------------------------------------------

/// `NaN` is unordered: every ordering test on it is false.
fn compare(a: NumberOperand, b: NumberOperand, accept: impl Fn(Ordering) -> bool + 'static) -> Binding<bool> {
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || Number::compare(a.get(), b.get()).is_some_and(&accept))
}

fn within(a: NumberOperand, b: NumberOperand, epsilon: f64, expected: bool) -> Binding<bool> {
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || Number::approx_eq(a.get(), b.get(), epsilon) == expected)
}

pub fn equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), Ordering::is_eq)
}

/// `|a - b| <= epsilon`.
pub fn equal_with_epsilon(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>, epsilon: f64) -> Binding<bool> {
    within(a.into(), b.into(), epsilon, true)
}

/// True for unordered operands (`NaN`).
pub fn not_equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || Number::compare(a.get(), b.get()) != Some(Ordering::Equal))
}

pub fn not_equal_with_epsilon(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>, epsilon: f64) -> Binding<bool> {
    within(a.into(), b.into(), epsilon, false)
}

pub fn greater_than(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), Ordering::is_gt)
}

pub fn greater_than_or_equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), Ordering::is_ge)
}

pub fn less_than(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), Ordering::is_lt)
}

pub fn less_than_or_equal(a: impl Into<NumberOperand>, b: impl Into<NumberOperand>) -> Binding<bool> {
    compare(a.into(), b.into(), Ordering::is_le)
}

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

/// Logical AND. While `a` is false, changes of `b` do not invalidate.
pub fn and(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    let first = a.clone();
    Binding::gated(deps, move |source| first.is(source) || first.get(), move || a.get() && b.get())
}

/// Logical OR. While `a` is true, changes of `b` do not invalidate.
pub fn or(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    let first = a.clone();
    Binding::gated(deps, move |source| first.is(source) || !first.get(), move || a.get() || b.get())
}

pub fn not(a: impl Into<Operand<bool>>) -> Binding<bool> {
    let a = a.into();
    Binding::new(a.dependency().cloned(), move || !a.get())
}

pub fn bool_equal(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || a.get() == b.get())
}

pub fn bool_not_equal(a: impl Into<Operand<bool>>, b: impl Into<Operand<bool>>) -> Binding<bool> {
    let (a, b) = (a.into(), b.into());
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || a.get() != b.get())
}

// ---------------------------------------------------------------------------
// Conditional
// ---------------------------------------------------------------------------

/// Start a conditional binding: `when(&flag).then(a).otherwise(b)`.
pub fn when(condition: impl Into<Operand<bool>>) -> When {
    When {
        condition: condition.into(),
    }
}

/// A condition awaiting its `then` branch.
#[must_use = "a condition does nothing until `then(..).otherwise(..)` builds the binding"]
pub struct When {
    condition: Operand<bool>,
}

impl When {
    pub fn then<T: Value>(self, value: impl Into<Operand<T>>) -> WhenThen<T> {
        WhenThen {
            condition: self.condition,
            then: value.into(),
        }
    }
}

/// A condition with its `then` branch, awaiting `otherwise`.
#[must_use = "call `otherwise` to build the binding"]
pub struct WhenThen<T> {
    condition: Operand<bool>,
    then: Operand<T>,
}

impl<T: Value> WhenThen<T> {
    /// Build the binding. Only the branch currently selected by the
    /// condition can invalidate it.
    pub fn otherwise(self, value: impl Into<Operand<T>>) -> Binding<T> {
        let Self { condition, then } = self;
        let otherwise = value.into();
        let deps = dependencies_of([condition.dependency(), then.dependency(), otherwise.dependency()]);
        let (gate_condition, gate_then, gate_otherwise) = (condition.clone(), then.clone(), otherwise.clone());
        Binding::gated(
            deps,
            move |source| {
                if gate_condition.is(source) {
                    return true;
                }
                let selected = if gate_condition.get() { &gate_then } else { &gate_otherwise };
                selected.is(source)
            },
            move || if condition.get() { then.get() } else { otherwise.get() },
        )
    }
}

// ---------------------------------------------------------------------------
// Strings and objects
// ---------------------------------------------------------------------------

/// Join the text of every part; `None` parts contribute nothing.
pub fn concat(parts: impl IntoIterator<Item = StringOperand>) -> Binding<Option<String>> {
    let parts: Vec<StringOperand> = parts.into_iter().collect();
    let deps = dependencies_of(parts.iter().map(Operand::dependency));
    Binding::new(deps, move || {
        let mut out = String::new();
        for part in &parts {
            if let Some(text) = part.get() {
                out.push_str(&text);
            }
        }
        Some(out)
    })
}

/// Compare two strings with `None` read as `""`.
pub fn string_compare(
    a: StringOperand,
    b: impl Into<StringOperand>,
    ignore_case: bool,
    accept: impl Fn(Ordering) -> bool + 'static,
) -> Binding<bool> {
    let b = b.into();
    let deps = dependencies_of([a.dependency(), b.dependency()]);
    Binding::new(deps, move || {
        let (left, right) = (a.get().unwrap_or_default(), b.get().unwrap_or_default());
        let ordering = if ignore_case {
            left.to_lowercase().cmp(&right.to_lowercase())
        } else {
            left.cmp(&right)
        };
        accept(ordering)
    })
}

/// The display form of any observable value.
pub fn convert<S>(source: &S) -> Binding<Option<String>>
where
    S: ObservableSource,
    S::Value: Display,
{
    let operand = Operand::observe(source);
    Binding::new(operand.dependency().cloned(), move || Some(operand.get().to_string()))
}

pub fn is_null<T: Value>(operand: Operand<Option<T>>) -> Binding<bool> {
    Binding::new(operand.dependency().cloned(), move || operand.get().is_none())
}

pub fn is_not_null<T: Value>(operand: Operand<Option<T>>) -> Binding<bool> {
    Binding::new(operand.dependency().cloned(), move || operand.get().is_some())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// A format argument read from an observable.
pub fn format_arg<S>(source: &S) -> Operand<FormatArg>
where
    S: ObservableSource,
    S::Value: Into<FormatArg>,
{
    Operand::observe(source).map(Into::into)
}

/// Render `pattern` in the calling thread's active locale.
///
/// The binding also depends on the thread's [`LocaleContext`], so a locale
/// switch re-renders it.
pub fn format(pattern: &str, args: Vec<Operand<FormatArg>>) -> Result<Binding<Option<String>>, BindError> {
    format_in(&LocaleContext::global(), pattern, args)
}

/// Render `pattern` in the active locale of `context`.
pub fn format_in(
    context: &LocaleContext,
    pattern: &str,
    args: Vec<Operand<FormatArg>>,
) -> Result<Binding<Option<String>>, BindError> {
    let pattern = prepare(pattern, args.len())?;
    let mut deps = vec![context.as_dependency()];
    deps.extend(dependencies_of(args.iter().map(Operand::dependency)));
    let context = context.clone();
    Ok(Binding::new(deps, move || render(&pattern, &context.current_locale(), &args)))
}

/// Render `pattern` in a fixed locale.
pub fn format_locale(
    locale: &str,
    pattern: &str,
    args: Vec<Operand<FormatArg>>,
) -> Result<Binding<Option<String>>, BindError> {
    let pattern = prepare(pattern, args.len())?;
    let deps = dependencies_of(args.iter().map(Operand::dependency));
    let locale = locale.to_string();
    Ok(Binding::new(deps, move || render(&pattern, &locale, &args)))
}

/// Validate a pattern applied to a single number of `kind`.
pub(crate) fn check_numeric_pattern(pattern: &str, kind: NumberKind) -> Result<(), BindError> {
    let parsed = prepare(pattern, 1)?;
    if kind.is_floating()
        && let Some(conversion) = parsed.conversions().find(|c| !c.accepts_float())
    {
        return Err(fxbind_i18n::FormatError::Mismatch {
            conversion: conversion.as_char(),
            found: "a float",
        }
        .into());
    }
    Ok(())
}

fn prepare(pattern: &str, supplied: usize) -> Result<FormatPattern, BindError> {
    let parsed = FormatPattern::parse(pattern)?;
    let expected = parsed.arg_count();
    if expected > supplied {
        return Err(BindError::FormatArity { expected, supplied });
    }
    Ok(parsed)
}

fn render(pattern: &FormatPattern, locale: &str, args: &[Operand<FormatArg>]) -> Option<String> {
    let values: Vec<FormatArg> = args.iter().map(Operand::get).collect();
    match pattern.render(locale, &values) {
        Ok(text) => Some(text),
        Err(error) => {
            warn!(%pattern, %error, "format failed; yielding none");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Collection access
// ---------------------------------------------------------------------------

fn checked_index(index: i32) -> Result<usize, BindError> {
    usize::try_from(index).map_err(|_| BindError::NegativeIndex(i64::from(index)))
}

fn element_or_none<E, S: IndexedSource<E>>(source: &S, index: usize) -> Option<E> {
    let element = source.element(index);
    if element.is_none() {
        debug!(index, len = source.len(), "index out of range; yielding none");
    }
    element
}

/// The element at a constant position.
///
/// A negative index is rejected here. An index past the end reads as
/// `None` for as long as the collection is too short.
pub fn value_at<E, S>(source: &S, index: i32) -> Result<Binding<Option<E>>, BindError>
where
    E: Value,
    S: IndexedSource<E>,
{
    let index = checked_index(index)?;
    let source = source.clone();
    Ok(Binding::new([source.as_dependency()], move || element_or_none(&source, index)))
}

/// The element at an observable position; any unusable index reads as
/// `None`.
pub fn value_at_observable<E, S>(source: &S, index: impl Into<Operand<i32>>) -> Binding<Option<E>>
where
    E: Value,
    S: IndexedSource<E>,
{
    let index = index.into();
    let source = source.clone();
    let deps = dependencies_of([Some(&source.as_dependency()), index.dependency()]);
    Binding::new(deps, move || {
        let raw = index.get();
        match usize::try_from(raw) {
            Ok(position) => element_or_none(&source, position),
            Err(_) => {
                debug!(index = raw, "negative index; yielding none");
                None
            }
        }
    })
}

/// Element types readable through the primitive accessors.
///
/// Implemented for the primitive value types and their `Option` forms; a
/// `None` element is "present but null".
pub trait ElementValue: Value {
    type Primitive: Value + Default;

    fn into_primitive(self) -> Option<Self::Primitive>;
}

macro_rules! element_value {
    ($($ty:ty),*) => {$(
        impl ElementValue for $ty {
            type Primitive = $ty;

            fn into_primitive(self) -> Option<$ty> {
                Some(self)
            }
        }

        impl ElementValue for Option<$ty> {
            type Primitive = $ty;

            fn into_primitive(self) -> Option<$ty> {
                self
            }
        }
    )*};
}

element_value!(bool, f64, f32, i64, i32, i16, i8);

fn primitive_at<E: ElementValue, S: IndexedSource<E>>(source: &S, index: usize) -> E::Primitive {
    let Some(element) = source.element(index) else {
        trace!(index, len = source.len(), "index out of range; yielding default");
        return E::Primitive::default();
    };
    element.into_primitive().unwrap_or_else(|| {
        debug!(index, "element is null; yielding default");
        E::Primitive::default()
    })
}

/// The element at a constant position as a primitive; absent or null
/// elements read as the type default.
pub fn value_at_or_default<E, S>(source: &S, index: i32) -> Result<Binding<E::Primitive>, BindError>
where
    E: ElementValue,
    S: IndexedSource<E>,
{
    let index = checked_index(index)?;
    let source = source.clone();
    Ok(Binding::new([source.as_dependency()], move || primitive_at(&source, index)))
}

/// Observable-index form of [`value_at_or_default`].
pub fn value_at_or_default_observable<E, S>(source: &S, index: impl Into<Operand<i32>>) -> Binding<E::Primitive>
where
    E: ElementValue,
    S: IndexedSource<E>,
{
    let index = index.into();
    let source = source.clone();
    let deps = dependencies_of([Some(&source.as_dependency()), index.dependency()]);
    Binding::new(deps, move || {
        let raw = index.get();
        match usize::try_from(raw) {
            Ok(position) => primitive_at(&source, position),
            Err(_) => {
                trace!(index = raw, "negative index; yielding default");
                E::Primitive::default()
            }
        }
    })
}

macro_rules! typed_accessors {
    ($($ty:ty => $constant:ident, $observable:ident);* $(;)?) => {$(
        pub fn $constant<E, S>(source: &S, index: i32) -> Result<Binding<$ty>, BindError>
        where
            E: ElementValue<Primitive = $ty>,
            S: IndexedSource<E>,
        {
            value_at_or_default(source, index)
        }

        pub fn $observable<E, S>(source: &S, index: impl Into<Operand<i32>>) -> Binding<$ty>
        where
            E: ElementValue<Primitive = $ty>,
            S: IndexedSource<E>,
        {
            value_at_or_default_observable(source, index)
        }
    )*};
}

typed_accessors! {
    bool => bool_value_at, bool_value_at_observable;
    f64 => double_value_at, double_value_at_observable;
    f32 => float_value_at, float_value_at_observable;
    i64 => long_value_at, long_value_at_observable;
    i32 => int_value_at, int_value_at_observable;
}

fn lookup_or_none<K, V, S: KeyedSource<K, V>>(source: &S, key: &K) -> Option<V> {
    let value = source.lookup(key);
    if value.is_none() {
        trace!("key absent; yielding none");
    }
    value
}

/// The value stored under a constant key.
pub fn value_at_key<K, V, S>(source: &S, key: K) -> Binding<Option<V>>
where
    K: Value,
    V: Value,
    S: KeyedSource<K, V>,
{
    let source = source.clone();
    Binding::new([source.as_dependency()], move || lookup_or_none(&source, &key))
}

/// The value stored under an observable key.
pub fn value_at_key_observable<K, V, S>(source: &S, key: impl Into<Operand<K>>) -> Binding<Option<V>>
where
    K: Value,
    V: Value,
    S: KeyedSource<K, V>,
{
    let key = key.into();
    let source = source.clone();
    let deps = dependencies_of([Some(&source.as_dependency()), key.dependency()]);
    Binding::new(deps, move || lookup_or_none(&source, &key.get()))
}

/// The value under a constant key as a primitive; absent keys and null
/// values read as the type default.
pub fn value_at_key_or_default<K, V, S>(source: &S, key: K) -> Binding<V::Primitive>
where
    K: Value,
    V: ElementValue,
    S: KeyedSource<K, V>,
{
    let source = source.clone();
    Binding::new([source.as_dependency()], move || match lookup_or_none(&source, &key) {
        None => V::Primitive::default(),
        Some(value) => value.into_primitive().unwrap_or_else(|| {
            debug!("value is null; yielding default");
            V::Primitive::default()
        }),
    })
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

fn length<S: HasSize>(source: &S) -> i32 {
    i32::try_from(source.len()).unwrap_or(i32::MAX)
}

/// Element count of any sized observable (collections and collection
/// bindings).
pub fn size<S>(source: &S) -> Binding<i32>
where
    S: HasSize + AsDependency + Clone + 'static,
{
    let source = source.clone();
    Binding::new([source.as_dependency()], move || length(&source))
}

pub fn is_empty<S>(source: &S) -> Binding<bool>
where
    S: HasSize + AsDependency + Clone + 'static,
{
    let source = source.clone();
    Binding::new([source.as_dependency()], move || source.is_empty())
}

pub fn is_not_empty<S>(source: &S) -> Binding<bool>
where
    S: HasSize + AsDependency + Clone + 'static,
{
    let source = source.clone();
    Binding::new([source.as_dependency()], move || !source.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{ListBinding, ObservableArray, ObservableList, ObservableMap};
    use crate::reactive::{InvalidationListener, Observable, Property, invalidation_listener};
    use std::cell::Cell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    fn counter(observable: &impl Observable) -> (Rc<Cell<usize>>, Rc<dyn InvalidationListener>) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let listener = invalidation_listener(move |_| h.set(h.get() + 1));
        observable.add_listener(&listener);
        (hits, listener)
    }

    #[test]
    fn arithmetic_promotes() {
        let d = Property::new(3.0f64);
        let i = Property::new(2i32);
        let sum = add(&d, &i);
        assert_eq!(sum.kind(), NumberKind::Double);
        assert_eq!(sum.get(), Number::Double(5.0));

        let ints = add(3i32, &i);
        assert_eq!(ints.kind(), NumberKind::Int);
        assert_eq!(ints.get(), Number::Int(5));

        let wide = Property::new(4i64);
        let long = multiply(&wide, 2i32);
        assert_eq!(long.kind(), NumberKind::Long);
        assert_eq!(long.get(), Number::Long(8));
    }

    #[test]
    fn short_extremum_stays_short() {
        let smaller = min(3i16, 5i16);
        assert_eq!(smaller.kind(), NumberKind::Short);
        assert_eq!(smaller.get(), Number::Short(3));

        let mixed = max(3i16, 5i8);
        assert_eq!(mixed.kind(), NumberKind::Int);
        assert_eq!(mixed.get(), Number::Int(5));

        let bytes = max(-1i8, 7i8);
        assert_eq!(bytes.get(), Number::Byte(7));
    }

    #[test]
    fn short_arithmetic_yields_int() {
        let sum = add(3i16, 4i8);
        assert_eq!(sum.kind(), NumberKind::Int);
        assert_eq!(sum.get(), Number::Int(7));
        assert_eq!(negate(2i16).get(), Number::Int(-2));
    }

    #[test]
    #[traced_test]
    fn integer_division_by_zero_degrades() {
        let divisor = Property::new(0i32);
        let quotient = divide(10i32, &divisor);
        assert_eq!(quotient.get(), Number::Int(0));
        assert!(logs_contain("integer division by zero"));
        divisor.set(3).unwrap();
        assert_eq!(quotient.get(), Number::Int(3));
    }

    #[test]
    fn float_division_by_zero_is_ieee() {
        assert_eq!(divide(1.0f64, 0i32).double_value(), f64::INFINITY);
    }

    #[test]
    fn comparisons() {
        let a = Property::new(2.5f64);
        assert!(greater_than(&a, 2i32).get());
        assert!(!less_than(&a, 2i32).get());
        assert!(less_than_or_equal(&a, 2.5f32).get());
        assert!(greater_than_or_equal(3i64, &a).get());
        assert!(equal(&a, 2.5f64).get());
        assert!(not_equal(&a, 2i32).get());
        assert!(equal_with_epsilon(&a, 2.4f64, 0.2).get());
        assert!(not_equal_with_epsilon(&a, 2.0f64, 0.2).get());
    }

    #[test]
    fn integer_epsilon_is_difference_based() {
        assert!(equal_with_epsilon(10i32, 12i32, 2.0).get());
        assert!(!equal_with_epsilon(10i32, 13i32, 2.0).get());
        assert!(!equal(10i32, 11i32).get());
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Property::new(f64::NAN);
        assert!(!equal(&nan, &nan).get());
        assert!(not_equal(&nan, 1i32).get());
        assert!(!greater_than(&nan, 0i32).get());
        assert!(!less_than_or_equal(&nan, 0i32).get());
    }

    #[test]
    fn and_ignores_second_operand_while_first_is_false() {
        let a = Property::new(false);
        let b = Property::new(false);
        let both = and(&a, &b);
        let (hits, _l) = counter(&both);
        assert!(!both.get());

        b.set(true).unwrap();
        assert_eq!(hits.get(), 0);
        assert!(both.is_valid());

        a.set(true).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(both.get());

        b.set(false).unwrap();
        assert_eq!(hits.get(), 2);
        assert!(!both.get());
    }

    #[test]
    fn or_ignores_second_operand_while_first_is_true() {
        let a = Property::new(true);
        let b = Property::new(false);
        let either = or(&a, &b);
        let (hits, _l) = counter(&either);
        assert!(either.get());

        b.set(true).unwrap();
        assert_eq!(hits.get(), 0);

        a.set(false).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(either.get());
    }

    #[test]
    fn and_over_one_observable_twice() {
        let a = Property::new(true);
        let same = and(&a, &a);
        assert_eq!(same.dependencies().len(), 1);
        assert!(same.get());
        a.set(false).unwrap();
        assert!(!same.get());
    }

    #[test]
    fn when_follows_the_selected_branch() {
        let flag = Property::new(true);
        let left = Property::new(1i32);
        let right = Property::new(2i32);
        let pick = when(&flag).then(&left).otherwise(&right);
        let (hits, _l) = counter(&pick);
        assert_eq!(pick.get(), 1);

        right.set(20).unwrap();
        assert_eq!(hits.get(), 0);

        flag.set(false).unwrap();
        assert_eq!(pick.get(), 20);
        left.set(10).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(when(false).then(0i32).otherwise(&left).get(), 10);
    }

    #[test]
    fn concat_and_compare_strings() {
        let first = Property::new(Some("Ada".to_string()));
        let last: Property<Option<String>> = Property::new(None);
        let full = concat([Operand::from(&first), " ".into(), Operand::from(&last)]);
        assert_eq!(full.get().as_deref(), Some("Ada "));
        last.set(Some("Lovelace".into())).unwrap();
        assert_eq!(full.get().as_deref(), Some("Ada Lovelace"));

        let same = string_compare(Operand::from(&first), "ADA", true, Ordering::is_eq);
        assert!(same.get());
        let null_is_empty = string_compare(Operand::constant(None), "", false, Ordering::is_eq);
        assert!(null_is_empty.get());
    }

    #[test]
    fn convert_and_null_checks() {
        let n = Property::new(42i32);
        assert_eq!(convert(&n).get().as_deref(), Some("42"));
        let maybe: Property<Option<u8>> = Property::new(None);
        let null = is_null(Operand::from(&maybe));
        let present = is_not_null(Operand::from(&maybe));
        assert!(null.get() && !present.get());
        maybe.set(Some(1)).unwrap();
        assert!(!null.get() && present.get());
    }

    #[test]
    fn format_follows_arguments_and_locale() {
        let context = LocaleContext::new("en");
        let price = Property::new(1234.5f64);
        let label = format_in(&context, "%,.2f EUR", vec![format_arg(&price)]).unwrap();
        assert_eq!(label.get().as_deref(), Some("1,234.50 EUR"));

        context.set_locale("de");
        assert!(!label.is_valid());
        assert_eq!(label.get().as_deref(), Some("1.234,50 EUR"));

        {
            let _guard = context.push_override("en");
            assert_eq!(label.get().as_deref(), Some("1,234.50 EUR"));
        }
        price.set(2.0).unwrap();
        assert_eq!(label.get().as_deref(), Some("2,00 EUR"));
    }

    #[test]
    fn format_rejects_bad_patterns_up_front() {
        assert!(matches!(format_locale("en", "%q", Vec::new()), Err(BindError::Format(_))));
        assert_eq!(
            format_locale("en", "%d and %d", vec![Operand::constant(FormatArg::Int(1))]).unwrap_err(),
            BindError::FormatArity { expected: 2, supplied: 1 }
        );
        assert!(check_numeric_pattern("%d", NumberKind::Double).is_err());
        assert!(check_numeric_pattern("%.1f", NumberKind::Int).is_ok());
    }

    #[test]
    #[traced_test]
    fn format_mismatch_at_render_time_yields_none() {
        let text = Property::new(Some("seven".to_string()));
        let rendered = format_locale("en", "%d", vec![format_arg(&text)]).unwrap();
        assert_eq!(rendered.get(), None);
        assert!(logs_contain("format failed"));
    }

    #[test]
    fn value_at_rejects_negative_constant_index() {
        let list: ObservableList<&'static str> = ObservableList::new();
        assert_eq!(value_at(&list, -1).unwrap_err(), BindError::NegativeIndex(-1));
        assert!(int_value_at(&ObservableArray::<i32>::with_len(1), -3).is_err());
    }

    #[test]
    #[traced_test]
    fn value_at_past_the_end_reads_none() {
        let list = ObservableList::from(vec!["x"]);
        let fifth = value_at(&list, 5).unwrap();
        assert_eq!(fifth.get(), None);
        assert!(logs_contain("index out of range"));

        list.extend(["a", "b", "c", "d", "e"]);
        assert_eq!(fifth.get(), Some("e"));
    }

    #[test]
    #[traced_test]
    fn observable_index_degrades_to_none() {
        let list = ObservableList::from(vec![10, 20]);
        let index = Property::new(1i32);
        let element = value_at_observable(&list, &index);
        assert_eq!(element.get(), Some(20));
        index.set(-1).unwrap();
        assert_eq!(element.get(), None);
        assert!(logs_contain("negative index"));
        index.set(7).unwrap();
        assert_eq!(element.get(), None);
    }

    #[test]
    #[traced_test]
    fn primitive_accessors_default_null_elements() {
        let list: ObservableList<Option<f64>> = ObservableList::from(vec![Some(1.5), None]);
        assert_eq!(double_value_at(&list, 0).unwrap().get(), 1.5);
        assert_eq!(double_value_at(&list, 1).unwrap().get(), 0.0);
        assert!(logs_contain("element is null"));
        assert_eq!(double_value_at(&list, 9).unwrap().get(), 0.0);

        let flags = ObservableList::from(vec![true]);
        let index = Property::new(0i32);
        let flag = bool_value_at_observable(&flags, &index);
        assert!(flag.get());
        index.set(4).unwrap();
        assert!(!flag.get());
    }

    #[test]
    fn typed_accessors_over_arrays() {
        let array = ObservableArray::from_slice(&[1.5f32, 2.5]);
        let second = float_value_at(&array, 1).unwrap();
        assert_eq!(second.get(), 2.5);
        array.set(1, 4.0).unwrap();
        assert_eq!(second.get(), 4.0);
        assert_eq!(long_value_at(&ObservableArray::from_slice(&[7i64]), 0).unwrap().get(), 7);
    }

    #[test]
    fn keyed_access() {
        let map: ObservableMap<String, Option<i32>> = ObservableMap::new();
        let key = Property::new("a".to_string());
        let by_constant = value_at_key(&map, "a".to_string());
        let by_observable = value_at_key_observable(&map, &key);
        let primitive = value_at_key_or_default(&map, "a".to_string());
        assert_eq!(by_constant.get(), None);
        assert_eq!(primitive.get(), 0);

        map.insert("a".into(), Some(3));
        map.insert("b".into(), None);
        assert_eq!(by_constant.get(), Some(Some(3)));
        assert_eq!(primitive.get(), 3);
        key.set("b".into()).unwrap();
        assert_eq!(by_observable.get(), Some(None));
    }

    #[test]
    fn aggregates_track_storage_and_bindings() {
        let list = ObservableList::from(vec![1, 2]);
        let count = size(&list);
        let empty = is_empty(&list);
        let filled = is_not_empty(&list);
        assert_eq!(count.get(), 2);
        list.clear();
        assert_eq!(count.get(), 0);
        assert!(empty.get() && !filled.get());

        let held = ListBinding::of(list.clone());
        let held_count = size(&held);
        assert_eq!(held_count.get(), 0);
        list.push(9);
        assert_eq!(held_count.get(), 1);
    }
}
