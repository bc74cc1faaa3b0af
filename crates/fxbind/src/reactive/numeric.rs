//! Numeric operands, bindings, and the fluent expression API.
//!
//! A [`NumberOperand`] remembers the [`NumberKind`] of its source so a
//! derived binding can pick its result kind when it is built, not when it
//! is evaluated. [`NumberExpression`] adds `a.add(&b).multiply(2)` style
//! composition to every numeric property and binding.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::binding::Binding;
use super::number::{Number, NumberKind, NumericValue};
use super::observable::{
    AsDependency, ChangeListener, Dependency, InvalidationListener, Observable, ObservableSource,
    ObservableValue, Operand,
};
use super::property::{Property, ReadOnlyProperty};
use crate::bindings;
use crate::error::BindError;
use crate::locale::LocaleContext;

/// An observable or constant numeric input.
#[derive(Clone)]
pub struct NumberOperand {
    kind: NumberKind,
    operand: Operand<Number>,
}

impl NumberOperand {
    /// A literal operand.
    pub fn constant(value: impl Into<Number>) -> Self {
        let value = value.into();
        Self {
            kind: value.kind(),
            operand: Operand::constant(value),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    #[must_use]
    pub fn get(&self) -> Number {
        self.operand.get()
    }

    #[must_use]
    pub fn dependency(&self) -> Option<&Dependency> {
        self.operand.dependency()
    }

    /// The operand as a format argument.
    pub(crate) fn into_format_operand(self) -> Operand<fxbind_i18n::FormatArg> {
        self.operand.map(Number::to_format_arg)
    }
}

impl<S> From<&S> for NumberOperand
where
    S: ObservableSource,
    S::Value: NumericValue,
{
    fn from(source: &S) -> Self {
        Self {
            kind: <S::Value as NumericValue>::KIND,
            operand: Operand::observe(source).map(Into::into),
        }
    }
}

impl From<&NumberBinding> for NumberOperand {
    fn from(binding: &NumberBinding) -> Self {
        Self {
            kind: binding.kind,
            operand: Operand::observe(&binding.binding),
        }
    }
}

impl From<NumberBinding> for NumberOperand {
    fn from(binding: NumberBinding) -> Self {
        Self::from(&binding)
    }
}

impl From<Number> for NumberOperand {
    fn from(value: Number) -> Self {
        Self::constant(value)
    }
}

macro_rules! literal_operand {
    ($($ty:ty),*) => {$(
        impl From<$ty> for NumberOperand {
            fn from(value: $ty) -> Self {
                Self::constant(value)
            }
        }
    )*};
}

literal_operand!(f64, f32, i64, i32, i16, i8);

impl fmt::Debug for NumberOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberOperand")
            .field("kind", &self.kind)
            .field("observed", &self.dependency().is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NumberBinding
// ---------------------------------------------------------------------------

/// A binding producing a [`Number`] of a fixed kind.
///
/// Dereferences to the underlying [`Binding<Number>`] for `get`,
/// `is_valid`, `invalidate`, and friends.
#[derive(Clone)]
pub struct NumberBinding {
    kind: NumberKind,
    binding: Binding<Number>,
}

impl NumberBinding {
    /// Wrap `compute`; results are cast to `kind` so the kind always holds.
    pub fn new(
        kind: NumberKind,
        dependencies: impl IntoIterator<Item = Dependency>,
        compute: impl Fn() -> Number + 'static,
    ) -> Self {
        Self {
            kind,
            binding: Binding::new(dependencies, move || compute().cast(kind)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    #[must_use]
    pub fn binding(&self) -> &Binding<Number> {
        &self.binding
    }

    #[must_use]
    pub fn double_value(&self) -> f64 {
        self.binding.get().as_f64()
    }

    #[must_use]
    pub fn float_value(&self) -> f32 {
        self.binding.get().as_f32()
    }

    #[must_use]
    pub fn long_value(&self) -> i64 {
        self.binding.get().as_i64()
    }

    #[must_use]
    pub fn int_value(&self) -> i32 {
        self.binding.get().as_i32()
    }

    /// A typed view of this binding.
    pub fn typed<N: NumericValue>(&self) -> Binding<N> {
        self.binding.then(N::from_number)
    }
}

impl Deref for NumberBinding {
    type Target = Binding<Number>;

    fn deref(&self) -> &Binding<Number> {
        &self.binding
    }
}

impl Observable for NumberBinding {
    fn add_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.binding.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn InvalidationListener>) {
        self.binding.remove_listener(listener);
    }

    fn contains_listener(&self, listener: &Rc<dyn InvalidationListener>) -> bool {
        self.binding.contains_listener(listener)
    }
}

impl ObservableValue<Number> for NumberBinding {
    fn value(&self) -> Number {
        self.binding.get()
    }

    fn add_change_listener(&self, listener: &Rc<dyn ChangeListener<Number>>) {
        self.binding.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &Rc<dyn ChangeListener<Number>>) {
        self.binding.remove_change_listener(listener);
    }

    fn contains_change_listener(&self, listener: &Rc<dyn ChangeListener<Number>>) -> bool {
        self.binding.contains_change_listener(listener)
    }
}

impl AsDependency for NumberBinding {
    fn as_dependency(&self) -> Dependency {
        self.binding.as_dependency()
    }
}

impl ObservableSource for NumberBinding {
    type Value = Number;

    fn as_observable_value(&self) -> Rc<dyn ObservableValue<Number>> {
        self.binding.as_observable_value()
    }
}

impl fmt::Debug for NumberBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberBinding")
            .field("kind", &self.kind)
            .field("valid", &self.binding.is_valid())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NumberExpression: fluent API
// ---------------------------------------------------------------------------

/// Fluent numeric composition for properties and bindings.
pub trait NumberExpression {
    fn number_operand(&self) -> NumberOperand;

    fn add(&self, other: impl Into<NumberOperand>) -> NumberBinding {
        bindings::add(self.number_operand(), other)
    }

    fn subtract(&self, other: impl Into<NumberOperand>) -> NumberBinding {
        bindings::subtract(self.number_operand(), other)
    }

    fn multiply(&self, other: impl Into<NumberOperand>) -> NumberBinding {
        bindings::multiply(self.number_operand(), other)
    }

    fn divide(&self, other: impl Into<NumberOperand>) -> NumberBinding {
        bindings::divide(self.number_operand(), other)
    }

    fn negate(&self) -> NumberBinding {
        bindings::negate(self.number_operand())
    }

    fn is_equal_to(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::equal(self.number_operand(), other)
    }

    fn is_equal_to_within(&self, other: impl Into<NumberOperand>, epsilon: f64) -> Binding<bool> {
        bindings::equal_with_epsilon(self.number_operand(), other, epsilon)
    }

    fn is_not_equal_to(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::not_equal(self.number_operand(), other)
    }

    fn is_not_equal_to_within(&self, other: impl Into<NumberOperand>, epsilon: f64) -> Binding<bool> {
        bindings::not_equal_with_epsilon(self.number_operand(), other, epsilon)
    }

    fn greater_than(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::greater_than(self.number_operand(), other)
    }

    fn greater_than_or_equal_to(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::greater_than_or_equal(self.number_operand(), other)
    }

    fn less_than(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::less_than(self.number_operand(), other)
    }

    fn less_than_or_equal_to(&self, other: impl Into<NumberOperand>) -> Binding<bool> {
        bindings::less_than_or_equal(self.number_operand(), other)
    }

    /// Locale-independent text form (`3.0`, `-4`).
    fn as_string(&self) -> Binding<Option<String>> {
        let operand = self.number_operand();
        Binding::new(operand.dependency().cloned(), move || Some(operand.get().to_string()))
    }

    /// Render through a printf-style pattern using the thread's locale.
    ///
    /// The pattern is validated here: a malformed pattern, more than one
    /// conversion, or an integer conversion applied to a float source is an
    /// error.
    fn as_string_format(&self, pattern: &str) -> Result<Binding<Option<String>>, BindError> {
        let operand = self.number_operand();
        bindings::check_numeric_pattern(pattern, operand.kind())?;
        bindings::format(pattern, vec![operand.into_format_operand()])
    }

    /// Render through a pattern using the active locale of `context`.
    fn as_string_format_in(&self, context: &LocaleContext, pattern: &str) -> Result<Binding<Option<String>>, BindError> {
        let operand = self.number_operand();
        bindings::check_numeric_pattern(pattern, operand.kind())?;
        bindings::format_in(context, pattern, vec![operand.into_format_operand()])
    }

    /// Render through a pattern using a fixed locale.
    fn as_string_locale(&self, locale: &str, pattern: &str) -> Result<Binding<Option<String>>, BindError> {
        let operand = self.number_operand();
        bindings::check_numeric_pattern(pattern, operand.kind())?;
        bindings::format_locale(locale, pattern, vec![operand.into_format_operand()])
    }
}

impl<N: NumericValue> NumberExpression for Property<N> {
    fn number_operand(&self) -> NumberOperand {
        NumberOperand::from(self)
    }
}

impl<N: NumericValue> NumberExpression for ReadOnlyProperty<N> {
    fn number_operand(&self) -> NumberOperand {
        NumberOperand::from(self)
    }
}

impl<N: NumericValue> NumberExpression for Binding<N> {
    fn number_operand(&self) -> NumberOperand {
        NumberOperand::from(self)
    }
}

impl NumberExpression for NumberBinding {
    fn number_operand(&self) -> NumberOperand {
        NumberOperand::from(self)
    }
}
