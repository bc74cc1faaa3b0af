//! Null checks and text conversion for arbitrary optional values.

use std::fmt::Display;

use super::binding::Binding;
use super::observable::{Operand, Value};
use super::property::{Property, ReadOnlyProperty};
use crate::bindings;

/// Operations on observables holding `Option<T>`.
pub trait ObjectExpression<T: Value> {
    fn object_operand(&self) -> Operand<Option<T>>;

    fn is_null(&self) -> Binding<bool> {
        bindings::is_null(self.object_operand())
    }

    fn is_not_null(&self) -> Binding<bool> {
        bindings::is_not_null(self.object_operand())
    }

    /// Display form of the value; `None` stays `None`.
    fn as_string(&self) -> Binding<Option<String>>
    where
        T: Display,
    {
        let operand = self.object_operand();
        Binding::new(operand.dependency().cloned(), move || {
            operand.get().map(|v| v.to_string())
        })
    }
}

impl<T: Value> ObjectExpression<T> for Property<Option<T>> {
    fn object_operand(&self) -> Operand<Option<T>> {
        Operand::from(self)
    }
}

impl<T: Value> ObjectExpression<T> for ReadOnlyProperty<Option<T>> {
    fn object_operand(&self) -> Operand<Option<T>> {
        Operand::from(self)
    }
}

impl<T: Value> ObjectExpression<T> for Binding<Option<T>> {
    fn object_operand(&self) -> Operand<Option<T>> {
        Operand::from(self)
    }
}
