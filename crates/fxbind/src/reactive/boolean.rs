//! Fluent boolean composition.

use super::binding::Binding;
use super::observable::Operand;
use super::property::{Property, ReadOnlyProperty};
use crate::bindings;

/// Logical operators for boolean properties and bindings.
///
/// `and`/`or` short-circuit their invalidation: a change of the right-hand
/// operand is ignored while the left-hand operand alone decides the result.
pub trait BooleanExpression {
    fn bool_operand(&self) -> Operand<bool>;

    fn and(&self, other: impl Into<Operand<bool>>) -> Binding<bool> {
        bindings::and(self.bool_operand(), other)
    }

    fn or(&self, other: impl Into<Operand<bool>>) -> Binding<bool> {
        bindings::or(self.bool_operand(), other)
    }

    fn not(&self) -> Binding<bool> {
        bindings::not(self.bool_operand())
    }

    fn is_equal_to(&self, other: impl Into<Operand<bool>>) -> Binding<bool> {
        bindings::bool_equal(self.bool_operand(), other)
    }

    fn is_not_equal_to(&self, other: impl Into<Operand<bool>>) -> Binding<bool> {
        bindings::bool_not_equal(self.bool_operand(), other)
    }

    /// `"true"` or `"false"`.
    fn as_string(&self) -> Binding<Option<String>> {
        let operand = self.bool_operand();
        Binding::new(operand.dependency().cloned(), move || Some(operand.get().to_string()))
    }
}

impl BooleanExpression for Property<bool> {
    fn bool_operand(&self) -> Operand<bool> {
        Operand::from(self)
    }
}

impl BooleanExpression for ReadOnlyProperty<bool> {
    fn bool_operand(&self) -> Operand<bool> {
        Operand::from(self)
    }
}

impl BooleanExpression for Binding<bool> {
    fn bool_operand(&self) -> Operand<bool> {
        Operand::from(self)
    }
}
