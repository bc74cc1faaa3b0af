//! Fluent composition for nullable strings.
//!
//! String values are `Option<String>`. Concatenation and every comparison
//! read `None` as the empty string; only the property's own change detection
//! tells `None` and `Some("")` apart.

use super::binding::Binding;
use super::observable::Operand;
use super::property::{Property, ReadOnlyProperty};
use crate::bindings;

/// Input of a string expression.
pub type StringOperand = Operand<Option<String>>;

/// Text composition and comparison.
pub trait StringExpression {
    fn string_operand(&self) -> StringOperand;

    /// The value with `None` read as `""`, evaluated now.
    fn value_safe(&self) -> String {
        self.string_operand().get().unwrap_or_default()
    }

    fn concat(&self, other: impl Into<StringOperand>) -> Binding<Option<String>> {
        bindings::concat([self.string_operand(), other.into()])
    }

    fn is_equal_to(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_eq())
    }

    fn is_equal_to_ignore_case(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, true, |o| o.is_eq())
    }

    fn is_not_equal_to(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_ne())
    }

    fn is_not_equal_to_ignore_case(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, true, |o| o.is_ne())
    }

    fn greater_than(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_gt())
    }

    fn greater_than_or_equal_to(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_ge())
    }

    fn less_than(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_lt())
    }

    fn less_than_or_equal_to(&self, other: impl Into<StringOperand>) -> Binding<bool> {
        bindings::string_compare(self.string_operand(), other, false, |o| o.is_le())
    }

    /// Length in characters; `None` has length 0.
    fn length(&self) -> Binding<i32> {
        let operand = self.string_operand();
        Binding::new(operand.dependency().cloned(), move || {
            let count = operand.get().map_or(0, |s| s.chars().count());
            i32::try_from(count).unwrap_or(i32::MAX)
        })
    }

    fn is_empty(&self) -> Binding<bool> {
        let operand = self.string_operand();
        Binding::new(operand.dependency().cloned(), move || {
            operand.get().is_none_or(|s| s.is_empty())
        })
    }

    fn is_not_empty(&self) -> Binding<bool> {
        let operand = self.string_operand();
        Binding::new(operand.dependency().cloned(), move || {
            operand.get().is_some_and(|s| !s.is_empty())
        })
    }
}

impl StringExpression for Property<Option<String>> {
    fn string_operand(&self) -> StringOperand {
        Operand::from(self)
    }
}

impl StringExpression for ReadOnlyProperty<Option<String>> {
    fn string_operand(&self) -> StringOperand {
        Operand::from(self)
    }
}

impl StringExpression for Binding<Option<String>> {
    fn string_operand(&self) -> StringOperand {
        Operand::from(self)
    }
}
