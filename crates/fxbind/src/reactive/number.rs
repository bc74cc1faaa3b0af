//! Dynamically typed numbers and the promotion rules between them.
//!
//! Arithmetic over mixed operand kinds promotes to the widest participant
//! in the order `Double > Float > Long > Int`. `Short` and `Byte` take part
//! in arithmetic as `Int`. [`NumberKind::extremum`] is the exception: `min`
//! and `max` of two shorts stay short, of two bytes stay byte.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Integer division by zero | Divisor evaluates to 0 | Result is 0, logged at debug |
//! | Integer overflow | Result exceeds the kind | Wraps (two's complement) |
//! | Float division by zero | IEEE semantics | `inf` / `NaN` |

use std::cmp::Ordering;
use std::fmt;

use fxbind_i18n::{FormatArg, display_float};
use tracing::debug;

use super::observable::Value;

/// The numeric type of an operand or binding.
///
/// Variants are declared in promotion rank order, so `Ord` compares rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl NumberKind {
    /// Result kind of `+ - * /` over `a` and `b`.
    #[must_use]
    pub fn arithmetic(a: Self, b: Self) -> Self {
        match a.max(b) {
            Self::Byte | Self::Short | Self::Int => Self::Int,
            wider => wider,
        }
    }

    /// Result kind of `min`/`max` over `a` and `b`.
    #[must_use]
    pub fn extremum(a: Self, b: Self) -> Self {
        if a == b && matches!(a, Self::Short | Self::Byte) {
            a
        } else {
            Self::arithmetic(a, b)
        }
    }

    /// Result kind of unary negation.
    #[must_use]
    pub fn negation(self) -> Self {
        Self::arithmetic(self, self)
    }

    #[must_use]
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// The zero of this kind.
    #[must_use]
    pub fn zero(self) -> Number {
        Number::Long(0).cast(self)
    }
}

/// A number tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

macro_rules! integer_op {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithmeticOp::Add => $a.wrapping_add($b),
            ArithmeticOp::Subtract => $a.wrapping_sub($b),
            ArithmeticOp::Multiply => $a.wrapping_mul($b),
            ArithmeticOp::Divide => {
                if $b == 0 {
                    debug!(dividend = $a, "integer division by zero; yielding 0");
                    0
                } else {
                    $a.wrapping_div($b)
                }
            }
        }
    };
}

macro_rules! float_op {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithmeticOp::Add => $a + $b,
            ArithmeticOp::Subtract => $a - $b,
            ArithmeticOp::Multiply => $a * $b,
            ArithmeticOp::Divide => $a / $b,
        }
    };
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
impl Number {
    #[must_use]
    pub fn kind(self) -> NumberKind {
        match self {
            Self::Byte(_) => NumberKind::Byte,
            Self::Short(_) => NumberKind::Short,
            Self::Int(_) => NumberKind::Int,
            Self::Long(_) => NumberKind::Long,
            Self::Float(_) => NumberKind::Float,
            Self::Double(_) => NumberKind::Double,
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Byte(v) => f64::from(v),
            Self::Short(v) => f64::from(v),
            Self::Int(v) => f64::from(v),
            Self::Long(v) => v as f64,
            Self::Float(v) => f64::from(v),
            Self::Double(v) => v,
        }
    }

    #[must_use]
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Float(v) => v,
            other => other.as_f64() as f32,
        }
    }

    /// Integer value; floats truncate toward zero and saturate.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Byte(v) => i64::from(v),
            Self::Short(v) => i64::from(v),
            Self::Int(v) => i64::from(v),
            Self::Long(v) => v,
            Self::Float(v) => v as i64,
            Self::Double(v) => v as i64,
        }
    }

    /// Narrowing conversions wrap, except from floats which saturate.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Float(v) => v as i32,
            Self::Double(v) => v as i32,
            other => other.as_i64() as i32,
        }
    }

    #[must_use]
    pub fn as_i16(self) -> i16 {
        self.as_i32() as i16
    }

    #[must_use]
    pub fn as_i8(self) -> i8 {
        self.as_i32() as i8
    }

    /// Convert to `kind`.
    #[must_use]
    pub fn cast(self, kind: NumberKind) -> Self {
        match kind {
            NumberKind::Byte => Self::Byte(self.as_i8()),
            NumberKind::Short => Self::Short(self.as_i16()),
            NumberKind::Int => Self::Int(self.as_i32()),
            NumberKind::Long => Self::Long(self.as_i64()),
            NumberKind::Float => Self::Float(self.as_f32()),
            NumberKind::Double => Self::Double(self.as_f64()),
        }
    }

    /// Apply `op` with both operands converted to `kind`.
    ///
    /// `kind` is normally [`NumberKind::arithmetic`] of the operands; short
    /// and byte kinds compute as `Int`.
    #[must_use]
    pub fn apply(op: ArithmeticOp, a: Self, b: Self, kind: NumberKind) -> Self {
        match kind {
            NumberKind::Double => Self::Double(float_op!(op, a.as_f64(), b.as_f64())),
            NumberKind::Float => Self::Float(float_op!(op, a.as_f32(), b.as_f32())),
            NumberKind::Long => Self::Long(integer_op!(op, a.as_i64(), b.as_i64())),
            NumberKind::Int | NumberKind::Short | NumberKind::Byte => {
                Self::Int(integer_op!(op, a.as_i32(), b.as_i32()))
            }
        }
    }

    /// Negate in `kind`.
    #[must_use]
    pub fn negate(self, kind: NumberKind) -> Self {
        match kind {
            NumberKind::Double => Self::Double(-self.as_f64()),
            NumberKind::Float => Self::Float(-self.as_f32()),
            NumberKind::Long => Self::Long(self.as_i64().wrapping_neg()),
            NumberKind::Int | NumberKind::Short | NumberKind::Byte => Self::Int(self.as_i32().wrapping_neg()),
        }
    }

    /// Smaller (`minimum = true`) or larger of `a` and `b`, in `kind`.
    #[must_use]
    pub fn extremum(a: Self, b: Self, kind: NumberKind, minimum: bool) -> Self {
        let (a, b) = (a.cast(kind), b.cast(kind));
        let ordering = if kind.is_floating() {
            a.as_f64().partial_cmp(&b.as_f64())
        } else {
            Some(a.as_i64().cmp(&b.as_i64()))
        };
        match ordering {
            // NaN wins either way.
            None => {
                if a.as_f64().is_nan() {
                    a
                } else {
                    b
                }
            }
            Some(Ordering::Greater) => {
                if minimum {
                    b
                } else {
                    a
                }
            }
            Some(_) => {
                if minimum {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Ordering in the promoted domain of both operands. `None` when either
    /// side is `NaN`.
    #[must_use]
    pub fn compare(a: Self, b: Self) -> Option<Ordering> {
        match NumberKind::arithmetic(a.kind(), b.kind()) {
            NumberKind::Double => a.as_f64().partial_cmp(&b.as_f64()),
            NumberKind::Float => a.as_f32().partial_cmp(&b.as_f32()),
            _ => Some(a.as_i64().cmp(&b.as_i64())),
        }
    }

    /// Equality within `epsilon` (inclusive). An epsilon of zero is exact.
    #[must_use]
    pub fn approx_eq(a: Self, b: Self, epsilon: f64) -> bool {
        match NumberKind::arithmetic(a.kind(), b.kind()) {
            NumberKind::Double | NumberKind::Float => (a.as_f64() - b.as_f64()).abs() <= epsilon,
            _ => {
                let diff = i128::from(a.as_i64()) - i128::from(b.as_i64());
                diff.unsigned_abs() as f64 <= epsilon
            }
        }
    }

    pub(crate) fn to_format_arg(self) -> FormatArg {
        if self.kind().is_floating() {
            FormatArg::Float(self.as_f64())
        } else {
            FormatArg::Int(self.as_i64())
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&display_float(f64::from(v))),
            Self::Double(v) => f.write_str(&display_float(v)),
        }
    }
}

impl From<Number> for FormatArg {
    fn from(number: Number) -> Self {
        number.to_format_arg()
    }
}

/// Rust primitives usable as typed numeric properties.
pub trait NumericValue: Value + Copy + Into<Number> {
    const KIND: NumberKind;

    /// Convert (with the usual narrowing) from any number.
    fn from_number(number: Number) -> Self;
}

macro_rules! numeric_value {
    ($($ty:ty => $variant:ident, $kind:ident, $conv:ident);* $(;)?) => {$(
        impl From<$ty> for Number {
            fn from(value: $ty) -> Self {
                Number::$variant(value)
            }
        }

        impl NumericValue for $ty {
            const KIND: NumberKind = NumberKind::$kind;

            fn from_number(number: Number) -> Self {
                number.$conv()
            }
        }
    )*};
}

numeric_value! {
    f64 => Double, Double, as_f64;
    f32 => Float, Float, as_f32;
    i64 => Long, Long, as_i64;
    i32 => Int, Int, as_i32;
    i16 => Short, Short, as_i16;
    i8 => Byte, Byte, as_i8;
}
