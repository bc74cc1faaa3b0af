//! Errors raised at construction time or by contract violations.
//!
//! Transient states of a reactive graph (an index that is momentarily out of
//! range, a missing map key, a null element read through a primitive
//! accessor) are never errors; they degrade to a default value. Only calls
//! that are wrong no matter when they happen return a [`BindError`].

use fxbind_i18n::FormatError;
use thiserror::Error;

/// Contract violations reported by properties, bindings, and collections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// `set` was called on a property that follows another observable.
    #[error("a bound value cannot be set (property '{name}')")]
    Bound { name: String },
    /// A property was bound to itself.
    #[error("cannot bind a property to itself")]
    SelfBinding,
    /// A constant index below zero was passed to an accessor.
    #[error("index must be non-negative, got {0}")]
    NegativeIndex(i64),
    /// A storage operation addressed a position outside the collection.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// A `from..to` range that is reversed or exceeds the collection.
    #[error("invalid range {from}..{to} for length {len}")]
    InvalidRange { from: usize, to: usize, len: usize },
    /// A format pattern consumes more values than the binding supplies.
    #[error("format pattern takes {expected} argument(s), {supplied} supplied")]
    FormatArity { expected: usize, supplied: usize },
    /// The format pattern itself is malformed or mismatched.
    #[error(transparent)]
    Format(#[from] FormatError),
}
