#![forbid(unsafe_code)]

//! Lazy observable values, properties, and derived bindings.
//!
//! This crate provides:
//! - [`reactive`]: the observable protocol, [`Property`], [`Binding`], and
//!   the typed numeric / boolean / string / object expression families
//! - [`collections`]: observable list, set, map, and array storage with
//!   structured change events, plus bindings whose value is a collection
//! - [`bindings`]: free functions building derived bindings from any mix of
//!   observables and literals
//! - [`locale`]: the thread's observable locale used by format bindings
//!
//! Everything is single threaded and synchronous: a mutation notifies its
//! dependents before it returns, and a derived value is recomputed only when
//! it is read after one of its inputs changed.
//!
//! ```
//! use fxbind::reactive::{NumberExpression, Property};
//!
//! let width = Property::new(3i32);
//! let height = Property::new(1.5f64);
//! let area = width.multiply(&height);
//! assert_eq!(area.double_value(), 4.5);
//!
//! width.set(4).unwrap();
//! assert_eq!(area.double_value(), 6.0);
//! ```

pub mod bindings;
pub mod collections;
pub mod error;
pub mod locale;
pub mod reactive;

pub use collections::{
    ArrayBinding, CollectionBinding, ListBinding, MapBinding, ObservableArray, ObservableList, ObservableMap,
    ObservableSet, SetBinding,
};
pub use error::BindError;
pub use locale::{LocaleContext, LocaleOverride};
pub use reactive::{
    AsDependency, Binding, BooleanExpression, NumberBinding, NumberExpression, ObjectExpression, Observable,
    ObservableValue, Property, ReadOnlyProperty, StringExpression,
};
