//! Reactive primitives: observables, properties, bindings, and the typed
//! expression families built on them.
//!
//! # Architecture
//!
//! - [`Property`]: writable value with unidirectional and bidirectional
//!   binding.
//! - [`Binding`]: lazily recomputed, cached value over a dependency set.
//! - [`NumberBinding`], [`BooleanExpression`], [`StringExpression`],
//!   [`ObjectExpression`]: typed composition layered on `Binding`.
//!
//! Every observable holds its listeners weakly. A derived binding holds its
//! dependencies strongly, so the ownership graph points from consumers to
//! sources and a dropped consumer is simply forgotten.

pub mod binding;
pub mod boolean;
pub(crate) mod listeners;
pub mod number;
pub mod numeric;
pub mod object;
pub mod observable;
pub mod property;
pub mod string;

pub use binding::Binding;
pub use boolean::BooleanExpression;
pub use number::{ArithmeticOp, Number, NumberKind, NumericValue};
pub use numeric::{NumberBinding, NumberExpression, NumberOperand};
pub use object::ObjectExpression;
pub use observable::{
    AsDependency, ChangeListener, Dependency, InvalidationListener, Observable, ObservableSource,
    ObservableValue, Operand, Value, change_listener, invalidation_listener,
};
pub use property::{Bean, Property, ReadOnlyProperty};
pub use string::{StringExpression, StringOperand};

pub type BooleanProperty = Property<bool>;
pub type DoubleProperty = Property<f64>;
pub type FloatProperty = Property<f32>;
pub type LongProperty = Property<i64>;
pub type IntProperty = Property<i32>;
pub type StringProperty = Property<Option<String>>;
pub type ObjectProperty<T> = Property<Option<T>>;

pub type BooleanBinding = Binding<bool>;
pub type StringBinding = Binding<Option<String>>;
pub type ObjectBinding<T> = Binding<Option<T>>;
