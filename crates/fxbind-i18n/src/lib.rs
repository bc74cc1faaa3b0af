#![forbid(unsafe_code)]

//! Locale-aware formatting collaborator for fxbind.
//!
//! The binding engine never formats numbers itself. String bindings that
//! need locale-sensitive output hand a parsed [`FormatPattern`], the current
//! [`Locale`], and their argument values to this crate and get a `String`
//! back.
//!
//! - [`symbols`]: decimal and grouping separators per locale.
//! - [`format`]: a printf-style pattern subset (`%d`, `%.2f`, `%,d`, ...).

pub mod format;
pub mod symbols;

pub use format::{Conversion, FormatArg, FormatError, FormatPattern, display_float, format};
pub use symbols::{DecimalSymbols, Locale, normalize_locale};
