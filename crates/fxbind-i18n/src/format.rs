//! Printf-style value formatting with locale-aware separators.
//!
//! A [`FormatPattern`] is parsed once and rendered many times, which is how
//! string bindings use it: the pattern is validated when the binding is
//! built and rendered on every recomputation.
//!
//! # Supported syntax
//!
//! `%[flags][width][.precision]conversion`, where flags are any of `-`
//! (left-justify), `0` (zero-pad), `+` (always sign), ` ` (space for
//! positive), `,` (locale grouping), and conversion is one of:
//!
//! | Conversion | Accepts | Output |
//! |------------|---------|--------|
//! | `d`, `i` | integers | decimal |
//! | `x`, `X` | integers | hexadecimal |
//! | `f` | integers, floats | fixed point, default precision 6 |
//! | `e`, `E` | integers, floats | scientific, default precision 6 |
//! | `s`, `S` | anything | display form, precision truncates |
//! | `b`, `B` | anything | `true`/`false` |
//!
//! `%%` renders a literal percent sign and `%n` a newline.
//!
//! # Invariants
//!
//! 1. **Single pass**: arguments are consumed left to right, one per
//!    conversion; surplus arguments are ignored.
//! 2. **Locale only affects separators**: digits, signs, and exponent markers
//!    are the same for every locale.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad pattern | Unknown conversion, dangling `%` | `parse` returns `Err` |
//! | Missing argument | Fewer args than conversions | `render` returns `Err` |
//! | Type mismatch | Float passed to `%d` or `%x` | `render` returns `Err` |

use std::fmt;

use thiserror::Error;

use crate::symbols::DecimalSymbols;

/// Errors from pattern parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A `%` at the end of the pattern with no conversion.
    #[error("unterminated conversion at byte {0}")]
    Unterminated(usize),
    /// A conversion character that is not supported.
    #[error("unknown conversion '%{conversion}' at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },
    /// Fewer arguments than conversions.
    #[error("missing argument for conversion #{0}")]
    MissingArgument(usize),
    /// The argument cannot be rendered by the conversion.
    #[error("conversion '%{conversion}' cannot format {found}")]
    Mismatch {
        conversion: char,
        found: &'static str,
    },
}

/// A single value handed to a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    /// Absent value; renders as `null` under `%s`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FormatArg {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Str(_) => "a string",
        }
    }
}

impl From<bool> for FormatArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FormatArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FormatArg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for FormatArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FormatArg {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for FormatArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Option<String>> for FormatArg {
    fn from(v: Option<String>) -> Self {
        v.map_or(Self::Null, Self::Str)
    }
}

/// Conversion kinds accepted by [`FormatPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Decimal,
    Hex,
    Fixed,
    Scientific,
    Text,
    Bool,
}

impl Conversion {
    fn from_char(c: char) -> Option<(Self, bool)> {
        let conversion = match c {
            'd' | 'i' => Self::Decimal,
            'x' | 'X' => Self::Hex,
            'f' => Self::Fixed,
            'e' | 'E' => Self::Scientific,
            's' | 'S' => Self::Text,
            'b' | 'B' => Self::Bool,
            _ => return None,
        };
        Some((conversion, c.is_ascii_uppercase()))
    }

    /// The canonical pattern character.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Decimal => 'd',
            Self::Hex => 'x',
            Self::Fixed => 'f',
            Self::Scientific => 'e',
            Self::Text => 's',
            Self::Bool => 'b',
        }
    }

    /// Whether a floating-point argument is accepted.
    #[must_use]
    pub fn accepts_float(self) -> bool {
        !matches!(self, Self::Decimal | Self::Hex)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
    upper: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Directive(Directive),
}

/// A parsed, reusable format pattern.
///
/// # Example
///
/// ```
/// use fxbind_i18n::format::{FormatArg, FormatPattern};
///
/// let pattern = FormatPattern::parse("%,.2f kg").unwrap();
/// assert_eq!(pattern.render("en", &[FormatArg::Float(1234.5)]).unwrap(), "1,234.50 kg");
/// assert_eq!(pattern.render("de", &[FormatArg::Float(1234.5)]).unwrap(), "1.234,50 kg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    segments: Vec<Segment>,
}

impl FormatPattern {
    /// Parse a pattern.
    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some(&(_, first)) = chars.peek() else {
                return Err(FormatError::Unterminated(offset));
            };
            match first {
                '%' => {
                    chars.next();
                    literal.push('%');
                    continue;
                }
                'n' => {
                    chars.next();
                    literal.push('\n');
                    continue;
                }
                _ => {}
            }

            let mut flags = Flags::default();
            while let Some(&(_, f)) = chars.peek() {
                match f {
                    '-' => flags.left = true,
                    '0' => flags.zero = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    ',' => flags.group = true,
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars);
            let precision = match chars.peek() {
                Some(&(_, '.')) => {
                    chars.next();
                    Some(take_number(&mut chars).unwrap_or(0))
                }
                _ => None,
            };

            let Some((conv_offset, conv)) = chars.next() else {
                return Err(FormatError::Unterminated(offset));
            };
            let (conversion, upper) =
                Conversion::from_char(conv).ok_or(FormatError::UnknownConversion {
                    conversion: conv,
                    offset: conv_offset,
                })?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Directive(Directive {
                flags,
                width,
                precision,
                conversion,
                upper,
            }));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Conversions in argument order.
    pub fn conversions(&self) -> impl Iterator<Item = Conversion> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Directive(directive) => Some(directive.conversion),
            Segment::Literal(_) => None,
        })
    }

    /// Number of arguments the pattern consumes.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.conversions().count()
    }

    /// Render the pattern for `locale` with the given arguments.
    pub fn render(&self, locale: &str, args: &[FormatArg]) -> Result<String, FormatError> {
        let symbols = DecimalSymbols::for_locale(locale);
        let mut out = String::with_capacity(self.source.len() + 8);
        let mut next = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Directive(directive) => {
                    let arg = args.get(next).ok_or(FormatError::MissingArgument(next))?;
                    next += 1;
                    out.push_str(&directive.render(arg, symbols)?);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse `pattern` and render it in one step.
pub fn format(locale: &str, pattern: &str, args: &[FormatArg]) -> Result<String, FormatError> {
    FormatPattern::parse(pattern)?.render(locale, args)
}

/// Locale-independent display form of a float: `3.0`, `0.25`, `NaN`.
#[must_use]
pub fn display_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{value:?}")
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&(_, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else { break };
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

impl Directive {
    fn mismatch(&self, arg: &FormatArg) -> FormatError {
        FormatError::Mismatch {
            conversion: self.conversion.as_char(),
            found: arg.type_name(),
        }
    }

    fn render(&self, arg: &FormatArg, symbols: DecimalSymbols) -> Result<String, FormatError> {
        let (body, numeric) = match self.conversion {
            Conversion::Decimal => {
                let FormatArg::Int(v) = arg else {
                    return Err(self.mismatch(arg));
                };
                let digits = v.unsigned_abs().to_string();
                let digits = if self.flags.group {
                    group_digits(&digits, symbols.grouping)
                } else {
                    digits
                };
                (self.signed(*v < 0, digits), true)
            }
            Conversion::Hex => {
                let FormatArg::Int(v) = arg else {
                    return Err(self.mismatch(arg));
                };
                (format!("{v:x}"), true)
            }
            Conversion::Fixed => {
                let v = self.float_arg(arg)?;
                (self.fixed(v, symbols), v.is_finite())
            }
            Conversion::Scientific => {
                let v = self.float_arg(arg)?;
                (self.scientific(v, symbols), v.is_finite())
            }
            Conversion::Text => {
                let text = match arg {
                    FormatArg::Null => "null".to_string(),
                    FormatArg::Bool(b) => b.to_string(),
                    FormatArg::Int(v) => v.to_string(),
                    FormatArg::Float(v) => display_float(*v),
                    FormatArg::Str(s) => s.clone(),
                };
                let text = match self.precision {
                    Some(max) => text.chars().take(max).collect(),
                    None => text,
                };
                (text, false)
            }
            Conversion::Bool => {
                let b = match arg {
                    FormatArg::Null => false,
                    FormatArg::Bool(b) => *b,
                    _ => true,
                };
                (b.to_string(), false)
            }
        };
        let body = if self.upper {
            body.to_uppercase()
        } else {
            body
        };
        Ok(self.pad(body, numeric))
    }

    fn float_arg(&self, arg: &FormatArg) -> Result<f64, FormatError> {
        match arg {
            FormatArg::Float(v) => Ok(*v),
            #[allow(clippy::cast_precision_loss)]
            FormatArg::Int(v) => Ok(*v as f64),
            other => Err(self.mismatch(other)),
        }
    }

    fn signed(&self, negative: bool, digits: String) -> String {
        let sign = if negative {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };
        format!("{sign}{digits}")
    }

    fn fixed(&self, v: f64, symbols: DecimalSymbols) -> String {
        if !v.is_finite() {
            return display_float(v);
        }
        let precision = self.precision.unwrap_or(6);
        let raw = format!("{:.precision$}", v.abs());
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (raw, None),
        };
        let int_part = if self.flags.group {
            group_digits(&int_part, symbols.grouping)
        } else {
            int_part
        };
        let body = match frac_part {
            Some(frac) => format!("{int_part}{}{frac}", symbols.decimal),
            None => int_part,
        };
        self.signed(v < 0.0, body)
    }

    fn scientific(&self, v: f64, symbols: DecimalSymbols) -> String {
        if !v.is_finite() {
            return display_float(v);
        }
        let precision = self.precision.unwrap_or(6);
        // `{:e}` rounds correctly and keeps subnormals finite.
        let formatted = format!("{:.precision$e}", v.abs());
        let (text, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let text = text.replace('.', &symbols.decimal.to_string());
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let body = format!("{text}e{exp_sign}{:02}", exponent.unsigned_abs());
        self.signed(v < 0.0, body)
    }

    fn pad(&self, body: String, numeric: bool) -> String {
        let len = body.chars().count();
        let Some(width) = self.width.filter(|w| *w > len) else {
            return body;
        };
        let fill = width - len;
        if self.flags.left {
            return format!("{body}{}", " ".repeat(fill));
        }
        if self.flags.zero && numeric {
            let sign_len = body
                .chars()
                .take_while(|c| matches!(c, '-' | '+' | ' '))
                .count();
            let (sign, digits) = body.split_at(sign_len);
            return format!("{sign}{}{digits}", "0".repeat(fill));
        }
        format!("{}{body}", " ".repeat(fill))
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(pattern: &str, locale: &str, args: &[FormatArg]) -> String {
        format(locale, pattern, args).unwrap()
    }

    #[test]
    fn literal_only() {
        assert_eq!(render("plain text", "en", &[]), "plain text");
        assert_eq!(render("100%%", "en", &[]), "100%");
        assert_eq!(render("a%nb", "en", &[]), "a\nb");
    }

    #[test]
    fn decimal_flags() {
        assert_eq!(render("%d", "en", &[42.into()]), "42");
        assert_eq!(render("%+d", "en", &[42.into()]), "+42");
        assert_eq!(render("%5d|", "en", &[42.into()]), "   42|");
        assert_eq!(render("%-5d|", "en", &[42.into()]), "42   |");
        assert_eq!(render("%05d", "en", &[(-42).into()]), "-0042");
        assert_eq!(render("%,d", "en", &[1_234_567i64.into()]), "1,234,567");
        assert_eq!(render("%,d", "de", &[1_234_567i64.into()]), "1.234.567");
    }

    #[test]
    fn fixed_uses_locale_separator() {
        assert_eq!(render("%.2f", "en", &[3.14159.into()]), "3.14");
        assert_eq!(render("%.2f", "de-DE", &[3.14159.into()]), "3,14");
        assert_eq!(render("%f", "en", &[1.5.into()]), "1.500000");
        assert_eq!(render("%.0f", "en", &[2.into()]), "2");
        assert_eq!(render("%,.1f", "fr", &[12345.26.into()]), "12\u{a0}345,3");
    }

    #[test]
    fn fixed_negative_and_special() {
        assert_eq!(render("%.1f", "en", &[(-0.26).into()]), "-0.3");
        assert_eq!(render("%.2f", "en", &[f64::NAN.into()]), "NaN");
        assert_eq!(render("%f", "en", &[f64::NEG_INFINITY.into()]), "-Infinity");
    }

    #[test]
    fn scientific() {
        assert_eq!(render("%e", "en", &[12.3456.into()]), "1.234560e+01");
        assert_eq!(render("%.2e", "en", &[0.000123.into()]), "1.23e-04");
        assert_eq!(render("%.1E", "en", &[9.96.into()]), "1.0E+01");
        assert_eq!(render("%.2e", "de", &[0.0.into()]), "0,00e+00");
        assert_eq!(render("%e", "en", &[(-2.5e-7).into()]), "-2.500000e-07");
    }

    #[test]
    fn scientific_subnormals_stay_finite() {
        assert_eq!(render("%e", "en", &[5e-324.into()]), "4.940656e-324");
        assert_eq!(render("%.3e", "en", &[f64::MIN_POSITIVE.into()]), "2.225e-308");
        assert_eq!(render("%.1e", "en", &[f64::MAX.into()]), "1.8e+308");
    }

    #[test]
    fn text_and_bool() {
        assert_eq!(render("%s", "en", &["hi".into()]), "hi");
        assert_eq!(render("%S", "en", &["hi".into()]), "HI");
        assert_eq!(render("%.2s", "en", &["hello".into()]), "he");
        assert_eq!(render("%s", "en", &[FormatArg::Null]), "null");
        assert_eq!(render("%s", "en", &[2.0.into()]), "2.0");
        assert_eq!(render("%b %b %b", "en", &[FormatArg::Null, false.into(), 1.into()]), "false false true");
        assert_eq!(render("%x %X", "en", &[255.into(), 255.into()]), "ff FF");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(FormatPattern::parse("abc %"), Err(FormatError::Unterminated(4)));
        assert_eq!(
            FormatPattern::parse("%q"),
            Err(FormatError::UnknownConversion {
                conversion: 'q',
                offset: 1
            })
        );
        assert!(FormatPattern::parse("%.2").is_err());
    }

    #[test]
    fn render_errors() {
        let pattern = FormatPattern::parse("%d and %d").unwrap();
        assert_eq!(pattern.arg_count(), 2);
        assert_eq!(pattern.render("en", &[1.into()]), Err(FormatError::MissingArgument(1)));
        assert_eq!(
            FormatPattern::parse("%d").unwrap().render("en", &[1.5.into()]),
            Err(FormatError::Mismatch {
                conversion: 'd',
                found: "a float"
            })
        );
    }

    #[test]
    fn conversions_in_order() {
        let pattern = FormatPattern::parse("%s=%.3f (%d)").unwrap();
        let kinds: Vec<_> = pattern.conversions().collect();
        assert_eq!(kinds, vec![Conversion::Text, Conversion::Fixed, Conversion::Decimal]);
        assert!(!Conversion::Decimal.accepts_float());
        assert!(Conversion::Fixed.accepts_float());
    }

    #[test]
    fn display_float_keeps_fraction_marker() {
        assert_eq!(display_float(3.0), "3.0");
        assert_eq!(display_float(0.25), "0.25");
        assert_eq!(display_float(f64::INFINITY), "Infinity");
    }

    proptest! {
        #[test]
        fn grouping_round_trips_digits(v in any::<i64>()) {
            let grouped = render("%,d", "en", &[v.into()]);
            let stripped: String = grouped.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, v.to_string());
        }

        #[test]
        fn width_is_a_lower_bound(v in -10_000i64..10_000, width in 0usize..12) {
            let pattern = format!("%{width}d");
            let out = render(&pattern, "en", &[v.into()]);
            prop_assert!(out.chars().count() >= width);
            prop_assert_eq!(out.trim_start().parse::<i64>().unwrap(), v);
        }
    }
}
