//! Decimal and grouping symbols per locale.
//!
//! Implements a small table covering the most common conventions. Each
//! locale tag maps to exactly one [`DecimalSymbols`] value.
//!
//! # Invariants
//!
//! 1. Every locale tag, known or not, maps to a symbol set.
//! 2. Unknown languages use the English convention (`.` and `,`).
//! 3. Decimal and grouping separators are always distinct.

/// Locale identifier (e.g., `"en"`, `"en-US"`, `"de-CH"`).
pub type Locale = String;

/// Separators used when rendering numbers for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSymbols {
    /// Separator between the integer and fractional part.
    pub decimal: char,
    /// Separator between digit groups of the integer part.
    pub grouping: char,
}

impl DecimalSymbols {
    /// English convention: `1,234.5`.
    pub const ENGLISH: Self = Self {
        decimal: '.',
        grouping: ',',
    };

    /// Continental convention: `1.234,5`.
    pub const CONTINENTAL: Self = Self {
        decimal: ',',
        grouping: '.',
    };

    /// Space-grouped convention: `1 234,5` (no-break space).
    pub const SPACED: Self = Self {
        decimal: ',',
        grouping: '\u{a0}',
    };

    /// Swiss convention: `1'234.5`.
    pub const SWISS: Self = Self {
        decimal: '.',
        grouping: '\'',
    };

    /// Select the symbols for a locale tag (e.g., `"en"`, `"de-DE"`, `"fr_CA"`).
    ///
    /// Falls back to English if the language is unknown.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let mut parts = locale.split(['-', '_']);
        let primary = parts.next().unwrap_or(locale).to_ascii_lowercase();
        let region = parts.next().map(str::to_ascii_uppercase);

        match (primary.as_str(), region.as_deref()) {
            ("de" | "it" | "fr" | "rm", Some("CH")) | ("de", Some("LI")) => Self::SWISS,
            ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro" | "hr"
            | "sl" | "sr", _) => Self::CONTINENTAL,
            ("fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "nn" | "uk"
            | "hu" | "bg" | "et" | "lv" | "lt", _) => Self::SPACED,
            _ => Self::ENGLISH,
        }
    }
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        Self::ENGLISH
    }
}

/// Normalise a raw locale string such as `"fr_FR.UTF-8@euro"` to `"fr-FR"`.
///
/// `C` and `POSIX` map to `"en"`. Returns `None` for blank input.
#[must_use]
pub fn normalize_locale(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some("en".to_string());
    }
    Some(raw.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_family() {
        assert_eq!(DecimalSymbols::for_locale("en"), DecimalSymbols::ENGLISH);
        assert_eq!(DecimalSymbols::for_locale("en-US"), DecimalSymbols::ENGLISH);
        assert_eq!(DecimalSymbols::for_locale("ja"), DecimalSymbols::ENGLISH);
    }

    #[test]
    fn continental_family() {
        assert_eq!(DecimalSymbols::for_locale("de"), DecimalSymbols::CONTINENTAL);
        assert_eq!(DecimalSymbols::for_locale("de_DE"), DecimalSymbols::CONTINENTAL);
        assert_eq!(DecimalSymbols::for_locale("pt-BR"), DecimalSymbols::CONTINENTAL);
    }

    #[test]
    fn region_overrides_language() {
        assert_eq!(DecimalSymbols::for_locale("de-CH"), DecimalSymbols::SWISS);
        assert_eq!(DecimalSymbols::for_locale("fr-ch"), DecimalSymbols::SWISS);
        assert_eq!(DecimalSymbols::for_locale("fr-FR"), DecimalSymbols::SPACED);
    }

    #[test]
    fn unknown_defaults_to_english() {
        assert_eq!(DecimalSymbols::for_locale("xx"), DecimalSymbols::ENGLISH);
        assert_eq!(DecimalSymbols::for_locale(""), DecimalSymbols::ENGLISH);
    }

    #[test]
    fn normalize_strips_encoding_and_modifier() {
        assert_eq!(normalize_locale("fr_FR.UTF-8@euro").as_deref(), Some("fr-FR"));
        assert_eq!(normalize_locale(" de_CH ").as_deref(), Some("de-CH"));
        assert_eq!(normalize_locale("POSIX").as_deref(), Some("en"));
        assert_eq!(normalize_locale("C.UTF-8").as_deref(), Some("en"));
        assert_eq!(normalize_locale("  "), None);
        assert_eq!(normalize_locale(".UTF-8"), None);
    }
}
