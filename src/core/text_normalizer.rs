//! Text Normalization
//!
//! Canonical form used for every functionality-name comparison.

use std::fmt::Display;

/// Lowercase and trim the string form of `value`.
///
/// Nothing else is touched: internal whitespace, punctuation and accents
/// survive, so `"Log  in"` and `"log in"` stay distinct for exact lookup.
pub fn normalize<T: Display + ?Sized>(value: &T) -> String {
    value.to_string().to_lowercase().trim().to_string()
}
