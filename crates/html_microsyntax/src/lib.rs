//! HTML Standard: common microsyntaxes used by attribute reflection.
//! Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html>
//!
//! Every parser here is total: malformed input yields `None` (or the
//! configured default keyword) and never an error. Deciding what to do with
//! "could not parse" belongs to the caller.

#![forbid(unsafe_code)]

// One module per section of the HTML Standard's microsyntax chapter.
pub mod enumerated;
pub mod numbers;
pub mod tokens;

pub use enumerated::{Enumerated, EnumeratedAttributeOptions, EnumeratedOptionsError};
pub use numbers::{parse_double, parse_integer, parse_non_negative_integer};
pub use tokens::{TokenSet, parse_ordered_set, serialize_ordered_set};

/// ASCII whitespace per the Infra Standard (TAB, LF, FF, CR, SPACE).
///
/// Spec: <https://infra.spec.whatwg.org/#ascii-whitespace>
#[inline]
#[must_use]
pub const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}
