//! UTF-16 string storage for JavaScript string values.
//!
//! JavaScript strings are sequences of 16-bit code units and may contain lone
//! surrogates. `DomString` keeps that representation so conversions such as
//! `USVString` can observe and replace them.

use core::char::{REPLACEMENT_CHARACTER, decode_utf16};
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// A JavaScript string value stored as UTF-16 code units.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomString(Vec<u16>);

impl DomString {
    /// Create an empty string.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw UTF-16 code units without validation.
    #[inline]
    #[must_use]
    pub const fn from_code_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    /// Borrow the raw code units.
    #[inline]
    #[must_use]
    pub fn code_units(&self) -> &[u16] {
        &self.0
    }

    /// Number of UTF-16 code units (JavaScript `length`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string has no code units.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append another string.
    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.0.extend(text.encode_utf16());
    }

    /// Append the code units of another `DomString`.
    #[inline]
    pub fn append(&mut self, other: &Self) {
        self.0.extend_from_slice(&other.0);
    }

    /// Whether the string contains no lone surrogates.
    ///
    /// Spec: <https://tc39.es/ecma262/#sec-isstringwellformedunicode>
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        decode_utf16(self.0.iter().copied()).all(|decoded| decoded.is_ok())
    }

    /// Replace every lone surrogate with U+FFFD.
    ///
    /// Spec: <https://webidl.spec.whatwg.org/#dfn-obtain-unicode>
    #[must_use]
    pub fn to_well_formed(&self) -> Self {
        if self.is_well_formed() {
            return self.clone();
        }
        let mut units = Vec::with_capacity(self.0.len());
        let mut buffer = [0_u16; 2];
        for decoded in decode_utf16(self.0.iter().copied()) {
            let character = decoded.unwrap_or(REPLACEMENT_CHARACTER);
            units.extend_from_slice(character.encode_utf16(&mut buffer));
        }
        Self(units)
    }

    /// Iterate over code points, yielding lone surrogates as `Err(unit)`.
    pub fn code_points(&self) -> impl Iterator<Item = Result<char, u16>> + '_ {
        decode_utf16(self.0.iter().copied()).map(|decoded| decoded.map_err(|err| err.unpaired_surrogate()))
    }

    /// Convert into a Rust string, replacing lone surrogates with U+FFFD.
    #[must_use]
    pub fn to_rust_string_lossy(&self) -> String {
        decode_utf16(self.0.iter().copied())
            .map(|decoded| decoded.unwrap_or(REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl From<&str> for DomString {
    #[inline]
    fn from(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }
}

impl From<String> for DomString {
    #[inline]
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<&String> for DomString {
    #[inline]
    fn from(text: &String) -> Self {
        Self::from(text.as_str())
    }
}

impl PartialEq<str> for DomString {
    fn eq(&self, other: &str) -> bool {
        self.0.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for DomString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Display for DomString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(&self.to_rust_string_lossy())
    }
}

impl Debug for DomString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{:?}", self.to_rust_string_lossy())
    }
}
