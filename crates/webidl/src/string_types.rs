//! WebIDL §3.2.10–§3.2.12 String types
//! Spec: <https://webidl.spec.whatwg.org/#js-DOMString>

use js::{DomString, JSError, JSValue, to_string};

/// `DOMString`: the template-literal stringification. Only symbols throw.
///
/// # Errors
/// Returns a `TypeError` for symbols and propagates exceptions from object
/// conversion.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-DOMString>
pub fn to_dom_string(value: &JSValue) -> Result<DomString, JSError> {
    if matches!(value, JSValue::Symbol(_)) {
        return Err(JSError::type_error("Cannot convert a Symbol value to a string"));
    }
    to_string(value)
}

/// `[LegacyNullToEmptyString] DOMString`: `null` becomes the empty string.
///
/// # Errors
/// See [`to_dom_string`].
///
/// Spec: <https://webidl.spec.whatwg.org/#LegacyNullToEmptyString>
pub fn to_dom_string_legacy_null_to_empty(value: &JSValue) -> Result<DomString, JSError> {
    if matches!(value, JSValue::Null) {
        return Ok(DomString::new());
    }
    to_dom_string(value)
}

/// `ByteString`: a `DOMString` whose code units all fit in one byte.
///
/// # Errors
/// Returns a `TypeError` when any code unit exceeds U+00FF.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-ByteString>
pub fn to_byte_string(value: &JSValue) -> Result<DomString, JSError> {
    let text = to_dom_string(value)?;
    if let Some(unit) = text.code_units().iter().find(|unit| **unit > 0xFF) {
        return Err(JSError::type_error(format!(
            "Cannot convert to ByteString because the character U+{unit:04X} is greater than 255"
        )));
    }
    Ok(text)
}

/// `USVString`: a `DOMString` with lone surrogates replaced by U+FFFD.
///
/// # Errors
/// See [`to_dom_string`].
///
/// Spec: <https://webidl.spec.whatwg.org/#js-USVString>
pub fn to_usv_string(value: &JSValue) -> Result<DomString, JSError> {
    Ok(to_dom_string(value)?.to_well_formed())
}
