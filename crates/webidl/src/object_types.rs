//! WebIDL §3.2.1–§3.2.3, §3.2.13–§3.2.14 and §3.2.19: `any`, `boolean`,
//! `object`, `symbol` and callback function types.
//! Spec: <https://webidl.spec.whatwg.org/#js-type-mapping>

use js::{JSError, JSValue, ObjectRef, Symbol};

/// `any`: every value is accepted as-is.
#[inline]
#[must_use]
pub fn to_any(value: &JSValue) -> JSValue {
    value.clone()
}

/// `boolean`: `ToBoolean`, which never throws.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-boolean>
#[inline]
#[must_use]
pub fn to_boolean(value: &JSValue) -> bool {
    js::to_boolean(value)
}

/// `object`
///
/// # Errors
/// Returns a `TypeError` for primitives.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-object>
pub fn to_object(value: &JSValue) -> Result<ObjectRef, JSError> {
    match value {
        JSValue::Object(object) => Ok(object.clone()),
        other => Err(JSError::type_error(format!("{} is not an object", other.debug_string()))),
    }
}

/// `symbol`
///
/// # Errors
/// Returns a `TypeError` for anything that is not a symbol.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-symbol>
pub fn to_symbol(value: &JSValue) -> Result<Symbol, JSError> {
    match value {
        JSValue::Symbol(symbol) => Ok(symbol.clone()),
        other => Err(JSError::type_error(format!("{} is not a symbol", other.debug_string()))),
    }
}

/// Callback function type.
///
/// # Errors
/// Returns a `TypeError` unless the value is callable.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-callback-function>
pub fn to_callback_function(value: &JSValue) -> Result<ObjectRef, JSError> {
    match value {
        JSValue::Object(object) if object.is_callable() => Ok(object.clone()),
        other => Err(JSError::type_error(format!("{} is not a function", other.debug_string()))),
    }
}

/// Nullable callback function type: `null` and `undefined` become `None`.
///
/// # Errors
/// Returns a `TypeError` for non-callable, non-nullish values.
pub fn to_nullable_callback_function(value: &JSValue) -> Result<Option<ObjectRef>, JSError> {
    if value.is_nullish() {
        return Ok(None);
    }
    to_callback_function(value).map(Some)
}

/// `[LegacyTreatNonObjectAsNull]` callback function type.
///
/// Any non-object becomes `None`; objects pass through unchanged even when
/// they are not callable. Invocation later ignores non-callable values.
///
/// Spec: <https://webidl.spec.whatwg.org/#LegacyTreatNonObjectAsNull>
#[must_use]
pub fn to_legacy_callback_function(value: &JSValue) -> Option<ObjectRef> {
    value.as_object().cloned()
}
