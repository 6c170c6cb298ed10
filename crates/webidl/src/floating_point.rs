//! WebIDL §3.2.5–§3.2.8 Floating point types
//! Spec: <https://webidl.spec.whatwg.org/#js-float>

use js::{JSError, JSValue, to_number};

/// `float`: nearest single-precision value; non-finite input or a result
/// that overflows single precision throws.
///
/// # Errors
/// Returns a `TypeError` when the value is not finite before or after rounding.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-float>
pub fn to_float(value: &JSValue) -> Result<f32, JSError> {
    let number = to_number(value)?;
    if !number.is_finite() {
        return Err(JSError::type_error("The provided value is non-finite"));
    }
    let rounded = number as f32;
    if rounded.is_infinite() {
        return Err(JSError::type_error("The provided value is outside the range of float"));
    }
    Ok(rounded)
}

/// `unrestricted float`: nearest single-precision value, keeping `NaN` and infinities.
///
/// # Errors
/// Propagates `ToNumber` failures.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-unrestricted-float>
pub fn to_unrestricted_float(value: &JSValue) -> Result<f32, JSError> {
    let number = to_number(value)?;
    if number.is_nan() {
        return Ok(f32::NAN);
    }
    Ok(number as f32)
}

/// `double`: like `ToNumber` but non-finite values throw.
///
/// # Errors
/// Returns a `TypeError` for `NaN` and infinities.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-double>
pub fn to_double(value: &JSValue) -> Result<f64, JSError> {
    let number = to_number(value)?;
    if !number.is_finite() {
        return Err(JSError::type_error("The provided value is non-finite"));
    }
    Ok(number)
}

/// `unrestricted double`
///
/// # Errors
/// Propagates `ToNumber` failures.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-unrestricted-double>
pub fn to_unrestricted_double(value: &JSValue) -> Result<f64, JSError> {
    to_number(value)
}
