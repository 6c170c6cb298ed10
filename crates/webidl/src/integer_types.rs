//! WebIDL §3.2.4 Integer types
//! Spec: <https://webidl.spec.whatwg.org/#js-integer-types>

use js::{JSError, JSValue, integer_part, to_number};

/// How an out-of-range number is brought into an integer type's range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IntegerConversion {
    /// Plain conversion: wrap modulo 2^bitLength.
    #[default]
    Modulo,
    /// `[Clamp]`: saturate to the bounds and round half to even; `NaN` becomes 0.
    Clamp,
    /// `[EnforceRange]`: throw unless the truncated value is in range.
    EnforceRange,
}

/// An IDL integer type: its bit length, signedness and Rust representation.
pub trait IdlInteger: Copy {
    /// Number of bits in the IDL type.
    const BIT_LENGTH: u32;
    /// Whether the IDL type is signed.
    const SIGNED: bool;
    /// IDL type name for error messages.
    const IDL_NAME: &'static str;

    /// Truncate a value already reduced modulo 2^64 to this type's width.
    fn from_wrapped(bits: u64) -> Self;

    /// Convert an integral `f64` known to lie within the type's bounds.
    fn from_in_range(value: f64) -> Self;
}

macro_rules! idl_integer {
    ($rust:ty, $bits:expr, $signed:expr, $name:expr) => {
        impl IdlInteger for $rust {
            const BIT_LENGTH: u32 = $bits;
            const SIGNED: bool = $signed;
            const IDL_NAME: &'static str = $name;

            #[inline]
            fn from_wrapped(bits: u64) -> Self {
                bits as Self
            }

            #[inline]
            fn from_in_range(value: f64) -> Self {
                value as Self
            }
        }
    };
}

idl_integer!(i8, 8, true, "byte");
idl_integer!(u8, 8, false, "octet");
idl_integer!(i16, 16, true, "short");
idl_integer!(u16, 16, false, "unsigned short");
idl_integer!(i32, 32, true, "long");
idl_integer!(u32, 32, false, "unsigned long");
idl_integer!(i64, 64, true, "long long");
idl_integer!(u64, 64, false, "unsigned long long");

/// 2^53 − 1, the bound used for 64-bit types under `[Clamp]`/`[EnforceRange]`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn bounds<T: IdlInteger>() -> (f64, f64) {
    if T::BIT_LENGTH == 64 {
        let lower = if T::SIGNED { -MAX_SAFE_INTEGER } else { 0.0 };
        return (lower, MAX_SAFE_INTEGER);
    }
    let bits = i32::try_from(T::BIT_LENGTH).unwrap_or(32);
    if T::SIGNED {
        let half = 2_f64.powi(bits - 1);
        (-half, half - 1.0)
    } else {
        (0.0, 2_f64.powi(bits) - 1.0)
    }
}

/// Reduce an integral `f64` modulo 2^64, exactly.
fn wrap_to_u64(integral: f64) -> u64 {
    let remainder = integral % TWO_POW_64;
    if remainder >= 0.0 {
        remainder as u64
    } else {
        (-remainder as u64).wrapping_neg()
    }
}

/// `ConvertToInt(V, bitLength, signedness)`
///
/// # Errors
/// Propagates `ToNumber` failures; under `[EnforceRange]` returns a
/// `TypeError` for non-finite or out-of-range values.
///
/// Spec: <https://webidl.spec.whatwg.org/#abstract-opdef-converttoint>
pub fn convert_to_int<T: IdlInteger>(value: &JSValue, conversion: IntegerConversion) -> Result<T, JSError> {
    let (lower, upper) = bounds::<T>();
    let number = to_number(value)?;
    let number = if number == 0.0 { 0.0 } else { number };

    match conversion {
        IntegerConversion::EnforceRange => {
            if !number.is_finite() {
                return Err(JSError::type_error(format!(
                    "Value is not a finite number and cannot be converted to '{}'",
                    T::IDL_NAME
                )));
            }
            let integral = integer_part(number);
            if integral < lower || integral > upper {
                return Err(JSError::type_error(format!(
                    "Value is outside the '{}' value range",
                    T::IDL_NAME
                )));
            }
            Ok(T::from_in_range(integral))
        }
        IntegerConversion::Clamp => {
            if number.is_nan() {
                return Ok(T::from_in_range(0.0));
            }
            let clamped = number.clamp(lower, upper).round_ties_even();
            Ok(T::from_in_range(if clamped == 0.0 { 0.0 } else { clamped }))
        }
        IntegerConversion::Modulo => {
            if !number.is_finite() {
                return Ok(T::from_in_range(0.0));
            }
            Ok(T::from_wrapped(wrap_to_u64(integer_part(number))))
        }
    }
}

/// `byte`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_byte(value: &JSValue, conversion: IntegerConversion) -> Result<i8, JSError> {
    convert_to_int(value, conversion)
}

/// `octet`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_octet(value: &JSValue, conversion: IntegerConversion) -> Result<u8, JSError> {
    convert_to_int(value, conversion)
}

/// `short`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_short(value: &JSValue, conversion: IntegerConversion) -> Result<i16, JSError> {
    convert_to_int(value, conversion)
}

/// `unsigned short`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_unsigned_short(value: &JSValue, conversion: IntegerConversion) -> Result<u16, JSError> {
    convert_to_int(value, conversion)
}

/// `long`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_long(value: &JSValue, conversion: IntegerConversion) -> Result<i32, JSError> {
    convert_to_int(value, conversion)
}

/// `unsigned long`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_unsigned_long(value: &JSValue, conversion: IntegerConversion) -> Result<u32, JSError> {
    convert_to_int(value, conversion)
}

/// `long long`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_long_long(value: &JSValue, conversion: IntegerConversion) -> Result<i64, JSError> {
    convert_to_int(value, conversion)
}

/// `unsigned long long`
///
/// # Errors
/// See [`convert_to_int`].
pub fn to_unsigned_long_long(value: &JSValue, conversion: IntegerConversion) -> Result<u64, JSError> {
    convert_to_int(value, conversion)
}

#[cfg(test)]
mod tests {
    use super::wrap_to_u64;

    #[test]
    fn wrapping_is_exact_for_negative_values() {
        assert_eq!(wrap_to_u64(-1.0), u64::MAX);
        assert_eq!(wrap_to_u64(-3.0), u64::MAX - 2);
        assert_eq!(wrap_to_u64(18_446_744_073_709_551_616.0), 0);
        assert_eq!(wrap_to_u64(4_294_967_296.0), 4_294_967_296);
    }
}
