//! ECMAScript abstract operations used by the WebIDL bindings.
//!
//! Spec: <https://tc39.es/ecma262/#sec-abstract-operations>

use num_bigint::BigInt;
use num_traits::{ToPrimitive as _, Zero as _};

use crate::error::JSError;
use crate::object::ObjectRef;
use crate::string::DomString;
use crate::symbol::Symbol;
use crate::value::{JSValue, PropertyKey};

/// Preferred type passed to `ToPrimitive`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PreferredType {
    /// No preference (`"default"`).
    Default,
    /// Prefer a number (`"number"`).
    Number,
    /// Prefer a string (`"string"`).
    String,
}

impl PreferredType {
    const fn hint(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// `ToBoolean`
///
/// Spec: <https://tc39.es/ecma262/#sec-toboolean>
#[must_use]
pub fn to_boolean(value: &JSValue) -> bool {
    match value {
        JSValue::Undefined | JSValue::Null => false,
        JSValue::Boolean(boolean) => *boolean,
        JSValue::Number(number) => !(number.is_nan() || *number == 0.0),
        JSValue::BigInt(big) => !big.is_zero(),
        JSValue::String(text) => !text.is_empty(),
        JSValue::Symbol(_) | JSValue::Object(_) => true,
    }
}

/// `GetMethod(V, P)` for object receivers; primitives have no methods here.
///
/// # Errors
/// Returns a `TypeError` when the property exists but is not callable.
///
/// Spec: <https://tc39.es/ecma262/#sec-getmethod>
pub fn get_method(value: &JSValue, key: PropertyKey) -> Result<Option<ObjectRef>, JSError> {
    let JSValue::Object(object) = value else {
        return Ok(None);
    };
    match object.get(key) {
        JSValue::Undefined | JSValue::Null => Ok(None),
        JSValue::Object(function) if function.is_callable() => Ok(Some(function)),
        other => Err(JSError::type_error(format!("{} is not a function", other.debug_string()))),
    }
}

/// `ToPrimitive`
///
/// # Errors
/// Propagates exceptions from `@@toPrimitive`, `valueOf` and `toString`, and
/// returns a `TypeError` when no primitive can be produced.
///
/// Spec: <https://tc39.es/ecma262/#sec-toprimitive>
pub fn to_primitive(value: &JSValue, preferred: PreferredType) -> Result<JSValue, JSError> {
    let JSValue::Object(object) = value else {
        return Ok(value.clone());
    };
    if let Some(exotic) = get_method(value, PropertyKey::Symbol(Symbol::to_primitive()))? {
        let result = exotic.call(value, &[JSValue::string(preferred.hint())])?;
        if matches!(result, JSValue::Object(_)) {
            return Err(JSError::type_error("Cannot convert object to primitive value"));
        }
        return Ok(result);
    }
    let preferred = if preferred == PreferredType::Default {
        PreferredType::Number
    } else {
        preferred
    };
    ordinary_to_primitive(object, preferred)
}

/// `OrdinaryToPrimitive`
///
/// Spec: <https://tc39.es/ecma262/#sec-ordinarytoprimitive>
fn ordinary_to_primitive(object: &ObjectRef, preferred: PreferredType) -> Result<JSValue, JSError> {
    let order = if preferred == PreferredType::String {
        ["toString", "valueOf"]
    } else {
        ["valueOf", "toString"]
    };
    let receiver = JSValue::Object(object.clone());
    for name in order {
        if let JSValue::Object(method) = object.get(name)
            && method.is_callable()
        {
            let result = method.call(&receiver, &[])?;
            if !matches!(result, JSValue::Object(_)) {
                return Ok(result);
            }
        }
    }
    Err(JSError::type_error("Cannot convert object to primitive value"))
}

/// `ToNumber`
///
/// # Errors
/// Returns a `TypeError` for symbols and BigInts, and propagates exceptions
/// raised while converting objects.
///
/// Spec: <https://tc39.es/ecma262/#sec-tonumber>
pub fn to_number(value: &JSValue) -> Result<f64, JSError> {
    match value {
        JSValue::Undefined => Ok(f64::NAN),
        JSValue::Null => Ok(0.0),
        JSValue::Boolean(boolean) => Ok(if *boolean { 1.0 } else { 0.0 }),
        JSValue::Number(number) => Ok(*number),
        JSValue::String(text) => Ok(string_to_number(text)),
        JSValue::BigInt(_) => Err(JSError::type_error("Cannot convert a BigInt value to a number")),
        JSValue::Symbol(_) => Err(JSError::type_error("Cannot convert a Symbol value to a number")),
        JSValue::Object(_) => to_number(&to_primitive(value, PreferredType::Number)?),
    }
}

/// ECMAScript `WhiteSpace` and `LineTerminator` code units.
///
/// Spec: <https://tc39.es/ecma262/#sec-white-space>
const fn is_js_whitespace(unit: u16) -> bool {
    matches!(
        unit,
        0x0009
            | 0x000A
            | 0x000B
            | 0x000C
            | 0x000D
            | 0x0020
            | 0x00A0
            | 0x1680
            | 0x2000..=0x200A
            | 0x2028
            | 0x2029
            | 0x202F
            | 0x205F
            | 0x3000
            | 0xFEFF
    )
}

fn trim_js_whitespace(text: &DomString) -> Option<String> {
    let units = text.code_units();
    let start = units.iter().position(|unit| !is_js_whitespace(*unit)).unwrap_or(units.len());
    let end = units.iter().rposition(|unit| !is_js_whitespace(*unit)).map_or(start, |last| last.saturating_add(1));
    String::from_utf16(units.get(start..end).unwrap_or_default()).ok()
}

/// `StringToNumber`: parse a StringNumericLiteral, yielding `NaN` when the
/// text is not one.
///
/// Spec: <https://tc39.es/ecma262/#sec-stringtonumber>
#[must_use]
pub fn string_to_number(text: &DomString) -> f64 {
    let Some(trimmed) = trim_js_whitespace(text) else {
        return f64::NAN;
    };
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_non_decimal(&trimmed) {
        return value;
    }
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed.as_str()),
    };
    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else if is_unsigned_decimal_literal(unsigned) {
        unsigned.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        return f64::NAN;
    };
    if negative { -magnitude } else { magnitude }
}

fn parse_non_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes.first() != Some(&b'0') {
        return None;
    }
    let radix = match bytes.get(1).map(u8::to_ascii_lowercase) {
        Some(b'x') => 16,
        Some(b'o') => 8,
        Some(b'b') => 2,
        _ => return None,
    };
    let mut value = 0.0_f64;
    for character in text.get(2..)?.chars() {
        let Some(digit) = character.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value.mul_add(f64::from(radix), f64::from(digit));
    }
    Some(value)
}

/// StrUnsignedDecimalLiteral without the `Infinity` alternative.
fn is_unsigned_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut index = 0;
    let integer_digits = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
    index += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        fraction_digits = bytes.iter().skip(index).take_while(|byte| byte.is_ascii_digit()).count();
        index += fraction_digits;
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return false;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_digits = bytes.iter().skip(index).take_while(|byte| byte.is_ascii_digit()).count();
        if exponent_digits == 0 {
            return false;
        }
        index += exponent_digits;
    }
    index == bytes.len()
}

/// `Number::toString(x)` with radix 10.
///
/// Spec: <https://tc39.es/ecma262/#sec-numeric-types-number-tostring>
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value == 0.0 {
        return String::from("0");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }
    // `{:e}` yields the shortest round-tripping digits, e.g. `1.2345e3`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digit_count = digits.len() as i64;
    let point = exponent.parse::<i64>().unwrap_or(0) + 1;

    if digit_count <= point && point <= 21 {
        let zeros = "0".repeat((point - digit_count) as usize);
        return format!("{digits}{zeros}");
    }
    if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        return format!("{whole}.{fraction}");
    }
    if -6 < point && point <= 0 {
        let zeros = "0".repeat((-point) as usize);
        return format!("0.{zeros}{digits}");
    }
    let exponent_value = point - 1;
    let sign = if exponent_value < 0 { '-' } else { '+' };
    let (first, rest) = digits.split_at(1);
    if rest.is_empty() {
        format!("{first}e{sign}{}", exponent_value.abs())
    } else {
        format!("{first}.{rest}e{sign}{}", exponent_value.abs())
    }
}

/// `ToString`
///
/// # Errors
/// Returns a `TypeError` for symbols and propagates exceptions raised while
/// converting objects.
///
/// Spec: <https://tc39.es/ecma262/#sec-tostring>
pub fn to_string(value: &JSValue) -> Result<DomString, JSError> {
    match value {
        JSValue::Undefined => Ok(DomString::from("undefined")),
        JSValue::Null => Ok(DomString::from("null")),
        JSValue::Boolean(boolean) => Ok(DomString::from(if *boolean { "true" } else { "false" })),
        JSValue::Number(number) => Ok(DomString::from(number_to_string(*number))),
        JSValue::BigInt(big) => Ok(DomString::from(big.to_string())),
        JSValue::String(text) => Ok(text.clone()),
        JSValue::Symbol(_) => Err(JSError::type_error("Cannot convert a Symbol value to a string")),
        JSValue::Object(_) => to_string(&to_primitive(value, PreferredType::String)?),
    }
}

/// `ToBigInt`
///
/// # Errors
/// Returns a `TypeError` for `undefined`, `null`, numbers and symbols, and a
/// `SyntaxError` for strings that are not integer literals.
///
/// Spec: <https://tc39.es/ecma262/#sec-tobigint>
pub fn to_big_int(value: &JSValue) -> Result<BigInt, JSError> {
    let primitive = to_primitive(value, PreferredType::Number)?;
    match primitive {
        JSValue::Undefined | JSValue::Null => Err(JSError::type_error(format!(
            "Cannot convert {} to a BigInt",
            primitive.debug_string()
        ))),
        JSValue::Boolean(boolean) => Ok(BigInt::from(u8::from(boolean))),
        JSValue::BigInt(big) => Ok(big),
        JSValue::Number(number) => Err(JSError::type_error(format!(
            "Cannot convert {} to a BigInt",
            number_to_string(number)
        ))),
        JSValue::String(text) => string_to_big_int(&text)
            .ok_or_else(|| JSError::SyntaxError(format!("Cannot convert {text} to a BigInt"))),
        JSValue::Symbol(_) => Err(JSError::type_error("Cannot convert a Symbol value to a BigInt")),
        JSValue::Object(_) => Err(JSError::type_error("Cannot convert object to primitive value")),
    }
}

/// `StringToBigInt`
///
/// Spec: <https://tc39.es/ecma262/#sec-stringtobigint>
#[must_use]
pub fn string_to_big_int(text: &DomString) -> Option<BigInt> {
    let trimmed = trim_js_whitespace(text)?;
    if trimmed.is_empty() {
        return Some(BigInt::zero());
    }
    let bytes = trimmed.as_bytes();
    if bytes.len() > 2 && bytes.first() == Some(&b'0') {
        let radix = match bytes.get(1).map(u8::to_ascii_lowercase) {
            Some(b'x') => Some(16),
            Some(b'o') => Some(8),
            Some(b'b') => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = trimmed.get(2..)?;
            if !digits.chars().all(|digit| digit.is_digit(radix)) {
                return None;
            }
            return BigInt::parse_bytes(digits.as_bytes(), radix);
        }
    }
    let (sign, digits) = match bytes.first() {
        Some(b'-') => ("-", trimmed.get(1..)?),
        Some(b'+') => ("", trimmed.get(1..)?),
        _ => ("", trimmed.as_str()),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    BigInt::parse_bytes(format!("{sign}{digits}").as_bytes(), 10)
}

/// Convert a BigInt to the nearest `f64`, saturating to infinities.
#[must_use]
pub fn big_int_to_number(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// `IntegerPart`: truncate toward zero, mapping `-0` to `+0`.
///
/// Spec: <https://webidl.spec.whatwg.org/#abstract-opdef-integerpart>
#[must_use]
pub fn integer_part(value: f64) -> f64 {
    let truncated = value.trunc();
    if truncated == 0.0 { 0.0 } else { truncated }
}

/// Iterate a value with the iterator protocol, calling `each` per element.
///
/// When `each` fails the iterator's `return` method is invoked before the
/// error is propagated.
///
/// # Errors
/// Returns a `TypeError` when the value is not iterable or the iterator
/// misbehaves, and propagates errors from the protocol methods and `each`.
///
/// Spec: <https://tc39.es/ecma262/#sec-getiterator>
pub fn iterate<F>(value: &JSValue, method: &ObjectRef, mut each: F) -> Result<(), JSError>
where
    F: FnMut(JSValue) -> Result<(), JSError>,
{
    let iterator = method.call(value, &[])?;
    let JSValue::Object(iterator_object) = &iterator else {
        return Err(JSError::type_error("Result of the Symbol.iterator method is not an object"));
    };
    let JSValue::Object(next) = iterator_object.get("next") else {
        return Err(JSError::type_error("iterator.next is not a function"));
    };
    loop {
        let result = next.call(&iterator, &[])?;
        let JSValue::Object(result_object) = result else {
            return Err(JSError::type_error("Iterator result is not an object"));
        };
        if to_boolean(&result_object.get("done")) {
            return Ok(());
        }
        if let Err(error) = each(result_object.get("value")) {
            if let Ok(Some(close)) = get_method(&iterator, PropertyKey::from("return")) {
                // The original error wins over anything `return` throws.
                drop(close.call(&iterator, &[]));
            }
            return Err(error);
        }
    }
}
