//! Numeric reflection: `long`, `unsigned long` variants and `double`.
//! Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:idl-long>

use dom_host::AttributeHost;
use html_microsyntax::{parse_double, parse_integer, parse_non_negative_integer};
use js::{DomExceptionName, JSError, JSValue, number_to_string};
use log::debug;
use webidl::{IntegerConversion, to_double, to_long, to_unsigned_long};

use crate::Reflector;

/// 2^31 − 1, the upper bound of every reflected integer range.
const MAX_REFLECTED: i64 = 2_147_483_647;

fn parse_in_range(value: Option<&str>, minimum: i64) -> Option<u32> {
    let parsed = parse_non_negative_integer(value?)?;
    if (minimum..=MAX_REFLECTED).contains(&parsed) {
        u32::try_from(parsed).ok()
    } else {
        None
    }
}

fn write_integer<T: ToString>(element: &dyn AttributeHost, name: &str, value: T) -> Result<(), JSError> {
    element.set_attribute(name, &value.to_string())
}

fn index_size_error(name: &str, value: impl ToString) -> JSError {
    JSError::dom(
        DomExceptionName::IndexSizeError,
        format!("The value {} provided for '{name}' is out of range", value.to_string()),
    )
}

/// `long`: any integer in the signed 32-bit range.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntReflector {
    default: i32,
}

impl IntReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: i32) -> Self {
        Self { default }
    }
}

impl Reflector for IntReflector {
    type Value = i32;

    #[inline]
    fn default_value(&self) -> i32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> i32 {
        value
            .and_then(parse_integer)
            .and_then(|parsed| i32::try_from(parsed).ok())
            .unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<i32, JSError> {
        to_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: i32) -> Result<(), JSError> {
        write_integer(element, name, value)
    }
}

/// `long` limited to only non-negative numbers; the default is `-1`.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#limited-to-only-non-negative-numbers>
#[derive(Copy, Clone, Debug)]
pub struct NonNegativeIntReflector {
    default: i32,
}

impl NonNegativeIntReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: i32) -> Self {
        Self { default }
    }
}

impl Default for NonNegativeIntReflector {
    #[inline]
    fn default() -> Self {
        Self::new(-1)
    }
}

impl Reflector for NonNegativeIntReflector {
    type Value = i32;

    #[inline]
    fn default_value(&self) -> i32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> i32 {
        parse_in_range(value, 0)
            .and_then(|parsed| i32::try_from(parsed).ok())
            .unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<i32, JSError> {
        to_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: i32) -> Result<(), JSError> {
        if value < 0 {
            return Err(index_size_error(name, value));
        }
        write_integer(element, name, value)
    }
}

/// `unsigned long`: values in `[0, 2^31 − 1]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnsignedIntReflector {
    default: u32,
}

impl UnsignedIntReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: u32) -> Self {
        Self { default }
    }
}

impl Reflector for UnsignedIntReflector {
    type Value = u32;

    #[inline]
    fn default_value(&self) -> u32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> u32 {
        parse_in_range(value, 0).unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<u32, JSError> {
        to_unsigned_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: u32) -> Result<(), JSError> {
        if i64::from(value) > MAX_REFLECTED {
            debug!("'{name}' = {value} is out of range, writing default {}", self.default);
            return write_integer(element, name, self.default);
        }
        write_integer(element, name, value)
    }
}

/// `unsigned long` limited to only positive numbers. Writing `0` throws.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#limited-to-only-positive-numbers>
#[derive(Copy, Clone, Debug)]
pub struct PositiveIntReflector {
    default: u32,
}

impl PositiveIntReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: u32) -> Self {
        Self { default }
    }
}

impl Default for PositiveIntReflector {
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl Reflector for PositiveIntReflector {
    type Value = u32;

    #[inline]
    fn default_value(&self) -> u32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> u32 {
        parse_in_range(value, 1).unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<u32, JSError> {
        to_unsigned_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: u32) -> Result<(), JSError> {
        if value == 0 {
            return Err(index_size_error(name, value));
        }
        if i64::from(value) > MAX_REFLECTED {
            debug!("'{name}' = {value} is out of range, writing default {}", self.default);
            return write_integer(element, name, self.default);
        }
        write_integer(element, name, value)
    }
}

/// `unsigned long` limited to only positive numbers with fallback: like
/// [`PositiveIntReflector`] but writing `0` falls back to the default.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#limited-to-only-positive-numbers-with-fallback>
#[derive(Copy, Clone, Debug)]
pub struct PositiveIntWithFallbackReflector {
    default: u32,
}

impl PositiveIntWithFallbackReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: u32) -> Self {
        Self { default }
    }
}

impl Default for PositiveIntWithFallbackReflector {
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl Reflector for PositiveIntWithFallbackReflector {
    type Value = u32;

    #[inline]
    fn default_value(&self) -> u32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> u32 {
        parse_in_range(value, 1).unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<u32, JSError> {
        to_unsigned_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: u32) -> Result<(), JSError> {
        if value == 0 || i64::from(value) > MAX_REFLECTED {
            debug!("'{name}' = {value} is out of range, writing default {}", self.default);
            return write_integer(element, name, self.default);
        }
        write_integer(element, name, value)
    }
}

/// `unsigned long` clamped to `[min, max]`.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#clamped-to-the-range>
#[derive(Copy, Clone, Debug)]
pub struct ClampedIntReflector {
    min: u32,
    max: u32,
    default: u32,
}

impl ClampedIntReflector {
    /// Reflect values clamped into `[min, max]`, reading `default` when the
    /// attribute is absent or unparseable.
    #[must_use]
    pub const fn new(min: u32, max: u32, default: u32) -> Self {
        Self { min, max, default }
    }
}

impl Reflector for ClampedIntReflector {
    type Value = u32;

    #[inline]
    fn default_value(&self) -> u32 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> u32 {
        let Some(parsed) = value.and_then(parse_non_negative_integer) else {
            return self.default;
        };
        if parsed < i64::from(self.min) {
            self.min
        } else if parsed > i64::from(self.max) {
            self.max
        } else {
            u32::try_from(parsed).unwrap_or(self.default)
        }
    }

    fn coerce_value(&self, value: &JSValue) -> Result<u32, JSError> {
        to_unsigned_long(value, IntegerConversion::Modulo)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: u32) -> Result<(), JSError> {
        if i64::from(value) > MAX_REFLECTED {
            debug!("'{name}' = {value} is out of range, writing default {}", self.default);
            return write_integer(element, name, self.default);
        }
        write_integer(element, name, value)
    }
}

/// `double`: any finite value; the attribute holds its shortest serialization.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:idl-double>
#[derive(Copy, Clone, Debug, Default)]
pub struct DoubleReflector {
    default: f64,
}

impl DoubleReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: f64) -> Self {
        Self { default }
    }
}

impl Reflector for DoubleReflector {
    type Value = f64;

    #[inline]
    fn default_value(&self) -> f64 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> f64 {
        value.and_then(parse_double).unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<f64, JSError> {
        to_double(value)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: f64) -> Result<(), JSError> {
        element.set_attribute(name, &number_to_string(value))
    }
}

/// `double` limited to only positive numbers.
///
/// Non-positive values read as the default. Writing a non-positive value
/// leaves the attribute untouched.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#limited-to-only-positive-numbers>
#[derive(Copy, Clone, Debug)]
pub struct PositiveDoubleReflector {
    default: f64,
}

impl PositiveDoubleReflector {
    /// Reflect with the given default.
    #[must_use]
    pub const fn new(default: f64) -> Self {
        Self { default }
    }
}

impl Default for PositiveDoubleReflector {
    #[inline]
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Reflector for PositiveDoubleReflector {
    type Value = f64;

    #[inline]
    fn default_value(&self) -> f64 {
        self.default
    }

    fn from_attribute(&self, value: Option<&str>) -> f64 {
        value
            .and_then(parse_double)
            .filter(|parsed| *parsed > 0.0)
            .unwrap_or(self.default)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<f64, JSError> {
        to_double(value)
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: f64) -> Result<(), JSError> {
        if value <= 0.0 {
            debug!("Ignoring non-positive value {value} for '{name}'");
            return Ok(());
        }
        element.set_attribute(name, &number_to_string(value))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_in_range;

    #[test]
    fn range_check_uses_the_reflected_bounds() {
        assert_eq!(parse_in_range(Some("0"), 0), Some(0));
        assert_eq!(parse_in_range(Some("0"), 1), None);
        assert_eq!(parse_in_range(Some("2147483647"), 1), Some(2_147_483_647));
        assert_eq!(parse_in_range(Some("2147483648"), 0), None);
        assert_eq!(parse_in_range(Some("-3"), 0), None);
        assert_eq!(parse_in_range(None, 0), None);
    }
}
