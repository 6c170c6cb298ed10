use num_bigint::BigInt;

use crate::conversions::number_to_string;
use crate::object::ObjectRef;
use crate::string::DomString;
use crate::symbol::Symbol;

/// An engine-agnostic representation of JavaScript values.
///
/// Equality is strict equality (`===`): objects and symbols compare by
/// identity and `NaN` is not equal to itself.
#[derive(Clone, Debug)]
pub enum JSValue {
    /// The `undefined` value.
    Undefined,
    /// The `null` value.
    Null,
    /// A boolean primitive.
    Boolean(bool),
    /// A number (IEEE 754 double precision).
    Number(f64),
    /// An arbitrary precision integer.
    BigInt(BigInt),
    /// A string value (UTF-16).
    String(DomString),
    /// A symbol value.
    Symbol(Symbol),
    /// An object, including functions and arrays.
    Object(ObjectRef),
}

impl JSValue {
    /// Build a string value from Rust text.
    #[inline]
    #[must_use]
    pub fn string(text: &str) -> Self {
        Self::String(DomString::from(text))
    }

    /// Whether this is `undefined` or `null`.
    #[inline]
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Whether this value can be called.
    ///
    /// Spec: <https://tc39.es/ecma262/#sec-iscallable>
    #[must_use]
    pub fn is_callable(&self) -> bool {
        match self {
            Self::Object(object) => object.is_callable(),
            Self::Undefined
            | Self::Null
            | Self::Boolean(_)
            | Self::Number(_)
            | Self::BigInt(_)
            | Self::String(_)
            | Self::Symbol(_) => false,
        }
    }

    /// Borrow the object handle, if this is an object.
    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            Self::Undefined
            | Self::Null
            | Self::Boolean(_)
            | Self::Number(_)
            | Self::BigInt(_)
            | Self::String(_)
            | Self::Symbol(_) => None,
        }
    }

    /// The `typeof` string for this value.
    #[must_use]
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(object) if object.is_callable() => "function",
            Self::Object(_) => "object",
        }
    }

    /// A short rendering for logs and error messages. Never invokes script.
    #[must_use]
    pub fn debug_string(&self) -> String {
        match self {
            Self::Undefined => String::from("undefined"),
            Self::Null => String::from("null"),
            Self::Boolean(value) => value.to_string(),
            Self::Number(value) => number_to_string(*value),
            Self::BigInt(value) => format!("{value}n"),
            Self::String(value) => format!("{value:?}"),
            Self::Symbol(symbol) => symbol.descriptive_string(),
            Self::Object(object) => object.tag_string(),
        }
    }
}

impl PartialEq for JSValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::BigInt(left), Self::BigInt(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Symbol(left), Self::Symbol(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => left == right,
            _ => false,
        }
    }
}

impl From<bool> for JSValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for JSValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for JSValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for JSValue {
    #[inline]
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for JSValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for JSValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(DomString::from(value))
    }
}

impl From<DomString> for JSValue {
    #[inline]
    fn from(value: DomString) -> Self {
        Self::String(value)
    }
}

impl From<ObjectRef> for JSValue {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl From<Symbol> for JSValue {
    #[inline]
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<BigInt> for JSValue {
    #[inline]
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for JSValue {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A property key: either a string or a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// A string-keyed property.
    String(DomString),
    /// A symbol-keyed property.
    Symbol(Symbol),
}

impl PropertyKey {
    /// The array index this key denotes, if it is a canonical numeric string.
    ///
    /// Spec: <https://tc39.es/ecma262/#array-index>
    #[must_use]
    pub fn array_index(&self) -> Option<u32> {
        let Self::String(text) = self else {
            return None;
        };
        let rust = text.to_rust_string_lossy();
        let index = rust.parse::<u32>().ok()?;
        (index != u32::MAX && index.to_string() == rust).then_some(index)
    }
}

impl From<&str> for PropertyKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(DomString::from(value))
    }
}

impl From<String> for PropertyKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(DomString::from(value))
    }
}

impl From<DomString> for PropertyKey {
    #[inline]
    fn from(value: DomString) -> Self {
        Self::String(value)
    }
}

impl From<Symbol> for PropertyKey {
    #[inline]
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<usize> for PropertyKey {
    #[inline]
    fn from(value: usize) -> Self {
        Self::String(DomString::from(value.to_string()))
    }
}
