use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

use crate::value::JSValue;

/// Names of the `DOMException` kinds raised by the bindings.
///
/// Spec: <https://webidl.spec.whatwg.org/#idl-DOMException-error-names>
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DomExceptionName {
    /// The index is not in the allowed range.
    IndexSizeError,
    /// The string did not match the expected pattern.
    SyntaxError,
    /// The string contains invalid characters.
    InvalidCharacterError,
    /// The operation is not supported.
    NotSupportedError,
}

impl DomExceptionName {
    /// The exception name as exposed to script.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IndexSizeError => "IndexSizeError",
            Self::SyntaxError => "SyntaxError",
            Self::InvalidCharacterError => "InvalidCharacterError",
            Self::NotSupportedError => "NotSupportedError",
        }
    }
}

/// Error type used by host callbacks and conversions.
#[derive(Clone, Debug)]
pub enum JSError {
    /// A type error (for example, wrong argument types).
    TypeError(String),
    /// A range error (for example, an invalid array length).
    RangeError(String),
    /// A reference to an identifier no scope defines.
    ReferenceError(String),
    /// A syntax error (for example, a malformed BigInt literal or handler body).
    SyntaxError(String),
    /// A `DOMException` with the given name.
    DomException {
        /// Exception name.
        name: DomExceptionName,
        /// Human readable detail.
        message: String,
    },
    /// A value thrown by script (for example, from a `valueOf` override).
    Exception(JSValue),
    /// An internal error not exposed to user code in detail.
    InternalError(String),
}

impl JSError {
    /// Shorthand for a `TypeError`.
    #[inline]
    pub fn type_error<M: Into<String>>(message: M) -> Self {
        Self::TypeError(message.into())
    }

    /// Shorthand for a `DOMException`.
    #[inline]
    pub fn dom<M: Into<String>>(name: DomExceptionName, message: M) -> Self {
        Self::DomException {
            name,
            message: message.into(),
        }
    }

    /// The `DOMException` name, if this is one.
    #[must_use]
    pub const fn dom_exception_name(&self) -> Option<DomExceptionName> {
        match self {
            Self::DomException { name, .. } => Some(*name),
            Self::TypeError(_)
            | Self::RangeError(_)
            | Self::ReferenceError(_)
            | Self::SyntaxError(_)
            | Self::Exception(_)
            | Self::InternalError(_) => None,
        }
    }

    /// Whether this is a `TypeError`.
    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeError(_))
    }
}

impl Display for JSError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::TypeError(message) => write!(formatter, "TypeError: {message}"),
            Self::RangeError(message) => write!(formatter, "RangeError: {message}"),
            Self::ReferenceError(message) => write!(formatter, "ReferenceError: {message}"),
            Self::SyntaxError(message) => write!(formatter, "SyntaxError: {message}"),
            Self::DomException { name, message } => {
                write!(formatter, "{}: {message}", name.as_str())
            }
            Self::Exception(value) => formatter.write_str(&value.debug_string()),
            Self::InternalError(message) => write!(formatter, "InternalError: {message}"),
        }
    }
}

impl Error for JSError {}
