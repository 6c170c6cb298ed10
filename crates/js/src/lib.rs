//! Engine-agnostic JavaScript value model shared by the Valor bindings.
//!
//! This crate centralizes the values, objects and abstract operations that
//! the WebIDL coercions, attribute reflection and event-handler crates build
//! on, so none of them depend on a particular script engine.

#![forbid(unsafe_code)]

pub mod console;
pub use console::{Console, ConsoleLogger, HostLogger, LogLevel};

/// ECMAScript abstract operations (`ToNumber`, `ToString`, ...).
pub mod conversions;
pub use conversions::{
    PreferredType, get_method, integer_part, iterate, number_to_string, string_to_number, to_big_int,
    to_boolean, to_number, to_primitive, to_string,
};

mod error;
pub use error::{DomExceptionName, JSError};

pub mod object;
pub use object::{NativeFunction, ObjectClass, ObjectRef, Property};

mod string;
pub use string::DomString;

mod symbol;
pub use symbol::Symbol;

mod value;
pub use value::{JSValue, PropertyKey};

/// Re-exported so downstream crates name the same BigInt type as `JSValue::BigInt`.
pub use num_bigint::BigInt;
