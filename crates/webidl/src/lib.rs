//! WebIDL: JavaScript binding conversions.
//! Spec: <https://webidl.spec.whatwg.org/#js-type-mapping>
//!
//! Every function takes an arbitrary `JSValue` and returns the IDL-typed
//! value, or a `JSError` (almost always a `TypeError`) thrown synchronously to
//! the caller, exactly as a binding layer would at an operation boundary.

#![forbid(unsafe_code)]

// One module per group of types in §3.2 "JavaScript type mapping".
pub mod bigint;
pub mod collections;
pub mod floating_point;
pub mod integer_types;
pub mod object_types;
pub mod string_types;

pub use bigint::to_bigint;
pub use collections::{to_frozen_array, to_record, to_sequence};
pub use floating_point::{to_double, to_float, to_unrestricted_double, to_unrestricted_float};
pub use integer_types::{
    IdlInteger, IntegerConversion, convert_to_int, to_byte, to_long, to_long_long, to_octet,
    to_short, to_unsigned_long, to_unsigned_long_long, to_unsigned_short,
};
pub use object_types::{
    to_any, to_boolean, to_callback_function, to_legacy_callback_function,
    to_nullable_callback_function, to_object, to_symbol,
};
pub use string_types::{
    to_byte_string, to_dom_string, to_dom_string_legacy_null_to_empty, to_usv_string,
};
