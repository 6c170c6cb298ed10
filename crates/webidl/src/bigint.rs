//! WebIDL §3.2.9 bigint
//! Spec: <https://webidl.spec.whatwg.org/#js-bigint>

use js::{BigInt, JSError, JSValue, to_big_int};

/// `bigint`: `ToBigInt` on the value.
///
/// Numbers are rejected with a `TypeError` rather than truncated, booleans map
/// to `0n`/`1n`, strings must be integer literals (`SyntaxError` otherwise) and
/// objects go through `@@toPrimitive`, `valueOf`, `toString` before dispatch.
///
/// # Errors
/// See `js::to_big_int`.
pub fn to_bigint(value: &JSValue) -> Result<BigInt, JSError> {
    to_big_int(value)
}
