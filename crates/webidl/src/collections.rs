//! WebIDL §3.2.20–§3.2.22 `sequence<T>`, `record<K, V>` and `FrozenArray<T>`.
//! Spec: <https://webidl.spec.whatwg.org/#js-sequence>

use core::hash::Hash;

use indexmap::IndexMap;
use js::{JSError, JSValue, ObjectRef, PropertyKey, Symbol, get_method, iterate};

/// `sequence<T>`: iterate the value, converting each element with `convert`.
///
/// # Errors
/// Returns a `TypeError` when the value is not an object or has no
/// `@@iterator`; propagates element conversion failures (after closing the
/// iterator).
///
/// Spec: <https://webidl.spec.whatwg.org/#js-sequence>
pub fn to_sequence<T, F>(value: &JSValue, mut convert: F) -> Result<Vec<T>, JSError>
where
    F: FnMut(&JSValue) -> Result<T, JSError>,
{
    if !matches!(value, JSValue::Object(_)) {
        return Err(JSError::type_error("The provided value cannot be converted to a sequence"));
    }
    let Some(method) = get_method(value, PropertyKey::Symbol(Symbol::iterator()))? else {
        return Err(JSError::type_error("The object must have a callable @@iterator property"));
    };
    let mut items = Vec::new();
    iterate(value, &method, |element| {
        items.push(convert(&element)?);
        Ok(())
    })?;
    Ok(items)
}

/// `FrozenArray<T>`: a sequence materialized as a frozen array object.
///
/// # Errors
/// See [`to_sequence`].
///
/// Spec: <https://webidl.spec.whatwg.org/#js-frozen-array>
pub fn to_frozen_array<T, F>(value: &JSValue, convert: F) -> Result<ObjectRef, JSError>
where
    T: Into<JSValue>,
    F: FnMut(&JSValue) -> Result<T, JSError>,
{
    let items = to_sequence(value, convert)?;
    let array = ObjectRef::new_array(items.into_iter().map(Into::into).collect());
    array.freeze();
    Ok(array)
}

/// `record<K, V>`: own enumerable string-keyed properties, in property order.
///
/// Symbol keys are skipped. When two keys convert to the same `K` the later
/// property wins but keeps the earlier position.
///
/// # Errors
/// Returns a `TypeError` for primitives; propagates key and value conversion
/// failures.
///
/// Spec: <https://webidl.spec.whatwg.org/#js-record>
pub fn to_record<K, V, KF, VF>(
    value: &JSValue,
    mut convert_key: KF,
    mut convert_value: VF,
) -> Result<IndexMap<K, V>, JSError>
where
    K: Eq + Hash,
    KF: FnMut(&JSValue) -> Result<K, JSError>,
    VF: FnMut(&JSValue) -> Result<V, JSError>,
{
    let JSValue::Object(object) = value else {
        return Err(JSError::type_error("The provided value cannot be converted to a record"));
    };
    let mut result = IndexMap::new();
    for key in object.own_property_keys() {
        let PropertyKey::String(name) = &key else {
            continue;
        };
        let Some(property) = object.get_own(&key) else {
            continue;
        };
        if !property.enumerable {
            continue;
        }
        let typed_key = convert_key(&JSValue::String(name.clone()))?;
        let typed_value = convert_value(&object.get(key.clone()))?;
        result.insert(typed_key, typed_value);
    }
    Ok(result)
}
