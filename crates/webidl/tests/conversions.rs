//! Tests for the WebIDL JavaScript-binding conversions.
//!
//! Integer cases mirror the modulo/clamp/enforce-range table, including the
//! wraparound values script authors run into most often.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js::{BigInt, DomString, JSError, JSValue, ObjectRef, PropertyKey, Property, Symbol};
use webidl::{
    IntegerConversion, to_byte, to_byte_string, to_dom_string, to_double, to_float,
    to_frozen_array, to_legacy_callback_function, to_long, to_long_long, to_octet, to_record,
    to_sequence, to_short, to_unrestricted_float, to_unsigned_long, to_unsigned_long_long,
    to_unsigned_short, to_usv_string, to_bigint, to_callback_function, to_any, to_symbol,
    to_nullable_callback_function, to_dom_string_legacy_null_to_empty,
};

use IntegerConversion::{Clamp, EnforceRange, Modulo};

fn num(value: f64) -> JSValue {
    JSValue::Number(value)
}

#[test]
fn modulo_wraps_like_twos_complement() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(to_unsigned_long(&num(-1.0), Modulo).unwrap(), 4_294_967_295);
    assert_eq!(to_long(&num(4_294_967_296.0), Modulo).unwrap(), 0);
    assert_eq!(to_byte(&num(200.0), Modulo).unwrap(), -56);
    assert_eq!(to_octet(&num(-1.0), Modulo).unwrap(), 255);
    assert_eq!(to_short(&num(32_768.0), Modulo).unwrap(), -32_768);
    assert_eq!(to_unsigned_short(&num(65_537.0), Modulo).unwrap(), 1);
    assert_eq!(to_long(&num(-2.7), Modulo).unwrap(), -2);
    assert_eq!(to_long(&num(f64::NAN), Modulo).unwrap(), 0);
    assert_eq!(to_long(&num(f64::INFINITY), Modulo).unwrap(), 0);
    assert_eq!(to_long_long(&num(-1.0), Modulo).unwrap(), -1);
    assert_eq!(to_unsigned_long_long(&num(-1.0), Modulo).unwrap(), u64::MAX);
    assert_eq!(to_long_long(&num(9_223_372_036_854_775_808.0), Modulo).unwrap(), i64::MIN);
}

#[test]
fn clamp_saturates_and_rounds_half_to_even() {
    assert_eq!(to_octet(&num(300.0), Clamp).unwrap(), 255);
    assert_eq!(to_octet(&num(-5.0), Clamp).unwrap(), 0);
    assert_eq!(to_octet(&num(2.5), Clamp).unwrap(), 2);
    assert_eq!(to_octet(&num(3.5), Clamp).unwrap(), 4);
    assert_eq!(to_byte(&num(f64::NAN), Clamp).unwrap(), 0);
    assert_eq!(to_long(&num(f64::NEG_INFINITY), Clamp).unwrap(), i32::MIN);
    assert_eq!(to_long_long(&num(1e300), Clamp).unwrap(), 9_007_199_254_740_991);
}

#[test]
fn enforce_range_rejects_non_finite_and_out_of_range() {
    assert_eq!(to_short(&num(-12.9), EnforceRange).unwrap(), -12);
    assert!(to_short(&num(40_000.0), EnforceRange).unwrap_err().is_type_error());
    assert!(to_long(&num(f64::NAN), EnforceRange).unwrap_err().is_type_error());
    assert!(to_unsigned_long(&num(-1.0), EnforceRange).unwrap_err().is_type_error());
    assert_eq!(to_unsigned_long(&num(-0.5), EnforceRange).unwrap(), 0);
    assert!(to_unsigned_long_long(&num(2f64.powi(53)), EnforceRange).unwrap_err().is_type_error());
}

#[test]
fn integers_accept_strings_and_objects_via_to_number() {
    assert_eq!(to_long(&JSValue::string(" 0x10 "), Modulo).unwrap(), 16);
    assert_eq!(to_long(&JSValue::string("abc"), Modulo).unwrap(), 0);
    assert_eq!(to_long(&JSValue::Boolean(true), Modulo).unwrap(), 1);
    assert!(to_long(&JSValue::Symbol(Symbol::new(None)), Modulo).unwrap_err().is_type_error());
    assert!(to_long(&JSValue::BigInt(BigInt::from(1)), Modulo).unwrap_err().is_type_error());
}

#[test]
fn floats_round_to_single_precision() {
    assert_eq!(to_float(&num(0.1)).unwrap(), 0.1_f32);
    assert!(to_float(&num(1e40)).unwrap_err().is_type_error());
    assert!(to_float(&num(f64::NAN)).unwrap_err().is_type_error());
    assert!(to_unrestricted_float(&num(f64::NAN)).unwrap().is_nan());
    assert_eq!(to_unrestricted_float(&num(1e40)).unwrap(), f32::INFINITY);
    assert!(to_double(&num(f64::INFINITY)).unwrap_err().is_type_error());
    assert_eq!(to_double(&JSValue::string("1.25")).unwrap(), 1.25);
}

#[test]
fn bigint_conversion_rules() {
    assert_eq!(to_bigint(&JSValue::Boolean(false)).unwrap(), BigInt::from(0));
    assert!(to_bigint(&num(3.0)).unwrap_err().is_type_error());
    assert!(matches!(to_bigint(&JSValue::string("nope")), Err(JSError::SyntaxError(_))));
    assert!(to_bigint(&JSValue::Undefined).unwrap_err().is_type_error());
}

#[test]
fn bigint_objects_prefer_to_primitive_then_value_of() {
    let hints = Rc::new(RefCell::new(Vec::new()));
    let object = ObjectRef::new_object();
    object.set(
        "valueOf",
        JSValue::Object(ObjectRef::new_function("valueOf", |_, _| Ok(JSValue::BigInt(BigInt::from(2))))),
    );
    object.set(
        "toString",
        JSValue::Object(ObjectRef::new_function("toString", |_, _| Ok(JSValue::string("9")))),
    );
    let value = JSValue::Object(object.clone());
    assert_eq!(to_bigint(&value).unwrap(), BigInt::from(2));

    let recorder = Rc::clone(&hints);
    object.set(
        PropertyKey::Symbol(Symbol::to_primitive()),
        JSValue::Object(ObjectRef::new_function("[Symbol.toPrimitive]", move |_, args| {
            let hint = args.first().cloned().unwrap_or(JSValue::Undefined);
            recorder.borrow_mut().push(to_dom_string(&hint)?.to_rust_string_lossy());
            Ok(JSValue::string("0x10"))
        })),
    );
    assert_eq!(to_bigint(&value).unwrap(), BigInt::from(16));
    assert_eq!(*hints.borrow(), vec![String::from("number")]);

    let only_to_string = ObjectRef::new_object();
    only_to_string.set("valueOf", JSValue::Null);
    only_to_string.set(
        "toString",
        JSValue::Object(ObjectRef::new_function("toString", |_, _| Ok(JSValue::string(" 42 ")))),
    );
    assert_eq!(to_bigint(&JSValue::Object(only_to_string)).unwrap(), BigInt::from(42));
}

#[test]
fn any_and_symbol() {
    let symbol = Symbol::new(Some("tag"));
    let object = ObjectRef::new_object();
    for value in [JSValue::Undefined, JSValue::Null, num(f64::NAN), JSValue::Object(object.clone())] {
        let converted = to_any(&value);
        match (&value, &converted) {
            (JSValue::Number(left), JSValue::Number(right)) => assert!(left.is_nan() && right.is_nan()),
            _ => assert_eq!(converted, value),
        }
    }
    assert_eq!(to_any(&JSValue::Object(object.clone())).as_object(), Some(&object));

    assert_eq!(to_symbol(&JSValue::Symbol(symbol.clone())).unwrap(), symbol);
    for value in [JSValue::string("tag"), JSValue::Undefined, JSValue::Object(object)] {
        assert!(to_symbol(&value).unwrap_err().is_type_error());
    }
}

#[test]
fn legacy_null_to_empty_only_affects_null() {
    assert_eq!(to_dom_string_legacy_null_to_empty(&JSValue::Null).unwrap(), "");
    assert_eq!(to_dom_string_legacy_null_to_empty(&JSValue::Undefined).unwrap(), "undefined");
    assert_eq!(to_dom_string_legacy_null_to_empty(&num(1.5)).unwrap(), "1.5");
    assert!(
        to_dom_string_legacy_null_to_empty(&JSValue::Symbol(Symbol::new(None)))
            .unwrap_err()
            .is_type_error()
    );
}

#[test]
fn string_family() {
    assert_eq!(to_dom_string(&JSValue::Null).unwrap(), "null");
    assert_eq!(to_dom_string(&num(-0.0)).unwrap(), "0");
    assert!(to_dom_string(&JSValue::Symbol(Symbol::new(Some("s")))).unwrap_err().is_type_error());

    assert_eq!(to_byte_string(&JSValue::string("caf\u{E9}")).unwrap(), "caf\u{E9}");
    assert!(to_byte_string(&JSValue::string("\u{0100}")).unwrap_err().is_type_error());

    let lone = JSValue::String(DomString::from_code_units(vec![0x61, 0xDC00]));
    assert_eq!(to_usv_string(&lone).unwrap(), "a\u{FFFD}");
}

#[test]
fn callback_types() {
    let function = ObjectRef::new_function("f", |_, _| Ok(JSValue::Undefined));
    let plain = ObjectRef::new_object();
    assert_eq!(to_callback_function(&JSValue::Object(function.clone())).unwrap(), function);
    assert!(to_callback_function(&JSValue::Object(plain.clone())).unwrap_err().is_type_error());

    assert_eq!(to_legacy_callback_function(&JSValue::string("alert(1)")), None);
    assert_eq!(to_legacy_callback_function(&num(1.0)), None);
    assert_eq!(to_legacy_callback_function(&JSValue::Object(plain.clone())), Some(plain.clone()));

    assert_eq!(to_nullable_callback_function(&JSValue::Null).unwrap(), None);
    assert_eq!(to_nullable_callback_function(&JSValue::Undefined).unwrap(), None);
    assert_eq!(
        to_nullable_callback_function(&JSValue::Object(function.clone())).unwrap(),
        Some(function)
    );
    assert!(to_nullable_callback_function(&JSValue::Object(plain)).unwrap_err().is_type_error());
    assert!(to_nullable_callback_function(&num(0.0)).unwrap_err().is_type_error());
}

#[test]
fn sequences_require_iterables_and_close_on_error() {
    let array = JSValue::Object(ObjectRef::new_array(vec![num(1.0), num(2.5), JSValue::string("3")]));
    assert_eq!(to_sequence(&array, |value| to_long(value, Modulo)).unwrap(), vec![1, 2, 3]);

    assert!(to_sequence(&JSValue::string("abc"), |value| to_dom_string(value)).unwrap_err().is_type_error());
    assert!(to_sequence(&JSValue::Object(ObjectRef::new_object()), |value| to_dom_string(value))
        .unwrap_err()
        .is_type_error());

    // Hand-rolled iterator that counts `return` calls.
    let closed = Rc::new(Cell::new(0));
    let iterable = ObjectRef::new_object();
    let closed_by_iterator = Rc::clone(&closed);
    iterable.set(
        PropertyKey::Symbol(Symbol::iterator()),
        JSValue::Object(ObjectRef::new_function("[Symbol.iterator]", move |_, _| {
            let iterator = ObjectRef::new_object();
            iterator.set(
                "next",
                JSValue::Object(ObjectRef::new_function("next", |_, _| {
                    let result = ObjectRef::new_object();
                    result.set("done", JSValue::Boolean(false));
                    result.set("value", JSValue::Symbol(Symbol::new(None)));
                    Ok(JSValue::Object(result))
                })),
            );
            let counter = Rc::clone(&closed_by_iterator);
            iterator.set(
                "return",
                JSValue::Object(ObjectRef::new_function("return", move |_, _| {
                    counter.set(counter.get() + 1);
                    Ok(JSValue::Object(ObjectRef::new_object()))
                })),
            );
            Ok(JSValue::Object(iterator))
        })),
    );
    let error = to_sequence(&JSValue::Object(iterable), |value| to_dom_string(value)).unwrap_err();
    assert!(error.is_type_error());
    assert_eq!(closed.get(), 1);
}

#[test]
fn frozen_arrays_are_frozen() {
    let array = JSValue::Object(ObjectRef::new_array(vec![num(1.0), num(2.0)]));
    let frozen = to_frozen_array(&array, |value| to_double(value)).unwrap();
    assert!(frozen.is_frozen());
    assert_eq!(frozen.array_elements(), vec![num(1.0), num(2.0)]);
}

#[test]
fn records_take_own_enumerable_string_keys_in_order() {
    let object = ObjectRef::new_object();
    object.set("b", num(2.0));
    object.set("1", num(10.0));
    object.set("a", num(1.0));
    object.define(PropertyKey::from("hidden"), Property::hidden(num(99.0)));
    object.set(PropertyKey::Symbol(Symbol::new(None)), num(7.0));

    let record = to_record(&JSValue::Object(object), |key| to_dom_string(key), |value| to_long(value, Modulo)).unwrap();
    let keys: Vec<String> = record.keys().map(DomString::to_rust_string_lossy).collect();
    assert_eq!(keys, vec!["1", "b", "a"]);
    assert_eq!(record.values().copied().collect::<Vec<_>>(), vec![10, 2, 1]);

    assert!(to_record(&num(1.0), |key| to_dom_string(key), |value| to_long(value, Modulo)).unwrap_err().is_type_error());
}
