//! Tests for `DomTokenList` and the reflected property table.

use dom_host::{AttributeHost, MemoryElement};
use js::{DomExceptionName, JSValue};
use reflection::{BooleanReflector, DomTokenList, PositiveIntReflector, PropertyTable, StringReflector};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn token_list_mutations_rewrite_the_attribute() {
    init();
    let element = MemoryElement::new("div");
    element.set_attribute("class", "  a b  a ").unwrap();
    let classes = DomTokenList::new(element.clone(), "class");
    assert_eq!(classes.length(), 2);
    assert_eq!(classes.item(1).as_deref(), Some("b"));
    assert_eq!(classes.item(2), None);
    assert!(classes.contains("a"));

    classes.add(&["c", "a"]).unwrap();
    assert_eq!(element.get_attribute("class").as_deref(), Some("a b c"));
    classes.remove(&["b"]).unwrap();
    assert_eq!(classes.value(), "a c");

    assert!(!classes.toggle("a", None).unwrap());
    assert!(classes.toggle("a", Some(true)).unwrap());
    assert!(classes.toggle("a", Some(true)).unwrap());
    assert!(!classes.toggle("z", Some(false)).unwrap());
    assert_eq!(classes.to_vec(), ["c", "a"]);

    assert!(classes.replace("c", "a").unwrap());
    assert_eq!(classes.value(), "a");
    assert!(!classes.replace("missing", "x").unwrap());
}

#[test]
fn token_list_validates_tokens() {
    init();
    let element = MemoryElement::new("div");
    let classes = DomTokenList::new(element.clone(), "class");
    let empty = classes.add(&[""]).unwrap_err();
    assert_eq!(empty.dom_exception_name(), Some(DomExceptionName::SyntaxError));
    let spaced = classes.toggle("a b", None).unwrap_err();
    assert_eq!(spaced.dom_exception_name(), Some(DomExceptionName::InvalidCharacterError));
    assert!(classes.supports("x").unwrap_err().is_type_error());
}

#[test]
fn removing_from_an_absent_attribute_does_not_create_it() {
    init();
    let element = MemoryElement::new("div");
    let classes = DomTokenList::new(element.clone(), "class");
    classes.remove(&["a"]).unwrap();
    assert!(!element.has_attribute("class"));
    classes.set_value("x  y").unwrap();
    assert_eq!(classes.length(), 2);
}

#[test]
fn supported_tokens_compare_case_insensitively() {
    init();
    let rel = DomTokenList::with_supported_tokens(MemoryElement::new("link"), "rel", ["stylesheet", "preload"]);
    assert!(rel.supports("StyleSheet").unwrap());
    assert!(!rel.supports("bogus").unwrap());
}

#[test]
fn property_table_routes_by_property_name() {
    init();
    let table = PropertyTable::new()
        .reflect("title", "title", StringReflector)
        .reflect("hidden", "hidden", BooleanReflector)
        .reflect("colSpan", "colspan", PositiveIntReflector::default());
    assert_eq!(table.names().collect::<Vec<_>>(), ["title", "hidden", "colSpan"]);
    assert_eq!(table.property("colSpan").map(|property| property.attribute()), Some("colspan"));

    let cell = MemoryElement::new("td");
    assert_eq!(table.get(&cell, "colSpan").unwrap(), JSValue::Number(1.0));
    table.set(&cell, "colSpan", &JSValue::string("4")).unwrap();
    assert_eq!(cell.get_attribute("colspan").as_deref(), Some("4"));
    assert_eq!(table.get(&cell, "colSpan").unwrap(), JSValue::Number(4.0));

    table.set(&cell, "hidden", &JSValue::Boolean(true)).unwrap();
    assert_eq!(table.get(&cell, "hidden").unwrap(), JSValue::Boolean(true));
    assert_eq!(table.get(&cell, "title").unwrap(), JSValue::string(""));
    assert!(table.get(&cell, "bogus").unwrap_err().is_type_error());
    table.set(&cell, "colSpan", &JSValue::Number(0.0)).unwrap_err();
}
