//! Tests for the HTML number, keyword and token parsers.

use html_microsyntax::{
    Enumerated, EnumeratedAttributeOptions, parse_double, parse_integer, parse_ordered_set,
    serialize_ordered_set,
};

#[test]
fn integers_tolerate_leading_whitespace_and_trailing_junk() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(parse_integer("42"), Some(42));
    assert_eq!(parse_integer("  \t\n-17px"), Some(-17));
    assert_eq!(parse_integer("+5"), Some(5));
    assert_eq!(parse_integer("12abc34"), Some(12));
    assert_eq!(parse_integer("abc"), None);
    assert_eq!(parse_integer(""), None);
    assert_eq!(parse_integer("-"), None);
    assert_eq!(parse_integer("\u{00A0}1"), None);
}

#[test]
fn doubles_follow_the_permissive_prefix_grammar() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(parse_double("1.5"), Some(1.5));
    assert_eq!(parse_double(" .5"), Some(0.5));
    assert_eq!(parse_double("-.5e1xyz"), Some(-5.0));
    assert_eq!(parse_double("2e"), Some(2.0));
    assert_eq!(parse_double("1.e3"), Some(1.0));
    assert_eq!(parse_double("3E2"), Some(300.0));
    assert_eq!(parse_double("1e400"), None);
    assert_eq!(parse_double("Infinity"), None);
    assert_eq!(parse_double("bogus"), None);
}

#[test]
fn enumerated_lookup_uses_defaults() {
    let _ = env_logger::builder().is_test(true).try_init();
    let enumerated = Enumerated::new(
        EnumeratedAttributeOptions::new(["on", "off", "auto"])
            .alias("yes", "on")
            .missing("auto")
            .invalid("off"),
    )
    .unwrap();
    assert_eq!(enumerated.lookup(None), Some("auto"));
    assert_eq!(enumerated.lookup(Some("YES")), Some("on"));
    assert_eq!(enumerated.lookup(Some("")), Some("off"));
    assert_eq!(enumerated.lookup(Some("maybe")), Some("off"));
    assert_eq!(enumerated.keywords(), ["on", "off", "auto"]);
}

#[test]
fn ordered_sets_round_trip_through_serialization() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tokens = parse_ordered_set("b a b\r\nc");
    assert_eq!(serialize_ordered_set(&tokens), "b a c");
    assert!(parse_ordered_set(" \t ").is_empty());
}
