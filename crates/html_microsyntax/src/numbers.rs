//! HTML §2.3.4 Numbers
//! Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#numbers>

use crate::is_ascii_whitespace;

fn skip_whitespace(input: &str) -> &str {
    input.trim_start_matches(is_ascii_whitespace)
}

fn leading_digits(input: &str) -> &str {
    let end = input.find(|character: char| !character.is_ascii_digit()).unwrap_or(input.len());
    input.get(..end).unwrap_or_default()
}

/// Rules for parsing integers.
///
/// Leading ASCII whitespace and an optional sign are accepted, at least one
/// digit is required, and anything after the digits is ignored. Values too
/// large for `i64` saturate, which keeps them out of every reflector range.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#rules-for-parsing-integers>
#[must_use]
pub fn parse_integer(input: &str) -> Option<i64> {
    let rest = skip_whitespace(input);
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, rest.get(1..)?),
        Some(b'+') => (false, rest.get(1..)?),
        _ => (false, rest),
    };
    let digits = leading_digits(rest);
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.bytes().fold(0_i64, |accumulated, digit| {
        accumulated
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { magnitude.saturating_neg() } else { magnitude })
}

/// Rules for parsing non-negative integers.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#rules-for-parsing-non-negative-integers>
#[must_use]
pub fn parse_non_negative_integer(input: &str) -> Option<i64> {
    parse_integer(input).filter(|value| *value >= 0)
}

/// Rules for parsing floating-point number values.
///
/// The longest prefix matching the HTML grammar is collected and handed to
/// the standard float parser. Results that are not finite are rejected and
/// `-0` becomes `0`.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#rules-for-parsing-floating-point-number-values>
#[must_use]
pub fn parse_double(input: &str) -> Option<f64> {
    let mut rest = skip_whitespace(input);
    let mut literal = String::new();

    match rest.as_bytes().first() {
        Some(b'-') => {
            literal.push('-');
            rest = rest.get(1..)?;
        }
        Some(b'+') => rest = rest.get(1..)?,
        _ => {}
    }

    let starts_with_fraction = rest.starts_with('.')
        && rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit);
    if starts_with_fraction {
        literal.push('0');
    } else {
        let integer = leading_digits(rest);
        if integer.is_empty() {
            return None;
        }
        literal.push_str(integer);
        rest = rest.get(integer.len()..)?;
    }

    if let Some(after_point) = rest.strip_prefix('.') {
        let fraction = leading_digits(after_point);
        if !fraction.is_empty() {
            literal.push('.');
            literal.push_str(fraction);
            rest = after_point.get(fraction.len()..)?;
            push_exponent(&mut literal, rest);
        }
    } else {
        push_exponent(&mut literal, rest);
    }

    let value = literal.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if value == 0.0 { 0.0 } else { value })
}

fn push_exponent(literal: &mut String, rest: &str) {
    let Some(after_e) = rest.strip_prefix(['e', 'E']) else {
        return;
    };
    let (sign, unsigned) = match after_e.as_bytes().first() {
        Some(b'-') => ("-", after_e.get(1..).unwrap_or_default()),
        Some(b'+') => ("", after_e.get(1..).unwrap_or_default()),
        _ => ("", after_e),
    };
    let digits = leading_digits(unsigned);
    if digits.is_empty() {
        return;
    }
    literal.push('e');
    literal.push_str(sign);
    literal.push_str(digits);
}

#[cfg(test)]
mod tests {
    use super::{parse_double, parse_integer, parse_non_negative_integer};

    #[test]
    fn integers_tolerate_whitespace_and_trailing_junk() {
        assert_eq!(parse_integer("  42px"), Some(42));
        assert_eq!(parse_integer("\n-7"), Some(-7));
        assert_eq!(parse_integer("+3"), Some(3));
        assert_eq!(parse_integer("-0"), Some(0));
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("x1"), None);
        assert_eq!(parse_integer("\u{A0}1"), None, "NBSP is not ASCII whitespace");
        assert_eq!(parse_integer("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn non_negative_rejects_negatives_only() {
        assert_eq!(parse_non_negative_integer("-0"), Some(0));
        assert_eq!(parse_non_negative_integer("-1"), None);
        assert_eq!(parse_non_negative_integer("12"), Some(12));
    }

    #[test]
    fn doubles_follow_the_html_prefix_grammar() {
        assert_eq!(parse_double("1.5"), Some(1.5));
        assert_eq!(parse_double("  -.5e1xyz"), Some(-5.0));
        assert_eq!(parse_double("1."), Some(1.0));
        assert_eq!(parse_double("1.e3"), Some(1.0));
        assert_eq!(parse_double("2e"), Some(2.0));
        assert_eq!(parse_double("2e+2"), Some(200.0));
        assert_eq!(parse_double("-0"), Some(0.0));
        assert!(parse_double("-0").is_some_and(|value| value.is_sign_positive()));
        assert_eq!(parse_double("."), None);
        assert_eq!(parse_double("e5"), None);
        assert_eq!(parse_double("1e400"), None);
        assert_eq!(parse_double("Infinity"), None);
    }
}
