//! HTML §2.3.8 Space-separated tokens, with the Infra ordered-set operations
//! `DOMTokenList` is specified in terms of.
//! Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#space-separated-tokens>

use smallvec::SmallVec;

use crate::is_ascii_whitespace;

/// An ordered set of tokens. Most token lists hold a handful of classes.
pub type TokenSet = SmallVec<[String; 4]>;

/// Ordered set parser: split on ASCII whitespace, dropping duplicates.
///
/// Spec: <https://dom.spec.whatwg.org/#concept-ordered-set-parser>
#[must_use]
pub fn parse_ordered_set(input: &str) -> TokenSet {
    let mut tokens = TokenSet::new();
    for token in input.split(is_ascii_whitespace).filter(|token| !token.is_empty()) {
        if !tokens.iter().any(|existing| existing == token) {
            tokens.push(token.to_owned());
        }
    }
    tokens
}

/// Ordered set serializer: join with a single U+0020 SPACE.
///
/// Spec: <https://dom.spec.whatwg.org/#concept-ordered-set-serializer>
#[must_use]
pub fn serialize_ordered_set(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::{parse_ordered_set, serialize_ordered_set};

    #[test]
    fn duplicates_and_whitespace_collapse() {
        let tokens = parse_ordered_set("  a\tb  a\nc\u{000C}");
        assert_eq!(tokens.as_slice(), ["a", "b", "c"]);
        assert_eq!(serialize_ordered_set(&tokens), "a b c");
    }

    #[test]
    fn non_ascii_whitespace_is_part_of_a_token() {
        let tokens = parse_ordered_set("a\u{00A0}b");
        assert_eq!(tokens.len(), 1);
    }
}
