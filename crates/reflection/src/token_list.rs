//! `DOMTokenList` over a space-separated content attribute.
//! Spec: <https://dom.spec.whatwg.org/#interface-domtokenlist>

use dom_host::AttributeHost;
use html_microsyntax::{TokenSet, is_ascii_whitespace, parse_ordered_set, serialize_ordered_set};
use js::{DomExceptionName, JSError};

/// Live token list reflecting one attribute of one element.
///
/// The token set is re-parsed from the attribute on every access, so changes
/// made through the attribute are always observed.
pub struct DomTokenList<H: AttributeHost> {
    element: H,
    attribute: String,
    supported: Option<Vec<String>>,
}

impl<H: AttributeHost> DomTokenList<H> {
    /// A token list for `attribute` with no supported-token restriction.
    pub fn new(element: H, attribute: &str) -> Self {
        Self {
            element,
            attribute: attribute.to_owned(),
            supported: None,
        }
    }

    /// A token list whose `supports()` checks against `supported`, compared
    /// ASCII case-insensitively.
    pub fn with_supported_tokens<I, S>(element: H, attribute: &str, supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element,
            attribute: attribute.to_owned(),
            supported: Some(
                supported
                    .into_iter()
                    .map(|token| token.into().to_ascii_lowercase())
                    .collect(),
            ),
        }
    }

    fn tokens(&self) -> TokenSet {
        self.element
            .get_attribute(&self.attribute)
            .map(|value| parse_ordered_set(&value))
            .unwrap_or_default()
    }

    /// Spec: <https://dom.spec.whatwg.org/#concept-dtl-update>
    fn update(&self, tokens: &TokenSet) -> Result<(), JSError> {
        if !self.element.has_attribute(&self.attribute) && tokens.is_empty() {
            return Ok(());
        }
        self.element
            .set_attribute(&self.attribute, &serialize_ordered_set(tokens))
    }

    fn validate(token: &str) -> Result<(), JSError> {
        if token.is_empty() {
            return Err(JSError::dom(
                DomExceptionName::SyntaxError,
                "The token provided must not be empty",
            ));
        }
        if token.contains(is_ascii_whitespace) {
            return Err(JSError::dom(
                DomExceptionName::InvalidCharacterError,
                format!("The token provided ('{token}') contains HTML space characters"),
            ));
        }
        Ok(())
    }

    /// `length`
    #[must_use]
    pub fn length(&self) -> usize {
        self.tokens().len()
    }

    /// `item(index)`
    #[must_use]
    pub fn item(&self, index: usize) -> Option<String> {
        self.tokens().into_iter().nth(index)
    }

    /// `contains(token)`
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().iter().any(|existing| existing == token)
    }

    /// `add(...tokens)`
    ///
    /// # Errors
    /// `SyntaxError` for an empty token, `InvalidCharacterError` for a token
    /// containing ASCII whitespace. Nothing is written in either case.
    pub fn add(&self, tokens: &[&str]) -> Result<(), JSError> {
        for token in tokens {
            Self::validate(token)?;
        }
        let mut set = self.tokens();
        for token in tokens {
            if !set.iter().any(|existing| existing == token) {
                set.push((*token).to_owned());
            }
        }
        self.update(&set)
    }

    /// `remove(...tokens)`
    ///
    /// # Errors
    /// As for [`DomTokenList::add`].
    pub fn remove(&self, tokens: &[&str]) -> Result<(), JSError> {
        for token in tokens {
            Self::validate(token)?;
        }
        let mut set = self.tokens();
        set.retain(|existing| !tokens.contains(&existing.as_str()));
        self.update(&set)
    }

    /// `toggle(token, force)`: returns whether the token is present afterwards.
    ///
    /// # Errors
    /// As for [`DomTokenList::add`].
    pub fn toggle(&self, token: &str, force: Option<bool>) -> Result<bool, JSError> {
        Self::validate(token)?;
        let mut set = self.tokens();
        if set.iter().any(|existing| existing == token) {
            if force == Some(true) {
                return Ok(true);
            }
            set.retain(|existing| existing != token);
            self.update(&set)?;
            return Ok(false);
        }
        if force == Some(false) {
            return Ok(false);
        }
        set.push(token.to_owned());
        self.update(&set)?;
        Ok(true)
    }

    /// `replace(token, newToken)`: returns whether `token` was present.
    ///
    /// # Errors
    /// As for [`DomTokenList::add`], checked for both tokens.
    pub fn replace(&self, token: &str, new_token: &str) -> Result<bool, JSError> {
        Self::validate(token)?;
        Self::validate(new_token)?;
        let set = self.tokens();
        if !set.iter().any(|existing| existing == token) {
            return Ok(false);
        }
        let mut replaced = TokenSet::new();
        let mut placed = false;
        for existing in set {
            if existing == token || existing == new_token {
                if !placed {
                    replaced.push(new_token.to_owned());
                    placed = true;
                }
            } else {
                replaced.push(existing);
            }
        }
        self.update(&replaced)?;
        Ok(true)
    }

    /// `supports(token)`
    ///
    /// # Errors
    /// `TypeError` when the attribute defines no supported tokens.
    pub fn supports(&self, token: &str) -> Result<bool, JSError> {
        let Some(supported) = &self.supported else {
            return Err(JSError::type_error(format!(
                "'{}' attribute has no supported tokens",
                self.attribute
            )));
        };
        let lowered = token.to_ascii_lowercase();
        Ok(supported.iter().any(|candidate| *candidate == lowered))
    }

    /// `value` getter: the attribute's raw value.
    #[must_use]
    pub fn value(&self) -> String {
        self.element.get_attribute(&self.attribute).unwrap_or_default()
    }

    /// `value` setter: replaces the attribute verbatim.
    ///
    /// # Errors
    /// Whatever the host reports for the write.
    pub fn set_value(&self, value: &str) -> Result<(), JSError> {
        self.element.set_attribute(&self.attribute, value)
    }

    /// The parsed token set, in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.tokens().into_vec()
    }
}
