//! String, URL and boolean reflection.

use dom_host::AttributeHost;
use js::{JSError, JSValue};
use url::Url;
use webidl::{to_boolean, to_dom_string, to_usv_string};

use crate::Reflector;

/// `DOMString` reflecting a content attribute; absence reads as `""`.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:idl-domstring>
#[derive(Copy, Clone, Debug, Default)]
pub struct StringReflector;

impl Reflector for StringReflector {
    type Value = String;

    #[inline]
    fn default_value(&self) -> String {
        String::new()
    }

    fn from_attribute(&self, value: Option<&str>) -> String {
        value.unwrap_or_default().to_owned()
    }

    fn coerce_value(&self, value: &JSValue) -> Result<String, JSError> {
        Ok(to_dom_string(value)?.to_rust_string_lossy())
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: String) -> Result<(), JSError> {
        element.set_attribute(name, &value)
    }
}

/// `DOMString?`: absence reads as `null`, writing `null` removes the attribute.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullableStringReflector;

impl Reflector for NullableStringReflector {
    type Value = Option<String>;

    #[inline]
    fn default_value(&self) -> Option<String> {
        None
    }

    fn from_attribute(&self, value: Option<&str>) -> Option<String> {
        value.map(str::to_owned)
    }

    fn coerce_value(&self, value: &JSValue) -> Result<Option<String>, JSError> {
        if value.is_nullish() {
            return Ok(None);
        }
        Ok(Some(to_dom_string(value)?.to_rust_string_lossy()))
    }

    fn set_attribute(
        &self,
        element: &dyn AttributeHost,
        name: &str,
        value: Option<String>,
    ) -> Result<(), JSError> {
        match value {
            Some(text) => element.set_attribute(name, &text),
            None => {
                element.remove_attribute(name);
                Ok(())
            }
        }
    }
}

/// `USVString` reflecting a URL: the attribute is parsed against a base URL
/// and the serialized result is returned; unparseable values are echoed back.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:idl-usvstring>
#[derive(Clone, Debug, Default)]
pub struct UrlReflector {
    base: Option<Url>,
}

impl UrlReflector {
    /// Reflect URLs resolved against the element's base URL only.
    #[must_use]
    pub const fn new() -> Self {
        Self { base: None }
    }

    /// Reflect URLs with a fallback base for elements that have none.
    #[must_use]
    pub const fn with_base(base: Url) -> Self {
        Self { base: Some(base) }
    }

    fn resolve(base: Option<&Url>, raw: &str) -> String {
        Url::options()
            .base_url(base)
            .parse(raw)
            .map_or_else(|_| raw.to_owned(), String::from)
    }
}

impl Reflector for UrlReflector {
    type Value = String;

    #[inline]
    fn default_value(&self) -> String {
        String::new()
    }

    fn from_attribute(&self, value: Option<&str>) -> String {
        value.map_or_else(String::new, |raw| Self::resolve(self.base.as_ref(), raw))
    }

    fn coerce_value(&self, value: &JSValue) -> Result<String, JSError> {
        Ok(to_usv_string(value)?.to_rust_string_lossy())
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: String) -> Result<(), JSError> {
        element.set_attribute(name, &value)
    }

    fn get(&self, element: &dyn AttributeHost, name: &str) -> String {
        let Some(raw) = element.get_attribute(name) else {
            return String::new();
        };
        let base = element.base_url().or_else(|| self.base.clone());
        Self::resolve(base.as_ref(), &raw)
    }
}

/// `boolean`: presence of the attribute is `true`.
///
/// Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:idl-boolean>
#[derive(Copy, Clone, Debug, Default)]
pub struct BooleanReflector;

impl Reflector for BooleanReflector {
    type Value = bool;

    #[inline]
    fn default_value(&self) -> bool {
        false
    }

    fn from_attribute(&self, value: Option<&str>) -> bool {
        value.is_some()
    }

    fn coerce_value(&self, value: &JSValue) -> Result<bool, JSError> {
        Ok(to_boolean(value))
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: bool) -> Result<(), JSError> {
        if value {
            element.set_attribute(name, "")
        } else {
            element.remove_attribute(name);
            Ok(())
        }
    }
}
