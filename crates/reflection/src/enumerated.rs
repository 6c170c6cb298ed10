//! Enumerated attribute reflection.
//! Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:enumerated-attribute>

use dom_host::AttributeHost;
use html_microsyntax::{Enumerated, EnumeratedAttributeOptions, EnumeratedOptionsError};
use js::{JSError, JSValue};
use webidl::to_dom_string;

use crate::Reflector;

/// `DOMString` limited to known values. A state with no keyword reads as `""`.
#[derive(Clone, Debug)]
pub struct EnumReflector {
    enumerated: Enumerated,
}

impl EnumReflector {
    /// Validate the options and build the reflector.
    ///
    /// # Errors
    /// Returns the configuration error from [`Enumerated::new`].
    pub fn new(options: EnumeratedAttributeOptions) -> Result<Self, EnumeratedOptionsError> {
        Ok(Self {
            enumerated: Enumerated::new(options)?,
        })
    }
}

impl Reflector for EnumReflector {
    type Value = String;

    fn default_value(&self) -> String {
        self.from_attribute(None)
    }

    fn from_attribute(&self, value: Option<&str>) -> String {
        self.enumerated.lookup(value).unwrap_or_default().to_owned()
    }

    fn coerce_value(&self, value: &JSValue) -> Result<String, JSError> {
        Ok(to_dom_string(value)?.to_rust_string_lossy())
    }

    fn set_attribute(&self, element: &dyn AttributeHost, name: &str, value: String) -> Result<(), JSError> {
        element.set_attribute(name, &value)
    }
}

/// `DOMString?` limited to known values: a state with no keyword reads as
/// `null` and writing `null` removes the attribute.
#[derive(Clone, Debug)]
pub struct NullableEnumReflector {
    enumerated: Enumerated,
}

impl NullableEnumReflector {
    /// Validate the options and build the reflector.
    ///
    /// # Errors
    /// Returns the configuration error from [`Enumerated::new`].
    pub fn new(options: EnumeratedAttributeOptions) -> Result<Self, EnumeratedOptionsError> {
        Ok(Self {
            enumerated: Enumerated::new(options)?,
        })
    }
}

impl Reflector for NullableEnumReflector {
    type Value = Option<String>;

    fn default_value(&self) -> Option<String> {
        self.from_attribute(None)
    }

    fn from_attribute(&self, value: Option<&str>) -> Option<String> {
        self.enumerated.lookup(value).map(str::to_owned)
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
        if let Some(text) = value {
            return element.set_attribute(name, &text);
        }
        element.remove_attribute(name);
        Ok(())
    }
}
