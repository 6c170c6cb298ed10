//! Property wiring for reflected attributes.
//!
//! Each registered property is an erased getter/setter pair over `JSValue`,
//! keyed by IDL property name, so bindings can route property access
//! without knowing the reflector's value type.

use std::rc::Rc;

use dom_host::AttributeHost;
use indexmap::IndexMap;
use js::{JSError, JSValue};

use crate::Reflector;

type Getter = dyn Fn(&dyn AttributeHost) -> JSValue;
type Setter = dyn Fn(&dyn AttributeHost, &JSValue) -> Result<(), JSError>;

/// One wired property: the content attribute it reflects and its accessors.
#[derive(Clone)]
pub struct ReflectedProperty {
    attribute: String,
    getter: Rc<Getter>,
    setter: Rc<Setter>,
}

impl ReflectedProperty {
    /// The reflected content attribute name.
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Run the IDL getter against `element`.
    #[must_use]
    pub fn get(&self, element: &dyn AttributeHost) -> JSValue {
        (self.getter)(element)
    }

    /// Run the IDL setter against `element`.
    ///
    /// # Errors
    /// Returns the reflector's conversion or range error.
    pub fn set(&self, element: &dyn AttributeHost, value: &JSValue) -> Result<(), JSError> {
        (self.setter)(element, value)
    }
}

/// Side table of reflected properties for one element interface.
#[derive(Clone, Default)]
pub struct PropertyTable {
    properties: IndexMap<String, ReflectedProperty>,
}

impl PropertyTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire `property` to the `attribute` content attribute through `reflector`.
    /// Registering a name twice replaces the earlier wiring.
    ///
    /// A table is shared by every element of an interface, so reflectors
    /// that are not [`Reflector::SHAREABLE`] are rejected at compile time.
    #[must_use]
    pub fn reflect<R>(mut self, property: &str, attribute: &str, reflector: R) -> Self
    where
        R: Reflector + 'static,
    {
        const { assert!(R::SHAREABLE, "per-element reflectors cannot be registered in a shared table") };
        let shared = Rc::new(reflector);
        let reader = Rc::clone(&shared);
        let content_attribute = attribute.to_owned();
        let getter_attribute = content_attribute.clone();
        let setter_attribute = content_attribute.clone();
        self.properties.insert(
            property.to_owned(),
            ReflectedProperty {
                attribute: content_attribute,
                getter: Rc::new(move |element: &dyn AttributeHost| {
                    Into::<JSValue>::into(reader.get(element, &getter_attribute))
                }),
                setter: Rc::new(move |element: &dyn AttributeHost, value: &JSValue| {
                    shared.set(element, &setter_attribute, value)
                }),
            },
        );
        self
    }

    /// Look up a wired property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ReflectedProperty> {
        self.properties.get(name)
    }

    /// Property names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// IDL getter by property name.
    ///
    /// # Errors
    /// `TypeError` when no property of that name is wired.
    pub fn get(&self, element: &dyn AttributeHost, name: &str) -> Result<JSValue, JSError> {
        self.lookup(name).map(|property| property.get(element))
    }

    /// IDL setter by property name.
    ///
    /// # Errors
    /// `TypeError` when no property of that name is wired, otherwise the
    /// reflector's own error.
    pub fn set(&self, element: &dyn AttributeHost, name: &str, value: &JSValue) -> Result<(), JSError> {
        self.lookup(name)?.set(element, value)
    }

    fn lookup(&self, name: &str) -> Result<&ReflectedProperty, JSError> {
        self.properties
            .get(name)
            .ok_or_else(|| JSError::type_error(format!("'{name}' is not a reflected property")))
    }
}
