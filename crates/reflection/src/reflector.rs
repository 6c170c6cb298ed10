use dom_host::AttributeHost;
use js::{JSError, JSValue};

/// The four-operation contract every reflected attribute satisfies.
///
/// `get`/`set` are the IDL getter and setter built from the other four and
/// are what property wiring calls.
pub trait Reflector {
    /// IDL-side value type.
    type Value: Clone + Into<JSValue>;

    /// Whether one instance may serve every element of an interface.
    /// Reflectors holding per-element state set this to `false`.
    const SHAREABLE: bool = true;

    /// Value reported when the content attribute is absent.
    fn default_value(&self) -> Self::Value;

    /// Map a content attribute value (or its absence) to the IDL value.
    fn from_attribute(&self, value: Option<&str>) -> Self::Value;

    /// Convert an arbitrary script value with the IDL type's conversion.
    ///
    /// # Errors
    /// Returns the conversion's `TypeError` for values of the wrong shape.
    fn coerce_value(&self, value: &JSValue) -> Result<Self::Value, JSError>;

    /// Write an IDL value back to the content attribute.
    ///
    /// # Errors
    /// Returns a DOM exception for values outside the attribute's contract,
    /// or whatever the host reports.
    fn set_attribute(
        &self,
        element: &dyn AttributeHost,
        name: &str,
        value: Self::Value,
    ) -> Result<(), JSError>;

    /// IDL getter.
    #[inline]
    fn get(&self, element: &dyn AttributeHost, name: &str) -> Self::Value {
        self.from_attribute(element.get_attribute(name).as_deref())
    }

    /// IDL setter: coerce, then write.
    ///
    /// # Errors
    /// See [`Reflector::coerce_value`] and [`Reflector::set_attribute`].
    #[inline]
    fn set(&self, element: &dyn AttributeHost, name: &str, value: &JSValue) -> Result<(), JSError> {
        let coerced = self.coerce_value(value)?;
        self.set_attribute(element, name, coerced)
    }
}
