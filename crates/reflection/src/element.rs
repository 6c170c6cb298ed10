//! Element reference reflection (`attr-associated element`).
//! Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes:element>

use core::cell::RefCell;

use dom_host::AttributeHost;
use js::{JSError, JSValue, ObjectRef};

use crate::Reflector;

/// `Element?` reflecting an id-referencing attribute.
///
/// Unlike the other reflectors this one holds per-element state, the
/// explicitly set element, so build one for every element instance. It is
/// not [`Reflector::SHAREABLE`] and cannot go in a
/// [`PropertyTable`](crate::PropertyTable).
///
/// The host must call [`ElementReflector::attribute_changed`] whenever the
/// content attribute is set or removed by anything other than this
/// reflector, so a stale explicit element does not outlive the id it
/// replaced.
#[derive(Debug, Default)]
pub struct ElementReflector {
    explicit: RefCell<Option<ObjectRef>>,
}

impl ElementReflector {
    /// A reflector with no explicitly set element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The explicitly set element, if any.
    #[must_use]
    pub fn explicit_element(&self) -> Option<ObjectRef> {
        self.explicit.borrow().clone()
    }

    /// Forget the explicitly set element after an outside change to the
    /// content attribute.
    pub fn attribute_changed(&self) {
        *self.explicit.borrow_mut() = None;
    }
}

impl Reflector for ElementReflector {
    type Value = Option<ObjectRef>;

    const SHAREABLE: bool = false;

    #[inline]
    fn default_value(&self) -> Option<ObjectRef> {
        None
    }

    /// Without a tree to search only the explicitly set element is known,
    /// and an absent attribute always reads as `null`.
    fn from_attribute(&self, value: Option<&str>) -> Option<ObjectRef> {
        value?;
        self.explicit_element()
    }

    fn coerce_value(&self, value: &JSValue) -> Result<Option<ObjectRef>, JSError> {
        match value {
            JSValue::Undefined | JSValue::Null => Ok(None),
            JSValue::Object(object) => Ok(Some(object.clone())),
            JSValue::Boolean(_)
            | JSValue::Number(_)
            | JSValue::BigInt(_)
            | JSValue::String(_)
            | JSValue::Symbol(_) => Err(JSError::type_error("Value is not of type 'Element'")),
        }
    }

    fn set_attribute(
        &self,
        element: &dyn AttributeHost,
        name: &str,
        value: Option<ObjectRef>,
    ) -> Result<(), JSError> {
        let Some(target) = value else {
            *self.explicit.borrow_mut() = None;
            element.remove_attribute(name);
            return Ok(());
        };
        element.set_attribute(name, "")?;
        *self.explicit.borrow_mut() = Some(target);
        Ok(())
    }

    fn get(&self, element: &dyn AttributeHost, name: &str) -> Option<ObjectRef> {
        if let Some(explicit) = self.explicit_element() {
            return Some(explicit);
        }
        let id = element.get_attribute(name)?;
        element.element_by_id(&id)
    }
}
