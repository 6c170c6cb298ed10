//! In-memory host element and document.
//!
//! Enough of the DOM for reflection and inline event handlers: lowercase
//! attribute storage, ordered per-type listener lists, synchronous dispatch
//! with a current target, an optional form owner and id lookup through the
//! owning document.

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use js::{DomExceptionName, JSError, JSValue, ObjectRef, Property, PropertyKey};
use log::{debug, trace};
use url::Url;

use crate::{AttributeHost, Event, EventListener, EventTarget, HostElement, ListenerId};

struct Registration {
    id: ListenerId,
    event_type: String,
    listener: EventListener,
}

struct DocumentInner {
    object: ObjectRef,
    url: RefCell<Option<Url>>,
    elements: RefCell<Vec<Weak<ElementInner>>>,
}

/// A document owning elements for id lookup.
#[derive(Clone)]
pub struct MemoryDocument(Rc<DocumentInner>);

impl MemoryDocument {
    /// Create an empty document with no URL.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(DocumentInner {
            object: ObjectRef::new_object(),
            url: RefCell::new(None),
            elements: RefCell::new(Vec::new()),
        }))
    }

    /// Set the document URL, which is also the base URL of its elements.
    pub fn set_url(&self, url: Url) {
        *self.0.url.borrow_mut() = Some(url);
    }

    /// The document URL.
    #[must_use]
    pub fn url(&self) -> Option<Url> {
        self.0.url.borrow().clone()
    }

    /// The script-visible document object.
    #[inline]
    #[must_use]
    pub fn js_object(&self) -> ObjectRef {
        self.0.object.clone()
    }

    /// Create an element owned by this document. Elements are kept in
    /// creation order, which stands in for tree order.
    #[must_use]
    pub fn create_element(&self, local_name: &str) -> MemoryElement {
        let element = MemoryElement::with_document(local_name, Some(self.clone()));
        self.0.elements.borrow_mut().push(Rc::downgrade(&element.0));
        element
    }

    /// `document.getElementById`
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<MemoryElement> {
        if id.is_empty() {
            return None;
        }
        let mut elements = self.0.elements.borrow_mut();
        elements.retain(|element| element.strong_count() > 0);
        elements
            .iter()
            .filter_map(Weak::upgrade)
            .map(MemoryElement)
            .find(|element| element.get_attribute("id").as_deref() == Some(id))
    }
}

impl Default for MemoryDocument {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

struct ElementInner {
    local_name: String,
    object: ObjectRef,
    attributes: RefCell<IndexMap<String, String>>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<u64>,
    document: Option<MemoryDocument>,
    form_owner: RefCell<Option<ObjectRef>>,
}

/// An element with attribute storage and an event listener list.
#[derive(Clone)]
pub struct MemoryElement(Rc<ElementInner>);

impl MemoryElement {
    /// Create an element that belongs to no document.
    #[must_use]
    pub fn new(local_name: &str) -> Self {
        Self::with_document(local_name, None)
    }

    fn with_document(local_name: &str, document: Option<MemoryDocument>) -> Self {
        let object = ObjectRef::new_object();
        object.define(
            PropertyKey::from("localName"),
            Property::data(JSValue::string(local_name)),
        );
        Self(Rc::new(ElementInner {
            local_name: local_name.to_ascii_lowercase(),
            object,
            attributes: RefCell::new(IndexMap::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            document,
            form_owner: RefCell::new(None),
        }))
    }

    /// The element's local name.
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.0.local_name
    }

    /// The owning document, if any.
    #[must_use]
    pub fn document(&self) -> Option<MemoryDocument> {
        self.0.document.clone()
    }

    /// Associate the element with a form (or clear the association).
    pub fn set_form_owner(&self, form: Option<&Self>) {
        *self.0.form_owner.borrow_mut() = form.map(Self::js_object);
    }

    /// Number of listeners currently registered for `event_type`.
    #[must_use]
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|registration| registration.event_type == event_type)
            .count()
    }

    /// Attribute names in insertion order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<String> {
        self.0.attributes.borrow().keys().cloned().collect()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.0
            .listeners
            .borrow()
            .iter()
            .any(|registration| registration.id == id)
    }
}

/// Spec: <https://dom.spec.whatwg.org/#valid-attribute-local-name>
fn validate_attribute_name(name: &str) -> Result<(), JSError> {
    let invalid = name.is_empty()
        || name.chars().any(|character| {
            matches!(
                character,
                '\u{0000}' | '\t' | '\n' | '\u{000C}' | '\r' | ' ' | '/' | '>' | '='
            )
        });
    if invalid {
        return Err(JSError::dom(
            DomExceptionName::InvalidCharacterError,
            format!("'{name}' is not a valid attribute name"),
        ));
    }
    Ok(())
}

impl AttributeHost for MemoryElement {
    fn get_attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(&name.to_ascii_lowercase()).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), JSError> {
        validate_attribute_name(name)?;
        trace!("<{}> {name}=\"{value}\"", self.0.local_name);
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), value.to_owned());
        Ok(())
    }

    fn remove_attribute(&self, name: &str) {
        self.0.attributes.borrow_mut().shift_remove(&name.to_ascii_lowercase());
    }

    fn base_url(&self) -> Option<Url> {
        self.0.document.as_ref().and_then(MemoryDocument::url)
    }

    fn element_by_id(&self, id: &str) -> Option<ObjectRef> {
        let document = self.0.document.as_ref()?;
        document.get_element_by_id(id).map(|element| element.js_object())
    }
}

impl EventTarget for MemoryElement {
    fn add_event_listener(&self, event_type: &str, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.0.next_listener.get());
        self.0.next_listener.set(id.0.saturating_add(1));
        self.0.listeners.borrow_mut().push(Registration {
            id,
            event_type: event_type.to_owned(),
            listener,
        });
        id
    }

    fn remove_event_listener(&self, event_type: &str, id: ListenerId) {
        self.0
            .listeners
            .borrow_mut()
            .retain(|registration| !(registration.id == id && registration.event_type == event_type));
    }

    fn dispatch_event(&self, event: &Event) -> bool {
        let snapshot: Vec<(ListenerId, EventListener)> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|registration| registration.event_type == event.event_type())
            .map(|registration| (registration.id, Rc::clone(&registration.listener)))
            .collect();
        debug!(
            "Dispatching '{}' to <{}> ({} listeners)",
            event.event_type(),
            self.0.local_name,
            snapshot.len()
        );
        event.set_current_target(Some(self.js_object()));
        for (id, listener) in snapshot {
            // Listeners removed by an earlier listener in this dispatch are skipped.
            if self.is_registered(id) {
                listener(event);
            }
        }
        event.set_current_target(None);
        !event.default_prevented()
    }
}

impl HostElement for MemoryElement {
    #[inline]
    fn js_object(&self) -> ObjectRef {
        self.0.object.clone()
    }

    fn form_owner(&self) -> Option<ObjectRef> {
        self.0.form_owner.borrow().clone()
    }

    fn owner_document(&self) -> Option<ObjectRef> {
        self.0.document.as_ref().map(MemoryDocument::js_object)
    }
}

#[cfg(test)]
mod tests {
    use super::validate_attribute_name;

    #[test]
    fn attribute_names_reject_whitespace_and_markup() {
        validate_attribute_name("data-x").unwrap();
        validate_attribute_name("").unwrap_err();
        validate_attribute_name("a b").unwrap_err();
        validate_attribute_name("a=b").unwrap_err();
    }
}
