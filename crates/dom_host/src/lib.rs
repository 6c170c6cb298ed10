//! Host contract for attribute reflection and event handlers.
//!
//! The reflection and event-handler engines never implement a DOM. They talk
//! to an element-like host through the traits in this crate: string attribute
//! storage, event listener registration and dispatch, and the handful of tree
//! lookups (form owner, document, id) the inline handler scope chain needs.
//! [`memory`] provides a small in-memory host for tests and embedders.

#![forbid(unsafe_code)]

mod event;
pub use event::Event;

pub mod memory;
pub use memory::{MemoryDocument, MemoryElement};

use std::rc::Rc;

use js::{JSError, ObjectRef};
use url::Url;

/// Listener callback invoked for each dispatched event.
pub type EventListener = Rc<dyn Fn(&Event)>;

/// Handle identifying one listener registration on a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// String attribute storage of an element.
///
/// Spec: <https://dom.spec.whatwg.org/#concept-element-attribute>
pub trait AttributeHost {
    /// Value of the named attribute, if present.
    fn get_attribute(&self, name: &str) -> Option<String>;

    /// Create or replace the named attribute.
    ///
    /// # Errors
    /// Returns `InvalidCharacterError` when `name` is not a valid attribute name.
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), JSError>;

    /// Remove the named attribute. Absent attributes are ignored.
    fn remove_attribute(&self, name: &str);

    /// Whether the named attribute is present.
    #[inline]
    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Base URL used to resolve URL-valued attributes.
    #[inline]
    fn base_url(&self) -> Option<Url> {
        None
    }

    /// First element with the given id in this element's tree.
    #[inline]
    fn element_by_id(&self, _id: &str) -> Option<ObjectRef> {
        None
    }
}

/// Listener registration and synchronous dispatch.
///
/// Spec: <https://dom.spec.whatwg.org/#interface-eventtarget>
pub trait EventTarget {
    /// Append a listener for `event_type`.
    fn add_event_listener(&self, event_type: &str, listener: EventListener) -> ListenerId;

    /// Remove a registration. Unknown ids are ignored.
    fn remove_event_listener(&self, event_type: &str, id: ListenerId);

    /// Invoke every listener registered for the event's type, in
    /// registration order. Returns `false` when the event was canceled.
    fn dispatch_event(&self, event: &Event) -> bool;
}

/// An element as seen by the event-handler compiler.
pub trait HostElement: AttributeHost + EventTarget {
    /// The script-visible object standing for this element.
    fn js_object(&self) -> ObjectRef;

    /// Script-visible form owner, for form-associated elements.
    fn form_owner(&self) -> Option<ObjectRef>;

    /// Script-visible node document.
    fn owner_document(&self) -> Option<ObjectRef>;
}
