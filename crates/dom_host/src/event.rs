//! Spec: <https://dom.spec.whatwg.org/#interface-event>

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js::{JSValue, ObjectRef, Property, PropertyKey};

struct EventInner {
    event_type: String,
    cancelable: bool,
    canceled: Cell<bool>,
    current_target: RefCell<Option<ObjectRef>>,
    object: ObjectRef,
}

impl EventInner {
    fn cancel(&self) {
        if self.cancelable && !self.canceled.get() {
            self.canceled.set(true);
            self.object.set("defaultPrevented", JSValue::Boolean(true));
        }
    }
}

/// A dispatched event, paired with the object script sees as `event`.
#[derive(Clone)]
pub struct Event(Rc<EventInner>);

impl Event {
    /// Create an untrusted event of the given type.
    #[must_use]
    pub fn new(event_type: &str, cancelable: bool) -> Self {
        Self(Rc::new_cyclic(|weak: &Weak<EventInner>| {
            let object = ObjectRef::new_object();
            object.define(PropertyKey::from("type"), Property::data(JSValue::string(event_type)));
            object.define(PropertyKey::from("cancelable"), Property::data(JSValue::Boolean(cancelable)));
            object.define(PropertyKey::from("defaultPrevented"), Property::data(JSValue::Boolean(false)));
            object.define(PropertyKey::from("currentTarget"), Property::data(JSValue::Null));
            let handle = Weak::clone(weak);
            let prevent_default = ObjectRef::new_function("preventDefault", move |_, _| {
                if let Some(inner) = handle.upgrade() {
                    inner.cancel();
                }
                Ok(JSValue::Undefined)
            });
            object.define(
                PropertyKey::from("preventDefault"),
                Property::hidden(JSValue::Object(prevent_default)),
            );
            EventInner {
                event_type: event_type.to_owned(),
                cancelable,
                canceled: Cell::new(false),
                current_target: RefCell::new(None),
                object,
            }
        }))
    }

    /// The event type, e.g. `"click"`.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.0.event_type
    }

    /// Whether `prevent_default` has any effect.
    #[inline]
    #[must_use]
    pub fn cancelable(&self) -> bool {
        self.0.cancelable
    }

    /// Set the canceled flag if the event is cancelable.
    ///
    /// Spec: <https://dom.spec.whatwg.org/#dom-event-preventdefault>
    #[inline]
    pub fn prevent_default(&self) {
        self.0.cancel();
    }

    /// Whether the canceled flag is set.
    #[inline]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.0.canceled.get()
    }

    /// The object whose listeners are currently being invoked.
    #[must_use]
    pub fn current_target(&self) -> Option<ObjectRef> {
        self.0.current_target.borrow().clone()
    }

    /// Update the current target during dispatch.
    pub fn set_current_target(&self, target: Option<ObjectRef>) {
        let value = target.clone().map_or(JSValue::Null, JSValue::Object);
        self.0.object.set("currentTarget", value);
        *self.0.current_target.borrow_mut() = target;
    }

    /// The script-visible event object.
    #[inline]
    #[must_use]
    pub fn to_js(&self) -> JSValue {
        JSValue::Object(self.0.object.clone())
    }
}
