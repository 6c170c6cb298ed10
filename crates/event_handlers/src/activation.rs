//! Activating and deactivating the event listener behind an event handler.
//! Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#activate-an-event-handler>

use core::cell::Cell;
use std::rc::Rc;

use dom_host::{Event, EventListener, EventTarget, ListenerId};
use js::{JSValue, ObjectRef};
use log::{debug, trace};

use crate::reporter::ErrorReporter;

/// Tracks the single listener an event handler registers on its target.
///
/// The listener is added once, when the handler first becomes non-null, and
/// stays registered until the handler is deactivated. Setting a new value
/// never re-registers it, so the handler keeps its position relative to
/// listeners added with `addEventListener`.
#[derive(Debug)]
pub struct ActivationController {
    event_type: String,
    registration: Cell<Option<ListenerId>>,
}

impl ActivationController {
    /// Inactive controller for handlers of `event_type`.
    #[must_use]
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_owned(),
            registration: Cell::new(None),
        }
    }

    /// The event type the listener is registered for.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether a listener is currently registered.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registration.get().is_some()
    }

    /// Register the listener on `target` unless it is already registered.
    ///
    /// On each event the listener asks `current_value` for the handler's
    /// callback (which may compile it), calls it with the event's current
    /// target as `this` and the event as its only argument, and cancels the
    /// event when the callback returns exactly `false`. Exceptions go to
    /// `reporter`.
    pub fn activate<T, F>(&self, target: &T, current_value: F, reporter: Rc<dyn ErrorReporter>)
    where
        T: EventTarget + ?Sized,
        F: Fn() -> Option<ObjectRef> + 'static,
    {
        if self.is_active() {
            return;
        }
        let event_type = self.event_type.clone();
        let listener: EventListener = Rc::new(move |event: &Event| {
            let Some(callback) = current_value() else {
                trace!("on{event_type} fired with no handler value");
                return;
            };
            if !callback.is_callable() {
                trace!("on{event_type} holds a non-callable value; ignoring");
                return;
            }
            let this = event.current_target().map_or(JSValue::Undefined, JSValue::Object);
            match callback.call(&this, &[event.to_js()]) {
                Ok(JSValue::Boolean(false)) => event.prevent_default(),
                Ok(_) => {}
                Err(error) => reporter.report_error(&error),
            }
        });
        let id = target.add_event_listener(&self.event_type, listener);
        debug!("Activated on{} handler listener {id:?}", self.event_type);
        self.registration.set(Some(id));
    }

    /// Remove the listener from `target`. Returns whether one was registered.
    pub fn deactivate<T: EventTarget + ?Sized>(&self, target: &T) -> bool {
        let Some(id) = self.registration.take() else {
            return false;
        };
        target.remove_event_listener(&self.event_type, id);
        debug!("Deactivated on{} handler listener {id:?}", self.event_type);
        true
    }
}
