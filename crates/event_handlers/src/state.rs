//! The value behind one `on<type>` property.
//! Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#event-handlers>

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use dom_host::HostElement;
use js::{JSValue, ObjectRef};
use log::debug;
use webidl::to_legacy_callback_function;

use crate::activation::ActivationController;
use crate::config::HandlerEnvironment;

/// An event handler's value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HandlerValue {
    /// No handler.
    #[default]
    Null,
    /// A callback, either set from script or compiled from an attribute.
    Compiled(ObjectRef),
    /// Content attribute source waiting to be compiled on first use.
    Uncompiled(String),
}

impl HandlerValue {
    /// Whether the value is [`HandlerValue::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Event handler state for one (target, event type) pair.
pub struct EventHandlerState {
    target: Rc<dyn HostElement>,
    event_type: String,
    value: RefCell<HandlerValue>,
    activation: ActivationController,
    environment: Rc<HandlerEnvironment>,
    this: Weak<Self>,
}

impl EventHandlerState {
    /// A null handler for `event_type` on `target`.
    #[must_use]
    pub fn new(target: Rc<dyn HostElement>, event_type: &str, environment: Rc<HandlerEnvironment>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            target,
            event_type: event_type.to_owned(),
            value: RefCell::new(HandlerValue::Null),
            activation: ActivationController::new(event_type),
            environment,
            this: Weak::clone(this),
        })
    }

    /// The event type this handler listens for.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// A snapshot of the stored value, without compiling.
    #[must_use]
    pub fn value(&self) -> HandlerValue {
        self.value.borrow().clone()
    }

    /// Whether the backing listener is registered.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// The handler's callback, compiling pending attribute source first.
    ///
    /// A compilation failure is reported and leaves the value null. The
    /// listener stays registered so a later attribute value keeps the
    /// handler's place among the target's listeners.
    ///
    /// Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#getting-the-current-value-of-the-event-handler>
    pub fn get(&self) -> Option<ObjectRef> {
        let source = match &*self.value.borrow() {
            HandlerValue::Null => return None,
            HandlerValue::Compiled(callback) => return Some(callback.clone()),
            HandlerValue::Uncompiled(source) => source.clone(),
        };
        let compiled = self.environment.compiler().compile(
            &source,
            &self.event_type,
            self.target.as_ref(),
            self.environment.global(),
        );
        match compiled {
            Ok(function) => {
                *self.value.borrow_mut() = HandlerValue::Compiled(function.clone());
                Some(function)
            }
            Err(error) => {
                debug!("Failed to compile on{} handler: {error}", self.event_type);
                *self.value.borrow_mut() = HandlerValue::Null;
                self.environment.reporter().report_error(&error.to_js_error());
                None
            }
        }
    }

    /// [`EventHandlerState::get`] as a script value.
    #[must_use]
    pub fn get_js(&self) -> JSValue {
        JSValue::from(self.get())
    }

    /// The IDL attribute setter. Non-objects clear the handler.
    pub fn set(&self, value: &JSValue) {
        match to_legacy_callback_function(value) {
            Some(callback) => {
                *self.value.borrow_mut() = HandlerValue::Compiled(callback);
                self.activate();
            }
            None => self.deactivate(),
        }
    }

    /// React to the content attribute being set (`Some`) or removed (`None`).
    ///
    /// Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#event-handler-attributes:concept-element-attributes-change-ext>
    pub fn from_attribute(&self, value: Option<&str>) {
        let Some(source) = value else {
            self.deactivate();
            return;
        };
        let gate = self.environment.gate();
        if gate.is_blocked(self.environment.compiler().engine(), source, &self.event_type) {
            self.deactivate();
            return;
        }
        *self.value.borrow_mut() = HandlerValue::Uncompiled(source.to_owned());
        self.activate();
    }

    fn activate(&self) {
        let this = Weak::clone(&self.this);
        self.activation.activate(
            self.target.as_ref(),
            move || this.upgrade().and_then(|state| state.get()),
            self.environment.reporter(),
        );
    }

    /// Remove the listener and null the value together.
    fn deactivate(&self) {
        self.activation.deactivate(self.target.as_ref());
        *self.value.borrow_mut() = HandlerValue::Null;
    }
}
