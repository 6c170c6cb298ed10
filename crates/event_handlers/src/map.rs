//! Per-element table of event handler states, keyed by property name.

use core::cell::RefCell;
use std::rc::Rc;

use dom_host::HostElement;
use indexmap::IndexMap;
use js::{JSError, JSValue};
use log::trace;

use crate::config::HandlerEnvironment;
use crate::state::EventHandlerState;

/// The event type named by an `on<type>` property or attribute.
fn event_type(name: &str) -> Option<&str> {
    name.strip_prefix("on").filter(|event_type| !event_type.is_empty())
}

/// Holds one [`EventHandlerState`] per `on<type>` property of an element,
/// created the first time the property is touched.
pub struct EventHandlerMap {
    target: Rc<dyn HostElement>,
    environment: Rc<HandlerEnvironment>,
    states: RefCell<IndexMap<String, Rc<EventHandlerState>>>,
}

impl EventHandlerMap {
    /// An empty table for `target`.
    #[must_use]
    pub fn new(target: Rc<dyn HostElement>, environment: Rc<HandlerEnvironment>) -> Self {
        Self {
            target,
            environment,
            states: RefCell::new(IndexMap::new()),
        }
    }

    /// The state behind `property`, creating it on first access.
    ///
    /// # Errors
    /// Returns a `TypeError` unless `property` is `on` followed by an event type.
    pub fn state(&self, property: &str) -> Result<Rc<EventHandlerState>, JSError> {
        let Some(event_type) = event_type(property) else {
            return Err(JSError::type_error(format!(
                "'{property}' is not an event handler property"
            )));
        };
        if let Some(state) = self.states.borrow().get(property) {
            return Ok(Rc::clone(state));
        }
        trace!("Creating handler state for {property}");
        let state = EventHandlerState::new(Rc::clone(&self.target), event_type, Rc::clone(&self.environment));
        self.states.borrow_mut().insert(property.to_owned(), Rc::clone(&state));
        Ok(state)
    }

    /// Names of the properties touched so far, in first-access order.
    #[must_use]
    pub fn properties(&self) -> Vec<String> {
        self.states.borrow().keys().cloned().collect()
    }

    /// Property getter.
    ///
    /// # Errors
    /// See [`EventHandlerMap::state`].
    pub fn get(&self, property: &str) -> Result<JSValue, JSError> {
        Ok(self.state(property)?.get_js())
    }

    /// Property setter.
    ///
    /// # Errors
    /// See [`EventHandlerMap::state`].
    pub fn set(&self, property: &str, value: &JSValue) -> Result<(), JSError> {
        self.state(property)?.set(value);
        Ok(())
    }

    /// Route a content attribute change. Returns whether `name` is an event
    /// handler attribute.
    pub fn attribute_changed(&self, name: &str, value: Option<&str>) -> bool {
        let Ok(state) = self.state(&name.to_ascii_lowercase()) else {
            return false;
        };
        state.from_attribute(value);
        true
    }

    /// Set the content attribute on the target and route the change.
    ///
    /// # Errors
    /// Propagates the host's rejection of the attribute name.
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), JSError> {
        self.target.set_attribute(name, value)?;
        self.attribute_changed(name, Some(value));
        Ok(())
    }

    /// Remove the content attribute from the target and route the change.
    pub fn remove_attribute(&self, name: &str) {
        self.target.remove_attribute(name);
        self.attribute_changed(name, None);
    }
}
