//! Explicit scope chain for inline handlers.
//!
//! Stands in for the nested object environments of
//! <https://html.spec.whatwg.org/multipage/webappapis.html#getting-the-current-value-of-the-event-handler>
//! step 3: element, then form owner, then document, then the global object.

use js::{JSError, JSValue, ObjectRef, PropertyKey, Symbol, to_boolean};

use crate::compiler::HandlerScope;

/// Where an identifier was found.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    /// A property of one of the object scopes; calls use it as `this`.
    Object(ObjectRef),
    /// A property of the global object.
    Global,
}

/// Ordered identifier lookup sources.
#[derive(Clone, Debug)]
pub struct ScopeChain {
    objects: Vec<ObjectRef>,
    global: ObjectRef,
}

impl ScopeChain {
    /// Scopes innermost first; `global` is always consulted last.
    #[must_use]
    pub const fn new(objects: Vec<ObjectRef>, global: ObjectRef) -> Self {
        Self { objects, global }
    }

    /// The global object.
    #[must_use]
    pub const fn global(&self) -> &ObjectRef {
        &self.global
    }

    /// `HasBinding` of an object environment record created for `with`:
    /// the property must exist and not be listed in `@@unscopables`.
    ///
    /// Spec: <https://tc39.es/ecma262/#sec-object-environment-records-hasbinding-n>
    fn object_has_binding(object: &ObjectRef, key: &PropertyKey) -> bool {
        if !object.has_property(key) {
            return false;
        }
        match object.get(Symbol::unscopables()) {
            JSValue::Object(unscopables) => !to_boolean(&unscopables.get(key.clone())),
            _ => true,
        }
    }

    /// Resolve `name`, innermost scope first.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Binding> {
        let key = PropertyKey::from(name);
        if let Some(object) = self
            .objects
            .iter()
            .find(|object| Self::object_has_binding(object, &key))
        {
            return Some(Binding::Object(object.clone()));
        }
        self.global.has_property(&key).then_some(Binding::Global)
    }

    /// Read `name`, returning the value and the `this` a call through the
    /// binding receives.
    ///
    /// # Errors
    /// `ReferenceError` when no scope defines `name`.
    pub fn lookup(&self, name: &str) -> Result<(JSValue, JSValue), JSError> {
        match self.resolve(name) {
            Some(Binding::Object(object)) => {
                let value = object.get(name);
                Ok((value, JSValue::Object(object)))
            }
            Some(Binding::Global) => Ok((self.global.get(name), JSValue::Undefined)),
            None => Err(JSError::ReferenceError(format!("{name} is not defined"))),
        }
    }

    /// Assign to `name`. Unresolvable names become global properties.
    pub fn assign(&self, name: &str, value: JSValue) {
        match self.resolve(name) {
            Some(Binding::Object(object)) => {
                object.set(name, value);
            }
            Some(Binding::Global) | None => {
                self.global.set(name, value);
            }
        }
    }
}

impl From<&HandlerScope> for ScopeChain {
    fn from(scope: &HandlerScope) -> Self {
        Self::new(scope.object_scopes(), scope.global.clone())
    }
}
