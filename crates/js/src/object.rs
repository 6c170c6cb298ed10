//! Reference-counted JavaScript objects.
//!
//! Objects are single-threaded (`Rc<RefCell<..>>`) to match the event-loop
//! model: every access happens on the thread that drives script and dispatch.
//! Property storage keeps insertion order so that own-key enumeration follows
//! the ordinary `[[OwnPropertyKeys]]` ordering.

use core::cell::{Cell, RefCell};
use core::fmt::{Debug, Formatter, Result as FmtResult};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::conversions::to_string;
use crate::error::JSError;
use crate::string::DomString;
use crate::symbol::Symbol;
use crate::value::{JSValue, PropertyKey};

/// Signature of a native function body: `(this, arguments) -> completion`.
pub type NativeFunction = dyn Fn(&JSValue, &[JSValue]) -> Result<JSValue, JSError>;

/// The built-in class of an object, used for default string conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    /// A plain object.
    Ordinary,
    /// An array exotic object.
    Array,
    /// A callable object.
    Function,
}

/// A single own data property.
#[derive(Clone, Debug)]
pub struct Property {
    /// Current value.
    pub value: JSValue,
    /// Whether assignments may change the value.
    pub writable: bool,
    /// Whether the property shows up in own-key enumeration.
    pub enumerable: bool,
}

impl Property {
    /// A writable, enumerable data property.
    #[inline]
    #[must_use]
    pub const fn data(value: JSValue) -> Self {
        Self {
            value,
            writable: true,
            enumerable: true,
        }
    }

    /// A writable, non-enumerable data property (methods, `length`).
    #[inline]
    #[must_use]
    pub const fn hidden(value: JSValue) -> Self {
        Self {
            value,
            writable: true,
            enumerable: false,
        }
    }
}

struct ObjectData {
    class: ObjectClass,
    name: String,
    properties: IndexMap<PropertyKey, Property>,
    prototype: Option<ObjectRef>,
    extensible: bool,
    call: Option<Rc<NativeFunction>>,
}

/// Shared handle to a JavaScript object. Cloning the handle aliases the object.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

struct Intrinsics {
    object_prototype: ObjectRef,
    array_prototype: ObjectRef,
    function_prototype: ObjectRef,
}

thread_local! {
    static INTRINSICS: Intrinsics = Intrinsics::create();
}

impl Intrinsics {
    fn create() -> Self {
        let object_prototype = ObjectRef::bare(ObjectClass::Ordinary, None);
        let function_prototype = ObjectRef::bare(ObjectClass::Ordinary, Some(object_prototype.clone()));
        let array_prototype = ObjectRef::bare(ObjectClass::Array, Some(object_prototype.clone()));

        let install = |target: &ObjectRef, key: PropertyKey, name: &str, body: Rc<NativeFunction>| {
            let function = ObjectRef::bare(ObjectClass::Function, Some(function_prototype.clone()));
            {
                let mut data = function.0.borrow_mut();
                data.name = name.to_owned();
                data.call = Some(body);
            }
            target.define(key, Property::hidden(JSValue::Object(function)));
        };

        install(
            &object_prototype,
            PropertyKey::from("toString"),
            "toString",
            Rc::new(|this: &JSValue, _: &[JSValue]| -> Result<JSValue, JSError> {
                let tag = this.as_object().map_or_else(|| String::from("[object Undefined]"), ObjectRef::tag_string);
                Ok(JSValue::string(&tag))
            }),
        );
        install(
            &object_prototype,
            PropertyKey::from("valueOf"),
            "valueOf",
            Rc::new(|this: &JSValue, _: &[JSValue]| -> Result<JSValue, JSError> { Ok(this.clone()) }),
        );
        install(
            &array_prototype,
            PropertyKey::from("toString"),
            "toString",
            Rc::new(|this: &JSValue, _: &[JSValue]| -> Result<JSValue, JSError> {
                let Some(array) = this.as_object() else {
                    return Err(JSError::type_error("Array.prototype.toString called on non-object"));
                };
                array.join(",").map(JSValue::String)
            }),
        );
        install(
            &array_prototype,
            PropertyKey::Symbol(Symbol::iterator()),
            "[Symbol.iterator]",
            Rc::new(|this: &JSValue, _: &[JSValue]| -> Result<JSValue, JSError> {
                let Some(array) = this.as_object() else {
                    return Err(JSError::type_error("Array iterator called on non-object"));
                };
                Ok(JSValue::Object(ObjectRef::array_values_iterator(array.clone())))
            }),
        );
        install(
            &function_prototype,
            PropertyKey::from("toString"),
            "toString",
            Rc::new(|this: &JSValue, _: &[JSValue]| -> Result<JSValue, JSError> {
                let name = this.as_object().map(ObjectRef::name).unwrap_or_default();
                Ok(JSValue::string(&format!("function {name}() {{ [native code] }}")))
            }),
        );

        Self {
            object_prototype,
            array_prototype,
            function_prototype,
        }
    }
}

impl ObjectRef {
    fn bare(class: ObjectClass, prototype: Option<Self>) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            class,
            name: String::new(),
            properties: IndexMap::new(),
            prototype,
            extensible: true,
            call: None,
        })))
    }

    /// Create an empty ordinary object inheriting from `Object.prototype`.
    #[must_use]
    pub fn new_object() -> Self {
        let prototype = INTRINSICS.with(|intrinsics| intrinsics.object_prototype.clone());
        Self::bare(ObjectClass::Ordinary, Some(prototype))
    }

    /// Create an ordinary object with no prototype.
    #[must_use]
    pub fn new_null_prototype() -> Self {
        Self::bare(ObjectClass::Ordinary, None)
    }

    /// Create an array holding `values`.
    #[must_use]
    pub fn new_array(values: Vec<JSValue>) -> Self {
        let prototype = INTRINSICS.with(|intrinsics| intrinsics.array_prototype.clone());
        let array = Self::bare(ObjectClass::Array, Some(prototype));
        let length = values.len();
        for (index, value) in values.into_iter().enumerate() {
            array.define(PropertyKey::from(index), Property::data(value));
        }
        array.define(PropertyKey::from("length"), Property::hidden(JSValue::Number(length as f64)));
        array
    }

    /// Create a native function object.
    pub fn new_function<F>(name: &str, body: F) -> Self
    where
        F: Fn(&JSValue, &[JSValue]) -> Result<JSValue, JSError> + 'static,
    {
        let prototype = INTRINSICS.with(|intrinsics| intrinsics.function_prototype.clone());
        let function = Self::bare(ObjectClass::Function, Some(prototype));
        {
            let mut data = function.0.borrow_mut();
            data.name = name.to_owned();
            data.call = Some(Rc::new(body));
        }
        function.define(PropertyKey::from("name"), Property::hidden(JSValue::string(name)));
        function
    }

    /// The object's class.
    #[must_use]
    pub fn class(&self) -> ObjectClass {
        self.0.borrow().class
    }

    /// The function name (empty for non-functions).
    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Whether the object has a `[[Call]]` behavior.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.0.borrow().call.is_some()
    }

    /// The `[[Prototype]]` of the object.
    #[must_use]
    pub fn prototype(&self) -> Option<Self> {
        self.0.borrow().prototype.clone()
    }

    /// Define or overwrite an own property, ignoring writability.
    pub fn define(&self, key: PropertyKey, property: Property) {
        self.0.borrow_mut().properties.insert(key, property);
    }

    /// Read an own property without walking the prototype chain.
    #[must_use]
    pub fn get_own(&self, key: &PropertyKey) -> Option<Property> {
        self.0.borrow().properties.get(key).cloned()
    }

    /// Whether `key` exists on the object or its prototype chain.
    #[must_use]
    pub fn has_property(&self, key: &PropertyKey) -> bool {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if object.0.borrow().properties.contains_key(key) {
                return true;
            }
            current = object.prototype();
        }
        false
    }

    /// `[[Get]]`: read a property, walking the prototype chain.
    #[must_use]
    pub fn get<K: Into<PropertyKey>>(&self, key: K) -> JSValue {
        let key = key.into();
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if let Some(property) = object.0.borrow().properties.get(&key) {
                return property.value.clone();
            }
            current = object.prototype();
        }
        JSValue::Undefined
    }

    /// `[[Set]]` in sloppy mode: returns `false` when the write was refused.
    pub fn set<K: Into<PropertyKey>>(&self, key: K, value: JSValue) -> bool {
        let key = key.into();
        let mut data = self.0.borrow_mut();
        if let Some(property) = data.properties.get_mut(&key) {
            if !property.writable {
                return false;
            }
            property.value = value;
            return true;
        }
        if !data.extensible {
            return false;
        }
        data.properties.insert(key, Property::data(value));
        true
    }

    /// Own property keys in ordinary order: array indices ascending, then
    /// strings in insertion order, then symbols in insertion order.
    ///
    /// Spec: <https://tc39.es/ecma262/#sec-ordinaryownpropertykeys>
    #[must_use]
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let data = self.0.borrow();
        let mut indices: Vec<(u32, PropertyKey)> = data
            .properties
            .keys()
            .filter_map(|key| key.array_index().map(|index| (index, key.clone())))
            .collect();
        indices.sort_by_key(|(index, _)| *index);
        let strings = data
            .properties
            .keys()
            .filter(|key| matches!(key, PropertyKey::String(_)) && key.array_index().is_none())
            .cloned();
        let symbols = data
            .properties
            .keys()
            .filter(|key| matches!(key, PropertyKey::Symbol(_)))
            .cloned();
        indices.into_iter().map(|(_, key)| key).chain(strings).chain(symbols).collect()
    }

    /// `[[Call]]`: invoke the object with a receiver and arguments.
    ///
    /// # Errors
    /// Returns a `TypeError` when the object is not callable, or whatever the
    /// function body throws.
    pub fn call(&self, this: &JSValue, arguments: &[JSValue]) -> Result<JSValue, JSError> {
        let body = self.0.borrow().call.clone();
        match body {
            Some(function) => function(this, arguments),
            None => Err(JSError::type_error(format!("{} is not a function", self.tag_string()))),
        }
    }

    /// `Object.freeze`: make the object non-extensible and every property read-only.
    pub fn freeze(&self) {
        let mut data = self.0.borrow_mut();
        data.extensible = false;
        for property in data.properties.values_mut() {
            property.writable = false;
        }
    }

    /// `Object.isFrozen`
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        let data = self.0.borrow();
        !data.extensible && data.properties.values().all(|property| !property.writable)
    }

    /// `Object.prototype.toString` style tag, e.g. `[object Array]`.
    #[must_use]
    pub fn tag_string(&self) -> String {
        match self.class() {
            ObjectClass::Ordinary => String::from("[object Object]"),
            ObjectClass::Array => String::from("[object Array]"),
            ObjectClass::Function => String::from("[object Function]"),
        }
    }

    /// The `length` of an array-like object, as a count of elements.
    #[must_use]
    pub fn array_length(&self) -> usize {
        match self.get("length") {
            JSValue::Number(length) if length.is_finite() && length > 0.0 => length as usize,
            _ => 0,
        }
    }

    /// Read the elements of an array-like object.
    #[must_use]
    pub fn array_elements(&self) -> Vec<JSValue> {
        (0..self.array_length()).map(|index| self.get(index)).collect()
    }

    fn join(&self, separator: &str) -> Result<DomString, JSError> {
        let mut joined = DomString::new();
        for (index, element) in self.array_elements().into_iter().enumerate() {
            if index > 0 {
                joined.push_str(separator);
            }
            if !element.is_nullish() {
                joined.append(&to_string(&element)?);
            }
        }
        Ok(joined)
    }

    fn array_values_iterator(array: Self) -> Self {
        let position = Rc::new(Cell::new(0_usize));
        let iterator = Self::new_object();
        let next = Self::new_function("next", move |_: &JSValue, _: &[JSValue]| {
            let index = position.get();
            let result = Self::new_object();
            if index < array.array_length() {
                position.set(index.saturating_add(1));
                result.set("value", array.get(index));
                result.set("done", JSValue::Boolean(false));
            } else {
                result.set("value", JSValue::Undefined);
                result.set("done", JSValue::Boolean(true));
            }
            Ok(JSValue::Object(result))
        });
        iterator.define(PropertyKey::from("next"), Property::hidden(JSValue::Object(next)));
        iterator
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectRef {}

impl Debug for ObjectRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        let data = self.0.borrow();
        match data.class {
            ObjectClass::Function => write!(formatter, "[Function: {}]", data.name),
            ObjectClass::Array => write!(formatter, "[Array({})]", data.properties.len().saturating_sub(1)),
            ObjectClass::Ordinary => write!(formatter, "[Object; {} props]", data.properties.len()),
        }
    }
}
