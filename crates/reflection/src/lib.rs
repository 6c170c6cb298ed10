//! HTML content attribute reflection.
//! Spec: <https://html.spec.whatwg.org/multipage/common-dom-interfaces.html#reflecting-content-attributes-in-idl-attributes>
//!
//! A [`Reflector`] is the shared, stateless description of how one kind of
//! IDL attribute maps to its content attribute. Element instances are
//! supplied per call through [`dom_host::AttributeHost`], so a single
//! reflector serves every element using the property. The element-reference
//! reflector is the one stateful exception and is built per element.

#![forbid(unsafe_code)]

mod element;
pub use element::ElementReflector;

mod enumerated;
pub use enumerated::{EnumReflector, NullableEnumReflector};

mod numeric;
pub use numeric::{
    ClampedIntReflector, DoubleReflector, IntReflector, NonNegativeIntReflector,
    PositiveDoubleReflector, PositiveIntReflector, PositiveIntWithFallbackReflector,
    UnsignedIntReflector,
};

mod reflector;
pub use reflector::Reflector;

mod string;
pub use string::{BooleanReflector, NullableStringReflector, StringReflector, UrlReflector};

mod table;
pub use table::{PropertyTable, ReflectedProperty};

mod token_list;
pub use token_list::DomTokenList;
