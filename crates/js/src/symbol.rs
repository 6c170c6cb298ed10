//! JavaScript symbol values and the well-known symbols used by the bindings.

use core::fmt::{Debug, Formatter, Result as FmtResult};
use core::hash::{Hash, Hasher};
use std::rc::Rc;

struct SymbolData {
    description: Option<String>,
}

/// A unique symbol value. Two symbols are equal only if they are the same symbol.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

struct WellKnownSymbols {
    iterator: Symbol,
    to_primitive: Symbol,
    unscopables: Symbol,
}

thread_local! {
    static WELL_KNOWN: WellKnownSymbols = WellKnownSymbols {
        iterator: Symbol::new(Some("Symbol.iterator")),
        to_primitive: Symbol::new(Some("Symbol.toPrimitive")),
        unscopables: Symbol::new(Some("Symbol.unscopables")),
    };
}

impl Symbol {
    /// Create a fresh symbol with an optional description.
    #[must_use]
    pub fn new(description: Option<&str>) -> Self {
        Self(Rc::new(SymbolData {
            description: description.map(str::to_owned),
        }))
    }

    /// The symbol's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// `Symbol.iterator`
    #[must_use]
    pub fn iterator() -> Self {
        WELL_KNOWN.with(|symbols| symbols.iterator.clone())
    }

    /// `Symbol.toPrimitive`
    #[must_use]
    pub fn to_primitive() -> Self {
        WELL_KNOWN.with(|symbols| symbols.to_primitive.clone())
    }

    /// `Symbol.unscopables`
    #[must_use]
    pub fn unscopables() -> Self {
        WELL_KNOWN.with(|symbols| symbols.unscopables.clone())
    }

    /// Descriptive form used by `Symbol.prototype.toString`.
    #[must_use]
    pub fn descriptive_string(&self) -> String {
        format!("Symbol({})", self.description().unwrap_or_default())
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<State: Hasher>(&self, state: &mut State) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl Debug for Symbol {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(&self.descriptive_string())
    }
}
