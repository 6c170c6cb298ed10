//! The built-in handler language: a small statement/expression subset of
//! ECMAScript evaluated directly over [`js`] values.
//!
//! Supported: literals, identifiers, `this`, member access and calls,
//! assignment, `!`, unary `-`, `typeof`, `+`, `-`, `===`, `!==`, `&&`,
//! `||`, `return`, `throw`, `if`/`else` and blocks. Loose equality is
//! rejected at parse time. Nesting deeper than a fixed bound is a syntax
//! error rather than unbounded recursion.
//!
//! This is a fallback, not a full engine. Hosts that need complete
//! ECMAScript fidelity implement [`ScriptCompiler`] over a real engine
//! and install it with
//! [`HandlerEnvironmentBuilder::compiler`](crate::HandlerEnvironmentBuilder::compiler).

mod interpreter;
mod lexer;
mod parser;
mod scope;
pub use scope::{Binding, ScopeChain};

use std::rc::Rc;

use js::{JSValue, ObjectRef};
use log::trace;

use crate::compiler::{CompileError, HandlerScope, ScriptCompiler};

/// [`ScriptCompiler`] backed by the built-in handler language.
#[derive(Copy, Clone, Debug, Default)]
pub struct HandlerScriptCompiler;

impl HandlerScriptCompiler {
    /// Create the compiler.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ScriptCompiler for HandlerScriptCompiler {
    fn check_syntax(&self, body: &str) -> Result<(), CompileError> {
        parser::parse(body).map(drop)
    }

    fn compile(&self, body: &str, name: &str, scope: &HandlerScope) -> Result<ObjectRef, CompileError> {
        let program = Rc::new(parser::parse(body)?);
        trace!("Parsed {name} into {} statement(s)", program.body.len());
        let chain = ScopeChain::from(scope);
        Ok(ObjectRef::new_function(name, move |this, arguments| {
            let event = arguments.first().cloned().unwrap_or(JSValue::Undefined);
            interpreter::run(&program, &chain, this, event)
        }))
    }
}
