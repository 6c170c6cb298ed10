//! Event handler attributes: lazy compilation of inline handler source,
//! Content Security Policy gating and the single backing event listener.
//! Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#event-handler-attributes>
//!
//! Each `on<type>` property of an element is an [`EventHandlerState`]. IDL
//! writes store callbacks directly; content attribute writes store source
//! text that is compiled the first time the handler is read, either by a
//! getter or by the listener when an event fires. Compilation failures are
//! reported through an [`ErrorReporter`] and never reach the caller.

#![forbid(unsafe_code)]

mod activation;
pub use activation::ActivationController;

mod compiler;
pub use compiler::{AttributeCompiler, CompileError, CompileErrorKind, HandlerScope, ScriptCompiler};

mod config;
pub use config::{EventHandlerConfig, HandlerEnvironment, HandlerEnvironmentBuilder};

mod csp;
pub use csp::{ContentSecurityPolicy, CspDisposition, CspGate, CspParseError, CspPolicy, CspViolation};

mod map;
pub use map::EventHandlerMap;

mod reporter;
pub use reporter::{
    ConsoleReporter, ErrorReporter, GlobalReporter, LoggerReporter, install_global_reporter,
    report_error,
};

pub mod script;
pub use script::HandlerScriptCompiler;

mod state;
pub use state::{EventHandlerState, HandlerValue};
