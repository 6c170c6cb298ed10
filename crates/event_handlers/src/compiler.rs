//! Compiling event handler content attributes into functions.
//! Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#getting-the-current-value-of-the-event-handler>

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;
use std::rc::Rc;

use dom_host::HostElement;
use js::{JSError, ObjectRef};
use log::{debug, info};

/// What went wrong while compiling handler source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The source is not a valid function body.
    Syntax,
    /// The host refused to compile script at all (for example, CSP).
    Blocked,
    /// An engine failure the engine did not classify; the message is the
    /// engine's own text.
    Engine,
}

/// A handler compilation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    /// Failure category.
    pub kind: CompileErrorKind,
    /// Engine-style message.
    pub message: String,
}

impl CompileError {
    /// A syntax error with the given message.
    #[inline]
    pub fn syntax<M: Into<String>>(message: M) -> Self {
        Self {
            kind: CompileErrorKind::Syntax,
            message: message.into(),
        }
    }

    /// A compilation refused by the host.
    #[inline]
    pub fn blocked<M: Into<String>>(message: M) -> Self {
        Self {
            kind: CompileErrorKind::Blocked,
            message: message.into(),
        }
    }

    /// An unclassified engine failure carrying the engine's message.
    #[inline]
    pub fn engine<M: Into<String>>(message: M) -> Self {
        Self {
            kind: CompileErrorKind::Engine,
            message: message.into(),
        }
    }

    /// The exception value handed to the error reporter.
    #[must_use]
    pub fn to_js_error(&self) -> JSError {
        match self.kind {
            CompileErrorKind::Syntax => JSError::SyntaxError(self.message.clone()),
            CompileErrorKind::Blocked | CompileErrorKind::Engine => JSError::InternalError(self.message.clone()),
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            CompileErrorKind::Syntax => write!(formatter, "SyntaxError: {}", self.message),
            CompileErrorKind::Blocked => write!(formatter, "EvalError: {}", self.message),
            CompileErrorKind::Engine => write!(formatter, "Error: {}", self.message),
        }
    }
}

impl Error for CompileError {}

/// Objects consulted, in order, for free identifiers in a handler body.
#[derive(Clone, Debug)]
pub struct HandlerScope {
    /// The element the handler belongs to.
    pub target: ObjectRef,
    /// The element's form owner, for form-associated elements.
    pub form_owner: Option<ObjectRef>,
    /// The element's node document.
    pub document: Option<ObjectRef>,
    /// The global object, consulted last.
    pub global: ObjectRef,
}

impl HandlerScope {
    /// Build the scope for `element` with the given global object.
    #[must_use]
    pub fn for_element(element: &dyn HostElement, global: &ObjectRef) -> Self {
        Self {
            target: element.js_object(),
            form_owner: element.form_owner(),
            document: element.owner_document(),
            global: global.clone(),
        }
    }

    /// The `with`-style scopes from innermost to outermost, excluding the global.
    #[must_use]
    pub fn object_scopes(&self) -> Vec<ObjectRef> {
        let mut scopes = vec![self.target.clone()];
        scopes.extend(self.form_owner.iter().cloned());
        scopes.extend(self.document.iter().cloned());
        scopes
    }
}

/// A script engine able to compile inline handler bodies.
pub trait ScriptCompiler {
    /// Parse `body` as the body of `function (event) { ... }`, in no scope.
    ///
    /// # Errors
    /// Returns the engine's syntax error, a blocked error when the host
    /// refuses to compile, or an engine error it could not classify.
    fn check_syntax(&self, body: &str) -> Result<(), CompileError>;

    /// Compile `body` into a function object called `name` taking one
    /// parameter, `event`, whose free identifiers resolve through `scope`.
    ///
    /// # Errors
    /// As for [`ScriptCompiler::check_syntax`].
    fn compile(&self, body: &str, name: &str, scope: &HandlerScope) -> Result<ObjectRef, CompileError>;
}

/// Two-phase compilation of an event handler content attribute.
#[derive(Clone)]
pub struct AttributeCompiler {
    engine: Rc<dyn ScriptCompiler>,
    log_compiles: bool,
}

impl AttributeCompiler {
    /// Wrap a script engine.
    #[must_use]
    pub fn new(engine: Rc<dyn ScriptCompiler>, log_compiles: bool) -> Self {
        Self { engine, log_compiles }
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &dyn ScriptCompiler {
        self.engine.as_ref()
    }

    /// Compile `source` for the `event_type` handler of `element`.
    ///
    /// The body is first parsed on its own so syntax errors surface exactly
    /// as the engine reports them, then compiled again inside the
    /// element → form owner → document → global scope chain as `on<type>`.
    ///
    /// # Errors
    /// Returns the first phase's failure, or the second's.
    pub fn compile(
        &self,
        source: &str,
        event_type: &str,
        element: &dyn HostElement,
        global: &ObjectRef,
    ) -> Result<ObjectRef, CompileError> {
        self.engine.check_syntax(source)?;
        let name = format!("on{event_type}");
        let scope = HandlerScope::for_element(element, global);
        let function = self.engine.compile(source, &name, &scope)?;
        if self.log_compiles {
            info!("Compiled inline handler {name}: {source:?}");
        } else {
            debug!("Compiled inline handler {name}");
        }
        Ok(function)
    }
}
