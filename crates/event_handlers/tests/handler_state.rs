//! Tests for the event handler state machine: activation, lazy compilation,
//! CSP gating and listener ordering.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dom_host::{AttributeHost as _, Event, EventTarget as _, HostElement, MemoryDocument, MemoryElement};
use event_handlers::{
    ActivationController, CompileError, CspPolicy, ErrorReporter, EventHandlerMap, EventHandlerState,
    HandlerEnvironment, HandlerScope, HandlerValue, ScriptCompiler,
};
use js::{JSError, JSValue, ObjectRef, to_string};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct RecordingReporter {
    errors: RefCell<Vec<String>>,
}

impl ErrorReporter for RecordingReporter {
    fn report_error(&self, error: &JSError) {
        self.errors.borrow_mut().push(error.to_string());
    }
}

/// Accepts any body without an unbalanced `(`; counts scoped compilations.
/// Bodies naming `eval-me` are refused outright and bodies naming
/// `engine-refusal` fail with an unclassified CSP-style engine message.
#[derive(Default)]
struct CountingCompiler {
    syntax_checks: Cell<usize>,
    compiles: Cell<usize>,
}

impl ScriptCompiler for CountingCompiler {
    fn check_syntax(&self, body: &str) -> Result<(), CompileError> {
        self.syntax_checks.set(self.syntax_checks.get() + 1);
        if body.contains("eval-me") {
            return Err(CompileError::blocked(
                "Refused to evaluate a string as JavaScript because 'unsafe-eval' is not allowed",
            ));
        }
        if body.contains("engine-refusal") {
            return Err(CompileError::engine(
                "EvalError: Refused to evaluate a string as JavaScript because 'unsafe-eval' is not allowed",
            ));
        }
        if body.matches('(').count() != body.matches(')').count() {
            return Err(CompileError::syntax("Unexpected end of input"));
        }
        Ok(())
    }

    fn compile(&self, _body: &str, name: &str, _scope: &HandlerScope) -> Result<ObjectRef, CompileError> {
        self.compiles.set(self.compiles.get() + 1);
        Ok(ObjectRef::new_function(name, |_, _| Ok(JSValue::Undefined)))
    }
}

struct Fixture {
    element: MemoryElement,
    compiler: Rc<CountingCompiler>,
    reporter: Rc<RecordingReporter>,
    environment: Rc<HandlerEnvironment>,
}

fn fixture() -> Fixture {
    init();
    let compiler = Rc::new(CountingCompiler::default());
    let reporter = Rc::new(RecordingReporter::default());
    let environment = HandlerEnvironment::builder()
        .compiler(Rc::clone(&compiler) as Rc<dyn ScriptCompiler>)
        .reporter(Rc::clone(&reporter) as Rc<dyn ErrorReporter>)
        .build();
    Fixture {
        element: MemoryElement::new("div"),
        compiler,
        reporter,
        environment: Rc::new(environment),
    }
}

impl Fixture {
    fn state(&self, event_type: &str) -> Rc<EventHandlerState> {
        EventHandlerState::new(
            Rc::new(self.element.clone()),
            event_type,
            Rc::clone(&self.environment),
        )
    }
}

#[test]
fn activation_is_idempotent() {
    init();
    let element = MemoryElement::new("div");
    let controller = ActivationController::new("click");
    let reporter: Rc<dyn ErrorReporter> = Rc::new(RecordingReporter::default());
    for _ in 0..3 {
        controller.activate(&element, || None, Rc::clone(&reporter));
    }
    assert!(controller.is_active());
    assert_eq!(element.listener_count("click"), 1);

    assert!(controller.deactivate(&element));
    assert!(!controller.deactivate(&element));
    assert!(!controller.is_active());
    assert_eq!(element.listener_count("click"), 0);
}

#[test]
fn setting_callbacks_registers_one_listener_and_null_removes_it() {
    let fixture = fixture();
    let state = fixture.state("click");
    let first = ObjectRef::new_function("first", |_, _| Ok(JSValue::Undefined));
    let second = ObjectRef::new_function("second", |_, _| Ok(JSValue::Undefined));

    state.set(&JSValue::Object(first));
    state.set(&JSValue::Object(second.clone()));
    assert_eq!(fixture.element.listener_count("click"), 1);
    assert_eq!(state.get(), Some(second));

    state.set(&JSValue::Null);
    state.set(&JSValue::Null);
    assert_eq!(state.value(), HandlerValue::Null);
    assert!(!state.is_active());
    assert_eq!(fixture.element.listener_count("click"), 0);
}

#[test]
fn non_object_values_clear_the_handler() {
    let fixture = fixture();
    let state = fixture.state("click");
    state.set(&JSValue::Object(ObjectRef::new_object()));
    assert!(state.is_active());
    state.set(&JSValue::string("alert(1)"));
    assert_eq!(state.get(), None);
    assert!(!state.is_active());
}

#[test]
fn attribute_source_compiles_once() {
    let fixture = fixture();
    let state = fixture.state("click");
    state.from_attribute(Some("x=1"));
    assert_eq!(state.value(), HandlerValue::Uncompiled(String::from("x=1")));
    assert!(state.is_active());
    assert_eq!(fixture.compiler.compiles.get(), 0);

    let first = state.get().unwrap();
    let second = state.get().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.name(), "onclick");
    assert_eq!(fixture.compiler.compiles.get(), 1);
    assert!(fixture.reporter.errors.borrow().is_empty());
}

#[test]
fn compile_failures_are_reported_once_and_read_as_null() {
    let fixture = fixture();
    let state = fixture.state("click");
    state.from_attribute(Some("broken("));
    assert_eq!(state.get(), None);
    assert_eq!(state.get(), None);
    assert_eq!(state.get_js(), JSValue::Null);

    let errors = fixture.reporter.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("SyntaxError"), "{}", errors[0]);
    assert_eq!(fixture.compiler.compiles.get(), 0);
    assert!(state.is_active());
}

#[test]
fn removing_the_attribute_deactivates() {
    let fixture = fixture();
    let state = fixture.state("input");
    state.from_attribute(Some("x=1"));
    assert_eq!(fixture.element.listener_count("input"), 1);
    state.from_attribute(None);
    assert_eq!(state.value(), HandlerValue::Null);
    assert_eq!(fixture.element.listener_count("input"), 0);
}

#[test]
fn csp_blocked_attributes_are_never_cached() {
    init();
    let compiler = Rc::new(CountingCompiler::default());
    let policy: Rc<dyn CspPolicy> = Rc::new(|source: &str| source.contains("alert"));
    let environment = HandlerEnvironment::builder()
        .compiler(Rc::clone(&compiler) as Rc<dyn ScriptCompiler>)
        .policy(policy)
        .build();
    let element = MemoryElement::new("a");
    let state = EventHandlerState::new(Rc::new(element.clone()), "click", Rc::new(environment));

    state.from_attribute(Some("x=1"));
    assert!(state.is_active());
    state.from_attribute(Some("alert(1)"));
    assert_eq!(state.value(), HandlerValue::Null);
    assert!(!state.is_active());
    assert_eq!(state.get(), None);
    assert_eq!(state.get(), None);
    assert_eq!(compiler.compiles.get(), 0);
    assert_eq!(element.listener_count("click"), 0);
}

#[test]
fn engine_refusals_block_without_a_policy() {
    let fixture = fixture();
    let state = fixture.state("click");
    state.from_attribute(Some("eval-me"));
    assert_eq!(state.value(), HandlerValue::Null);
    assert!(!state.is_active());
    assert_eq!(fixture.compiler.syntax_checks.get(), 1);
    assert!(fixture.reporter.errors.borrow().is_empty());
}

#[test]
fn unclassified_engine_refusals_are_matched_by_message() {
    let fixture = fixture();
    let state = fixture.state("click");
    state.from_attribute(Some("engine-refusal"));
    assert_eq!(state.value(), HandlerValue::Null);
    assert!(!state.is_active());
    assert!(fixture.reporter.errors.borrow().is_empty());
}

#[test]
fn syntax_errors_mentioning_csp_words_are_reported_not_blocked() {
    init();
    let reporter = Rc::new(RecordingReporter::default());
    let environment = HandlerEnvironment::builder()
        .reporter(Rc::clone(&reporter) as Rc<dyn ErrorReporter>)
        .build();
    let element = MemoryElement::new("div");
    let state = EventHandlerState::new(Rc::new(element.clone()), "click", Rc::new(environment));
    state.from_attribute(Some("x EvalError"));
    assert_eq!(state.value(), HandlerValue::Uncompiled(String::from("x EvalError")));
    assert!(state.is_active());
    assert_eq!(element.listener_count("click"), 1);

    assert_eq!(state.get(), None);
    assert_eq!(state.get(), None);
    let errors = reporter.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors.first().is_some_and(|error| error.starts_with("SyntaxError")));
}

#[test]
fn returning_exactly_false_prevents_the_default() {
    init();
    let element = MemoryElement::new("a");
    let environment = Rc::new(HandlerEnvironment::builder().build());
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), environment);

    for (source, prevented) in [
        ("return false", true),
        ("return true", false),
        ("return", false),
        ("return 0", false),
        ("return ''", false),
        ("return !1", true),
    ] {
        handlers.set_attribute("onclick", source).unwrap();
        let event = Event::new("click", true);
        assert_eq!(element.dispatch_event(&event), !prevented, "{source}");
        assert_eq!(event.default_prevented(), prevented, "{source}");
    }
}

#[test]
fn handler_keeps_its_listener_position_across_recompilation() {
    init();
    let document = MemoryDocument::new();
    let element = document.create_element("div");
    let calls = Rc::new(RefCell::new(Vec::<String>::new()));

    let log = Rc::clone(&calls);
    let push = ObjectRef::new_function("push", move |_, arguments| {
        let label = to_string(arguments.first().unwrap_or(&JSValue::Undefined))?;
        log.borrow_mut().push(label.to_rust_string_lossy());
        Ok(JSValue::Undefined)
    });
    assert!(document.js_object().set("push", JSValue::Object(push)));

    let reporter = Rc::new(RecordingReporter::default());
    let environment = HandlerEnvironment::builder()
        .reporter(Rc::clone(&reporter) as Rc<dyn ErrorReporter>)
        .build();
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), Rc::new(environment));

    let first = Rc::clone(&calls);
    element.add_event_listener("foo", Rc::new(move |_: &Event| first.borrow_mut().push(String::from("ONE"))));
    handlers.set_attribute("onfoo", "push('TWO'").unwrap();
    let third = Rc::clone(&calls);
    element.add_event_listener("foo", Rc::new(move |_: &Event| third.borrow_mut().push(String::from("THREE"))));

    assert_eq!(handlers.get("onfoo").unwrap(), JSValue::Null);
    assert_eq!(reporter.errors.borrow().len(), 1);

    handlers.set_attribute("onfoo", "push('TWO')").unwrap();
    assert_eq!(element.listener_count("foo"), 3);
    element.dispatch_event(&Event::new("foo", false));
    assert_eq!(*calls.borrow(), ["ONE", "TWO", "THREE"]);
    assert_eq!(reporter.errors.borrow().len(), 1);
}

#[test]
fn handler_exceptions_are_reported_and_dispatch_continues() {
    init();
    let element = MemoryElement::new("button");
    let reporter = Rc::new(RecordingReporter::default());
    let environment = HandlerEnvironment::builder()
        .reporter(Rc::clone(&reporter) as Rc<dyn ErrorReporter>)
        .build();
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), Rc::new(environment));
    handlers.set_attribute("onclick", "throw 'boom'").unwrap();

    let after = Rc::new(Cell::new(false));
    let flag = Rc::clone(&after);
    element.add_event_listener("click", Rc::new(move |_: &Event| flag.set(true)));
    element.dispatch_event(&Event::new("click", true));

    assert!(after.get());
    let errors = reporter.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("boom"), "{}", errors[0]);
}

#[test]
fn handler_map_routes_properties_and_attributes() {
    init();
    let element = MemoryElement::new("div");
    let target: Rc<dyn HostElement> = Rc::new(element.clone());
    let handlers = EventHandlerMap::new(target, Rc::new(HandlerEnvironment::builder().build()));

    assert!(handlers.get("click").unwrap_err().is_type_error());
    assert!(handlers.get("on").unwrap_err().is_type_error());
    assert!(!handlers.attribute_changed("title", Some("x")));

    assert_eq!(handlers.get("onclick").unwrap(), JSValue::Null);
    handlers.set_attribute("ONCHANGE", "return 1").unwrap();
    assert_eq!(element.get_attribute("onchange").as_deref(), Some("return 1"));
    assert!(handlers.get("onchange").unwrap().is_callable());
    assert_eq!(handlers.properties(), ["onclick", "onchange"]);

    handlers.remove_attribute("onchange");
    assert!(!element.has_attribute("onchange"));
    assert_eq!(handlers.get("onchange").unwrap(), JSValue::Null);
    assert_eq!(element.listener_count("change"), 0);
}
