//! Tests for the built-in handler compiler and handler configuration.

use std::cell::RefCell;
use std::rc::Rc;

use dom_host::{AttributeHost as _, Event, EventTarget as _, HostElement as _, MemoryDocument, MemoryElement};
use event_handlers::{
    AttributeCompiler, CompileErrorKind, ErrorReporter, EventHandlerConfig, EventHandlerMap, EventHandlerState,
    HandlerEnvironment, HandlerScope, HandlerScriptCompiler, HandlerValue, ScriptCompiler,
};
use js::{JSError, JSValue, ObjectRef, Symbol};

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

fn call(function: &ObjectRef, this: &JSValue) -> JSValue {
    function.call(this, &[JSValue::Undefined]).unwrap()
}

#[test]
fn syntax_errors_surface_before_scoping() {
    init();
    let compiler = HandlerScriptCompiler::new();
    for body in ["return (", "a b", "x = = 1", "if (x) {", "a == b", "return 'unterminated"] {
        let error = compiler.check_syntax(body).unwrap_err();
        assert_eq!(error.kind, CompileErrorKind::Syntax, "{body}");
    }
    for body in ["", "return false", "a.b(c, 'd'); e = !f\ng()", "if (x === 1) { y() } else z()"] {
        compiler.check_syntax(body).unwrap();
    }
}

#[test]
fn identifiers_resolve_element_then_form_then_document_then_global() {
    init();
    let document = MemoryDocument::new();
    let form = document.create_element("form");
    let input = document.create_element("input");
    input.set_form_owner(Some(&form));

    let global = ObjectRef::new_object();
    for (object, value) in [
        (global.clone(), "global"),
        (document.js_object(), "document"),
        (form.js_object(), "form"),
    ] {
        assert!(object.set("where", JSValue::string(value)));
    }
    assert!(global.set("onlyGlobal", JSValue::string("g")));

    let compiler = AttributeCompiler::new(Rc::new(HandlerScriptCompiler::new()), false);
    let function = compiler
        .compile("return where + ':' + localName + ':' + onlyGlobal", "input", &input, &global)
        .unwrap();
    assert_eq!(function.name(), "oninput");
    assert_eq!(call(&function, &JSValue::Undefined), JSValue::string("form:input:g"));

    input.set_form_owner(None);
    let function = compiler.compile("return where", "input", &input, &global).unwrap();
    assert_eq!(call(&function, &JSValue::Undefined), JSValue::string("document"));
}

#[test]
fn unscopable_properties_do_not_shadow_outer_scopes() {
    init();
    let element = MemoryElement::new("div");
    let global = ObjectRef::new_object();
    assert!(global.set("localName", JSValue::string("outer")));
    let unscopables = ObjectRef::new_object();
    assert!(unscopables.set("localName", JSValue::Boolean(true)));
    assert!(element.js_object().set(Symbol::unscopables(), JSValue::Object(unscopables)));

    let scope = HandlerScope::for_element(&element, &global);
    let function = HandlerScriptCompiler::new()
        .compile("return localName", "onclick", &scope)
        .unwrap();
    assert_eq!(call(&function, &JSValue::Undefined), JSValue::string("outer"));
}

#[test]
fn assignments_write_through_the_scope_chain() {
    init();
    let element = MemoryElement::new("button");
    let global = ObjectRef::new_object();
    let scope = HandlerScope::for_element(&element, &global);
    let function = HandlerScriptCompiler::new()
        .compile("this.seen = localName; created = typeof missing; event = 2; return event", "onclick", &scope)
        .unwrap();

    let this = JSValue::Object(element.js_object());
    assert_eq!(call(&function, &this), JSValue::Number(2.0));
    assert_eq!(element.js_object().get("seen"), JSValue::string("button"));
    assert_eq!(global.get("created"), JSValue::string("undefined"));
}

#[test]
fn runtime_errors_are_thrown_from_the_function() {
    init();
    let element = MemoryElement::new("div");
    let scope = HandlerScope::for_element(&element, &ObjectRef::new_object());
    let compiler = HandlerScriptCompiler::new();

    let unresolved = compiler.compile("missing()", "onclick", &scope).unwrap();
    let error = unresolved.call(&JSValue::Undefined, &[]).unwrap_err();
    assert_eq!(error.to_string(), "ReferenceError: missing is not defined");

    let not_callable = compiler.compile("localName()", "onclick", &scope).unwrap();
    assert!(not_callable.call(&JSValue::Undefined, &[]).unwrap_err().is_type_error());

    let nullish = compiler.compile("return event.type", "onclick", &scope).unwrap();
    assert!(nullish.call(&JSValue::Undefined, &[JSValue::Null]).unwrap_err().is_type_error());
}

#[test]
fn handlers_receive_the_event_and_current_target() {
    init();
    let element = MemoryElement::new("button");
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), Rc::new(HandlerEnvironment::builder().build()));
    handlers
        .set_attribute(
            "onclick",
            "if (event.type === 'click' && this === event.currentTarget) event.preventDefault()",
        )
        .unwrap();

    let event = Event::new("click", true);
    assert!(!element.dispatch_event(&event));
    assert!(event.default_prevented());
}

#[test]
fn configured_policies_gate_attributes() {
    init();
    let element = MemoryElement::new("div");
    let enforce = EventHandlerConfig::new(Some(String::from("script-src 'self'")), false, true);
    let environment = HandlerEnvironment::from_config(&enforce).unwrap();
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), Rc::new(environment));
    handlers.set_attribute("onclick", "return false").unwrap();
    assert!(element.has_attribute("onclick"));
    assert_eq!(handlers.state("onclick").unwrap().value(), HandlerValue::Null);
    assert_eq!(element.listener_count("click"), 0);

    let report_only = EventHandlerConfig::new(Some(String::from("script-src 'self'")), true, false);
    let environment = HandlerEnvironment::from_config(&report_only).unwrap();
    let handlers = EventHandlerMap::new(Rc::new(element.clone()), Rc::new(environment));
    handlers.set_attribute("onclick", "return false").unwrap();
    assert!(handlers.get("onclick").unwrap().is_callable());

    let allowed = EventHandlerConfig::new(Some(String::from("default-src 'unsafe-eval'")), false, false);
    let environment = HandlerEnvironment::from_config(&allowed).unwrap();
    let handlers = EventHandlerMap::new(Rc::new(element), Rc::new(environment));
    handlers.set_attribute("onclick", "return false").unwrap();
    assert!(handlers.get("onclick").unwrap().is_callable());
}

#[test]
fn invalid_policies_fail_configuration() {
    init();
    let config = EventHandlerConfig::new(Some(String::from("script_src 'self'")), false, false);
    let Err(error) = HandlerEnvironment::from_config(&config) else {
        panic!("policy should be rejected");
    };
    assert!(error.to_string().contains("Invalid Content-Security-Policy"));
    assert_eq!(EventHandlerConfig::default().disposition().as_str(), "enforce");
}

#[test]
fn deeply_nested_sources_are_syntax_errors() {
    init();
    let compiler = HandlerScriptCompiler::new();
    let balanced = format!("return {}1{}", "(".repeat(10_000), ")".repeat(10_000));
    for body in ["(".repeat(100_000), balanced, "!".repeat(100_000) + "x", "{".repeat(100_000)] {
        let error = compiler.check_syntax(&body).unwrap_err();
        assert_eq!(error.kind, CompileErrorKind::Syntax);
    }
    let moderate = format!("return {}1{}", "(".repeat(20), ")".repeat(20));
    compiler.check_syntax(&moderate).unwrap();

    let reporter = Rc::new(RecordingReporter::default());
    let environment = HandlerEnvironment::builder()
        .reporter(Rc::clone(&reporter) as Rc<dyn ErrorReporter>)
        .build();
    let state = EventHandlerState::new(Rc::new(MemoryElement::new("div")), "click", Rc::new(environment));
    state.from_attribute(Some(&"(".repeat(100_000)));
    assert!(state.get().is_none());
    assert!(state.get().is_none());
    let errors = reporter.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors.first().is_some_and(|error| error.starts_with("SyntaxError")));
}
