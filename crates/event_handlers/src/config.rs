//! Configuration for inline event handlers.
//!
//! [`EventHandlerConfig`] carries the settings that can come from the
//! environment; [`HandlerEnvironment`] is the assembled set of collaborators
//! (compiler, CSP gate, error reporter, global object) shared by every
//! handler of a document.

use std::env;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use js::ObjectRef;
use log::debug;

use crate::compiler::{AttributeCompiler, ScriptCompiler};
use crate::csp::{ContentSecurityPolicy, CspDisposition, CspGate, CspPolicy};
use crate::reporter::{ErrorReporter, GlobalReporter};
use crate::script::HandlerScriptCompiler;

/// Settings for inline event handler compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventHandlerConfig {
    /// Serialized Content-Security-Policy applied to inline handlers.
    pub csp: Option<String>,
    /// Whether `csp` only reports violations.
    pub csp_report_only: bool,
    /// Whether each successful lazy compilation is logged at info level.
    pub log_compiles: bool,
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}

impl EventHandlerConfig {
    /// Construct a configuration with explicit values.
    #[inline]
    #[must_use]
    pub const fn new(csp: Option<String>, csp_report_only: bool, log_compiles: bool) -> Self {
        Self {
            csp,
            csp_report_only,
            log_compiles,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `VALOR_CSP`: policy header value (default: no policy)
    /// - `VALOR_CSP_REPORT_ONLY`: "1" or "true" for a report-only policy
    /// - `VALOR_LOG_HANDLER_COMPILES`: "1" or "true" to log compilations
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// [`EventHandlerConfig::from_env`] over an arbitrary variable source.
    #[must_use]
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let csp = lookup("VALOR_CSP").filter(|policy| !policy.trim().is_empty());
        Self::new(
            csp,
            flag(lookup("VALOR_CSP_REPORT_ONLY")),
            flag(lookup("VALOR_LOG_HANDLER_COMPILES")),
        )
    }

    /// Disposition of the configured policy.
    #[inline]
    #[must_use]
    pub const fn disposition(&self) -> CspDisposition {
        if self.csp_report_only {
            CspDisposition::Report
        } else {
            CspDisposition::Enforce
        }
    }
}

/// Collaborators shared by the handlers of one document.
pub struct HandlerEnvironment {
    compiler: AttributeCompiler,
    gate: CspGate,
    reporter: Rc<dyn ErrorReporter>,
    global: ObjectRef,
}

impl HandlerEnvironment {
    /// Start building an environment from the defaults.
    #[inline]
    #[must_use]
    pub fn builder() -> HandlerEnvironmentBuilder {
        HandlerEnvironmentBuilder::default()
    }

    /// Build the default environment for `config`: the built-in compiler,
    /// the configured policy if any and the global error reporter.
    ///
    /// # Errors
    /// Returns an error when the configured policy cannot be parsed.
    pub fn from_config(config: &EventHandlerConfig) -> Result<Self> {
        let mut builder = Self::builder().log_compiles(config.log_compiles);
        if let Some(serialized) = &config.csp {
            let policy = ContentSecurityPolicy::parse(serialized, config.disposition())
                .with_context(|| format!("Invalid Content-Security-Policy {serialized:?}"))?;
            debug!("Inline handlers use a {} policy", config.disposition().as_str());
            builder = builder.policy(Rc::new(policy));
        }
        Ok(builder.build())
    }

    /// The two-phase attribute compiler.
    #[inline]
    #[must_use]
    pub const fn compiler(&self) -> &AttributeCompiler {
        &self.compiler
    }

    /// The CSP gate consulted on attribute changes.
    #[inline]
    #[must_use]
    pub const fn gate(&self) -> &CspGate {
        &self.gate
    }

    /// The sink for compilation failures and handler exceptions.
    #[inline]
    #[must_use]
    pub fn reporter(&self) -> Rc<dyn ErrorReporter> {
        Rc::clone(&self.reporter)
    }

    /// The global object ending every handler's scope chain.
    #[inline]
    #[must_use]
    pub const fn global(&self) -> &ObjectRef {
        &self.global
    }
}

/// Builder for [`HandlerEnvironment`].
#[derive(Default)]
pub struct HandlerEnvironmentBuilder {
    compiler: Option<Rc<dyn ScriptCompiler>>,
    policy: Option<Rc<dyn CspPolicy>>,
    reporter: Option<Rc<dyn ErrorReporter>>,
    global: Option<ObjectRef>,
    log_compiles: bool,
}

impl HandlerEnvironmentBuilder {
    /// Use `compiler` instead of [`HandlerScriptCompiler`].
    #[must_use]
    pub fn compiler(mut self, compiler: Rc<dyn ScriptCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Gate attribute changes through `policy`.
    #[must_use]
    pub fn policy(mut self, policy: Rc<dyn CspPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Report errors to `reporter` instead of the global reporter.
    #[must_use]
    pub fn reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Use `global` as the global object.
    #[must_use]
    pub fn global(mut self, global: ObjectRef) -> Self {
        self.global = Some(global);
        self
    }

    /// Log successful compilations at info level.
    #[must_use]
    pub const fn log_compiles(mut self, enabled: bool) -> Self {
        self.log_compiles = enabled;
        self
    }

    /// Assemble the environment.
    #[must_use]
    pub fn build(self) -> HandlerEnvironment {
        let engine = self
            .compiler
            .unwrap_or_else(|| Rc::new(HandlerScriptCompiler::new()));
        HandlerEnvironment {
            compiler: AttributeCompiler::new(engine, self.log_compiles),
            gate: self.policy.map_or_else(CspGate::without_policy, CspGate::with_policy),
            reporter: self.reporter.unwrap_or_else(|| Rc::new(GlobalReporter)),
            global: self.global.unwrap_or_else(ObjectRef::new_object),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;

    use super::EventHandlerConfig;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name| variables.get(name).cloned()
    }

    #[test]
    fn unset_variables_give_the_default() {
        assert_eq!(EventHandlerConfig::from_lookup(lookup(&[])), EventHandlerConfig::default());
        let names = ["VALOR_CSP", "VALOR_CSP_REPORT_ONLY", "VALOR_LOG_HANDLER_COMPILES"];
        if names.iter().all(|name| env::var_os(name).is_none()) {
            assert_eq!(EventHandlerConfig::from_env(), EventHandlerConfig::default());
        }
    }

    #[test]
    fn variables_are_read_and_normalized() {
        let config = EventHandlerConfig::from_lookup(lookup(&[
            ("VALOR_CSP", "script-src 'self'"),
            ("VALOR_CSP_REPORT_ONLY", "TRUE"),
            ("VALOR_LOG_HANDLER_COMPILES", "1"),
        ]));
        assert_eq!(config.csp.as_deref(), Some("script-src 'self'"));
        assert!(config.csp_report_only);
        assert!(config.log_compiles);
        assert_eq!(config.disposition().as_str(), "report");

        let config = EventHandlerConfig::from_lookup(lookup(&[
            ("VALOR_CSP", "   "),
            ("VALOR_CSP_REPORT_ONLY", "yes"),
            ("VALOR_LOG_HANDLER_COMPILES", "0"),
        ]));
        assert_eq!(config, EventHandlerConfig::default());
    }
}
