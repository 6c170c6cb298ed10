//! Content Security Policy checks for inline event handlers.
//! Spec: <https://w3c.github.io/webappsec-csp/#can-compile-strings>

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::compiler::{CompileErrorKind, ScriptCompiler};

/// Whether a policy's violations block or are only reported.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CspDisposition {
    /// Violations block the action (`Content-Security-Policy`).
    #[default]
    Enforce,
    /// Violations are only reported (`Content-Security-Policy-Report-Only`).
    Report,
}

impl CspDisposition {
    /// The disposition as it appears in violation reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enforce => "enforce",
            Self::Report => "report",
        }
    }
}

/// A violation report.
///
/// Spec: <https://w3c.github.io/webappsec-csp/#violation>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CspViolation {
    /// Directive whose source list disallowed the action.
    pub effective_directive: String,
    /// `"eval"` for string compilation.
    pub blocked_url: String,
    /// Disposition of the violated policy.
    pub disposition: CspDisposition,
    /// First 40 characters of the offending source.
    pub sample: String,
}

impl CspViolation {
    /// Whether this violation stops script compilation.
    #[must_use]
    pub fn blocks_compilation(&self) -> bool {
        self.effective_directive == "script-src"
            && self.blocked_url == "eval"
            && self.disposition == CspDisposition::Enforce
    }
}

/// Reasons a policy header is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CspParseError {
    /// The header holds no directives.
    Empty,
    /// A directive name contains characters outside `[A-Za-z0-9-]`.
    InvalidDirectiveName(String),
}

impl Display for CspParseError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Empty => write!(formatter, "policy contains no directives"),
            Self::InvalidDirectiveName(name) => write!(formatter, "invalid directive name '{name}'"),
        }
    }
}

impl Error for CspParseError {}

/// A single parsed policy.
///
/// Spec: <https://w3c.github.io/webappsec-csp/#parse-serialized-policy>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: IndexMap<String, Vec<String>>,
    disposition: CspDisposition,
}

const SAMPLE_LENGTH: usize = 40;

impl ContentSecurityPolicy {
    /// Parse a serialized policy. Directive names are ASCII-lowercased and
    /// repeated directives after the first are ignored.
    ///
    /// # Errors
    /// Returns a [`CspParseError`] for an empty policy or a malformed
    /// directive name.
    pub fn parse(serialized: &str, disposition: CspDisposition) -> Result<Self, CspParseError> {
        let mut directives = IndexMap::new();
        for token in serialized.split(';') {
            let mut parts = token.split_ascii_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            if !name.chars().all(|character| character.is_ascii_alphanumeric() || character == '-') {
                return Err(CspParseError::InvalidDirectiveName(name.to_owned()));
            }
            let name = name.to_ascii_lowercase();
            if directives.contains_key(&name) {
                debug!("Ignoring duplicate CSP directive '{name}'");
                continue;
            }
            directives.insert(name, parts.map(str::to_owned).collect());
        }
        if directives.is_empty() {
            return Err(CspParseError::Empty);
        }
        Ok(Self {
            directives,
            disposition,
        })
    }

    /// The policy's disposition.
    #[inline]
    #[must_use]
    pub const fn disposition(&self) -> CspDisposition {
        self.disposition
    }

    /// The source list of a directive, if present.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&[String]> {
        self.directives.get(name).map(Vec::as_slice)
    }

    /// `script-src`, falling back to `default-src`.
    ///
    /// Spec: <https://w3c.github.io/webappsec-csp/#directive-fallback-list>
    fn effective_script_sources(&self) -> Option<&[String]> {
        self.directive("script-src").or_else(|| self.directive("default-src"))
    }

    /// The violation compiling `source` as script would cause, if any.
    #[must_use]
    pub fn eval_violation(&self, source: &str) -> Option<CspViolation> {
        let sources = self.effective_script_sources()?;
        let allowed = sources
            .iter()
            .any(|expression| expression.eq_ignore_ascii_case("'unsafe-eval'"));
        if allowed {
            return None;
        }
        Some(CspViolation {
            effective_directive: String::from("script-src"),
            blocked_url: String::from("eval"),
            disposition: self.disposition,
            sample: source.chars().take(SAMPLE_LENGTH).collect(),
        })
    }
}

/// Decides whether compiling a given handler source is blocked.
pub trait CspPolicy {
    /// Whether compiling `source` is blocked.
    fn is_blocked(&self, source: &str) -> bool;
}

impl CspPolicy for ContentSecurityPolicy {
    fn is_blocked(&self, source: &str) -> bool {
        let Some(violation) = self.eval_violation(source) else {
            return false;
        };
        warn!(
            "CSP violation ({}): {} '{}' blocked, sample {:?}",
            violation.disposition.as_str(),
            violation.effective_directive,
            violation.blocked_url,
            violation.sample
        );
        violation.blocks_compilation()
    }
}

impl<F: Fn(&str) -> bool> CspPolicy for F {
    #[inline]
    fn is_blocked(&self, source: &str) -> bool {
        self(source)
    }
}

/// Message fragments engines use when refusing to compile because of CSP.
const CSP_MESSAGE_MARKERS: [&str; 4] = [
    "Content Security Policy",
    "unsafe-eval",
    "EvalError",
    "Refused to evaluate",
];

/// Gate consulted before an attribute's source is stored for compilation.
#[derive(Clone, Default)]
pub struct CspGate {
    policy: Option<Rc<dyn CspPolicy>>,
}

impl CspGate {
    /// A gate backed by an explicit policy.
    #[must_use]
    pub fn with_policy(policy: Rc<dyn CspPolicy>) -> Self {
        Self { policy: Some(policy) }
    }

    /// A gate with no policy: blocking is detected from the engine's own
    /// refusal to compile.
    #[must_use]
    pub fn without_policy() -> Self {
        Self { policy: None }
    }

    /// Whether compiling `source` for the `event_type` handler is blocked.
    ///
    /// Without a policy the source is speculatively parsed and the engine's
    /// error is inspected. Syntax errors never block. Message markers are
    /// only consulted for errors the engine left unclassified.
    pub fn is_blocked(&self, engine: &dyn ScriptCompiler, source: &str, event_type: &str) -> bool {
        let blocked = match &self.policy {
            Some(policy) => policy.is_blocked(source),
            None => engine.check_syntax(source).err().is_some_and(|error| match error.kind {
                CompileErrorKind::Blocked => true,
                CompileErrorKind::Syntax => false,
                CompileErrorKind::Engine => CSP_MESSAGE_MARKERS
                    .iter()
                    .any(|marker| error.message.contains(marker)),
            }),
        };
        if blocked {
            debug!("CSP blocked the on{event_type} content attribute");
        }
        blocked
    }
}
