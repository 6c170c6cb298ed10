//! HTML §2.3.3 Keywords and enumerated attributes
//! Spec: <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#keywords-and-enumerated-attributes>

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::collections::HashMap;
use std::error::Error;

/// Configuration of an enumerated attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumeratedAttributeOptions {
    /// Canonical keywords; distinct under ASCII case-insensitive comparison.
    pub keywords: Vec<String>,
    /// `(alias, canonical keyword)` pairs. Aliases match ASCII case-insensitively.
    pub aliases: Vec<(String, String)>,
    /// Value for an absent attribute (the missing value default).
    pub missing: Option<String>,
    /// Value for an attribute matching no keyword (the invalid value default).
    pub invalid: Option<String>,
}

impl EnumeratedAttributeOptions {
    /// Options with the given keywords and no defaults.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add an alias mapping to a canonical keyword.
    #[must_use]
    pub fn alias(mut self, alias: &str, keyword: &str) -> Self {
        self.aliases.push((alias.to_owned(), keyword.to_owned()));
        self
    }

    /// Set the missing value default.
    #[must_use]
    pub fn missing(mut self, keyword: &str) -> Self {
        self.missing = Some(keyword.to_owned());
        self
    }

    /// Set the invalid value default.
    #[must_use]
    pub fn invalid(mut self, keyword: &str) -> Self {
        self.invalid = Some(keyword.to_owned());
        self
    }
}

/// Reasons an enumerated attribute configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumeratedOptionsError {
    /// Two keywords are equal ignoring ASCII case.
    DuplicateKeyword(String),
    /// An alias equals a keyword ignoring ASCII case.
    AliasCollidesWithKeyword(String),
    /// An alias maps to something that is not a keyword.
    AliasTargetUnknown {
        /// The alias.
        alias: String,
        /// The unknown target.
        target: String,
    },
    /// The missing value default is not a keyword.
    MissingDefaultUnknown(String),
    /// The invalid value default is not a keyword.
    InvalidDefaultUnknown(String),
}

impl Display for EnumeratedOptionsError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::DuplicateKeyword(keyword) => write!(formatter, "keyword '{keyword}' is listed twice"),
            Self::AliasCollidesWithKeyword(alias) => {
                write!(formatter, "alias '{alias}' collides with a keyword")
            }
            Self::AliasTargetUnknown { alias, target } => {
                write!(formatter, "alias '{alias}' maps to unknown keyword '{target}'")
            }
            Self::MissingDefaultUnknown(keyword) => {
                write!(formatter, "missing value default '{keyword}' is not a keyword")
            }
            Self::InvalidDefaultUnknown(keyword) => {
                write!(formatter, "invalid value default '{keyword}' is not a keyword")
            }
        }
    }
}

impl Error for EnumeratedOptionsError {}

/// A validated enumerated attribute: maps raw attribute values to canonical keywords.
#[derive(Clone, Debug)]
pub struct Enumerated {
    keywords: Vec<String>,
    /// ASCII-lowercased keyword or alias -> index into `keywords`.
    table: HashMap<String, usize>,
    missing: Option<usize>,
    invalid: Option<usize>,
}

impl Enumerated {
    /// Validate `options` and build the lookup table.
    ///
    /// # Errors
    /// Returns an [`EnumeratedOptionsError`] when keywords repeat, an alias
    /// collides with a keyword or targets an unknown one, or a default is not
    /// itself a keyword.
    pub fn new(options: EnumeratedAttributeOptions) -> Result<Self, EnumeratedOptionsError> {
        let mut table = HashMap::new();
        for (index, keyword) in options.keywords.iter().enumerate() {
            if table.insert(keyword.to_ascii_lowercase(), index).is_some() {
                return Err(EnumeratedOptionsError::DuplicateKeyword(keyword.clone()));
            }
        }
        let keyword_index = |keyword: &str| options.keywords.iter().position(|candidate| candidate == keyword);

        let mut alias_entries = Vec::with_capacity(options.aliases.len());
        for (alias, target) in &options.aliases {
            let folded = alias.to_ascii_lowercase();
            if table.contains_key(&folded) {
                return Err(EnumeratedOptionsError::AliasCollidesWithKeyword(alias.clone()));
            }
            let Some(index) = keyword_index(target) else {
                return Err(EnumeratedOptionsError::AliasTargetUnknown {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            };
            alias_entries.push((folded, index));
        }
        table.extend(alias_entries);

        let missing = match &options.missing {
            Some(keyword) => Some(
                keyword_index(keyword)
                    .ok_or_else(|| EnumeratedOptionsError::MissingDefaultUnknown(keyword.clone()))?,
            ),
            None => None,
        };
        let invalid = match &options.invalid {
            Some(keyword) => Some(
                keyword_index(keyword)
                    .ok_or_else(|| EnumeratedOptionsError::InvalidDefaultUnknown(keyword.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            keywords: options.keywords,
            table,
            missing,
            invalid,
        })
    }

    /// Map an attribute value to its canonical keyword.
    ///
    /// `None` yields the missing value default, an unmatched string yields
    /// the invalid value default. Only ASCII letters are case-folded.
    #[must_use]
    pub fn lookup(&self, value: Option<&str>) -> Option<&str> {
        let index = match value {
            None => self.missing,
            Some(text) => self.table.get(&text.to_ascii_lowercase()).copied().or(self.invalid),
        };
        index.and_then(|position| self.keywords.get(position)).map(String::as_str)
    }

    /// The canonical keywords, in configuration order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
