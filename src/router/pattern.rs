//! Route pattern compilation.
//!
//! A route pattern is a regular expression that may also contain capture
//! tokens in angle brackets:
//!
//! | Token          | Converter | Substituted group                   |
//! |----------------|-----------|-------------------------------------|
//! | `<name>`       | `str`     | `(?P<name>[A-Za-z0-9_\-]+)`         |
//! | `<str:name>`   | `str`     | `(?P<name>[A-Za-z0-9_\-]+)`         |
//! | `<int:name>`   | `int`     | `(?P<name>[0-9]{1,19})`             |
//!
//! Angle brackets are reserved for tokens: any `<` or `>` left outside a
//! complete token is rejected rather than passed to the regex engine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::capture::{Converter, UnknownConverter};

// The converter part is deliberately broader than the known kinds so that
// `<float:x>` reports an unknown converter instead of a stray bracket.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:([0-9A-Za-z_]+):)?([0-9A-Za-z_]+)>").expect("token grammar is a valid regex")
});

/// Sub-pattern for `str` captures: ASCII word characters and hyphen.
const STR_GROUP: &str = r"[A-Za-z0-9_\-]+";

/// Sub-pattern for `int` captures: at most 19 digits, the widest run that
/// always fits a `u64`.
const INT_GROUP: &str = r"[0-9]{1,19}";

/// Why a route pattern could not be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("capture `{name}` specified twice in pattern `{pattern}`")]
    DuplicateCapture { pattern: String, name: String },

    #[error("invalid capture converter in pattern `{pattern}`: {source}")]
    UnknownConverter {
        pattern: String,
        #[source]
        source: UnknownConverter,
    },

    #[error("unbalanced capture angle brackets in pattern `{pattern}`")]
    UnbalancedBrackets { pattern: String },

    #[error("pattern `{pattern}` is not a valid regular expression: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled route pattern.
///
/// Immutable once built; keeps the raw pattern for diagnostics and duplicate
/// detection next to the regex it expanded to.
///
/// # Examples
///
/// ```
/// use remux::router::{Converter, Pattern};
///
/// let pattern = Pattern::compile("^/blog/<blogUID>/images/<int:imageID>").unwrap();
/// assert_eq!(pattern.raw(), "^/blog/<blogUID>/images/<int:imageID>");
/// assert_eq!(pattern.converter("imageID"), Some(Converter::Int));
/// assert!(pattern.is_match("/blog/GjqzmwZ/images/2334"));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    compiled: Regex,
    descriptors: HashMap<String, Converter>,
}

impl Pattern {
    /// Expand capture tokens in `raw` and compile the result.
    ///
    /// # Errors
    ///
    /// - [`PatternError::DuplicateCapture`]: a capture name is used twice.
    /// - [`PatternError::UnknownConverter`]: a token names a converter other
    ///   than `str` or `int`.
    /// - [`PatternError::UnbalancedBrackets`]: a `<` or `>` is not part of a
    ///   complete token.
    /// - [`PatternError::InvalidRegex`]: the expanded pattern is rejected by
    ///   the regex engine.
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        let mut expanded = String::with_capacity(raw.len() + 32);
        let mut descriptors = HashMap::new();
        let mut literal_start = 0;

        for token in TOKEN.captures_iter(raw) {
            // Group 0 always participates in a match.
            let Some(whole) = token.get(0) else { continue };
            let name = &token[2];

            check_literal(raw, &raw[literal_start..whole.start()])?;
            expanded.push_str(&raw[literal_start..whole.start()]);
            literal_start = whole.end();

            if descriptors.contains_key(name) {
                return Err(PatternError::DuplicateCapture {
                    pattern: raw.to_owned(),
                    name: name.to_owned(),
                });
            }

            let converter = match token.get(1) {
                Some(kind) => kind.as_str().parse::<Converter>().map_err(|source| {
                    PatternError::UnknownConverter {
                        pattern: raw.to_owned(),
                        source,
                    }
                })?,
                None => Converter::default(),
            };

            let group = match converter {
                Converter::Str => STR_GROUP,
                Converter::Int => INT_GROUP,
            };
            expanded.push_str(&format!("(?P<{name}>{group})"));
            descriptors.insert(name.to_owned(), converter);
        }

        check_literal(raw, &raw[literal_start..])?;
        expanded.push_str(&raw[literal_start..]);

        let compiled = Regex::new(&expanded).map_err(|source| PatternError::InvalidRegex {
            pattern: raw.to_owned(),
            source,
        })?;

        Ok(Self {
            raw: raw.to_owned(),
            compiled,
            descriptors,
        })
    }

    /// The pattern as registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The regular expression the pattern expanded to.
    pub fn regex(&self) -> &str {
        self.compiled.as_str()
    }

    pub fn converter(&self, name: &str) -> Option<Converter> {
        self.descriptors.get(name).copied()
    }

    /// Capture names and their converters.
    pub fn descriptors(&self) -> &HashMap<String, Converter> {
        &self.descriptors
    }

    /// Whether the pattern matches anywhere in `path`.
    pub fn is_match(&self, path: &str) -> bool {
        self.compiled.is_match(path)
    }

    pub(crate) fn compiled(&self) -> &Regex {
        &self.compiled
    }
}

fn check_literal(raw: &str, literal: &str) -> Result<(), PatternError> {
    if literal.contains(['<', '>']) {
        return Err(PatternError::UnbalancedBrackets {
            pattern: raw.to_owned(),
        });
    }
    Ok(())
}
