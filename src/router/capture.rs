//! Typed path captures extracted from a matched route.

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// How a `<converter:name>` token is matched and how its value may be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    /// Word characters, hyphen and underscore. The default when a token has
    /// no converter.
    #[default]
    Str,
    /// One to nineteen decimal digits, so every match fits in a `u64`.
    Int,
}

impl Converter {
    /// The converter name as written in a pattern token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a converter name that is neither `str` nor `int`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capture converter `{0}`")]
pub struct UnknownConverter(pub String);

impl FromStr for Converter {
    type Err = UnknownConverter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(Self::Str),
            "int" => Ok(Self::Int),
            other => Err(UnknownConverter(other.to_owned())),
        }
    }
}

/// Errors reading a capture as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("capture `{name}` uses the `{converter}` converter, not `int`")]
    WrongConverter { name: String, converter: Converter },

    #[error("capture `{name}` does not fit the requested integer type: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseIntError,
    },
}

/// The matched text of a capture, tagged with its converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "converter", content = "value", rename_all = "lowercase")]
pub enum CaptureValue {
    Str(String),
    Int(String),
}

impl CaptureValue {
    pub(crate) fn new(converter: Converter, raw: &str) -> Self {
        match converter {
            Converter::Str => Self::Str(raw.to_owned()),
            Converter::Int => Self::Int(raw.to_owned()),
        }
    }

    pub fn converter(&self) -> Converter {
        match self {
            Self::Str(_) => Converter::Str,
            Self::Int(_) => Converter::Int,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Str(raw) | Self::Int(raw) => raw,
        }
    }
}

/// One named value captured from the request path.
///
/// # Examples
///
/// ```
/// use remux::router::{Capture, CaptureError, Converter};
///
/// let id = Capture::new("blogID", Converter::Int, "1234");
/// assert_eq!(id.as_i64(), Ok(1234));
///
/// let uid = Capture::new("blogUID", Converter::Str, "1234");
/// assert_eq!(uid.as_str(), "1234");
/// assert!(matches!(uid.as_i64(), Err(CaptureError::WrongConverter { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    name: String,
    #[serde(flatten)]
    value: CaptureValue,
}

impl Capture {
    /// Builds a capture from the text matched for `name`.
    pub fn new(name: impl Into<String>, converter: Converter, raw: &str) -> Self {
        Self {
            name: name.into(),
            value: CaptureValue::new(converter, raw),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CaptureValue {
        &self.value
    }

    pub fn converter(&self) -> Converter {
        self.value.converter()
    }

    /// The captured text. Always available, whatever the converter.
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Reads an `int` capture as `u64`. Every value the `int` converter
    /// accepts fits.
    pub fn as_u64(&self) -> Result<u64, CaptureError> {
        self.parse_int()
    }

    /// Reads an `int` capture as `i64`; nineteen-digit values above
    /// `i64::MAX` fail with [`CaptureError::Parse`].
    pub fn as_i64(&self) -> Result<i64, CaptureError> {
        self.parse_int()
    }

    /// Reads an `int` capture as `i32`, failing with [`CaptureError::Parse`]
    /// when it does not fit.
    pub fn as_i32(&self) -> Result<i32, CaptureError> {
        self.parse_int()
    }

    fn parse_int<T>(&self) -> Result<T, CaptureError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        match &self.value {
            CaptureValue::Int(raw) => raw.parse().map_err(|source| CaptureError::Parse {
                name: self.name.clone(),
                source,
            }),
            CaptureValue::Str(_) => Err(CaptureError::WrongConverter {
                name: self.name.clone(),
                converter: Converter::Str,
            }),
        }
    }
}

/// All captures of one matched request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Captures {
    map: HashMap<String, Capture>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, capture: Capture) {
        self.map.insert(capture.name.clone(), capture);
    }

    pub fn get(&self, name: &str) -> Option<&Capture> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capture> {
        self.map.values()
    }
}

impl FromIterator<Capture> for Captures {
    fn from_iter<I: IntoIterator<Item = Capture>>(iter: I) -> Self {
        let mut captures = Self::new();
        for capture in iter {
            captures.insert(capture);
        }
        captures
    }
}
