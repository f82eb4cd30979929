//! Field kinds and validation options
//!
//! Supported kinds:
//! - text, email, url, password: strings
//! - number, integer: numeric values
//! - auto_number: assigned by the backend, never validated
//! - boolean
//! - selection, multi_selection: keys from a fixed option list
//! - date, time, date_time: ISO 8601 strings

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// Field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Password,
    Number,
    Integer,
    AutoNumber,
    Boolean,
    Selection,
    MultiSelection,
    Date,
    Time,
    DateTime,
}

impl FieldKind {
    /// All kinds, in declaration order
    pub const ALL: [FieldKind; 13] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Url,
        FieldKind::Password,
        FieldKind::Number,
        FieldKind::Integer,
        FieldKind::AutoNumber,
        FieldKind::Boolean,
        FieldKind::Selection,
        FieldKind::MultiSelection,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::DateTime,
    ];

    /// Returns the kind name used in definition files
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::AutoNumber => "auto_number",
            FieldKind::Boolean => "boolean",
            FieldKind::Selection => "selection",
            FieldKind::MultiSelection => "multi_selection",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "date_time",
        }
    }

    /// Whether values of this kind are strings
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Email | FieldKind::Url | FieldKind::Password
        )
    }

    /// Whether this kind needs a selection list
    pub fn needs_selection(&self) -> bool {
        matches!(self, FieldKind::Selection | FieldKind::MultiSelection)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled regular expression that serializes as its source text
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern
    pub fn new(source: &str) -> ModelResult<Self> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| ModelError::InvalidField {
                field: "regex".into(),
                reason: format!("invalid pattern '{}': {}", source, e),
            })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Validation options for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Whether a value must be set (default: true)
    #[serde(default = "default_required")]
    pub required: bool,

    /// Whether a required string field accepts "" (default: false)
    #[serde(default)]
    pub allow_empty: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,

    /// Option list as `[key, label]` pairs for selection fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<(String, String)>>,
}

fn default_required() -> bool {
    true
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: default_required(),
            allow_empty: false,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            regex: None,
            selection: None,
        }
    }
}

impl FieldOptions {
    /// Keys of the selection list, in order
    pub fn selection_keys(&self) -> Vec<String> {
        self.selection
            .as_ref()
            .map(|s| s.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }
}
