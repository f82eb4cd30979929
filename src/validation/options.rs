//! Options for a validation pass

use serde::{Deserialize, Serialize};

/// Options for a validation pass; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Validate only these fields (default: all fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Upper bound on the async phase (default: configured timeout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ValidationOptions {
    /// Restrict validation to the given fields
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Fill unset keys from `defaults`; keys set here win
    pub fn merged_over(&self, defaults: &ValidationOptions) -> ValidationOptions {
        ValidationOptions {
            fields: self.fields.clone().or_else(|| defaults.fields.clone()),
            timeout_ms: self.timeout_ms.or(defaults.timeout_ms),
        }
    }
}
