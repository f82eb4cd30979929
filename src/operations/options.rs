//! Operation options
//!
//! Every key is optional. Unset keys fall back to the manager's
//! configuration or to the documented default.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::query::WhereQuery;
use crate::validation::ValidationOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Records to update (default: the record with the model's primary key)
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereQuery>,

    /// Fields to validate and write (default: all fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationOptions>,
}

impl UpdateOptions {
    pub fn with_where(mut self, where_clause: WhereQuery) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Records to return (default: all records)
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereQuery>,

    /// Sort keys: `"field"` or `"field desc"`, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,

    /// Page size (default: configured read limit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default)]
    pub offset: usize,
}

impl ReadOptions {
    pub fn with_where(mut self, where_clause: WhereQuery) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn order_by(mut self, key: impl Into<String>) -> Self {
        self.order_by.push(key.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Parsed sort keys as `(field, descending)`
    pub fn sort_keys(&self) -> ModelResult<Vec<(&str, bool)>> {
        self.order_by
            .iter()
            .map(|key| {
                let mut parts = key.split_whitespace();
                let field = parts
                    .next()
                    .ok_or_else(|| ModelError::InvalidOptions("empty order_by entry".into()))?;
                let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                    None | Some("asc") => false,
                    Some("desc") => true,
                    Some(other) => {
                        return Err(ModelError::InvalidOptions(format!(
                            "bad sort direction '{}' in '{}'",
                            other, key
                        )))
                    }
                };
                if parts.next().is_some() {
                    return Err(ModelError::InvalidOptions(format!("bad order_by entry '{}'", key)));
                }
                Ok((field, descending))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveOptions {
    /// Records to remove (default: the record with the model's primary key)
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereQuery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationOptions>,
}

impl RemoveOptions {
    pub fn with_where(mut self, where_clause: WhereQuery) -> Self {
        self.where_clause = Some(where_clause);
        self
    }
}
