//! Operation descriptors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;
use crate::query::WhereQuery;

/// The four model operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Read,
    Remove,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Read,
        OperationKind::Remove,
    ];

    /// Get operation name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Read => "read",
            Self::Remove => "remove",
        }
    }

    /// Whether the operation writes and therefore validates first
    pub fn validates(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ModelError::InvalidOptions(format!("unknown operation '{}'", s)))
    }
}

/// One invocation of an operation
///
/// Created per call and never persisted. The id correlates log lines of a
/// single call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOperation {
    #[serde(rename = "operation")]
    pub kind: OperationKind,

    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereQuery>,

    pub id: Uuid,
}

impl ModelOperation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            where_clause: None,
            id: Uuid::new_v4(),
        }
    }

    pub fn with_where(mut self, where_clause: WhereQuery) -> Self {
        self.where_clause = Some(where_clause);
        self
    }
}
