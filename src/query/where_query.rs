//! Where clauses
//!
//! A where clause selects records for `update`, `read` and `remove`. It is
//! written as a JSON object:
//!
//! ```json
//! { "status": "open", "priority": { "_gte": 3 }, "_or": [ {"owner": "amy"}, {"owner": "bo"} ] }
//! ```
//!
//! Keys of one object are combined with AND. A literal value means equality.
//! An empty object matches every record.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};
use crate::models::Model;
use crate::validation::js_compare;

const AND: &str = "_and";
const OR: &str = "_or";

/// A `_like` pattern; `%` matches any sequence, case-insensitive
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    pub fn new(source: &str) -> ModelResult<Self> {
        let body = source
            .split('%')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?is)^{}$", body))
            .map_err(|e| ModelError::InvalidQuery(format!("bad _like pattern '{}': {}", source, e)))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Condition on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Like(LikePattern),
    In(Vec<Value>),
    Nin(Vec<Value>),
}

impl Condition {
    /// Operator key as written in JSON
    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "_eq",
            Condition::Ne(_) => "_ne",
            Condition::Gt(_) => "_gt",
            Condition::Gte(_) => "_gte",
            Condition::Lt(_) => "_lt",
            Condition::Lte(_) => "_lte",
            Condition::Like(_) => "_like",
            Condition::In(_) => "_in",
            Condition::Nin(_) => "_nin",
        }
    }

    fn parse(field: &str, operator: &str, value: &Value) -> ModelResult<Self> {
        let list = |value: &Value| {
            value.as_array().cloned().ok_or_else(|| {
                ModelError::InvalidQuery(format!("{} on '{}' expects an array", operator, field))
            })
        };

        Ok(match operator {
            "_eq" => Condition::Eq(value.clone()),
            "_ne" => Condition::Ne(value.clone()),
            "_gt" => Condition::Gt(value.clone()),
            "_gte" => Condition::Gte(value.clone()),
            "_lt" => Condition::Lt(value.clone()),
            "_lte" => Condition::Lte(value.clone()),
            "_like" => {
                let pattern = value.as_str().ok_or_else(|| {
                    ModelError::InvalidQuery(format!("_like on '{}' expects a string", field))
                })?;
                Condition::Like(LikePattern::new(pattern)?)
            }
            "_in" => Condition::In(list(value)?),
            "_nin" => Condition::Nin(list(value)?),
            other => {
                return Err(ModelError::InvalidQuery(format!(
                    "unknown operator '{}' on '{}'",
                    other, field
                )))
            }
        })
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Condition::Eq(v) => loose_eq(value, v),
            Condition::Ne(v) => !loose_eq(value, v),
            Condition::Gt(v) => compare(value, v) == Some(Ordering::Greater),
            Condition::Gte(v) => matches!(compare(value, v), Some(Ordering::Greater | Ordering::Equal)),
            Condition::Lt(v) => compare(value, v) == Some(Ordering::Less),
            Condition::Lte(v) => matches!(compare(value, v), Some(Ordering::Less | Ordering::Equal)),
            Condition::Like(p) => value.as_str().is_some_and(|s| p.is_match(s)),
            Condition::In(list) => list.iter().any(|v| loose_eq(value, v)),
            Condition::Nin(list) => !list.iter().any(|v| loose_eq(value, v)),
        }
    }

    fn to_value(&self) -> Value {
        let operand = match self {
            Condition::Eq(v)
            | Condition::Ne(v)
            | Condition::Gt(v)
            | Condition::Gte(v)
            | Condition::Lt(v)
            | Condition::Lte(v) => v.clone(),
            Condition::Like(p) => Value::String(p.as_str().to_string()),
            Condition::In(list) | Condition::Nin(list) => Value::Array(list.clone()),
        };
        let mut op = Map::new();
        op.insert(self.operator().to_string(), operand);
        Value::Object(op)
    }
}

/// A record filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum WhereQuery {
    /// Every sub-query matches; empty matches everything
    And(Vec<WhereQuery>),
    /// At least one sub-query matches
    Or(Vec<WhereQuery>),
    /// One field satisfies a condition
    Field { field: String, condition: Condition },
}

impl Default for WhereQuery {
    fn default() -> Self {
        Self::all()
    }
}

impl WhereQuery {
    /// Matches every record
    pub fn all() -> Self {
        WhereQuery::And(Vec::new())
    }

    /// Equality on one field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        WhereQuery::Field {
            field: field.into(),
            condition: Condition::Eq(value.into()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, WhereQuery::And(queries) if queries.is_empty())
    }

    /// Parse a where clause from its JSON form
    pub fn parse(value: &Value) -> ModelResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ModelError::InvalidQuery(format!("expected an object, got {}", value)))?;

        let mut parts = Vec::new();
        for (key, value) in obj {
            match key.as_str() {
                AND | OR => {
                    let items = value.as_array().ok_or_else(|| {
                        ModelError::InvalidQuery(format!("{} expects an array of queries", key))
                    })?;
                    let queries = items
                        .iter()
                        .map(WhereQuery::parse)
                        .collect::<ModelResult<Vec<_>>>()?;
                    parts.push(if key == AND {
                        WhereQuery::And(queries)
                    } else {
                        WhereQuery::Or(queries)
                    });
                }
                field if field.starts_with('_') => {
                    return Err(ModelError::InvalidQuery(format!(
                        "unknown operator '{}' at field position",
                        field
                    )));
                }
                field => match value {
                    Value::Object(ops) => {
                        if ops.is_empty() {
                            return Err(ModelError::InvalidQuery(format!(
                                "empty condition on '{}'",
                                field
                            )));
                        }
                        for (op, operand) in ops {
                            parts.push(WhereQuery::Field {
                                field: field.to_string(),
                                condition: Condition::parse(field, op, operand)?,
                            });
                        }
                    }
                    literal => parts.push(WhereQuery::eq(field, literal.clone())),
                },
            }
        }

        Ok(match parts.len() {
            1 => parts.remove(0),
            _ => WhereQuery::And(parts),
        })
    }

    /// Whether a record satisfies the clause. Absent fields compare as `null`.
    pub fn matches(&self, model: &Model) -> bool {
        match self {
            WhereQuery::And(queries) => queries.iter().all(|q| q.matches(model)),
            WhereQuery::Or(queries) => queries.iter().any(|q| q.matches(model)),
            WhereQuery::Field { field, condition } => {
                condition.matches(model.get(field).unwrap_or(&Value::Null))
            }
        }
    }

    /// Every field name referenced, sorted
    pub fn field_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            WhereQuery::And(queries) | WhereQuery::Or(queries) => {
                for q in queries {
                    q.collect_fields(names);
                }
            }
            WhereQuery::Field { field, .. } => {
                names.insert(field.as_str());
            }
        }
    }

    /// JSON form; parses back to an equivalent clause
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        match self {
            WhereQuery::And(queries) if queries.is_empty() => {}
            WhereQuery::And(queries) => {
                obj.insert(AND.into(), queries.iter().map(WhereQuery::to_value).collect());
            }
            WhereQuery::Or(queries) => {
                obj.insert(OR.into(), queries.iter().map(WhereQuery::to_value).collect());
            }
            WhereQuery::Field { field, condition } => {
                obj.insert(field.clone(), condition.to_value());
            }
        }
        Value::Object(obj)
    }
}

impl TryFrom<Value> for WhereQuery {
    type Error = ModelError;

    fn try_from(value: Value) -> ModelResult<Self> {
        WhereQuery::parse(&value)
    }
}

impl From<WhereQuery> for Value {
    fn from(query: WhereQuery) -> Self {
        query.to_value()
    }
}

/// Equality where numbers compare by value (`1 == 1.0`)
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering for range operators; null never compares
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_null() || b.is_null() {
        return None;
    }
    js_compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(values: Value) -> Model {
        match values {
            Value::Object(map) => Model::from_values("Task", map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_matches_all() {
        let q = WhereQuery::parse(&json!({})).unwrap();
        assert!(q.is_all());
        assert!(q.matches(&record(json!({"a": 1}))));
    }

    #[test]
    fn test_literal_is_equality() {
        let q = WhereQuery::parse(&json!({"status": "open"})).unwrap();
        assert!(q.matches(&record(json!({"status": "open"}))));
        assert!(!q.matches(&record(json!({"status": "closed"}))));
        assert!(!q.matches(&record(json!({}))));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let q = WhereQuery::eq("id", json!(1));
        assert!(q.matches(&record(json!({"id": 1.0}))));
    }

    #[test]
    fn test_range_operators() {
        let q = WhereQuery::parse(&json!({"priority": {"_gte": 2, "_lt": 5}})).unwrap();
        assert!(q.matches(&record(json!({"priority": 2}))));
        assert!(q.matches(&record(json!({"priority": 4}))));
        assert!(!q.matches(&record(json!({"priority": 5}))));
        assert!(!q.matches(&record(json!({}))));
    }

    #[test]
    fn test_like() {
        let q = WhereQuery::parse(&json!({"title": {"_like": "%rust%"}})).unwrap();
        assert!(q.matches(&record(json!({"title": "Learning Rust today"}))));
        assert!(!q.matches(&record(json!({"title": "Go"}))));

        let literal = WhereQuery::parse(&json!({"title": {"_like": "a.c"}})).unwrap();
        assert!(!literal.matches(&record(json!({"title": "abc"}))));
    }

    #[test]
    fn test_in_and_nin() {
        let q = WhereQuery::parse(&json!({"tag": {"_in": ["a", "b"]}})).unwrap();
        assert!(q.matches(&record(json!({"tag": "a"}))));
        assert!(!q.matches(&record(json!({"tag": "c"}))));

        let q = WhereQuery::parse(&json!({"tag": {"_nin": ["a"]}})).unwrap();
        assert!(q.matches(&record(json!({"tag": "c"}))));
    }

    #[test]
    fn test_and_or() {
        let q = WhereQuery::parse(&json!({
            "_or": [{"owner": "amy"}, {"owner": "bo"}],
            "done": false
        }))
        .unwrap();
        assert!(q.matches(&record(json!({"owner": "bo", "done": false}))));
        assert!(!q.matches(&record(json!({"owner": "bo", "done": true}))));
        assert!(!q.matches(&record(json!({"owner": "cy", "done": false}))));
    }

    #[test]
    fn test_field_names() {
        let q = WhereQuery::parse(&json!({
            "_and": [{"b": 1}, {"a": {"_ne": 2}}],
            "c": 3
        }))
        .unwrap();
        let names: Vec<&str> = q.field_names().into_iter().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_queries() {
        assert!(WhereQuery::parse(&json!([1])).is_err());
        assert!(WhereQuery::parse(&json!({"a": {"_between": [1, 2]}})).is_err());
        assert!(WhereQuery::parse(&json!({"a": {"_in": 3}})).is_err());
        assert!(WhereQuery::parse(&json!({"_not": {}})).is_err());
        assert!(WhereQuery::parse(&json!({"_and": {}})).is_err());
    }

    #[test]
    fn test_serde_uses_json_form() {
        let q: WhereQuery = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(q, WhereQuery::eq("id", 3));

        let reparsed = WhereQuery::parse(&serde_json::to_value(&q).unwrap()).unwrap();
        assert_eq!(reparsed, q);
    }
}
