//! Model instances

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record of a registered model type
///
/// Values are loosely typed; validation decides whether they fit the
/// field definitions. A value is "set" when present and not `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Registered model type name
    pub model: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl Model {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            values: Map::new(),
        }
    }

    pub fn from_values(model: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            model: model.into(),
            values,
        }
    }

    /// Builder form of [`Model::set`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Raw value, including an explicit `null`
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Value if set
    pub fn get_set(&self, field: &str) -> Option<&Value> {
        self.values.get(field).filter(|v| !v.is_null())
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.get_set(field).is_some()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// Keys present on the instance
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// A copy restricted to `fields`
    pub fn project(&self, fields: &[String]) -> Model {
        let values = self
            .values
            .iter()
            .filter(|(k, _)| fields.iter().any(|f| f == *k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Model::from_values(self.model.clone(), values)
    }
}
