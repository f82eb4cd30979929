//! In-memory backend
//!
//! Records live in process memory, one list per model type. Nothing is
//! persisted. `AutoNumber` fields are filled from a per-field sequence on
//! create when the caller leaves them unset.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::backend::Backend;
use crate::error::{ModelError, ModelResult};
use crate::fields::FieldKind;
use crate::models::{Model, ModelManager};
use crate::operations::{CreateOptions, OperationResult, ReadOptions, RemoveOptions, UpdateOptions};
use crate::query::WhereQuery;
use crate::validation::js_compare;

#[derive(Default)]
struct Store {
    records: HashMap<String, Vec<Model>>,
    /// Last number handed out per (model, field)
    sequences: HashMap<(String, String), i64>,
}

/// Backend keeping records in memory
#[derive(Default)]
pub struct InMemoryBackend {
    store: RwLock<Store>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records without validation
    pub fn load(&self, model_name: &str, records: Vec<Model>) -> ModelResult<()> {
        let mut store = self.write()?;
        store
            .records
            .entry(model_name.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }

    /// Number of stored records of a model type
    pub fn count(&self, model_name: &str) -> usize {
        self.store
            .read()
            .map(|s| s.records.get(model_name).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn write(&self) -> ModelResult<std::sync::RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|_| ModelError::internal("Lock poisoned"))
    }

    fn do_create(&self, manager: &ModelManager, model: &Model, result: &mut OperationResult) -> ModelResult<()> {
        let meta = manager.get_model_meta(&model.model)?;
        let mut record = model.clone();
        let mut store = self.write()?;

        for field in meta.fields.iter().filter(|f| f.kind == FieldKind::AutoNumber) {
            if record.is_set(&field.name) {
                continue;
            }
            let key = (meta.name.clone(), field.name.clone());
            let existing_max = store
                .records
                .get(&meta.name)
                .into_iter()
                .flatten()
                .filter_map(|r| r.get(&field.name).and_then(Value::as_i64))
                .max()
                .unwrap_or(0);
            let sequence = store.sequences.entry(key).or_insert(0);
            *sequence = (*sequence).max(existing_max) + 1;
            record.set(field.name.clone(), *sequence);
        }

        store
            .records
            .entry(meta.name.clone())
            .or_default()
            .push(record.clone());
        result.result = Some(record);
        Ok(())
    }

    fn do_update(
        &self,
        manager: &ModelManager,
        model: &Model,
        result: &mut OperationResult,
        options: &UpdateOptions,
    ) -> ModelResult<()> {
        let meta = manager.get_model_meta(&model.model)?;
        let where_clause = options.where_clause.clone().unwrap_or_default();
        let fields: Vec<String> = match &options.fields {
            Some(fields) => fields.clone(),
            None => meta.field_names().map(str::to_string).collect(),
        };

        let mut store = self.write()?;
        let mut count = 0;
        if let Some(records) = store.records.get_mut(&meta.name) {
            for record in records.iter_mut().filter(|r| where_clause.matches(r)) {
                for field in &fields {
                    if let Some(value) = model.get(field) {
                        record.set(field.clone(), value.clone());
                    }
                }
                count += 1;
            }
        }

        result.result = Some(model.clone());
        result.meta.total_count = Some(count);
        Ok(())
    }

    fn do_read(&self, model_name: &str, result: &mut OperationResult, options: &ReadOptions) -> ModelResult<()> {
        let where_clause = options.where_clause.clone().unwrap_or_else(WhereQuery::all);
        let limit = options.limit.unwrap_or(usize::MAX);
        let sort_keys = options.sort_keys()?;

        let store = self
            .store
            .read()
            .map_err(|_| ModelError::internal("Lock poisoned"))?;
        let mut matched: Vec<Model> = store
            .records
            .get(model_name)
            .into_iter()
            .flatten()
            .filter(|r| where_clause.matches(r))
            .cloned()
            .collect();

        if !sort_keys.is_empty() {
            matched.sort_by(|a, b| {
                sort_keys
                    .iter()
                    .map(|(field, descending)| {
                        let ord = compare_field(a.get(field), b.get(field));
                        if *descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        result.meta.total_count = Some(matched.len());
        result.meta.offset = Some(options.offset);
        result.meta.limit = Some(limit);
        result.results = Some(
            matched
                .into_iter()
                .skip(options.offset)
                .take(limit)
                .collect(),
        );
        Ok(())
    }

    fn do_remove(&self, model: &Model, result: &mut OperationResult, options: &RemoveOptions) -> ModelResult<()> {
        let where_clause = options.where_clause.clone().unwrap_or_default();

        let mut store = self.write()?;
        let mut count = 0;
        if let Some(records) = store.records.get_mut(&model.model) {
            let before = records.len();
            records.retain(|r| !where_clause.matches(r));
            count = before - records.len();
        }

        result.meta.total_count = Some(count);
        Ok(())
    }
}

impl Backend for InMemoryBackend {
    fn create<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        _options: &'a CreateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        Box::pin(async move { self.do_create(manager, model, result) })
    }

    fn update<'a>(
        &'a self,
        manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a UpdateOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        Box::pin(async move { self.do_update(manager, model, result, options) })
    }

    fn read<'a>(
        &'a self,
        _manager: &'a ModelManager,
        model_name: &'a str,
        result: &'a mut OperationResult,
        options: &'a ReadOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        Box::pin(async move { self.do_read(model_name, result, options) })
    }

    fn remove<'a>(
        &'a self,
        _manager: &'a ModelManager,
        model: &'a Model,
        result: &'a mut OperationResult,
        options: &'a RemoveOptions,
    ) -> BoxFuture<'a, ModelResult<()>> {
        Box::pin(async move { self.do_remove(model, result, options) })
    }
}

/// Sort order for one field; unset values first
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => js_compare(a, b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldDef;
    use crate::models::ModelMeta;
    use crate::operations::{ModelOperation, OperationKind};
    use serde_json::json;

    fn manager() -> ModelManager {
        let manager = ModelManager::new();
        manager
            .register(
                ModelMeta::new(
                    "Task",
                    vec![FieldDef::auto_number("id"), FieldDef::text("title")],
                )
                .primary_key("id"),
            )
            .unwrap();
        manager
    }

    fn result(kind: OperationKind) -> OperationResult {
        OperationResult::new(ModelOperation::new(kind))
    }

    #[tokio::test]
    async fn test_create_assigns_auto_numbers() {
        let manager = manager();
        let backend = InMemoryBackend::new();

        for title in ["a", "b"] {
            let mut res = result(OperationKind::Create);
            let model = Model::new("Task").with("title", title);
            backend
                .create(&manager, &model, &mut res, &CreateOptions::default())
                .await
                .unwrap();
        }

        let mut res = result(OperationKind::Read);
        backend
            .read(&manager, "Task", &mut res, &ReadOptions::default().order_by("id"))
            .await
            .unwrap();
        let ids: Vec<&Value> = res.results.as_ref().unwrap().iter().map(|m| m.get("id").unwrap()).collect();
        assert_eq!(ids, vec![&json!(1), &json!(2)]);
    }

    #[tokio::test]
    async fn test_explicit_ids_advance_the_sequence() {
        let manager = manager();
        let backend = InMemoryBackend::new();
        backend
            .load("Task", vec![Model::new("Task").with("id", 10).with("title", "seed")])
            .unwrap();

        let mut res = result(OperationKind::Create);
        backend
            .create(&manager, &Model::new("Task").with("title", "x"), &mut res, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(res.result.unwrap().get("id"), Some(&json!(11)));
    }

    #[tokio::test]
    async fn test_read_orders_and_pages() {
        let manager = manager();
        let backend = InMemoryBackend::new();
        let records = (1..=5)
            .map(|i| Model::new("Task").with("id", i).with("title", format!("t{}", i)))
            .collect();
        backend.load("Task", records).unwrap();

        let mut res = result(OperationKind::Read);
        let options = ReadOptions::default().order_by("id desc").limit(2).offset(1);
        backend.read(&manager, "Task", &mut res, &options).await.unwrap();

        let ids: Vec<i64> = res
            .results
            .unwrap()
            .iter()
            .map(|m| m.get("id").and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(res.meta.total_count, Some(5));
        assert_eq!(res.meta.offset, Some(1));
        assert_eq!(res.meta.limit, Some(2));
    }

    #[tokio::test]
    async fn test_update_and_remove_report_counts() {
        let manager = manager();
        let backend = InMemoryBackend::new();
        backend
            .load(
                "Task",
                vec![
                    Model::new("Task").with("id", 1).with("title", "a"),
                    Model::new("Task").with("id", 2).with("title", "a"),
                    Model::new("Task").with("id", 3).with("title", "b"),
                ],
            )
            .unwrap();

        let mut res = result(OperationKind::Update);
        let options = UpdateOptions::default()
            .with_where(WhereQuery::eq("title", "a"))
            .with_fields(["title"]);
        backend
            .update(&manager, &Model::new("Task").with("title", "z"), &mut res, &options)
            .await
            .unwrap();
        assert_eq!(res.meta.total_count, Some(2));

        let mut res = result(OperationKind::Remove);
        let options = RemoveOptions::default().with_where(WhereQuery::eq("title", "z"));
        backend
            .remove(&manager, &Model::new("Task"), &mut res, &options)
            .await
            .unwrap();
        assert_eq!(res.meta.total_count, Some(2));
        assert_eq!(backend.count("Task"), 1);
    }
}
