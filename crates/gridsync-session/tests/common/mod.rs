//! Common test utilities and mocks

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gridsync_columns::ColumnReconciler;
use gridsync_core::{ColumnSchema, DataRecord, FieldMeta, FieldType, GridError, RowKey};
use gridsync_datasource::{
    DataSourceError, DataSourceResult, GridDataSource, LoadOptions, LoadResult,
};
use gridsync_selection::SelectionStore;
use gridsync_session::EditSessionController;
use gridsync_settings::GridSettings;
use serde_json::{Value, json};

pub fn record(value: Value) -> DataRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// In-memory grid data source recording every call.
///
/// Inserted rows get ids from 100 upwards. Failures can be injected per
/// operation and every call can be slowed down by a fixed delay.
pub struct MockGridSource {
    pub records: Arc<parking_lot::Mutex<Vec<DataRecord>>>,
    pub next_id: Arc<parking_lot::Mutex<i64>>,
    /// Operations ("load", "by_key", "insert", "update", "remove") that fail
    pub failing: Vec<String>,
    pub delay: Option<Duration>,
    pub call_log: Arc<parking_lot::Mutex<Vec<String>>>,
    pub inserted: Arc<parking_lot::Mutex<Vec<DataRecord>>>,
    pub updated: Arc<parking_lot::Mutex<Vec<(RowKey, DataRecord)>>>,
}

impl MockGridSource {
    pub fn new() -> Self {
        Self {
            records: Arc::new(parking_lot::Mutex::new(Vec::new())),
            next_id: Arc::new(parking_lot::Mutex::new(100)),
            failing: Vec::new(),
            delay: None,
            call_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            inserted: Arc::new(parking_lot::Mutex::new(Vec::new())),
            updated: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Source with a few order lines
    pub fn with_lines() -> Self {
        let source = Self::new();
        source.records.lock().extend(lines());
        source
    }

    pub fn with_failure(mut self, operation: impl Into<String>) -> Self {
        self.failing.push(operation.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().clone()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    async fn enter(&self, operation: &str, detail: String) -> DataSourceResult<()> {
        let entry = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, detail)
        };
        self.call_log.lock().push(entry);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|f| f == operation) {
            return Err(DataSourceError::Grid(GridError::Store(format!(
                "{} rejected",
                operation
            ))));
        }
        Ok(())
    }

    fn position(&self, key: RowKey) -> Option<usize> {
        let id = key.persisted_id()?;
        self.records
            .lock()
            .iter()
            .position(|r| r.get("id").and_then(Value::as_i64) == Some(id))
    }
}

#[async_trait]
impl GridDataSource for MockGridSource {
    async fn load(&self, _options: LoadOptions) -> DataSourceResult<LoadResult> {
        self.enter("load", String::new()).await?;
        let data = self.records.lock().clone();
        Ok(LoadResult {
            total_count: data.len(),
            data,
        })
    }

    async fn by_key(&self, key: RowKey) -> DataSourceResult<DataRecord> {
        self.enter("by_key", key.to_string()).await?;
        let index = self.position(key).ok_or(DataSourceError::RecordNotFound(key))?;
        Ok(self.records.lock()[index].clone())
    }

    async fn insert(&self, mut values: DataRecord) -> DataSourceResult<DataRecord> {
        self.enter("insert", String::new()).await?;
        self.inserted.lock().push(values.clone());

        let id = {
            let mut next = self.next_id.lock();
            let id = *next;
            *next += 1;
            id
        };
        values.insert("id".to_string(), json!(id));
        self.records.lock().push(values.clone());
        Ok(values)
    }

    async fn update(&self, key: RowKey, values: DataRecord) -> DataSourceResult<DataRecord> {
        self.enter("update", key.to_string()).await?;
        self.updated.lock().push((key, values.clone()));

        let index = self.position(key).ok_or(DataSourceError::RecordNotFound(key))?;
        let mut records = self.records.lock();
        records[index].extend(values);
        Ok(records[index].clone())
    }

    async fn remove(&self, key: RowKey) -> DataSourceResult<()> {
        self.enter("remove", key.to_string()).await?;
        let index = self.position(key).ok_or(DataSourceError::RecordNotFound(key))?;
        self.records.lock().remove(index);
        Ok(())
    }
}

pub fn lines() -> Vec<DataRecord> {
    vec![
        record(json!({"id": 1, "name": "Bolt", "qty": 10, "note": "", "code": "B-1"})),
        record(json!({"id": 2, "name": "Nut", "qty": 4, "note": "", "code": "N-1"})),
        record(json!({"id": 3, "name": "Washer", "qty": 25, "note": "", "code": "W-1"})),
    ]
}

pub fn line(id: i64) -> DataRecord {
    lines()
        .into_iter()
        .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
        .unwrap_or_else(|| panic!("no line {id}"))
}

/// `name` is required, `qty` defaults to 1, `code` is read-only
pub fn fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("name", FieldType::String).required(),
        FieldMeta::new("qty", FieldType::Integer).with_default(json!(1)),
        FieldMeta::new("note", FieldType::Text),
        FieldMeta::new("code", FieldType::String).readonly(),
    ]
}

pub fn schema() -> Vec<ColumnSchema> {
    vec![
        ColumnSchema::new("name"),
        ColumnSchema::new("qty"),
        ColumnSchema::new("note"),
        ColumnSchema::new("code"),
    ]
}

pub fn viewport() -> Vec<RowKey> {
    vec![
        RowKey::Persisted(1),
        RowKey::Persisted(2),
        RowKey::Persisted(3),
    ]
}

pub struct Harness {
    pub controller: EditSessionController,
    pub source: Arc<MockGridSource>,
    pub selection: Arc<SelectionStore>,
}

pub fn harness(source: MockGridSource) -> Harness {
    harness_with(source, GridSettings::default())
}

pub fn harness_with(source: MockGridSource, settings: GridSettings) -> Harness {
    let source = Arc::new(source);
    let selection = Arc::new(SelectionStore::new());
    let columns = Arc::new(
        ColumnReconciler::new(settings.columns.clone(), fields(), schema()).with_selection_column(),
    );
    let controller = EditSessionController::new(
        source.clone(),
        columns,
        Arc::clone(&selection),
        &settings,
    );
    Harness {
        controller,
        source,
        selection,
    }
}
