//! Common test utilities and mocks

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gridsync_core::{
    DataRecord, DataStore, DeleteRequest, GridError, GridResult, SearchOptions, SearchResult,
};
use serde_json::{Value, json};

/// In-memory business store for exercising the bridge without a backend.
///
/// Records are kept by id with a version that is bumped on every save. Every
/// call is logged, and failures can be injected per operation.
pub struct MockDataStore {
    pub records: Arc<parking_lot::Mutex<Vec<DataRecord>>>,
    pub next_id: Arc<parking_lot::Mutex<i64>>,
    /// Operations ("search", "read", "save", "delete") that fail
    pub failing: Vec<String>,
    /// Reported total, overriding the real count
    pub reported_total: Option<usize>,
    pub delay: Option<Duration>,
    /// Log of all calls, for assertion in tests
    pub call_log: Arc<parking_lot::Mutex<Vec<String>>>,
    pub last_search: Arc<parking_lot::Mutex<Option<SearchOptions>>>,
    pub last_saved: Arc<parking_lot::Mutex<Option<DataRecord>>>,
    pub last_delete: Arc<parking_lot::Mutex<Option<DeleteRequest>>>,
}

pub fn record(value: Value) -> DataRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

impl MockDataStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(parking_lot::Mutex::new(Vec::new())),
            next_id: Arc::new(parking_lot::Mutex::new(100)),
            failing: Vec::new(),
            reported_total: None,
            delay: None,
            call_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            last_search: Arc::new(parking_lot::Mutex::new(None)),
            last_saved: Arc::new(parking_lot::Mutex::new(None)),
            last_delete: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Store with a few products
    pub fn with_products() -> Self {
        let store = Self::new();
        store.records.lock().extend([
            record(json!({"id": 1, "version": 0, "name": "Bolt", "qty": 10, "price": 0.5})),
            record(json!({"id": 2, "version": 3, "name": "Nut", "qty": 4, "price": 0.2})),
            record(json!({"id": 3, "name": "Washer", "qty": 25, "price": 0.1})),
        ]);
        store
    }

    pub fn with_failure(mut self, operation: impl Into<String>) -> Self {
        self.failing.push(operation.into());
        self
    }

    pub fn with_reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
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
            .filter(|call| call.starts_with(operation))
            .count()
    }

    pub fn record(&self, id: i64) -> Option<DataRecord> {
        self.records
            .lock()
            .iter()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .cloned()
    }

    async fn enter(&self, call: String, operation: &str) -> GridResult<()> {
        self.call_log.lock().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|op| op == operation) {
            return Err(GridError::Store(format!("{operation} failed")));
        }
        Ok(())
    }
}

fn project(record: &DataRecord, fields: &[String]) -> DataRecord {
    if fields.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(name, _)| fields.iter().any(|f| f == *name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[async_trait]
impl DataStore for MockDataStore {
    async fn search(&self, options: SearchOptions) -> GridResult<SearchResult> {
        self.enter("search".to_string(), "search").await?;
        *self.last_search.lock() = Some(options.clone());

        let records = self.records.lock().clone();
        let total = records.len();
        let records = records
            .into_iter()
            .skip(options.offset.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(SearchResult {
            records,
            total_count: self.reported_total.unwrap_or(total),
        })
    }

    async fn read(&self, id: i64, fields: &[String]) -> GridResult<DataRecord> {
        self.enter(format!("read {id}"), "read").await?;
        self.record(id)
            .map(|r| project(&r, fields))
            .ok_or_else(|| GridError::NotFound(id.to_string()))
    }

    async fn save(&self, mut record: DataRecord, _fields: &[String]) -> GridResult<DataRecord> {
        self.enter("save".to_string(), "save").await?;
        *self.last_saved.lock() = Some(record.clone());

        let mut records = self.records.lock();
        match record.get("id").and_then(Value::as_i64) {
            Some(id) => {
                let stored = records
                    .iter_mut()
                    .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
                    .ok_or_else(|| GridError::NotFound(id.to_string()))?;
                let version = record.get("version").and_then(Value::as_i64).unwrap_or(0);
                let current = stored.get("version").and_then(Value::as_i64).unwrap_or(0);
                if version != current {
                    return Err(GridError::Concurrency(format!(
                        "record {id} is at version {current}, got {version}"
                    )));
                }
                record.insert("version".to_string(), json!(current + 1));
                *stored = record.clone();
                Ok(record)
            }
            None => {
                let mut next_id = self.next_id.lock();
                *next_id += 1;
                record.insert("id".to_string(), json!(*next_id));
                record.insert("version".to_string(), json!(0));
                records.push(record.clone());
                Ok(record)
            }
        }
    }

    async fn delete(&self, request: DeleteRequest) -> GridResult<()> {
        self.enter(format!("delete {}", request.id), "delete").await?;
        *self.last_delete.lock() = Some(request);
        self.records
            .lock()
            .retain(|r| r.get("id").and_then(Value::as_i64) != Some(request.id));
        Ok(())
    }
}
