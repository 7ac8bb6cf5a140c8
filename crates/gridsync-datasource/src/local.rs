//! Data source backed by an in-memory row array

use std::sync::Arc;

use async_trait::async_trait;
use gridsync_core::{DataRecord, RowKey};
use gridsync_query::{RecordPredicate, sort_records, widget_json_to_business};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{DataSourceError, DataSourceResult};
use crate::source::{GridDataSource, LoadOptions, LoadResult};

/// Host callbacks that persist changes to an in-memory detail table.
///
/// Every callback is optional. A missing one is logged and the local data
/// source carries on as if it had accepted the record unchanged.
#[async_trait]
pub trait LocalRecordHandlers: Send + Sync {
    async fn on_save(&self, _record: DataRecord) -> DataSourceResult<DataRecord> {
        Err(DataSourceError::HandlerMissing("save"))
    }

    async fn on_update(&self, _record: DataRecord) -> DataSourceResult<DataRecord> {
        Err(DataSourceError::HandlerMissing("update"))
    }

    async fn on_delete(&self, _records: Vec<DataRecord>) -> DataSourceResult<()> {
        Err(DataSourceError::HandlerMissing("delete"))
    }
}

/// Handlers that provide none of the callbacks
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHandlers;

impl LocalRecordHandlers for NoHandlers {}

/// The authoritative record of the row being edited, when the field widgets
/// keep one outside the widget's own edit buffer
pub trait FormRecordSource: Send + Sync {
    fn current_record(&self) -> Option<DataRecord>;
}

pub struct LocalDataSource {
    rows: Mutex<Vec<DataRecord>>,
    handlers: Arc<dyn LocalRecordHandlers>,
    form: Mutex<Option<Arc<dyn FormRecordSource>>>,
    key_field: String,
}

impl std::fmt::Debug for LocalDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDataSource")
            .field("rows", &self.rows.lock().len())
            .field("key_field", &self.key_field)
            .finish_non_exhaustive()
    }
}

impl LocalDataSource {
    pub fn new(rows: Vec<DataRecord>, handlers: Arc<dyn LocalRecordHandlers>) -> Self {
        tracing::debug!(rows = rows.len(), "creating local data source");
        Self {
            rows: Mutex::new(rows),
            handlers,
            form: Mutex::new(None),
            key_field: "id".to_string(),
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Read inserted and updated values from `form` instead of the widget
    pub fn attach_form(&self, form: Arc<dyn FormRecordSource>) {
        *self.form.lock() = Some(form);
    }

    pub fn detach_form(&self) {
        *self.form.lock() = None;
    }

    /// Snapshot of the current rows
    pub fn rows(&self) -> Vec<DataRecord> {
        self.rows.lock().clone()
    }

    pub fn row_keys(&self) -> Vec<RowKey> {
        self.rows
            .lock()
            .iter()
            .filter_map(|row| RowKey::from_record(row, &self.key_field))
            .collect()
    }

    /// Replace all rows, e.g. after the parent record was reloaded
    pub fn replace_rows(&self, rows: Vec<DataRecord>) {
        *self.rows.lock() = rows;
    }

    fn is_row(&self, row: &DataRecord, key: RowKey) -> bool {
        row.get(&self.key_field).and_then(Value::as_i64) == Some(key.to_widget_key())
    }

    fn find(&self, key: RowKey) -> DataSourceResult<DataRecord> {
        self.rows
            .lock()
            .iter()
            .find(|row| self.is_row(row, key))
            .cloned()
            .ok_or(DataSourceError::RecordNotFound(key))
    }

    fn form_record(&self) -> Option<DataRecord> {
        let form = self.form.lock().clone()?;
        form.current_record()
    }

    /// Put a handler result back into the row array
    fn store_row(&self, previous: Option<RowKey>, record: &DataRecord) {
        let key = RowKey::from_record(record, &self.key_field);
        let mut rows = self.rows.lock();
        let position = rows.iter().position(|row| {
            previous.is_some_and(|k| self.is_row(row, k)) || key.is_some_and(|k| self.is_row(row, k))
        });
        match position {
            Some(index) => rows[index] = record.clone(),
            None => rows.push(record.clone()),
        }
    }
}

#[async_trait]
impl GridDataSource for LocalDataSource {
    #[tracing::instrument(skip(self))]
    async fn load(&self, options: LoadOptions) -> DataSourceResult<LoadResult> {
        let mut rows = self.rows();

        if let Some(filter) = options.filter.as_ref().and_then(widget_json_to_business) {
            rows.retain(|row| filter.matches(row));
        }
        if let Some(order) = options.sort_update().apply(None) {
            sort_records(&mut rows, &order);
        }

        let total_count = rows.len();
        let data = rows
            .into_iter()
            .skip(options.skip.unwrap_or(0))
            .take(options.take.unwrap_or(usize::MAX))
            .collect();
        Ok(LoadResult { data, total_count })
    }

    async fn by_key(&self, key: RowKey) -> DataSourceResult<DataRecord> {
        self.find(key)
    }

    #[tracing::instrument(skip(self, values))]
    async fn insert(&self, values: DataRecord) -> DataSourceResult<DataRecord> {
        let record = self.form_record().unwrap_or(values);
        let previous = RowKey::from_record(&record, &self.key_field);

        let saved = match self.handlers.on_save(record.clone()).await {
            Ok(saved) => saved,
            Err(DataSourceError::HandlerMissing(op)) => {
                tracing::warn!(handler = op, "no handler provided, keeping values as is");
                record
            }
            Err(e) => return Err(e),
        };

        self.store_row(previous, &saved);
        Ok(saved)
    }

    #[tracing::instrument(skip(self, values))]
    async fn update(&self, key: RowKey, values: DataRecord) -> DataSourceResult<DataRecord> {
        let mut record = self.find(key)?;
        record.extend(self.form_record().unwrap_or(values));

        let saved = match self.handlers.on_update(record.clone()).await {
            Ok(saved) => saved,
            Err(DataSourceError::HandlerMissing(op)) => {
                tracing::warn!(handler = op, "no handler provided, keeping merged record");
                record
            }
            Err(e) => return Err(e),
        };

        self.store_row(Some(key), &saved);
        Ok(saved)
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: RowKey) -> DataSourceResult<()> {
        let record = self.find(key)?;

        match self.handlers.on_delete(vec![record]).await {
            Ok(()) => {}
            Err(DataSourceError::HandlerMissing(op)) => {
                tracing::warn!(handler = op, "no handler provided, row kept");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        self.rows.lock().retain(|row| !self.is_row(row, key));
        Ok(())
    }
}
