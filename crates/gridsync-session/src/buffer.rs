//! Authoritative record of the row being edited

use gridsync_core::DataRecord;
use gridsync_datasource::FormRecordSource;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

/// Record container the field widgets write into while a row is edited.
///
/// A focused input holds its typed value back until it loses focus; that
/// value sits in the staged slot and only reaches the record on `blur`.
#[derive(Debug, Default)]
pub struct EditBuffer {
    record: RwLock<Option<DataRecord>>,
    staged: Mutex<Option<(String, Value)>>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start buffering `record`, discarding anything left from a previous row
    pub fn load(&self, record: DataRecord) {
        *self.staged.lock() = None;
        *self.record.write() = Some(record);
    }

    pub fn clear(&self) {
        *self.staged.lock() = None;
        *self.record.write() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.record.read().is_some()
    }

    /// Snapshot of the committed values
    pub fn record(&self) -> Option<DataRecord> {
        self.record.read().clone()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.record.read().as_ref()?.get(field).cloned()
    }

    /// Write a value as a field widget's change handler does.
    ///
    /// Returns false when no record is loaded.
    pub fn set_field(&self, field: impl Into<String>, value: Value) -> bool {
        match self.record.write().as_mut() {
            Some(record) => {
                record.insert(field.into(), value);
                true
            }
            None => false,
        }
    }

    /// Hold a value typed into the focused input without committing it
    pub fn stage(&self, field: impl Into<String>, value: Value) {
        *self.staged.lock() = Some((field.into(), value));
    }

    pub fn has_staged(&self) -> bool {
        self.staged.lock().is_some()
    }

    /// Finalize the focused input, moving its staged value into the record
    pub fn blur(&self) -> bool {
        let Some((field, value)) = self.staged.lock().take() else {
            return false;
        };
        tracing::trace!(field = %field, "committing staged input");
        self.set_field(field, value)
    }
}

impl FormRecordSource for EditBuffer {
    fn current_record(&self) -> Option<DataRecord> {
        self.record()
    }
}
