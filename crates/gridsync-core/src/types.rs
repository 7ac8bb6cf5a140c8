//! Core types for GridSync

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// A business record as the host's data store hands it out.
///
/// Records are plain JSON objects. Cloning a record is a deep copy, which is
/// what every boundary that hands records to the widget relies on.
pub type DataRecord = serde_json::Map<String, Value>;

/// Identity of a row tracked by the grid.
///
/// The embedded widget needs a single scalar key, so unsaved rows are exposed
/// to it as strictly negative integers. Inside GridSync the two cases stay
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RowKey {
    /// Client-side placeholder for a row that has not been inserted yet
    Pending(u64),
    /// Primary identifier of a persisted record
    Persisted(i64),
}

impl RowKey {
    /// Whether the row has not been persisted yet
    pub fn is_pending(&self) -> bool {
        matches!(self, RowKey::Pending(_))
    }

    /// The persisted identifier, if any
    pub fn persisted_id(&self) -> Option<i64> {
        match self {
            RowKey::Persisted(id) => Some(*id),
            RowKey::Pending(_) => None,
        }
    }

    /// Scalar key handed to the widget (negative for pending rows)
    pub fn to_widget_key(&self) -> i64 {
        match self {
            RowKey::Pending(seq) => -(*seq as i64),
            RowKey::Persisted(id) => *id,
        }
    }

    /// Interpret a scalar widget key
    pub fn from_widget_key(key: i64) -> Self {
        if key < 0 {
            RowKey::Pending(key.unsigned_abs())
        } else {
            RowKey::Persisted(key)
        }
    }

    /// Read the key of a record from its key field
    pub fn from_record(record: &DataRecord, key_field: &str) -> Option<Self> {
        record
            .get(key_field)
            .and_then(Value::as_i64)
            .map(RowKey::from_widget_key)
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKey::Pending(seq) => write!(f, "pending#{}", seq),
            RowKey::Persisted(id) => write!(f, "{}", id),
        }
    }
}

/// Monotonic allocator for pending row keys.
///
/// Keys are unique for the lifetime of the allocator; they are never reused,
/// even after the row they were handed to has been inserted or discarded.
#[derive(Debug, Default)]
pub struct RowKeyAllocator {
    last: AtomicU64,
}

impl RowKeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next pending key
    pub fn next(&self) -> RowKey {
        RowKey::Pending(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Read the concurrency version of a record, defaulting to 0 when absent
pub fn record_version(record: &DataRecord, version_field: &str) -> i64 {
    record
        .get(version_field)
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

/// Whether a field value counts as "no value" for required-ness checks
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Collect the fields of `current` that differ from `initial`.
///
/// Fields removed from `current` are reported as `null`.
pub fn changed_fields(initial: &DataRecord, current: &DataRecord) -> DataRecord {
    let mut changes = DataRecord::new();
    for (name, value) in current {
        if initial.get(name) != Some(value) {
            changes.insert(name.clone(), value.clone());
        }
    }
    for name in initial.keys() {
        if !current.contains_key(name) {
            changes.insert(name.clone(), Value::Null);
        }
    }
    changes
}
