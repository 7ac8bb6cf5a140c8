mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::record;
use gridsync_core::{DataRecord, RowKey};
use gridsync_datasource::{
    DataSourceError, DataSourceResult, FormRecordSource, GridDataSource, LoadOptions,
    LocalDataSource, LocalRecordHandlers, NoHandlers,
};
use gridsync_query::WidgetSort;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn lines() -> Vec<DataRecord> {
    vec![
        record(json!({"id": 1, "product": "Bolt", "qty": 10})),
        record(json!({"id": 2, "product": "Nut", "qty": 4})),
        record(json!({"id": 3, "product": "Washer", "qty": 25})),
        record(json!({"id": 4, "product": "Spring", "qty": 4})),
    ]
}

fn ids(records: &[DataRecord]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .collect()
}

/// Handlers that record what they were given and stamp saved records
#[derive(Default)]
struct RecordingHandlers {
    saved: Mutex<Vec<DataRecord>>,
    updated: Mutex<Vec<DataRecord>>,
    deleted: Mutex<Vec<DataRecord>>,
}

#[async_trait]
impl LocalRecordHandlers for RecordingHandlers {
    async fn on_save(&self, mut record: DataRecord) -> DataSourceResult<DataRecord> {
        self.saved.lock().push(record.clone());
        record.insert("saved".to_string(), json!(true));
        Ok(record)
    }

    async fn on_update(&self, record: DataRecord) -> DataSourceResult<DataRecord> {
        self.updated.lock().push(record.clone());
        Ok(record)
    }

    async fn on_delete(&self, records: Vec<DataRecord>) -> DataSourceResult<()> {
        self.deleted.lock().extend(records);
        Ok(())
    }
}

struct FixedForm(DataRecord);

impl FormRecordSource for FixedForm {
    fn current_record(&self) -> Option<DataRecord> {
        Some(self.0.clone())
    }
}

#[tokio::test]
async fn load_filters_sorts_and_pages_in_memory() {
    let source = LocalDataSource::new(lines(), Arc::new(NoHandlers));

    let result = source
        .load(
            LoadOptions::page(1, 2)
                .with_filter(json!(["qty", "<", 20]))
                .with_sort(vec![WidgetSort::asc("qty"), WidgetSort::desc("product")]),
        )
        .await
        .unwrap();

    // qty < 20 sorted: Spring(4), Nut(4), Bolt(10)
    assert_eq!(result.total_count, 3);
    assert_eq!(ids(&result.data), vec![2, 1]);
}

#[tokio::test]
async fn amounts_stored_as_text_and_numbers_sort_and_filter_together() {
    let rows: Vec<DataRecord> = (0..64)
        .map(|i| {
            let amount = if i % 2 == 0 {
                json!(format!("{}.00", i))
            } else {
                json!(i as f64 + 0.5)
            };
            record(json!({"id": i + 1, "amount": amount}))
        })
        .collect();
    let source = LocalDataSource::new(rows, Arc::new(NoHandlers));

    let sorted = source
        .load(LoadOptions::default().with_sort(vec![WidgetSort::asc("amount")]))
        .await
        .unwrap();
    assert_eq!(ids(&sorted.data), (1..=64).collect::<Vec<i64>>());

    let filtered = source
        .load(LoadOptions::default().with_filter(json!(["amount", ">=", "60"])))
        .await
        .unwrap();
    assert_eq!(ids(&filtered.data), vec![61, 62, 63, 64]);
}

#[tokio::test]
async fn by_key_and_update_report_unknown_keys() {
    let source = LocalDataSource::new(lines(), Arc::new(NoHandlers));

    assert_eq!(
        source.by_key(RowKey::Persisted(3)).await.unwrap().get("product"),
        Some(&json!("Washer"))
    );
    assert!(matches!(
        source.by_key(RowKey::Persisted(9)).await,
        Err(DataSourceError::RecordNotFound(RowKey::Persisted(9)))
    ));
    assert!(matches!(
        source.update(RowKey::Persisted(9), DataRecord::new()).await,
        Err(DataSourceError::RecordNotFound(_))
    ));
}

#[tokio::test]
async fn update_merges_before_calling_the_handler() {
    let handlers = Arc::new(RecordingHandlers::default());
    let source = LocalDataSource::new(lines(), handlers.clone());

    let saved = source
        .update(RowKey::Persisted(2), record(json!({"qty": 7})))
        .await
        .unwrap();

    let expected = record(json!({"id": 2, "product": "Nut", "qty": 7}));
    assert_eq!(saved, expected);
    assert_eq!(*handlers.updated.lock(), vec![expected.clone()]);
    assert_eq!(source.rows()[1], expected);
}

#[tokio::test]
async fn missing_handlers_echo_and_keep_rows_in_sync() {
    let source = LocalDataSource::new(lines(), Arc::new(NoHandlers));

    let updated = source
        .update(RowKey::Persisted(1), record(json!({"qty": 11})))
        .await
        .unwrap();
    assert_eq!(updated, record(json!({"id": 1, "product": "Bolt", "qty": 11})));

    let inserted = source
        .insert(record(json!({"id": -1, "product": "Pin", "qty": 1})))
        .await
        .unwrap();
    assert_eq!(inserted, record(json!({"id": -1, "product": "Pin", "qty": 1})));
    assert_eq!(source.row_keys().last(), Some(&RowKey::Pending(1)));

    // without a delete handler nothing is removed
    source.remove(RowKey::Persisted(1)).await.unwrap();
    assert_eq!(source.rows().len(), 5);
}

#[tokio::test]
async fn insert_prefers_the_form_record() {
    let handlers = Arc::new(RecordingHandlers::default());
    let source = LocalDataSource::new(lines(), handlers.clone());
    source.attach_form(Arc::new(FixedForm(record(
        json!({"id": -2, "product": "From form", "qty": 3}),
    ))));

    let saved = source
        .insert(record(json!({"id": -2, "product": "From widget"})))
        .await
        .unwrap();

    assert_eq!(
        handlers.saved.lock()[0].get("product"),
        Some(&json!("From form"))
    );
    assert_eq!(saved.get("saved"), Some(&json!(true)));
    assert_eq!(source.rows().len(), 5);

    source.detach_form();
    source
        .update(RowKey::Pending(2), record(json!({"qty": 8})))
        .await
        .unwrap();
    assert_eq!(source.rows().len(), 5);
    assert_eq!(source.rows()[4].get("qty"), Some(&json!(8)));
}

#[tokio::test]
async fn remove_hands_the_row_to_the_delete_handler() {
    let handlers = Arc::new(RecordingHandlers::default());
    let source = LocalDataSource::new(lines(), handlers.clone());

    source.remove(RowKey::Persisted(3)).await.unwrap();

    assert_eq!(ids(&handlers.deleted.lock()), vec![3]);
    assert_eq!(ids(&source.rows()), vec![1, 2, 4]);
}

#[tokio::test]
async fn loaded_rows_are_copies() {
    let source = LocalDataSource::new(lines(), Arc::new(NoHandlers));

    let mut loaded = source.load(LoadOptions::default()).await.unwrap();
    loaded.data[0].insert("qty".to_string(), json!(0));

    assert_eq!(source.rows()[0].get("qty"), Some(&json!(10)));
}
