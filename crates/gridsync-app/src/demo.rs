//! Scripted editing session over an in-memory order-line table

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use gridsync_columns::ColumnReconciler;
use gridsync_core::{ColumnSchema, DataRecord, FieldMeta, FieldType, RowKey, SelectionItem};
use gridsync_datasource::{
    DataSourceResult, GridDataSource, LoadOptions, LocalDataSource, LocalRecordHandlers,
};
use gridsync_query::WidgetSort;
use gridsync_selection::{HeaderState, SelectionStore};
use gridsync_session::{EditSessionController, KeyEvent, PointerTarget};
use gridsync_settings::GridSettings;
use serde_json::{Value, json};

/// Stands in for the parent form: assigns ids to saved lines
struct ParentForm {
    next_id: AtomicI64,
}

#[async_trait]
impl LocalRecordHandlers for ParentForm {
    async fn on_save(&self, mut record: DataRecord) -> DataSourceResult<DataRecord> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::info!(id, "parent form stored a new line");
        record.insert("id".to_string(), json!(id));
        Ok(record)
    }

    async fn on_update(&self, record: DataRecord) -> DataSourceResult<DataRecord> {
        Ok(record)
    }
}

/// What the scripted session left behind
#[derive(Debug)]
pub struct DemoReport {
    pub rows: Vec<DataRecord>,
    pub selected: Vec<RowKey>,
    pub header: HeaderState,
    pub group_by: String,
}

fn fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("product", FieldType::String).required(),
        FieldMeta::new("qty", FieldType::Integer).with_default(json!(1)),
        FieldMeta::new("unit", FieldType::String).with_selection(vec![
            SelectionItem::new("pc", "Piece"),
            SelectionItem::new("box", "Box"),
        ]),
        FieldMeta::new("note", FieldType::Text),
    ]
}

fn schema() -> Vec<ColumnSchema> {
    vec![
        ColumnSchema::new("product").with_title("Product").with_width(180),
        ColumnSchema::new("qty").with_title("Quantity"),
        ColumnSchema::new("unit").with_title("Unit"),
        ColumnSchema::new("note").with_title("Note"),
    ]
}

fn rows() -> Result<Vec<DataRecord>> {
    let value = json!([
        {"id": 1, "product": "Bolt M6", "qty": 100, "unit": "pc", "note": ""},
        {"id": 2, "product": "Nut M6", "qty": 100, "unit": "pc", "note": ""},
        {"id": 3, "product": "Washer", "qty": 2, "unit": "box", "note": ""},
    ]);
    let rows: Vec<DataRecord> =
        serde_json::from_value(value).context("Failed to build sample rows")?;
    Ok(rows)
}

fn row(rows: &[DataRecord], key: RowKey) -> Result<DataRecord> {
    rows.iter()
        .find(|r| r.get("id").and_then(Value::as_i64) == Some(key.to_widget_key()))
        .cloned()
        .with_context(|| format!("row {} is not loaded", key))
}

pub async fn run(settings: &GridSettings) -> Result<DemoReport> {
    let source = Arc::new(LocalDataSource::new(
        rows()?,
        Arc::new(ParentForm {
            next_id: AtomicI64::new(10),
        }),
    ));
    let selection = Arc::new(SelectionStore::new());
    let columns = Arc::new(
        ColumnReconciler::new(settings.columns.clone(), fields(), schema()).with_selection_column(),
    );
    let controller = EditSessionController::new(
        source.clone(),
        Arc::clone(&columns),
        Arc::clone(&selection),
        settings,
    );
    source.attach_form(controller.buffer());

    let page = source
        .load(LoadOptions::page(0, settings.data.page_size).with_sort(vec![WidgetSort::asc("id")]))
        .await?;
    println!("loaded {} of {} rows", page.data.len(), page.total_count);
    println!("widget columns: {}", columns.widget_columns().len());
    let viewport: Vec<RowKey> = page
        .data
        .iter()
        .filter_map(|r| RowKey::from_record(r, &settings.data.key_field))
        .collect();

    let first = RowKey::Persisted(1);
    let click = controller.on_cell_click(first, "qty", &row(&page.data, first)?).await;
    println!("click row 1: {:?}", click);
    controller.input(json!(120))?;
    println!("tab: {:?}", controller.on_key_down(KeyEvent::tab(), &viewport).await);
    controller.input(json!("box"))?;

    let last = RowKey::Persisted(3);
    let switch = controller.on_cell_click(last, "note", &row(&page.data, last)?).await;
    println!("switch to row 3: {:?}", switch);
    controller.input(json!("handle with care"))?;

    let enter = controller.on_key_down(KeyEvent::enter(), &viewport).await;
    println!("enter on last row: {:?}", enter);

    controller.set_field("product", json!("Spring washer"))?;
    let dropdown = controller.overlays().register("unit-dropdown");
    let inside = controller.on_pointer_down(PointerTarget::outside()).await;
    println!("click while dropdown open: {:?}", inside);
    drop(dropdown);
    let away = controller.on_pointer_down(PointerTarget::outside()).await;
    println!("click away: {:?}", away);

    selection.toggle(first);
    columns.set_group_by("unit");

    let rows = source.rows();
    let keys = source.row_keys();
    Ok(DemoReport {
        rows,
        selected: selection.selected_keys(),
        header: selection.header_state(&keys),
        group_by: columns.group_by(),
    })
}
