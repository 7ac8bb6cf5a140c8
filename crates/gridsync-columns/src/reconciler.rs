use gridsync_core::{ColumnSchema, FieldMeta, find_field};
use gridsync_settings::ColumnSettings;
use tokio::sync::watch;

use crate::mapping::to_widget_columns;
use crate::reverse::{apply_group_by, apply_widget_change, group_by_string};
use crate::widget::{WidgetColumn, WidgetColumnState};

/// Owns the observable business column schema of one grid.
///
/// The write-back path (`on_widget_columns_changed`, `set_group_by`) is the
/// only writer; every other consumer reads a snapshot or subscribes.
pub struct ColumnReconciler {
    settings: ColumnSettings,
    fields: Vec<FieldMeta>,
    selectable: bool,
    schema: watch::Sender<Vec<ColumnSchema>>,
}

impl std::fmt::Debug for ColumnReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnReconciler")
            .field("columns", &self.schema.borrow().len())
            .field("selectable", &self.selectable)
            .finish_non_exhaustive()
    }
}

impl ColumnReconciler {
    pub fn new(settings: ColumnSettings, fields: Vec<FieldMeta>, schema: Vec<ColumnSchema>) -> Self {
        Self {
            settings,
            fields,
            selectable: false,
            schema: watch::channel(schema).0,
        }
    }

    /// Prepend the selection checkbox column to the widget columns
    pub fn with_selection_column(mut self) -> Self {
        self.selectable = true;
        self
    }

    pub fn settings(&self) -> &ColumnSettings {
        &self.settings
    }

    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        find_field(&self.fields, name)
    }

    /// Current schema snapshot
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.schema.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ColumnSchema>> {
        self.schema.subscribe()
    }

    /// Widget column options for the current schema
    pub fn widget_columns(&self) -> Vec<WidgetColumn> {
        to_widget_columns(&self.schema.borrow(), &self.fields, &self.settings, self.selectable)
    }

    /// Handle a widget column-option-changed event.
    ///
    /// Returns whether the schema changed. Events that don't alter any
    /// persisted column property leave the schema and its subscribers alone.
    pub fn on_widget_columns_changed(&self, change: &[WidgetColumnState]) -> bool {
        let changed = self.schema.send_if_modified(|schema| {
            let updated = apply_widget_change(change, schema, &self.settings);
            if !schema_differs(schema, &updated) {
                return false;
            }
            *schema = updated;
            true
        });
        if changed {
            tracing::debug!("column schema updated from widget state");
        }
        changed
    }

    pub fn group_by(&self) -> String {
        group_by_string(&self.schema.borrow())
    }

    pub fn set_group_by(&self, group_by: &str) -> bool {
        self.schema.send_if_modified(|schema| {
            let updated = apply_group_by(schema, group_by);
            if !schema_differs(schema, &updated) {
                return false;
            }
            *schema = updated;
            true
        })
    }

    /// Whether a column can be edited inline: visible in the schema, editable,
    /// not a system column, and backed by a field that isn't read-only
    pub fn is_editable(&self, name: &str) -> bool {
        if self.settings.is_system_column(name) {
            return false;
        }
        let schema = self.schema.borrow();
        let Some(column) = schema.iter().find(|c| c.name == name) else {
            return false;
        };
        column.visible
            && column.editable
            && column.widget.as_deref() != Some("button")
            && !self.field(base_name(name)).is_some_and(|f| f.readonly)
    }

    /// Editable columns in display order; the Tab cycle of an edited row
    pub fn editable_columns(&self) -> Vec<String> {
        let mut ordered: Vec<(u32, String)> = self
            .schema
            .borrow()
            .iter()
            .enumerate()
            .map(|(index, c)| (c.visible_index.unwrap_or(index as u32), c.name.clone()))
            .collect();
        ordered.sort_by_key(|(position, _)| *position);
        ordered
            .into_iter()
            .map(|(_, name)| name)
            .filter(|name| self.is_editable(name))
            .collect()
    }
}

fn base_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Shallow comparison of the properties the write-back path owns
fn schema_differs(old: &[ColumnSchema], new: &[ColumnSchema]) -> bool {
    old.len() != new.len()
        || old.iter().zip(new).any(|(a, b)| {
            a.name != b.name
                || a.width != b.width
                || a.visible != b.visible
                || a.visible_index != b.visible_index
                || a.group_index != b.group_index
        })
}
