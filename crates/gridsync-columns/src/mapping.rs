//! Forward mapping: business schema -> widget columns

use std::collections::HashMap;

use gridsync_core::{ColumnSchema, FieldMeta, FieldType, find_field};
use gridsync_settings::ColumnSettings;
use serde_json::Value;

use crate::widget::{
    BUTTON_PREFIX, ColumnKind, DisplayType, FixedPosition, LookupItem, SELECTION_COLUMN,
    WidgetColumn,
};

/// Field metadata for a column; dotted names (`partner.name`) resolve to
/// their first segment
fn field_for<'a>(column: &ColumnSchema, fields: &'a [FieldMeta]) -> Option<&'a FieldMeta> {
    let base = column.name.split('.').next().unwrap_or(&column.name);
    find_field(fields, base)
}

fn is_button(column: &ColumnSchema) -> bool {
    column.widget.as_deref() == Some("button")
}

/// Display type for a field, honoring an explicit widget override
pub fn display_type(field: Option<&FieldMeta>, widget: Option<&str>) -> DisplayType {
    let widget = widget.or_else(|| field.and_then(|f| f.widget.as_deref()));
    if let Some(mapped) = widget.and_then(display_type_of_widget) {
        return mapped;
    }

    match field.map(|f| f.field_type).unwrap_or_default() {
        FieldType::Integer | FieldType::Long | FieldType::Decimal => DisplayType::Number,
        FieldType::Date => DisplayType::Date,
        FieldType::Datetime | FieldType::Time => DisplayType::Datetime,
        FieldType::Boolean => DisplayType::Boolean,
        // collections display their size
        FieldType::OneToMany | FieldType::ManyToMany => DisplayType::Number,
        FieldType::Binary => DisplayType::Object,
        _ => DisplayType::String,
    }
}

fn display_type_of_widget(widget: &str) -> Option<DisplayType> {
    let widget = widget.to_ascii_lowercase().replace('_', "-");
    let mapped = match widget.as_str() {
        "integer" | "long" | "decimal" | "int" | "float" | "double" => DisplayType::Number,
        "date" => DisplayType::Date,
        "datetime" | "time" => DisplayType::Datetime,
        "boolean" => DisplayType::Boolean,
        "many-to-one" | "one-to-one" | "string" | "text" | "email" | "url" | "phone" => {
            DisplayType::String
        }
        "one-to-many" | "many-to-many" => DisplayType::Number,
        _ => return None,
    };
    Some(mapped)
}

/// Lookup table for fields with a fixed selection list.
///
/// Values that look like integers are passed as numbers, matching how the
/// store returns them.
pub fn lookup_for(field: &FieldMeta) -> Option<Vec<LookupItem>> {
    if field.selection_list.is_empty() {
        return None;
    }
    let items = field
        .selection_list
        .iter()
        .map(|item| LookupItem {
            value: item
                .value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(item.value.clone())),
            text: if item.title.is_empty() {
                item.value.clone()
            } else {
                item.title.clone()
            },
        })
        .collect();
    Some(items)
}

/// The selection checkbox column, pinned to the left edge
pub fn selection_column(settings: &ColumnSettings) -> WidgetColumn {
    let width = settings.selection_width;
    WidgetColumn {
        data_field: SELECTION_COLUMN.to_string(),
        caption: String::new(),
        width: Some(width),
        min_width: Some(width),
        max_width: Some(width),
        visible: true,
        visible_index: None,
        allow_sorting: false,
        allow_filtering: false,
        allow_grouping: false,
        allow_hiding: false,
        allow_editing: false,
        data_type: DisplayType::Boolean,
        group_index: None,
        lookup: None,
        fixed: Some(FixedPosition::Left),
        kind: ColumnKind::Selection,
        target_name: None,
    }
}

fn button_column(column: &ColumnSchema, index: usize, settings: &ColumnSettings) -> WidgetColumn {
    let width = column.width.unwrap_or(settings.button_width);
    WidgetColumn {
        data_field: format!("{}{}", BUTTON_PREFIX, column.name),
        caption: String::new(),
        width: Some(width),
        min_width: Some(width),
        max_width: Some(width),
        visible: column.visible,
        visible_index: column.visible_index.or(Some(index as u32)),
        allow_sorting: false,
        allow_filtering: false,
        allow_grouping: false,
        allow_hiding: false,
        allow_editing: false,
        data_type: DisplayType::String,
        group_index: None,
        lookup: None,
        fixed: None,
        kind: ColumnKind::Button,
        target_name: None,
    }
}

fn data_column(
    column: &ColumnSchema,
    index: usize,
    fields: &[FieldMeta],
    settings: &ColumnSettings,
) -> WidgetColumn {
    let field = field_for(column, fields);
    let readonly = field.is_some_and(|f| f.readonly);

    WidgetColumn {
        data_field: column.name.clone(),
        caption: column.caption().to_string(),
        width: column.width,
        min_width: Some(settings.min_width),
        max_width: None,
        visible: column.visible,
        visible_index: column.visible_index.or(Some(index as u32)),
        allow_sorting: column.sortable,
        allow_filtering: true,
        allow_grouping: true,
        allow_hiding: true,
        allow_editing: column.editable && !readonly,
        data_type: display_type(field, column.widget.as_deref()),
        group_index: column.group_index,
        lookup: field.and_then(lookup_for),
        fixed: None,
        kind: ColumnKind::Data,
        target_name: field
            .filter(|f| f.field_type.is_reference())
            .and_then(|f| f.target_name.clone()),
    }
}

/// Build the widget's column options from the business schema.
///
/// Columns keep their schema position as default `visible_index`, so an
/// unchanged widget state maps back onto an unchanged schema.
pub fn to_widget_columns(
    schema: &[ColumnSchema],
    fields: &[FieldMeta],
    settings: &ColumnSettings,
    selectable: bool,
) -> Vec<WidgetColumn> {
    let mut columns = Vec::with_capacity(schema.len() + usize::from(selectable));
    if selectable {
        columns.push(selection_column(settings));
    }
    for (index, column) in schema.iter().enumerate() {
        if is_button(column) {
            columns.push(button_column(column, index, settings));
        } else {
            columns.push(data_column(column, index, fields, settings));
        }
    }
    tracing::debug!(columns = columns.len(), "mapped schema to widget columns");
    columns
}

/// Apply a saved column state over the view's defaults.
///
/// Width, visibility, order and group position come from the saved state when
/// it has them; columns the saved state doesn't know keep their defaults.
pub fn merge_saved_state(view: &[ColumnSchema], saved: &[ColumnSchema]) -> Vec<ColumnSchema> {
    view.iter()
        .map(|column| {
            let Some(state) = saved.iter().find(|s| s.name == column.name) else {
                return column.clone();
            };
            let mut merged = column.clone();
            merged.width = state.width.or(column.width);
            merged.visible = state.visible;
            merged.visible_index = state.visible_index.or(column.visible_index);
            merged.group_index = state.group_index;
            merged
        })
        .collect()
}

/// Fields to request from the store for the schema's columns.
///
/// Reference columns also fetch their display field (`partner.name`).
pub fn fields_to_fetch(schema: &[ColumnSchema], fields: &[FieldMeta]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    for column in schema.iter().filter(|c| !is_button(c)) {
        push(column.name.clone());
        if let Some(field) = field_for(column, fields).filter(|f| f.field_type.is_reference()) {
            if let Some(target) = field.target_name.as_deref().filter(|t| *t != "id") {
                push(format!("{}.{}", column.name, target));
            }
        }
    }
    names
}

/// Pixel offsets of pinned columns from their edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedOffsets {
    pub left: HashMap<String, u32>,
    pub right: HashMap<String, u32>,
}

impl FixedOffsets {
    pub fn offset(&self, data_field: &str) -> Option<(FixedPosition, u32)> {
        if let Some(offset) = self.left.get(data_field) {
            return Some((FixedPosition::Left, *offset));
        }
        self.right
            .get(data_field)
            .map(|offset| (FixedPosition::Right, *offset))
    }
}

/// Offsets of pinned columns: left-pinned columns are offset by the widths of
/// the left-pinned columns before them, right-pinned by those after them.
pub fn fixed_offsets(columns: &[WidgetColumn]) -> FixedOffsets {
    let mut offsets = FixedOffsets::default();
    let visible = || columns.iter().filter(|c| c.visible);

    let mut left = 0;
    for column in visible().filter(|c| c.fixed == Some(FixedPosition::Left)) {
        offsets.left.insert(column.data_field.clone(), left);
        left += column.width.unwrap_or(0);
    }

    let mut right = 0;
    let right_fixed: Vec<&WidgetColumn> = visible()
        .filter(|c| c.fixed == Some(FixedPosition::Right))
        .collect();
    for column in right_fixed.into_iter().rev() {
        offsets.right.insert(column.data_field.clone(), right);
        right += column.width.unwrap_or(0);
    }

    offsets
}
