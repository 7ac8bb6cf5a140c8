//! Reverse mapping: widget column events -> business schema

use gridsync_core::ColumnSchema;
use gridsync_settings::ColumnSettings;

use crate::widget::{RawWidth, WidgetColumnState};

/// Fold a widget column-option-changed event into the schema.
///
/// System columns and columns the schema does not know are ignored, corrupt
/// widths become "unset", and group indices are renumbered to stay contiguous.
/// A `visible_index` equal to the column's default position is not written,
/// so a schema that never had one keeps it unset.
pub fn apply_widget_change(
    change: &[WidgetColumnState],
    schema: &[ColumnSchema],
    settings: &ColumnSettings,
) -> Vec<ColumnSchema> {
    let mut updated = schema.to_vec();

    for state in change {
        let Some(name) = state.data_field.as_deref() else {
            continue;
        };
        if settings.is_system_column(name) {
            continue;
        }
        let Some((index, column)) = updated
            .iter_mut()
            .enumerate()
            .find(|(_, column)| column.name == name)
        else {
            tracing::debug!(column = name, "widget reported an unknown column, ignoring");
            continue;
        };

        let width = state.width.sanitize();
        if width.is_none() && state.width != RawWidth::Unset {
            tracing::warn!(column = name, width = ?state.width, "discarding invalid column width");
        }
        column.width = width;
        column.visible = state.visible;
        if state.visible_index != column.visible_index.or(Some(index as u32)) {
            column.visible_index = state.visible_index;
        }
        column.group_index = state.group_index.and_then(|g| u32::try_from(g).ok());
    }

    normalize_group_indices(&mut updated);
    updated
}

/// Renumber group indices to 0..n, keeping their relative order
pub fn normalize_group_indices(schema: &mut [ColumnSchema]) {
    let mut grouped: Vec<(u32, usize)> = schema
        .iter()
        .enumerate()
        .filter_map(|(position, column)| column.group_index.map(|g| (g, position)))
        .collect();
    grouped.sort_unstable();

    for (next, (_, position)) in grouped.into_iter().enumerate() {
        schema[position].group_index = Some(next as u32);
    }
}

/// The business group-by string: grouped column names in group order
pub fn group_by_string(schema: &[ColumnSchema]) -> String {
    let mut grouped: Vec<(u32, &str)> = schema
        .iter()
        .filter_map(|column| column.group_index.map(|g| (g, column.name.as_str())))
        .collect();
    grouped.sort_by_key(|(g, _)| *g);
    grouped
        .into_iter()
        .map(|(_, name)| name)
        .collect::<Vec<_>>()
        .join(",")
}

/// Set the schema's group indices from a comma-separated group-by string.
///
/// Names the schema doesn't know are skipped without leaving a gap.
pub fn apply_group_by(schema: &[ColumnSchema], group_by: &str) -> Vec<ColumnSchema> {
    let mut updated = schema.to_vec();
    for column in &mut updated {
        column.group_index = None;
    }

    let mut next = 0;
    for name in group_by.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match updated.iter_mut().find(|c| c.name == name) {
            Some(column) if column.group_index.is_none() => {
                column.group_index = Some(next);
                next += 1;
            }
            Some(_) => {}
            None => tracing::debug!(column = name, "group-by names an unknown column"),
        }
    }
    updated
}
