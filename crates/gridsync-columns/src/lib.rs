//! Column state reconciliation for GridSync
//!
//! The host owns the business column schema; the widget owns its column
//! options. The forward mapping (`mapping`) is authoritative and builds the
//! widget's columns from the schema. The reverse mapping (`reverse`) is a
//! filtered, diffed write-back of the widget's column events into the schema.
//! `ColumnReconciler` ties both to one observable schema.

mod mapping;
mod reconciler;
mod reverse;
mod widget;

pub use mapping::{
    FixedOffsets, display_type, fields_to_fetch, fixed_offsets, lookup_for, merge_saved_state,
    selection_column, to_widget_columns,
};
pub use reconciler::ColumnReconciler;
pub use reverse::{apply_group_by, apply_widget_change, group_by_string, normalize_group_indices};
pub use widget::{
    BUTTON_PREFIX, ColumnKind, DisplayType, FixedPosition, LookupItem, RawWidth, SELECTION_COLUMN,
    WidgetColumn, WidgetColumnState,
};
