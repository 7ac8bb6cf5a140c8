//! Filter/sort translation for GridSync
//!
//! The grid widget describes filters as nested JSON arrays
//! (`["field", "op", value]` or `[expr, "and", expr, ...]`) and sorts as
//! `{selector, desc}` lists. The business store wants a `Filter`/`Criteria`
//! tree and a `-`-prefixed field list. Everything here is a pure function.
//!
//! The crate also evaluates criteria and sort orders against in-memory records,
//! for data sources that never reach the business store.

mod eval;
mod sort;
mod translate;
mod widget_filter;

pub use eval::{RecordPredicate, compare_values, sort_records};
pub use sort::{SortDirection, SortField, SortUpdate, WidgetSort, widget_sort_to_business};
pub use translate::{
    business_filter_to_widget, map_widget_operator, widget_filter_to_business,
    widget_json_to_business,
};
pub use widget_filter::{GroupOperand, WidgetFilter};
