//! Row selection for GridSync
//!
//! Selection is keyed by `RowKey`, never by the widget's row index, so it
//! survives the widget re-creating its row objects after a sort, filter or
//! group change.

mod store;

pub use store::{HeaderState, SelectionStore};
