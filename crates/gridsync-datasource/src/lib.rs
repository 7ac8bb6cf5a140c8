//! Data-source bridge for GridSync
//!
//! The widget consumes a generic load/by_key/insert/update/remove provider.
//! Two interchangeable implementations sit behind `GridDataSource`:
//!
//! - `RemoteDataSource` translates the calls into business store searches,
//!   reads, saves and deletes
//! - `LocalDataSource` serves an in-memory row array (detail tables living
//!   inside a parent record) and calls host-supplied handlers to persist
//!
//! Records cross this boundary by value, so nothing the widget does to a
//! returned record can reach the source of truth.

mod error;
mod local;
mod remote;
mod source;

pub use error::{DataSourceError, DataSourceResult};
pub use local::{FormRecordSource, LocalDataSource, LocalRecordHandlers, NoHandlers};
pub use remote::RemoteDataSource;
pub use source::{GridDataSource, LoadOptions, LoadResult};
