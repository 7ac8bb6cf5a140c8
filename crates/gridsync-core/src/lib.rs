//! GridSync Core - shared abstractions for the grid synchronization layer
//!
//! This crate holds the types every other GridSync crate agrees on:
//!
//! - `RowKey` - pending (unsaved) vs persisted row identity
//! - `DataRecord` - a business record as a JSON object
//! - `ColumnSchema` / `FieldMeta` - the host's column configuration and field metadata
//! - `Filter` / `Criteria` - the business query's criteria tree
//! - `DataStore` - the business store contract consumed by the data-source bridge

mod criteria;
mod error;
mod schema;
mod store;
mod types;

pub use criteria::*;
pub use error::*;
pub use schema::*;
pub use store::*;
pub use types::*;
