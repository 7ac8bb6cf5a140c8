//! Business data store contract
//!
//! The store's transport and persistence live outside GridSync. The data-source
//! bridge is the only consumer of this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CriteriaNode, DataRecord, GridResult};

/// Query options for `DataStore::search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Fields to fetch; empty means the store's default set
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<CriteriaNode>,
    /// Field names, `-` prefix for descending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Page of records returned by a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub records: Vec<DataRecord>,
    /// Total number of matching records across all pages; 0 when unknown
    #[serde(default)]
    pub total_count: usize,
}

/// Identity and concurrency version of a record to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
    pub version: i64,
}

/// The host application's business store
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Search records
    async fn search(&self, options: SearchOptions) -> GridResult<SearchResult>;

    /// Read one record by its primary identifier
    async fn read(&self, id: i64, fields: &[String]) -> GridResult<DataRecord>;

    /// Insert (no id) or update (with id and version) a record, returning the
    /// stored record
    async fn save(&self, record: DataRecord, fields: &[String]) -> GridResult<DataRecord>;

    /// Delete a record, checking its concurrency version
    async fn delete(&self, request: DeleteRequest) -> GridResult<()>;
}
