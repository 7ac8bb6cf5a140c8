use async_trait::async_trait;
use gridsync_core::{DataRecord, RowKey};
use gridsync_query::{SortUpdate, WidgetSort};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataSourceResult;

/// Load request as the widget issues it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub take: Option<usize>,
    #[serde(default)]
    pub sort: Option<Vec<WidgetSort>>,
    #[serde(default)]
    pub group: Option<Vec<WidgetSort>>,
    /// Raw widget filter expression
    #[serde(default)]
    pub filter: Option<Value>,
}

impl LoadOptions {
    pub fn page(skip: usize, take: usize) -> Self {
        Self {
            skip: Some(skip),
            take: Some(take),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: Vec<WidgetSort>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_group(mut self, group: Vec<WidgetSort>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sort change carried by this request
    pub fn sort_update(&self) -> SortUpdate {
        SortUpdate::from_widget(self.group.as_deref(), self.sort.as_deref())
    }
}

/// One page of rows for the widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub data: Vec<DataRecord>,
    pub total_count: usize,
}

/// The CRUD contract the widget expects from its data provider
#[async_trait]
pub trait GridDataSource: Send + Sync {
    async fn load(&self, options: LoadOptions) -> DataSourceResult<LoadResult>;

    async fn by_key(&self, key: RowKey) -> DataSourceResult<DataRecord>;

    /// Insert a new row; `values` may still carry the placeholder key
    async fn insert(&self, values: DataRecord) -> DataSourceResult<DataRecord>;

    /// Update a row with the subset of fields that changed
    async fn update(&self, key: RowKey, values: DataRecord) -> DataSourceResult<DataRecord>;

    async fn remove(&self, key: RowKey) -> DataSourceResult<()>;
}
