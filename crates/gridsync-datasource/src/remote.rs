//! Data source backed by the business store

use std::sync::Arc;

use async_trait::async_trait;
use gridsync_core::{
    CriteriaNode, DataRecord, DataStore, DeleteRequest, RowKey, SearchOptions, record_version,
};
use gridsync_query::widget_json_to_business;
use gridsync_settings::DataSettings;

use crate::error::{DataSourceError, DataSourceResult};
use crate::source::{GridDataSource, LoadOptions, LoadResult};

/// Exposes a `DataStore` as the widget's data provider.
///
/// The caller's base search options (domain filter, default sort, page size)
/// are composed with whatever the widget asks for on every load.
pub struct RemoteDataSource {
    store: Arc<dyn DataStore>,
    base: SearchOptions,
    fields: Vec<String>,
    settings: DataSettings,
}

impl RemoteDataSource {
    pub fn new(store: Arc<dyn DataStore>, fields: Vec<String>) -> Self {
        Self {
            store,
            base: SearchOptions::default(),
            fields,
            settings: DataSettings::default(),
        }
    }

    pub fn with_base_options(mut self, base: SearchOptions) -> Self {
        self.base = base;
        self
    }

    pub fn with_settings(mut self, settings: DataSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn persisted_id(key: RowKey) -> DataSourceResult<i64> {
        key.persisted_id().ok_or(DataSourceError::RecordNotFound(key))
    }

    /// Compose the widget's load request with the base options
    pub fn search_options(&self, options: &LoadOptions) -> SearchOptions {
        let mut search = self.base.clone();
        search.fields = self.fields.clone();
        search.sort_by = options.sort_update().apply(search.sort_by);

        let widget_filter = options.filter.as_ref().and_then(widget_json_to_business);
        search.filter = CriteriaNode::and_combine(search.filter, widget_filter);

        if options.skip.is_some() {
            search.offset = options.skip;
        }
        if options.take.is_some() {
            search.limit = options.take;
        }
        search
    }
}

#[async_trait]
impl GridDataSource for RemoteDataSource {
    #[tracing::instrument(skip(self))]
    async fn load(&self, options: LoadOptions) -> DataSourceResult<LoadResult> {
        let search = self.search_options(&options);
        tracing::debug!(sort_by = ?search.sort_by, filter = ?search.filter, "searching");

        let result = self
            .store
            .search(search)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "load failed"))?;

        // Some stores report 0 when they skipped counting
        let total_count = if result.total_count == 0 {
            result.records.len()
        } else {
            result.total_count
        };
        Ok(LoadResult {
            data: result.records,
            total_count,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn by_key(&self, key: RowKey) -> DataSourceResult<DataRecord> {
        let id = Self::persisted_id(key)?;
        Ok(self.store.read(id, &self.fields).await?)
    }

    #[tracing::instrument(skip(self, values))]
    async fn insert(&self, mut values: DataRecord) -> DataSourceResult<DataRecord> {
        // the placeholder key is a client-side artifact
        values.remove(&self.settings.key_field);

        let saved = self.store.save(values, &self.fields).await?;
        tracing::info!(id = ?saved.get(&self.settings.key_field), "record inserted");
        Ok(saved)
    }

    #[tracing::instrument(skip(self, values))]
    async fn update(&self, key: RowKey, values: DataRecord) -> DataSourceResult<DataRecord> {
        let id = Self::persisted_id(key)?;

        let mut record = self.store.read(id, &self.fields).await?;
        tracing::debug!(fields = values.len(), "merging changed fields over stored record");
        record.extend(values);

        let saved = self.store.save(record, &self.fields).await?;
        tracing::info!(id, "record updated");
        Ok(saved)
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: RowKey) -> DataSourceResult<()> {
        let id = Self::persisted_id(key)?;

        let fields = [
            self.settings.key_field.clone(),
            self.settings.version_field.clone(),
        ];
        let record = self.store.read(id, &fields).await?;
        let version = record_version(&record, &self.settings.version_field);

        self.store.delete(DeleteRequest { id, version }).await?;
        tracing::info!(id, version, "record removed");
        Ok(())
    }
}
