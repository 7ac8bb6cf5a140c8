use gridsync_core::{GridError, RowKey};
use thiserror::Error;

pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Errors surfaced by the data-source bridge
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Record with key {0} not found")]
    RecordNotFound(RowKey),

    #[error("No {0} handler provided")]
    HandlerMissing(&'static str),
}
