//! Error types for the edit session controller

use gridsync_datasource::DataSourceError;
use thiserror::Error;

/// Errors from operations that require or address an open session.
///
/// Validation problems are not errors: they come back inside
/// `CommitOutcome::Invalid` and leave the session open.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No row is being edited")]
    NoActiveSession,

    #[error("Column is not editable: {0}")]
    ColumnNotEditable(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
