use std::time::Duration;

use hyper::StatusCode;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::sync::summary::{SyncDirection, SyncSummary};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error talking to remote alert service: {0}")]
    Network(String),
    #[error("HTTP status {status} from remote alert service: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Invalid JSON from remote alert service: {0}")]
    Json(String),
    #[error("Invalid remote endpoint: {0}")]
    InvalidEndpoint(String),
}

impl RemoteError {
    /// True when the remote side could not be reached at all, as opposed to
    /// answering with something we could not use.
    pub fn is_unavailable(&self) -> bool {
        match self {
            RemoteError::Timeout(_) | RemoteError::Network(_) => true,
            RemoteError::Http { status, .. } => status.is_server_error(),
            RemoteError::Json(_) | RemoteError::InvalidEndpoint(_) => false,
        }
    }
}

/// Batch-level failure of a reconciliation run. Items that succeeded are already
/// committed; the summary says how many.
#[derive(Debug, Error)]
#[error(
    "{} completed with {} failures. Last error: {}",
    .summary.direction,
    .summary.failed,
    .summary.last_error.as_deref().unwrap_or("none")
)]
pub struct SyncError {
    pub summary: SyncSummary,
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence failure while {context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("Remote alert service request failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("A {0} is already in progress")]
    SyncInProgress(SyncDirection),
}

impl AlertError {
    pub fn persistence(context: &'static str) -> impl FnOnce(DbErr) -> AlertError {
        move |source| AlertError::Persistence { context, source }
    }

    pub fn not_found_id(id: i32) -> AlertError {
        AlertError::NotFound(format!("alert with id {id}"))
    }

    pub fn not_found_name(name: &str) -> AlertError {
        AlertError::NotFound(format!("alert with name '{name}'"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AlertError::NotFound(_))
    }
}

/// Translates a unique-constraint violation into a validation error carrying
/// `message`; everything else stays a persistence failure.
pub(crate) fn unique_as_validation(
    context: &'static str,
    message: impl FnOnce() -> String,
) -> impl FnOnce(DbErr) -> AlertError {
    move |source| match source.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AlertError::Validation(message()),
        _ => AlertError::Persistence { context, source },
    }
}
