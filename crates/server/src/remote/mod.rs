//! The remote alerting service, seen as an aggregate store with list/get/create/update.

mod convert;
pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::error::RemoteError;

pub use http::HttpAlertGateway;
pub use types::{MalformedAlert, RemoteAlert};

/// One entry of a remote listing; unreadable entries are kept so callers can
/// account for them.
pub type ListedAlert = Result<RemoteAlert, MalformedAlert>;

#[async_trait]
pub trait RemoteAlertGateway: Send + Sync {
    /// Every alert the remote side holds. `Err` is for the listing as a whole.
    async fn list(&self) -> Result<Vec<ListedAlert>, RemoteError>;

    /// `Ok(None)` when the remote side has no alert by that name.
    async fn get_by_name(&self, name: &str) -> Result<Option<RemoteAlert>, RemoteError>;

    async fn create(&self, alert: &RemoteAlert) -> Result<(), RemoteError>;

    async fn update(&self, name: &str, alert: &RemoteAlert) -> Result<(), RemoteError>;
}

/// Stand-in used when no real gateway could be built; every call fails with the
/// reason it could not be built.
#[derive(Clone, Debug)]
pub struct DisconnectedGateway {
    reason: String,
}

impl DisconnectedGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> RemoteError {
        RemoteError::InvalidEndpoint(self.reason.clone())
    }
}

#[async_trait]
impl RemoteAlertGateway for DisconnectedGateway {
    async fn list(&self) -> Result<Vec<ListedAlert>, RemoteError> {
        Err(self.error())
    }

    async fn get_by_name(&self, _name: &str) -> Result<Option<RemoteAlert>, RemoteError> {
        Err(self.error())
    }

    async fn create(&self, _alert: &RemoteAlert) -> Result<(), RemoteError> {
        Err(self.error())
    }

    async fn update(&self, _name: &str, _alert: &RemoteAlert) -> Result<(), RemoteError> {
        Err(self.error())
    }
}
