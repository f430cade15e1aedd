use std::fmt;

use serde::Serialize;

use crate::error::{AlertError, SyncError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Pull,
    Push,
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::Pull => f.write_str("pull"),
            SyncDirection::Push => f.write_str("push"),
        }
    }
}

/// What happened to one item of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Created,
    Updated,
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub direction: SyncDirection,
    /// Candidates the batch started with.
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub last_error: Option<String>,
    /// The run stopped early; counts cover what was processed.
    pub cancelled: bool,
}

impl SyncSummary {
    pub fn new(direction: SyncDirection) -> Self {
        Self {
            direction,
            total: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            last_error: None,
            cancelled: false,
        }
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }

    pub(crate) fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.created += 1,
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Skipped => self.skipped += 1,
        }
    }

    pub(crate) fn record_failure(&mut self, name: &str, error: &AlertError) {
        self.failed += 1;
        self.last_error = Some(format!("{name}: {error}"));
    }

    /// Any failure turns the run into a [`SyncError`] carrying this summary.
    pub fn into_result(self) -> Result<SyncSummary, AlertError> {
        if self.failed > 0 {
            Err(SyncError { summary: self }.into())
        } else {
            Ok(self)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncHealth {
    Healthy,
    RemoteUnavailable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// `None` when the remote listing failed.
    pub remote_count: Option<usize>,
    pub local_count: u64,
    pub health: SyncHealth,
    pub last_error: Option<String>,
}
