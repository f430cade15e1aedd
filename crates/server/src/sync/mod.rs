//! Two-way reconciliation between the local store and the remote alerting service.
//!
//! Both directions walk the full candidate set and treat each item on its own:
//! an item that fails is counted and the batch moves on. Items already written
//! stay written whatever happens to the rest of the batch.

pub mod decision;
pub mod summary;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};

use self::decision::{ChangeDecision, decide};
use self::summary::{ItemOutcome, SyncDirection, SyncHealth, SyncStatus, SyncSummary};
use crate::aggregate::AlertAggregate;
use crate::error::AlertError;
use crate::remote::{ListedAlert, RemoteAlert, RemoteAlertGateway};
use crate::service::AlertService;

pub struct SyncEngine {
    service: AlertService,
    gateway: Arc<dyn RemoteAlertGateway>,
    local_page_size: u64,
    /// Held for the whole of a pull or push; the two directions exclude each other.
    in_progress: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        service: AlertService,
        gateway: Arc<dyn RemoteAlertGateway>,
        local_page_size: u64,
    ) -> Self {
        Self {
            service,
            gateway,
            local_page_size: local_page_size.max(1),
            in_progress: Mutex::new(()),
        }
    }

    pub async fn pull_from_remote(&self) -> Result<SyncSummary, AlertError> {
        self.pull_from_remote_while(&AtomicBool::new(true)).await
    }

    /// Pulls every remote alert into the local store. Stops taking new items once
    /// `running` is cleared.
    #[tracing::instrument(skip(self, running))]
    pub async fn pull_from_remote_while(
        &self,
        running: &AtomicBool,
    ) -> Result<SyncSummary, AlertError> {
        let _guard = self.claim(SyncDirection::Pull)?;
        let remote = self.gateway.list().await?;

        let mut summary = SyncSummary::new(SyncDirection::Pull);
        summary.total = remote.len();

        for item in remote {
            if !running.load(Ordering::SeqCst) {
                summary.cancelled = true;
                break;
            }
            let name = match &item {
                Ok(alert) => alert.name.clone(),
                Err(malformed) => malformed.name.clone(),
            };
            match self.pull_one(item).await {
                Ok(outcome) => {
                    tracing::info!(
                        name = "sync.pull.item",
                        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                        message = "Pulled alert",
                        alert_name = %name,
                        outcome = ?outcome,
                    );
                    summary.record(outcome);
                }
                Err(e) => {
                    tracing::warn!(
                        name = "sync.pull.item_failed",
                        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                        message = "Failed to pull alert",
                        alert_name = %name,
                        error = %e,
                    );
                    summary.record_failure(&name, &e);
                }
            }
        }

        log_summary(&summary);
        summary.into_result()
    }

    async fn pull_one(&self, item: ListedAlert) -> Result<ItemOutcome, AlertError> {
        let item = item.map_err(|m| {
            AlertError::Validation(format!("malformed remote alert: {}", m.reason))
        })?;
        let mut incoming = AlertAggregate::try_from(item)?;
        let Some(local) = self.service.find_by_name(&incoming.name).await? else {
            self.service.create(&incoming).await?;
            return Ok(ItemOutcome::Created);
        };
        match decide(&local, &incoming) {
            ChangeDecision::Update => {
                incoming.id = local.id;
                self.service.update(&incoming).await?;
                Ok(ItemOutcome::Updated)
            }
            ChangeDecision::Skip => Ok(ItemOutcome::Skipped),
        }
    }

    pub async fn push_to_remote(&self) -> Result<SyncSummary, AlertError> {
        self.push_to_remote_while(&AtomicBool::new(true)).await
    }

    /// Pushes every local alert to the remote side, walking the store page by page.
    #[tracing::instrument(skip(self, running))]
    pub async fn push_to_remote_while(
        &self,
        running: &AtomicBool,
    ) -> Result<SyncSummary, AlertError> {
        let _guard = self.claim(SyncDirection::Push)?;
        let store = self.service.store();

        let mut summary = SyncSummary::new(SyncDirection::Push);
        let mut offset = 0;
        'pages: loop {
            let page = store.list(offset, self.local_page_size).await?;
            summary.total = usize::try_from(page.total).unwrap_or(usize::MAX);
            if page.items.is_empty() {
                break;
            }
            offset += page.items.len() as u64;

            for alert in &page.items {
                if !running.load(Ordering::SeqCst) {
                    summary.cancelled = true;
                    break 'pages;
                }
                match self.push_one(alert).await {
                    Ok(outcome) => {
                        tracing::info!(
                            name = "sync.push.item",
                            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                            message = "Pushed alert",
                            alert_name = %alert.name,
                            outcome = ?outcome,
                        );
                        summary.record(outcome);
                    }
                    Err(e) => {
                        tracing::warn!(
                            name = "sync.push.item_failed",
                            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                            message = "Failed to push alert",
                            alert_name = %alert.name,
                            error = %e,
                        );
                        summary.record_failure(&alert.name, &e);
                    }
                }
            }

            if offset >= page.total {
                break;
            }
        }

        log_summary(&summary);
        summary.into_result()
    }

    /// Only a definite miss routes to create; a failed lookup is an item failure.
    async fn push_one(&self, alert: &AlertAggregate) -> Result<ItemOutcome, AlertError> {
        let remote = RemoteAlert::from(alert);
        match self.gateway.get_by_name(&alert.name).await? {
            Some(_) => {
                self.gateway.update(&alert.name, &remote).await?;
                Ok(ItemOutcome::Updated)
            }
            None => {
                self.gateway.create(&remote).await?;
                Ok(ItemOutcome::Created)
            }
        }
    }

    /// Counts on both sides. A failing remote is reported, not raised.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self) -> Result<SyncStatus, AlertError> {
        let local_count = self.service.count().await?;
        match self.gateway.list().await {
            Ok(remote) => Ok(SyncStatus {
                remote_count: Some(remote.len()),
                local_count,
                health: SyncHealth::Healthy,
                last_error: None,
            }),
            Err(e) => {
                tracing::warn!(
                    name = "sync.status.remote_unavailable",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    message = "Remote alert service unreachable",
                    error = %e,
                    unavailable = e.is_unavailable(),
                );
                Ok(SyncStatus {
                    remote_count: None,
                    local_count,
                    health: SyncHealth::RemoteUnavailable,
                    last_error: Some(e.to_string()),
                })
            }
        }
    }

    fn claim(&self, direction: SyncDirection) -> Result<MutexGuard<'_, ()>, AlertError> {
        self.in_progress
            .try_lock()
            .map_err(|_| AlertError::SyncInProgress(direction))
    }
}

fn log_summary(summary: &SyncSummary) {
    tracing::info!(
        name = "sync.batch.completed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        message = "Sync batch finished",
        direction = %summary.direction,
        total = summary.total,
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        cancelled = summary.cancelled,
    );
}
