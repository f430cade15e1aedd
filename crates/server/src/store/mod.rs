//! Transactional persistence of the alert aggregate.
//!
//! Every write runs inside one database transaction and either commits the whole
//! graph change or nothing. Reads are plain queries on the shared connection.

mod create;
mod delete;
mod read;
pub mod refresh;
mod rows;
mod update;

use std::sync::Arc;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;

use crate::aggregate::{AlertAggregate, AlertStatus};
use crate::entity::alert;
use crate::error::AlertError;

/// One page of hydrated aggregates plus the unpaged total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlertPage {
    pub items: Vec<AlertAggregate>,
    pub total: u64,
}

#[derive(Clone, Debug)]
pub struct AlertStore {
    db: Arc<DatabaseConnection>,
}

impl AlertStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Persists the whole graph and returns it with every identity assigned.
    #[tracing::instrument(skip(self, alert), fields(alert_name = %alert.name))]
    pub async fn create(&self, alert: &AlertAggregate) -> Result<AlertAggregate, AlertError> {
        alert.validate()?;
        let tx = self.begin().await?;
        let result = create::insert_graph(&tx, alert).await;
        let created = finish(tx, result).await?;
        tracing::info!(
            name = "store.alert.created",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            message = "Alert aggregate created",
            alert_id = created.id,
            tags = created.tags.len(),
            queries = created.queries.len(),
        );
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<AlertAggregate, AlertError> {
        let root = read::find_root_by_id(self.connection(), id)
            .await?
            .ok_or_else(|| AlertError::not_found_id(id))?;
        read::hydrate(self.connection(), root).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<AlertAggregate, AlertError> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| AlertError::not_found_name(name))
    }

    /// Like [`get_by_name`](Self::get_by_name) but a miss is `Ok(None)`.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<AlertAggregate>, AlertError> {
        match read::find_root_by_name(self.connection(), name).await? {
            Some(root) => read::hydrate(self.connection(), root).await.map(Some),
            None => Ok(None),
        }
    }

    /// Id of the alert holding `name`, read from the root row only.
    pub async fn name_owner(&self, name: &str) -> Result<Option<i32>, AlertError> {
        Ok(read::find_root_by_name(self.connection(), name)
            .await?
            .map(|root| root.id))
    }

    /// Rewrites an existing graph and returns it as stored after commit.
    #[tracing::instrument(skip(self, alert), fields(alert_name = %alert.name, alert_id = ?alert.id))]
    pub async fn update(&self, alert: &AlertAggregate) -> Result<AlertAggregate, AlertError> {
        alert.validate()?;
        let tx = self.begin().await?;
        let result = update::update_graph(&tx, alert).await;
        let id = finish(tx, result).await?;
        tracing::info!(
            name = "store.alert.updated",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            message = "Alert aggregate updated",
            alert_id = id,
        );
        self.get_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AlertError> {
        let tx = self.begin().await?;
        let result = delete::delete_graph(&tx, id).await;
        finish(tx, result).await?;
        tracing::info!(
            name = "store.alert.deleted",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            message = "Alert aggregate deleted",
            alert_id = id,
        );
        Ok(())
    }

    /// Newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, offset: u64, limit: u64) -> Result<AlertPage, AlertError> {
        self.page(None, offset, limit).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_by_status(
        &self,
        status: AlertStatus,
        offset: u64,
        limit: u64,
    ) -> Result<AlertPage, AlertError> {
        self.page(Some(status), offset, limit).await
    }

    pub async fn count(&self) -> Result<u64, AlertError> {
        alert::Entity::find()
            .count(self.connection())
            .await
            .map_err(AlertError::persistence("counting alerts"))
    }

    async fn page(
        &self,
        status: Option<AlertStatus>,
        offset: u64,
        limit: u64,
    ) -> Result<AlertPage, AlertError> {
        let mut select = alert::Entity::find();
        if let Some(status) = status {
            select = select.filter(alert::Column::Status.eq(status));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(AlertError::persistence("counting alerts"))?;

        let roots = select
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(AlertError::persistence("listing alerts"))?;

        let mut items = Vec::with_capacity(roots.len());
        for root in roots {
            items.push(read::hydrate(self.connection(), root).await?);
        }
        Ok(AlertPage { items, total })
    }

    async fn begin(&self) -> Result<DatabaseTransaction, AlertError> {
        self.db
            .begin()
            .await
            .map_err(AlertError::persistence("opening transaction"))
    }
}

/// Commits on success; rolls back and hands the original error back otherwise.
async fn finish<T>(tx: DatabaseTransaction, result: Result<T, AlertError>) -> Result<T, AlertError> {
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(AlertError::persistence("committing transaction"))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(
                    name = "store.transaction.rollback_failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    error = %rollback,
                    message = "Rollback failed, connection will discard the transaction",
                );
            }
            Err(e)
        }
    }
}
