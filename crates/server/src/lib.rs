//! Persistence and two-way reconciliation of alert rule aggregates.
//!
//! An alert rule is one root row fanning out into a configuration with its own
//! blocks and collections, a schedule, tags and queries. [`store::AlertStore`]
//! writes and reads that graph transactionally; [`sync::SyncEngine`] keeps it in
//! step with a remote alerting service reached through
//! [`remote::RemoteAlertGateway`].

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

use crate::config::AppConfig;

pub mod aggregate;
pub mod config;
pub mod entity;
pub mod error;
pub mod remote;
pub mod service;
pub mod store;
pub mod sync;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

/// Connects and makes sure every table exists.
pub async fn open_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
