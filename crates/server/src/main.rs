use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alert_rule_sync::AppResources;
use alert_rule_sync::config::load_config_or_panic;
use alert_rule_sync::error::AlertError;
use alert_rule_sync::open_database;
use alert_rule_sync::remote::{DisconnectedGateway, HttpAlertGateway, RemoteAlertGateway};
use alert_rule_sync::service::AlertService;
use alert_rule_sync::store::AlertStore;
use alert_rule_sync::sync::SyncEngine;
use color_eyre::eyre::{WrapErr, bail};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_standard_tracing() {
    let default_directives = "alert_rule_sync=info,hyper=warn,sea_orm=warn";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    initialize_standard_tracing();

    let command = env::args().nth(1).unwrap_or_else(|| "status".to_string());
    if !matches!(command.as_str(), "pull" | "push" | "status") {
        bail!("usage: alert-rule-sync [pull|push|status]");
    }

    let config = Arc::new(load_config_or_panic());
    let db = Arc::new(
        open_database(&config.database_url)
            .await
            .wrap_err("Failed to open database")?,
    );
    let resources = AppResources { db, config };

    let gateway: Arc<dyn RemoteAlertGateway> =
        match HttpAlertGateway::new(&resources.config.remote) {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                tracing::warn!(
                    name = "startup.gateway.unavailable",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    error = %e,
                    message = "Remote gateway could not be built, remote marked unavailable",
                );
                Arc::new(DisconnectedGateway::new(e.to_string()))
            }
        };

    let service = AlertService::new(AlertStore::new(resources.db.clone()));
    let engine = SyncEngine::new(
        service,
        gateway,
        resources.config.sync.local_page_size,
    );

    // Ctrl-C stops the batch after the item in flight.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!(
                    name = "sync.cancel.requested",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    message = "Interrupt received, finishing current item",
                );
                running.store(false, Ordering::SeqCst);
            }
        });
    }

    let output = match command.as_str() {
        "pull" => summary_json(engine.pull_from_remote_while(&running).await)?,
        "push" => summary_json(engine.push_to_remote_while(&running).await)?,
        _ => serde_json::to_string_pretty(&engine.status().await?)?,
    };
    println!("{output}");
    Ok(())
}

/// A batch with item failures still prints its summary before failing.
fn summary_json(
    result: Result<alert_rule_sync::sync::summary::SyncSummary, AlertError>,
) -> color_eyre::eyre::Result<String> {
    match result {
        Ok(summary) => Ok(serde_json::to_string_pretty(&summary)?),
        Err(AlertError::Sync(err)) => {
            println!("{}", serde_json::to_string_pretty(&err.summary)?);
            Err(AlertError::Sync(err).into())
        }
        Err(e) => Err(e.into()),
    }
}
