mod common;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use alert_rule_sync::aggregate::{AlertAggregate, AlertStatus};
use alert_rule_sync::error::{AlertError, RemoteError, SyncError};
use alert_rule_sync::remote::{
    DisconnectedGateway, ListedAlert, MalformedAlert, RemoteAlert, RemoteAlertGateway,
};
use alert_rule_sync::service::AlertService;
use alert_rule_sync::store::AlertStore;
use alert_rule_sync::sync::SyncEngine;
use alert_rule_sync::sync::summary::{SyncDirection, SyncHealth};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::Notify;

use common::{count_rows, fail_inserts_into, full_alert, setup_test_db};

/// In-memory remote side that records what was pushed to it.
#[derive(Default)]
struct FakeGateway {
    alerts: Mutex<Vec<RemoteAlert>>,
    created: Mutex<Vec<String>>,
    updated: Mutex<Vec<String>>,
    broken_lookups: Vec<String>,
    /// Listed after the readable alerts.
    unreadable: Vec<MalformedAlert>,
}

impl FakeGateway {
    fn with_alerts(alerts: Vec<RemoteAlert>) -> Self {
        Self {
            alerts: Mutex::new(alerts),
            ..Default::default()
        }
    }

    fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    fn updated(&self) -> Vec<String> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAlertGateway for FakeGateway {
    async fn list(&self) -> Result<Vec<ListedAlert>, RemoteError> {
        let readable = self.alerts.lock().unwrap().clone().into_iter().map(Ok);
        Ok(readable.chain(self.unreadable.iter().cloned().map(Err)).collect())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<RemoteAlert>, RemoteError> {
        if self.broken_lookups.iter().any(|n| n == name) {
            return Err(RemoteError::Network("connection reset".into()));
        }
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.name == name)
            .cloned())
    }

    async fn create(&self, alert: &RemoteAlert) -> Result<(), RemoteError> {
        self.created.lock().unwrap().push(alert.name.clone());
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    async fn update(&self, name: &str, alert: &RemoteAlert) -> Result<(), RemoteError> {
        self.updated.lock().unwrap().push(name.to_string());
        let mut alerts = self.alerts.lock().unwrap();
        if let Some(existing) = alerts.iter_mut().find(|a| a.name == name) {
            *existing = alert.clone();
        }
        Ok(())
    }
}

/// Remote side whose listing blocks until released.
struct GatedGateway {
    gate: Arc<Notify>,
}

#[async_trait]
impl RemoteAlertGateway for GatedGateway {
    async fn list(&self) -> Result<Vec<ListedAlert>, RemoteError> {
        self.gate.notified().await;
        Ok(Vec::new())
    }

    async fn get_by_name(&self, _name: &str) -> Result<Option<RemoteAlert>, RemoteError> {
        Ok(None)
    }

    async fn create(&self, _alert: &RemoteAlert) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn update(&self, _name: &str, _alert: &RemoteAlert) -> Result<(), RemoteError> {
        Ok(())
    }
}

fn remote(name: &str, modified: i64) -> RemoteAlert {
    let mut alert = full_alert(name);
    alert.last_modified_time = Some(modified);
    RemoteAlert::from(&alert)
}

fn engine(
    db: Arc<DatabaseConnection>,
    gateway: Arc<dyn RemoteAlertGateway>,
    page_size: u64,
) -> SyncEngine {
    SyncEngine::new(AlertService::new(AlertStore::new(db)), gateway, page_size)
}

#[tokio::test]
async fn pull_creates_missing_and_updates_changed() {
    let db = setup_test_db().await;
    let store = AlertStore::new(db.clone());
    let mut local = full_alert("b");
    local.last_modified_time = Some(1);
    store.create(&local).await.unwrap();

    let mut changed = remote("b", 2);
    changed.display_name = "new display".into();
    let gateway = Arc::new(FakeGateway::with_alerts(vec![remote("a", 1), changed]));

    let summary = engine(db.clone(), gateway, 100)
        .pull_from_remote()
        .await
        .expect("pull failed");

    assert_eq!(summary.direction, SyncDirection::Pull);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let b = store.get_by_name("b").await.unwrap();
    assert_eq!(b.display_name, "new display");
    assert_eq!(b.last_modified_time, Some(2));
    assert!(store.get_by_name("a").await.is_ok());
}

#[tokio::test]
async fn pulling_twice_skips_unchanged_alerts() {
    let db = setup_test_db().await;
    let gateway = Arc::new(FakeGateway::with_alerts(vec![remote("a", 1), remote("b", 1)]));
    let engine = engine(db.clone(), gateway, 100);

    let first = engine.pull_from_remote().await.unwrap();
    assert_eq!(first.created, 2);

    let second = engine.pull_from_remote().await.unwrap();
    assert_eq!(second.skipped, 2);
    assert_eq!(second.created + second.updated, 0);
    assert_eq!(count_rows(&db, "alerts").await, 2);
    assert_eq!(count_rows(&db, "alert_queries").await, 4);
}

#[tokio::test]
async fn one_bad_item_does_not_stop_the_pull() {
    let db = setup_test_db().await;
    fail_inserts_into(&db, "alerts", Some("NEW.name = 'r3'")).await;
    let alerts = (1..=5).map(|i| remote(&format!("r{i}"), 1)).collect();
    let gateway = Arc::new(FakeGateway::with_alerts(alerts));

    let err = engine(db.clone(), gateway, 100)
        .pull_from_remote()
        .await
        .unwrap_err();

    let AlertError::Sync(SyncError { summary }) = err else {
        panic!("expected a sync error, got {err:?}");
    };
    assert_eq!(summary.total, 5);
    assert_eq!(summary.created, 4);
    assert_eq!(summary.failed, 1);
    assert!(summary.last_error.as_deref().unwrap().starts_with("r3: "));

    let store = AlertStore::new(db.clone());
    assert_eq!(store.count().await.unwrap(), 4);
    assert!(store.get_by_name("r3").await.unwrap_err().is_not_found());
    // the failed item left none of its children behind
    assert_eq!(count_rows(&db, "alert_configurations").await, 4);
}

#[tokio::test]
async fn invalid_remote_status_is_an_item_failure() {
    let db = setup_test_db().await;
    let mut bad = remote("bad", 1);
    bad.status = Some("PAUSED".into());
    let gateway = Arc::new(FakeGateway::with_alerts(vec![bad, remote("good", 1)]));

    let err = engine(db.clone(), gateway, 100)
        .pull_from_remote()
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("pull completed with 1 failures"));
    assert!(err.to_string().contains("PAUSED"));
    assert_eq!(count_rows(&db, "alerts").await, 1);
}

#[tokio::test]
async fn unreadable_remote_entry_is_counted_and_skipped() {
    let db = setup_test_db().await;
    let gateway = Arc::new(FakeGateway {
        alerts: Mutex::new(vec![remote("a", 1), remote("c", 1)]),
        unreadable: vec![MalformedAlert {
            name: "b".into(),
            reason: "missing field `displayName`".into(),
        }],
        ..Default::default()
    });

    let err = engine(db.clone(), gateway, 100)
        .pull_from_remote()
        .await
        .unwrap_err();

    let AlertError::Sync(SyncError { summary }) = err else {
        panic!("expected a sync error, got {err:?}");
    };
    assert_eq!(summary.total, 3);
    assert_eq!(summary.created, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.last_error.as_deref().unwrap().starts_with("b: "));
    assert!(summary.last_error.as_deref().unwrap().contains("displayName"));
    assert_eq!(count_rows(&db, "alerts").await, 2);
}

#[tokio::test]
async fn pull_propagates_listing_failure() {
    let db = setup_test_db().await;
    let gateway = Arc::new(DisconnectedGateway::new("no endpoint"));

    let err = engine(db, gateway, 100).pull_from_remote().await.unwrap_err();
    assert!(matches!(err, AlertError::Remote(RemoteError::InvalidEndpoint(_))));
}

#[tokio::test]
async fn push_walks_every_local_page() {
    let db = setup_test_db().await;
    let store = AlertStore::new(db.clone());
    for i in 0..5 {
        store.create(&full_alert(&format!("alert-{i}"))).await.unwrap();
    }
    let gateway = Arc::new(FakeGateway::with_alerts(vec![remote("alert-1", 1)]));

    let summary = engine(db, gateway.clone(), 2)
        .push_to_remote()
        .await
        .expect("push failed");

    assert_eq!(summary.direction, SyncDirection::Push);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.created, 4);
    assert_eq!(summary.updated, 1);
    assert_eq!(gateway.updated(), vec!["alert-1".to_string()]);

    let mut created = gateway.created();
    created.sort();
    assert_eq!(created, ["alert-0", "alert-2", "alert-3", "alert-4"]);
}

#[tokio::test]
async fn failed_remote_lookup_is_not_treated_as_missing() {
    let db = setup_test_db().await;
    let store = AlertStore::new(db.clone());
    store.create(&full_alert("flaky")).await.unwrap();
    store.create(&full_alert("steady")).await.unwrap();
    let gateway = Arc::new(FakeGateway {
        broken_lookups: vec!["flaky".into()],
        ..Default::default()
    });

    let err = engine(db, gateway.clone(), 100)
        .push_to_remote()
        .await
        .unwrap_err();

    let AlertError::Sync(SyncError { summary }) = err else {
        panic!("expected a sync error, got {err:?}");
    };
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.created, 1);
    assert_eq!(gateway.created(), vec!["steady".to_string()]);
}

#[tokio::test]
async fn pushed_alert_carries_its_parts() {
    let db = setup_test_db().await;
    let store = AlertStore::new(db.clone());
    let mut alert = full_alert("cpu-high");
    alert.status = AlertStatus::Disabled;
    store.create(&alert).await.unwrap();
    let gateway = Arc::new(FakeGateway::default());

    engine(db, gateway.clone(), 100).push_to_remote().await.unwrap();

    let pushed = gateway.alerts.lock().unwrap()[0].clone();
    assert_eq!(pushed.status.as_deref(), Some("DISABLED"));
    let cfg = pushed.configuration.expect("configuration pushed");
    assert_eq!(cfg.query_list.len(), 2);
    assert_eq!(cfg.tags, vec!["team-infra".to_string()]);
    assert_eq!(cfg.annotations.len(), 1);
    assert_eq!(pushed.schedule.map(|s| s.kind), Some("FixedRate".to_string()));
}

#[tokio::test]
async fn cleared_running_flag_cancels_the_batch() {
    let db = setup_test_db().await;
    let gateway = Arc::new(FakeGateway::with_alerts(vec![remote("a", 1), remote("b", 1)]));

    let summary = engine(db.clone(), gateway, 100)
        .pull_from_remote_while(&AtomicBool::new(false))
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed(), 0);
    assert_eq!(count_rows(&db, "alerts").await, 0);
}

#[tokio::test]
async fn concurrent_runs_are_refused() {
    let db = setup_test_db().await;
    let gate = Arc::new(Notify::new());
    let engine = engine(db, Arc::new(GatedGateway { gate: gate.clone() }), 100);

    let first = engine.pull_from_remote();
    let second = async {
        tokio::task::yield_now().await;
        let refused = engine.push_to_remote().await;
        gate.notify_one();
        refused
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(matches!(err, AlertError::SyncInProgress(SyncDirection::Push)));
    assert_eq!(err.to_string(), "A push is already in progress");
}

#[tokio::test]
async fn status_reports_both_sides() {
    let db = setup_test_db().await;
    AlertStore::new(db.clone())
        .create(&AlertAggregate::new("local-only", "Local"))
        .await
        .unwrap();

    let healthy = engine(
        db.clone(),
        Arc::new(FakeGateway::with_alerts(vec![remote("a", 1), remote("b", 1)])),
        100,
    )
    .status()
    .await
    .unwrap();
    assert_eq!(healthy.health, SyncHealth::Healthy);
    assert_eq!(healthy.remote_count, Some(2));
    assert_eq!(healthy.local_count, 1);

    let down = engine(db, Arc::new(DisconnectedGateway::new("no endpoint")), 100)
        .status()
        .await
        .unwrap();
    assert_eq!(down.health, SyncHealth::RemoteUnavailable);
    assert_eq!(down.remote_count, None);
    assert_eq!(down.local_count, 1);
    assert!(down.last_error.unwrap().contains("no endpoint"));
}
