mod common;

use alert_rule_sync::aggregate::{AlertAggregate, AlertStatus, Query};
use alert_rule_sync::error::AlertError;
use alert_rule_sync::service::AlertService;
use alert_rule_sync::store::AlertStore;

use common::{full_alert, setup_test_db};

async fn setup_service() -> AlertService {
    AlertService::new(AlertStore::new(setup_test_db().await))
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let service = setup_service().await;

    let err = service.create(&AlertAggregate::new("", "CPU")).await.unwrap_err();
    assert!(matches!(err, AlertError::Validation(_)));

    let mut alert = AlertAggregate::new("cpu-high", "CPU");
    alert.queries.push(Query::default());
    let err = service.create(&alert).await.unwrap_err();
    assert!(matches!(err, AlertError::Validation(ref m) if m.contains("query")));

    assert_eq!(service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_rejects_taken_name() {
    let service = setup_service().await;
    service.create(&full_alert("cpu-high")).await.unwrap();

    let err = service
        .create(&AlertAggregate::new("cpu-high", "Another"))
        .await
        .unwrap_err();
    assert!(matches!(err, AlertError::Validation(ref m) if m.contains("cpu-high")));
}

#[tokio::test]
async fn zero_id_and_blank_name_are_rejected() {
    let service = setup_service().await;

    assert!(matches!(service.get(0).await, Err(AlertError::Validation(_))));
    assert!(matches!(service.delete(0).await, Err(AlertError::Validation(_))));
    assert!(matches!(service.get_by_name("  ").await, Err(AlertError::Validation(_))));
    assert!(service.get(7).await.unwrap_err().is_not_found());
    assert!(service.find_by_name("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn update_requires_an_id() {
    let service = setup_service().await;
    let created = service.create(&full_alert("cpu-high")).await.unwrap();

    let mut no_id = created.clone();
    no_id.id = None;
    let err = service.update(&no_id).await.unwrap_err();
    assert!(matches!(err, AlertError::Validation(ref m) if m.contains("id")));

    let mut changed = created.clone();
    changed.status = AlertStatus::Disabled;
    changed.description = None;
    let updated = service.update(&changed).await.unwrap();
    assert_eq!(updated.status, AlertStatus::Disabled);
    assert!(updated.description.is_none());
}

#[tokio::test]
async fn update_rejects_name_owned_by_another_alert() {
    let service = setup_service().await;
    service.create(&full_alert("cpu-high")).await.unwrap();
    let other = service.create(&full_alert("mem-high")).await.unwrap();

    let mut clash = other.clone();
    clash.name = "cpu-high".into();
    let err = service.update(&clash).await.unwrap_err();
    assert!(matches!(err, AlertError::Validation(ref m) if m.contains("already exists")));
}

#[tokio::test]
async fn list_normalises_page_arguments() {
    let service = setup_service().await;
    for i in 0..3 {
        service
            .create(&AlertAggregate::new(format!("alert-{i}"), "x"))
            .await
            .unwrap();
    }

    let listing = service.list(0, 0).await.unwrap();
    assert_eq!(listing.page, 1);
    assert_eq!(listing.page_size, 20);
    assert_eq!(listing.total, 3);
    assert_eq!(listing.items.len(), 3);

    let listing = service.list(2, 2).await.unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name, "alert-0");

    let listing = service.list(1, 500).await.unwrap();
    assert_eq!(listing.page_size, 20);
}

#[tokio::test]
async fn list_by_status_parses_status_text() {
    let service = setup_service().await;
    let mut disabled = AlertAggregate::new("quiet", "Quiet");
    disabled.status = AlertStatus::Disabled;
    service.create(&disabled).await.unwrap();
    service.create(&AlertAggregate::new("loud", "Loud")).await.unwrap();

    let listing = service.list_by_status("DISABLED", 1, 10).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].name, "quiet");

    let err = service.list_by_status("paused", 1, 10).await.unwrap_err();
    assert!(matches!(err, AlertError::Validation(ref m) if m.contains("paused")));
}
