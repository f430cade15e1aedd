use std::time::Duration;

use alert_rule_sync::error::{AlertError, RemoteError};
use alert_rule_sync::sync::summary::SyncDirection;
use hyper::StatusCode;

#[test]
fn alert_error_messages() {
    let err = AlertError::Validation("name is required".into());
    assert_eq!(err.to_string(), "Validation failed: name is required");

    let err = AlertError::not_found_id(42);
    assert!(err.is_not_found());
    assert!(err.to_string().starts_with("Not found:"));
    assert!(err.to_string().contains("42"));

    let err = AlertError::not_found_name("cpu-high");
    assert!(err.to_string().contains("cpu-high"));

    let err = AlertError::SyncInProgress(SyncDirection::Pull);
    assert_eq!(err.to_string(), "A pull is already in progress");
    assert!(!err.is_not_found());
}

#[test]
fn persistence_error_keeps_context_and_source() {
    let err = AlertError::persistence("inserting alert")(sea_orm::DbErr::Custom("disk full".into()));
    let text = err.to_string();
    assert!(text.contains("inserting alert"));
    assert!(text.contains("disk full"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn remote_errors_wrap_into_alert_errors() {
    let err: AlertError = RemoteError::Timeout(Duration::from_secs(10)).into();
    assert!(err.to_string().starts_with("Remote alert service request failed"));
    assert!(format!("{err:?}").contains("Timeout"));

    // decode failures are remote errors too, just not unavailability
    let err: AlertError = RemoteError::Json("eof".into()).into();
    match &err {
        AlertError::Remote(inner) => assert!(!inner.is_unavailable()),
        other => panic!("expected a remote error, got {other:?}"),
    }
}

#[test]
fn unavailability_classification() {
    assert!(RemoteError::Network("reset".into()).is_unavailable());
    assert!(RemoteError::Timeout(Duration::from_secs(1)).is_unavailable());
    assert!(
        RemoteError::Http {
            status: StatusCode::BAD_GATEWAY,
            body: String::new()
        }
        .is_unavailable()
    );
    assert!(
        !RemoteError::Http {
            status: StatusCode::NOT_FOUND,
            body: String::new()
        }
        .is_unavailable()
    );
    assert!(!RemoteError::Json("eof".into()).is_unavailable());
    assert!(!RemoteError::InvalidEndpoint("ftp://x".into()).is_unavailable());
}
