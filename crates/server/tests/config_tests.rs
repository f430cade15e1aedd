use alert_rule_sync::config::{AppConfig, ConfigError};
use config::{Config, Environment, File, FileFormat};

fn build(yaml: &str) -> Result<AppConfig, ConfigError> {
    let cfg = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?;
    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

#[test]
fn minimal_yaml_gets_defaults() {
    let yaml = r#"
database_url: "sqlite://alerts.db?mode=rwc"
remote:
  endpoint: "https://alerts.example.com/api/v1"
  project: "ops"
"#;
    let app = build(yaml).expect("config should load");

    assert_eq!(app.database_url, "sqlite://alerts.db?mode=rwc");
    assert_eq!(app.remote.project, "ops");
    assert!(app.remote.api_token.is_none());
    assert_eq!(app.remote.timeout_secs, 10);
    assert_eq!(app.remote.list_page_size, 200);
    assert_eq!(app.sync.local_page_size, 100);
}

#[test]
fn explicit_values_win_over_defaults() {
    let yaml = r#"
database_url: "postgres://alerts@localhost/alerts"
remote:
  endpoint: "https://alerts.example.com"
  project: "ops"
  api_token: "t0ken"
  timeout_secs: 30
  list_page_size: 50
sync:
  local_page_size: 25
"#;
    let app = build(yaml).unwrap();

    assert_eq!(app.remote.api_token.as_deref(), Some("t0ken"));
    assert_eq!(app.remote.timeout_secs, 30);
    assert_eq!(app.remote.list_page_size, 50);
    assert_eq!(app.sync.local_page_size, 25);
}

#[test]
fn missing_remote_section_fails_to_build() {
    let err = build(r#"database_url: "sqlite::memory:""#).unwrap_err();
    assert!(matches!(err, ConfigError::Build(_)));
    assert!(err.to_string().starts_with("Configuration build error"));
}

#[test]
fn invalid_values_fail_validation() {
    let yaml = r#"
database_url: "sqlite::memory:"
remote:
  endpoint: "https://alerts.example.com"
  project: "ops"
sync:
  local_page_size: 0
"#;
    let err = build(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("local_page_size")));
}

#[test]
fn environment_overrides_nested_keys() {
    let yaml = r#"
database_url: "sqlite::memory:"
remote:
  endpoint: "https://alerts.example.com"
  project: "ops"
"#;
    // SAFETY: no other test reads this prefix
    unsafe {
        std::env::set_var("ARS_TEST__REMOTE__PROJECT", "staging");
        std::env::set_var("ARS_TEST__REMOTE__TIMEOUT_SECS", "3");
    }

    let cfg = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .add_source(
            Environment::with_prefix("ARS_TEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .unwrap();
    let app: AppConfig = cfg.try_deserialize().unwrap();

    assert_eq!(app.remote.project, "staging");
    assert_eq!(app.remote.timeout_secs, 3);

    unsafe {
        std::env::remove_var("ARS_TEST__REMOTE__PROJECT");
        std::env::remove_var("ARS_TEST__REMOTE__TIMEOUT_SECS");
    }
}
