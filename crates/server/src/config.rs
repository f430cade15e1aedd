use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Connection details for the remote alerting service.
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteConfig {
    /// Base URL, e.g. `https://alerts.example.com/api/v1`.
    pub endpoint: String,
    pub project: String,
    /// Sent as a bearer token when present.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size used when listing remote alerts.
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncConfig {
    /// Page size used when walking the local store during a push.
    #[serde(default = "default_local_page_size")]
    pub local_page_size: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_page_size: default_local_page_size(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_list_page_size() -> u32 {
    200
}

fn default_local_page_size() -> u64 {
    100
}

const MAX_PAGE_SIZE: u64 = 1000;

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation("database_url must be set".into()));
        }
        if self.remote.project.trim().is_empty() {
            return Err(ConfigError::Validation("remote.project must be set".into()));
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "remote.timeout_secs must be > 0".into(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&u64::from(self.remote.list_page_size)) {
            return Err(ConfigError::Validation(format!(
                "remote.list_page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.sync.local_page_size) {
            return Err(ConfigError::Validation(format!(
                "sync.local_page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// A `.env` file in the working directory is read first, so its variables take part
/// in the override. Overrides use the key path separated by double underscores,
/// e.g. `REMOTE__API_TOKEN`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};

    let _ = dotenvy::dotenv();

    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            remote: RemoteConfig {
                endpoint: "http://localhost:8080".into(),
                project: "ops".into(),
                api_token: None,
                timeout_secs: default_timeout_secs(),
                list_page_size: default_list_page_size(),
            },
            sync: SyncConfig::default(),
        }
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_blank_project() {
        let mut cfg = sample();
        cfg.remote.project = "  ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = sample();
        cfg.remote.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_page_sizes() {
        let mut cfg = sample();
        cfg.sync.local_page_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = sample();
        cfg.remote.list_page_size = 1001;
        assert!(cfg.validate().is_err());
    }
}
