//! JSON-over-HTTP implementation of [`RemoteAlertGateway`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, header};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use rustls::{ClientConfig, RootCertStore};
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use url::Url;

use super::types::{MalformedAlert, RemoteAlert, RemoteAlertList};
use super::{ListedAlert, RemoteAlertGateway};
use crate::config::RemoteConfig;
use crate::error::RemoteError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct HttpAlertGateway {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    /// `{endpoint}/projects/{project}/alerts`
    alerts_url: Url,
    api_token: Option<String>,
    timeout: Duration,
    page_size: u32,
}

impl HttpAlertGateway {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut base = Url::parse(&config.endpoint)
            .map_err(|e| RemoteError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                base.scheme()
            )));
        }
        base.path_segments_mut()
            .map_err(|_| RemoteError::InvalidEndpoint(config.endpoint.clone()))?
            .pop_if_empty()
            .extend(["projects", config.project.as_str(), "alerts"]);

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config()?)
            .https_or_http()
            .enable_http1()
            .build();

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build(connector),
            alerts_url: base,
            api_token: config.api_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            page_size: config.list_page_size,
        })
    }

    fn alert_url(&self, name: &str) -> Result<Url, RemoteError> {
        let mut url = self.alerts_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidEndpoint(self.alerts_url.to_string()))?
            .push(name);
        Ok(url)
    }

    /// Sends one request and returns status and body, bounded by the configured timeout.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, Bytes), RemoteError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| RemoteError::Network(e.to_string()))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| RemoteError::Network(e.to_string()))?
                .to_bytes();
            Ok::<_, RemoteError>((status, body))
        };

        timeout(self.timeout, exchange)
            .await
            .map_err(|_| RemoteError::Timeout(self.timeout))?
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        url: &Url,
        payload: &T,
    ) -> Result<(), RemoteError> {
        let body = serde_json::to_vec(payload).map_err(|e| RemoteError::Json(e.to_string()))?;
        let (status, body) = self.send(method, url, Some(body)).await?;
        if !status.is_success() {
            return Err(http_error(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteAlertGateway for HttpAlertGateway {
    /// Pages through the listing until a short page. A reported `total` only
    /// caps the walk, it never ends it early on its own.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ListedAlert>, RemoteError> {
        let mut alerts = Vec::new();
        let mut offset: u64 = 0;
        loop {
            let mut url = self.alerts_url.clone();
            url.query_pairs_mut()
                .append_pair("offset", &offset.to_string())
                .append_pair("size", &self.page_size.to_string());
            let (status, body) = self.send(Method::GET, &url, None).await?;
            if !status.is_success() {
                return Err(http_error(status, &body));
            }
            let page: RemoteAlertList =
                serde_json::from_slice(&body).map_err(|e| RemoteError::Json(e.to_string()))?;
            let fetched = page.results.len() as u64;
            for value in page.results {
                let position = alerts.len() as u64;
                alerts.push(decode_entry(value, position));
            }
            offset += fetched;
            if fetched < u64::from(self.page_size) || page.total.is_some_and(|t| offset >= t) {
                break;
            }
        }
        tracing::debug!(
            name = "remote.alerts.listed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            message = "Fetched remote alert listing",
            count = alerts.len(),
            malformed = alerts.iter().filter(|a| a.is_err()).count(),
        );
        Ok(alerts)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<RemoteAlert>, RemoteError> {
        let url = self.alert_url(name)?;
        let (status, body) = self.send(Method::GET, &url, None).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(http_error(status, &body));
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| RemoteError::Json(e.to_string()))
    }

    #[tracing::instrument(skip(self, alert), fields(alert_name = %alert.name))]
    async fn create(&self, alert: &RemoteAlert) -> Result<(), RemoteError> {
        let url = self.alerts_url.clone();
        self.send_json(Method::POST, &url, alert).await
    }

    #[tracing::instrument(skip(self, alert))]
    async fn update(&self, name: &str, alert: &RemoteAlert) -> Result<(), RemoteError> {
        let url = self.alert_url(name)?;
        self.send_json(Method::PUT, &url, alert).await
    }
}

fn decode_entry(value: Value, position: u64) -> ListedAlert {
    match serde_json::from_value::<RemoteAlert>(value.clone()) {
        Ok(alert) => Ok(alert),
        Err(e) => {
            let malformed = MalformedAlert::from_value(&value, position, &e);
            tracing::warn!(
                name = "remote.alerts.malformed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                message = "Remote listing entry could not be decoded",
                alert_name = %malformed.name,
                error = %malformed.reason,
            );
            Err(malformed)
        }
    }
}

fn http_error(status: StatusCode, body: &[u8]) -> RemoteError {
    RemoteError::Http {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// TLS client config with the bundled webpki roots. The crypto provider is passed
/// explicitly so no process-wide default has to be installed.
fn tls_config() -> Result<ClientConfig, RemoteError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::aws_lc_rs::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| RemoteError::InvalidEndpoint(format!("TLS setup failed: {e}")))?
    .with_root_certificates(roots)
    .with_no_client_auth();
    Ok(config)
}
