//! reqwest-backed transport.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use marketplace_core::TransportError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::{HttpClientConfig, Transport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP transport over a pooled reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
}

impl HttpTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .default_headers(default_headers(&config.default_headers)?)
            .gzip(config.gzip);

        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let inner = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Create a transport with default configuration.
    pub fn default_transport() -> Result<Self, TransportError> {
        Self::new(HttpClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        method: &'static str,
        url: &Url,
    ) -> Result<Bytes, TransportError> {
        let started = Instant::now();
        let endpoint = redacted(url);

        let response = request.send().await.map_err(|e| {
            let err = self.map_error(e);
            warn!(method, endpoint = %endpoint, error = %err, "Request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, endpoint = %endpoint, status = status.as_u16(), "Unexpected status");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        debug!(
            method,
            endpoint = %endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        Ok(body)
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.config.timeout)
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes, TransportError> {
        let url = parse_url(url)?;
        let request = self
            .inner
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        self.execute(request, "POST", &url).await
    }

    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        let url = parse_url(url)?;
        let request = self.inner.get(url.clone());
        self.execute(request, "GET", &url).await
    }
}

fn parse_url(raw: &str) -> Result<Url, TransportError> {
    Url::parse(raw).map_err(|e| TransportError::Other(format!("invalid URL: {}", e)))
}

/// Scheme, host and path only: query strings carry signatures.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

fn default_headers(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Other(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Other(format!("invalid header value: {}", e)))?;
        map.append(name, value);
    }
    Ok(map)
}
