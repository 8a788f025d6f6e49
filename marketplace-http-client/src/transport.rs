//! The transport seam between the API clients and the network.

use async_trait::async_trait;
use bytes::Bytes;
use marketplace_core::TransportError;
use std::sync::Arc;

/// Sends one request and returns the raw response body.
///
/// Implementations return the body of any 2xx response and a
/// [`TransportError`] otherwise. They never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes, TransportError>;

    /// GET a URL, query string included.
    async fn get(&self, url: &str) -> Result<Bytes, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes, TransportError> {
        (**self).post_form(url, body).await
    }

    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        (**self).get(url).await
    }
}
