//! Scripted in-memory transport for tests.

use async_trait::async_trait;
use bytes::Bytes;
use marketplace_core::{FormMap, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::Transport;

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: RecordedMethod,
    /// Full URL, query string included.
    pub url: String,
    /// Form body of a POST.
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parsed form parameters: the POST body, or the query string of a GET.
    pub fn form(&self) -> FormMap<Vec<u8>> {
        match &self.body {
            Some(body) => FormMap::parse(body.as_bytes()),
            None => {
                let query = self.url.split_once('?').map(|(_, q)| q).unwrap_or("");
                FormMap::parse(query.as_bytes())
            }
        }
    }

    /// A single parameter as text.
    pub fn param(&self, name: &str) -> Option<String> {
        self.form()
            .get_scalar(name)
            .map(|value| String::from_utf8_lossy(value).into_owned())
    }
}

/// A transport answering from a queue of scripted responses.
///
/// Requests are recorded in order. Once the queue runs dry every request
/// fails with [`TransportError::Other`].
///
/// ```
/// use marketplace_http_client::{MockTransport, RecordedMethod, Transport};
///
/// # tokio_test::block_on(async {
/// let transport = MockTransport::new();
/// transport.push_body(r#"{"result": true}"#);
///
/// let body = transport.post_form("https://example.test/rest/", "a=1".to_string()).await.unwrap();
/// assert_eq!(&body[..], br#"{"result": true}"#);
///
/// let request = &transport.requests()[0];
/// assert_eq!(request.method, RecordedMethod::Post);
/// assert_eq!(request.param("a").as_deref(), Some("1"));
/// assert!(transport.post_form("https://example.test/rest/", String::new()).await.is_err());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Bytes, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn push_body(&self, body: impl Into<Bytes>) -> &Self {
        self.responses.lock().push_back(Ok(body.into()));
        self
    }

    /// Queue a failure.
    pub fn push_error(&self, error: TransportError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }

    fn respond(&self, request: RecordedRequest) -> Result<Bytes, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response left".to_string())))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes, TransportError> {
        self.respond(RecordedRequest {
            method: RecordedMethod::Post,
            url: url.to_string(),
            body: Some(body),
        })
    }

    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        self.respond(RecordedRequest {
            method: RecordedMethod::Get,
            url: url.to_string(),
            body: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let transport = MockTransport::new();
        transport.push_body("first").push_body("second");

        assert_eq!(transport.post_form("https://x/", "a=1".into()).await.unwrap(), "first");
        assert_eq!(transport.get("https://x/?b=2").await.unwrap(), "second");
        assert!(transport.get("https://x/").await.is_err());

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, RecordedMethod::Post);
        assert_eq!(requests[0].param("a").as_deref(), Some("1"));
        assert_eq!(requests[1].param("b").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let transport = MockTransport::new();
        transport.push_error(TransportError::Status { status: 502 });

        let err = transport.get("https://x/").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502 }));
        assert_eq!(transport.remaining(), 0);
    }
}
