//! Error types for marketplace operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketplaceError>;

/// A single entry of the `error` array returned by the partner REST API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemoteError {
    /// Symbolic error code, e.g. `CALLBACK_ALREADY_EXISTS`.
    #[serde(default)]
    pub code: String,
    /// Numeric (or numeric-looking) error identifier.
    #[serde(default, deserialize_with = "crate::value::string_or_number")]
    pub id: String,
    /// Human-readable description, when the API sends one.
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Failures while reaching the remote endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The round-trip did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Any other failure of the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Errors that can occur while talking to the marketplace.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Partner id or secret is empty.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The method name does not resolve to a wire action.
    #[error("bad method call: {0}")]
    BadAction(String),

    /// A parameter the signature depends on was not supplied.
    #[error("missing signed parameter `{param}` for action {action}")]
    MissingSignedParam {
        /// Wire action being signed.
        action: String,
        /// Name of the absent parameter.
        param: String,
    },

    /// Caller input violates a local contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A string cannot be converted between charsets.
    #[error("cannot convert between {from} and {to}: {message}")]
    Encoding {
        /// Source charset label.
        from: &'static str,
        /// Target charset label.
        to: &'static str,
        /// What went wrong.
        message: String,
    },

    /// The endpoint could not be reached.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The partner REST API reported an error.
    #[error("REST call to {action} failed: {code}")]
    RemoteApi {
        /// Wire action that failed.
        action: String,
        /// Code of the first reported error.
        code: String,
        /// Identifier of the first reported error.
        id: String,
        /// Every error the API reported.
        errors: Vec<RemoteError>,
    },

    /// The client-registration API answered with an error line.
    #[error("client registration failed: {0}")]
    ClientsApi(String),

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The inbound callback signature does not match.
    #[error("hash mismatch")]
    HashMismatch,
}

impl MarketplaceError {
    /// Check if the caller may reasonably retry the operation.
    ///
    /// Only transport-level failures qualify; protocol errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(TransportError::Timeout(_)) => true,
            Self::Transport(TransportError::Connection(_)) => true,
            Self::Transport(TransportError::Status { status }) => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout(_)))
    }

    /// Code of the first remote error, if this is a remote API error.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::RemoteApi { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// HTTP status an inbound boundary should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::HashMismatch => 400,
            Self::Encoding { .. } | Self::MalformedResponse(_) => 400,
            _ => 500,
        }
    }

    /// Build a remote API error from the response's `error` array.
    pub fn remote(action: &str, errors: Vec<RemoteError>) -> Self {
        let (code, id) = errors
            .first()
            .map(|e| (e.code.clone(), e.id.clone()))
            .unwrap_or_default();
        Self::RemoteApi {
            action: action.to_string(),
            code,
            id,
            errors,
        }
    }
}

impl From<serde_json::Error> for MarketplaceError {
    fn from(err: serde_json::Error) -> Self {
        MarketplaceError::MalformedResponse(err.to_string())
    }
}
