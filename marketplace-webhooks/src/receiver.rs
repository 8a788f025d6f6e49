//! Callback receiver for HTTP boundaries.

use marketplace_core::{Credentials, MarketplaceError, Result};
use tracing::{debug, warn};

use crate::{CallbackVerifier, VerifiedCallback};

/// Receiver for incoming callbacks.
#[derive(Debug, Clone)]
pub struct CallbackReceiver {
    verifier: CallbackVerifier,
}

impl CallbackReceiver {
    /// Create a receiver for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            verifier: CallbackVerifier::new(credentials),
        }
    }

    /// Verify and decode a raw callback body.
    pub fn receive(&self, body: &[u8]) -> Result<VerifiedCallback> {
        self.verifier.verify(body)
    }

    /// Create a handler for an event filter.
    ///
    /// The filter is an exact event type, a `prefix.*` pattern or `*`.
    pub fn handler<F>(&self, event_filter: &str, callback: F) -> CallbackHandler<F>
    where
        F: Fn(VerifiedCallback) -> Result<()>,
    {
        CallbackHandler {
            receiver: self.clone(),
            event_filter: event_filter.to_string(),
            callback,
        }
    }

    /// HTTP status answering a failed callback.
    pub fn status_for(error: &MarketplaceError) -> u16 {
        error.status_code()
    }
}

/// A callback handler that filters and processes specific events.
pub struct CallbackHandler<F>
where
    F: Fn(VerifiedCallback) -> Result<()>,
{
    receiver: CallbackReceiver,
    event_filter: String,
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(VerifiedCallback) -> Result<()>,
{
    /// Handle a raw callback body.
    ///
    /// Returns `Ok(false)` for verified callbacks the filter does not match.
    pub fn handle(&self, body: &[u8]) -> Result<bool> {
        let callback = self.receiver.receive(body)?;

        if !self.matches_event(callback.callback_type()) {
            debug!(
                callback_type = %callback.callback_type(),
                filter = %self.event_filter,
                "Callback skipped by filter"
            );
            return Ok(false);
        }

        (self.callback)(callback)?;
        Ok(true)
    }

    /// Handle a raw callback body and answer with an HTTP status.
    pub fn respond(&self, body: &[u8]) -> u16 {
        match self.handle(body) {
            Ok(_) => 200,
            Err(e) => {
                warn!(error = %e, "Callback handling failed");
                CallbackReceiver::status_for(&e)
            }
        }
    }

    fn matches_event(&self, event: &str) -> bool {
        if self.event_filter == "*" {
            return true;
        }

        if let Some(prefix) = self.event_filter.strip_suffix(".*") {
            return event
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'));
        }

        self.event_filter == event
    }
}
