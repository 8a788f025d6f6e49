//! Partner credentials.

use crate::{MarketplaceError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

/// Partner identifier and shared secret, as shown on the partner card.
///
/// Immutable once built. Clones share the same underlying values, so a single
/// instance can back any number of clients and verifiers.
#[derive(Clone)]
pub struct Credentials {
    inner: Arc<Inner>,
}

struct Inner {
    partner_id: String,
    secret: SecretString,
}

impl Credentials {
    /// Create credentials, rejecting an empty partner id or secret.
    pub fn new(partner_id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let partner_id = partner_id.into();
        let secret = secret.into();

        if partner_id.is_empty() {
            return Err(MarketplaceError::InvalidCredentials(
                "partner id must not be empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(MarketplaceError::InvalidCredentials(
                "secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            inner: Arc::new(Inner {
                partner_id,
                secret: SecretString::new(secret.into()),
            }),
        })
    }

    /// Partner identifier.
    pub fn partner_id(&self) -> &str {
        &self.inner.partner_id
    }

    /// Shared signing secret.
    pub fn secret(&self) -> &str {
        self.inner.secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("partner_id", &self.inner.partner_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
