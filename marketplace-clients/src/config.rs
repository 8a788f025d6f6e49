//! Client registration API configuration.

use serde::{Deserialize, Serialize};

/// Default endpoint of the client registration API.
pub const API_ENDPOINT: &str = "https://partners.1c-bitrix.ru/add_client.php";

/// Configuration of [`ClientsApi`](crate::ClientsApi).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientsApiConfig {
    /// Endpoint URL.
    pub endpoint: String,
}

impl Default for ClientsApiConfig {
    fn default() -> Self {
        Self {
            endpoint: API_ENDPOINT.to_string(),
        }
    }
}

impl ClientsApiConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        assert_eq!(ClientsApiConfig::new().endpoint, API_ENDPOINT);
        let config = ClientsApiConfig::new().with_endpoint("http://localhost/add_client.php");
        assert_eq!(config.endpoint, "http://localhost/add_client.php");
    }
}
