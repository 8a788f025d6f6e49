//! Partner REST API client configuration.

/// Production endpoint of the partner REST API.
pub const REST_ENDPOINT: &str = "https://partners.1c-bitrix.ru/rest/";

/// Partner REST API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnersApiConfig {
    /// Endpoint every action is posted to.
    pub endpoint: String,
    /// Follow pagination to the last page on list actions.
    pub fetch_all_pages: bool,
}

impl Default for PartnersApiConfig {
    fn default() -> Self {
        Self {
            endpoint: REST_ENDPOINT.to_string(),
            fetch_all_pages: false,
        }
    }
}

impl PartnersApiConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Enable or disable fetching every page of list actions.
    pub fn with_fetch_all_pages(mut self, fetch_all_pages: bool) -> Self {
        self.fetch_all_pages = fetch_all_pages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PartnersApiConfig::default();
        assert_eq!(config.endpoint, REST_ENDPOINT);
        assert!(!config.fetch_all_pages);
    }

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let base = PartnersApiConfig::new();
        let paged = base.clone().with_fetch_all_pages(true);
        assert!(paged.fetch_all_pages);
        assert!(!base.fetch_all_pages);
    }
}
