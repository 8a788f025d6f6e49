// Marketplace client settings

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, Result};
use marketplace_clients::{API_ENDPOINT, ClientsApiConfig};
use marketplace_core::Credentials;
use marketplace_http_client::HttpClientConfig;
use marketplace_partners::{PartnersApiConfig, REST_ENDPOINT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix used by [`MarketplaceSettings::from_env`].
pub const DEFAULT_PREFIX: &str = "MARKETPLACE";

/// Everything needed to build the marketplace clients.
///
/// Environment variables map onto fields by prefix, e.g.
/// `MARKETPLACE_PARTNER_ID`, `MARKETPLACE_SECRET`,
/// `MARKETPLACE_FETCH_ALL_PAGES`, `MARKETPLACE_TIMEOUT_SECS`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    pub partner_id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    pub partners_endpoint: String,
    pub clients_endpoint: String,
    pub fetch_all_pages: bool,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            partner_id: String::new(),
            secret: empty_secret(),
            partners_endpoint: REST_ENDPOINT.to_string(),
            clients_endpoint: API_ENDPOINT.to_string(),
            fetch_all_pages: false,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl MarketplaceSettings {
    /// Load from `MARKETPLACE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Load from environment variables with a custom prefix.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        Self::from_vars(std::env::vars(), prefix)
    }

    /// Load from a `.env` file, with process environment variables taking
    /// precedence. The process environment is not modified.
    pub fn from_dotenv(path: impl AsRef<std::path::Path>, prefix: &str) -> Result<Self> {
        let file_vars = read_dotenv(path.as_ref())?;
        Self::from_vars(file_vars.into_iter().chain(std::env::vars()), prefix)
    }

    /// Build from `(name, value)` pairs; later pairs win.
    ///
    /// Names without the prefix are ignored, as are unknown names.
    pub fn from_vars<I>(vars: I, prefix: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let marker = format!("{}_", prefix);
        let mut settings = Self::default();
        for (key, value) in vars {
            if let Some(name) = key.strip_prefix(&marker) {
                settings.set(&name.to_lowercase(), value)?;
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON, TOML or `.env` file, chosen by extension.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings: Self = crate::ConfigLoader::auto(path)?.load_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn set(&mut self, name: &str, value: String) -> Result<()> {
        match name {
            "partner_id" => self.partner_id = value,
            "secret" => self.secret = SecretString::new(value.into_boxed_str()),
            "partners_endpoint" => self.partners_endpoint = value,
            "clients_endpoint" => self.clients_endpoint = value,
            "fetch_all_pages" => self.fetch_all_pages = parse_bool(name, &value)?,
            "timeout_secs" => self.timeout_secs = parse_number(name, &value)?,
            "connect_timeout_secs" => self.connect_timeout_secs = parse_number(name, &value)?,
            "user_agent" => self.user_agent = Some(value),
            other => debug!(setting = other, "Ignoring unknown setting"),
        }
        Ok(())
    }

    /// Partner credentials.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            self.partner_id.as_str(),
            self.secret.expose_secret(),
        )?)
    }

    /// HTTP transport configuration.
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs));
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        builder.build()
    }

    /// Partner REST API configuration.
    pub fn partners_config(&self) -> PartnersApiConfig {
        PartnersApiConfig::new()
            .with_endpoint(self.partners_endpoint.as_str())
            .with_fetch_all_pages(self.fetch_all_pages)
    }

    /// Client registration API configuration.
    pub fn clients_config(&self) -> ClientsApiConfig {
        ClientsApiConfig::new().with_endpoint(self.clients_endpoint.as_str())
    }
}

impl Validate for MarketplaceSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.partner_id, "partner_id")?;
        ConfigValidator::not_empty(self.secret.expose_secret(), "secret")?;
        ConfigValidator::is_url(&self.partners_endpoint, "partners_endpoint")?;
        ConfigValidator::is_url(&self.clients_endpoint, "clients_endpoint")?;
        ConfigValidator::in_range(self.timeout_secs, 1, 600, "timeout_secs")?;
        ConfigValidator::in_range(self.connect_timeout_secs, 1, 600, "connect_timeout_secs")?;
        Ok(())
    }
}

pub(crate) fn read_dotenv(path: &std::path::Path) -> Result<Vec<(String, String)>> {
    dotenvy::from_path_iter(path)
        .map_err(|e| ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e)))?
        .map(|item| item.map_err(|e| ConfigError::ParseError(e.to_string())))
        .collect()
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new().into_boxed_str())
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(SecretString::new(value.into_boxed_str()))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "false" | "off" | "" => Ok(false),
        other => Err(ConfigError::ParseError(format!(
            "{} must be a boolean, got {:?}",
            name, other
        ))),
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::ParseError(format!("{} must be a number: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars() {
        let settings = MarketplaceSettings::from_vars(
            vars(&[
                ("MARKETPLACE_PARTNER_ID", "100"),
                ("MARKETPLACE_SECRET", "s3cr3t"),
                ("MARKETPLACE_FETCH_ALL_PAGES", "Y"),
                ("MARKETPLACE_TIMEOUT_SECS", "5"),
                ("MARKETPLACE_UNKNOWN", "ignored"),
                ("OTHER_SECRET", "ignored"),
            ]),
            DEFAULT_PREFIX,
        )
        .unwrap();

        assert_eq!(settings.partner_id, "100");
        assert_eq!(settings.secret.expose_secret(), "s3cr3t");
        assert!(settings.fetch_all_pages);
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.partners_endpoint, REST_ENDPOINT);
    }

    #[test]
    fn test_custom_prefix() {
        let settings = MarketplaceSettings::from_vars(
            vars(&[("APP_PARTNER_ID", "7"), ("APP_SECRET", "x")]),
            "APP",
        )
        .unwrap();
        assert_eq!(settings.partner_id, "7");
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let result = MarketplaceSettings::from_vars(
            vars(&[("MARKETPLACE_PARTNER_ID", "100")]),
            DEFAULT_PREFIX,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_bad_values_fail_parsing() {
        let result = MarketplaceSettings::from_vars(
            vars(&[("MARKETPLACE_FETCH_ALL_PAGES", "maybe")]),
            DEFAULT_PREFIX,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let result = MarketplaceSettings::from_vars(
            vars(&[("MARKETPLACE_TIMEOUT_SECS", "soon")]),
            DEFAULT_PREFIX,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_timeout_out_of_range() {
        let result = MarketplaceSettings::from_vars(
            vars(&[
                ("MARKETPLACE_PARTNER_ID", "100"),
                ("MARKETPLACE_SECRET", "s3cr3t"),
                ("MARKETPLACE_TIMEOUT_SECS", "0"),
            ]),
            DEFAULT_PREFIX,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_conversions() {
        let settings = MarketplaceSettings::from_vars(
            vars(&[
                ("MARKETPLACE_PARTNER_ID", "100"),
                ("MARKETPLACE_SECRET", "s3cr3t"),
                ("MARKETPLACE_CLIENTS_ENDPOINT", "http://localhost/add_client.php"),
                ("MARKETPLACE_CONNECT_TIMEOUT_SECS", "3"),
                ("MARKETPLACE_USER_AGENT", "partner-tools/1.0"),
            ]),
            DEFAULT_PREFIX,
        )
        .unwrap();

        let credentials = settings.credentials().unwrap();
        assert_eq!(credentials.partner_id(), "100");
        assert_eq!(credentials.secret(), "s3cr3t");

        let http = settings.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(30));
        assert_eq!(http.connect_timeout, Duration::from_secs(3));
        assert_eq!(http.user_agent, "partner-tools/1.0");

        assert_eq!(settings.partners_config(), PartnersApiConfig::new());
        assert_eq!(
            settings.clients_config().endpoint,
            "http://localhost/add_client.php"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut settings = MarketplaceSettings::default();
        settings.set("secret", "s3cr3t".to_string()).unwrap();
        assert!(!format!("{:?}", settings).contains("s3cr3t"));
    }
}
