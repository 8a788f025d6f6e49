// Settings file loaders

use crate::settings::{DEFAULT_PREFIX, read_dotenv};
use crate::{ConfigError, MarketplaceSettings, Result};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Settings file loader
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension; `.env` files are recognized
    /// by name as well.
    pub fn auto(path: &str) -> Result<Self> {
        let path_obj = Path::new(path);
        if path_obj.file_name().and_then(|s| s.to_str()) == Some(".env") {
            return Ok(Self::new(FileFormat::Env));
        }

        let ext = path_obj
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    /// Load settings from file
    pub fn load_file(&self, path: &str) -> Result<MarketplaceSettings> {
        if self.format == FileFormat::Env {
            return MarketplaceSettings::from_vars(read_dotenv(Path::new(path))?, DEFAULT_PREFIX);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("Failed to read file: {}", e)))?;

        self.parse(&content)
    }

    /// Parse settings from a JSON or TOML string
    pub fn parse(&self, content: &str) -> Result<MarketplaceSettings> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e))),
            FileFormat::Env => Err(ConfigError::LoadError(
                ".env settings are read from a file".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let json = r#"{"partner_id": "100", "secret": "s3cr3t", "fetch_all_pages": true}"#;

        let settings = loader.parse(json).unwrap();
        assert_eq!(settings.partner_id, "100");
        assert_eq!(settings.secret.expose_secret(), "s3cr3t");
        assert!(settings.fetch_all_pages);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            partner_id = "100"
            secret = "s3cr3t"
            timeout_secs = 15
        "#;

        let settings = loader.parse(toml).unwrap();
        assert_eq!(settings.partner_id, "100");
        assert_eq!(settings.timeout_secs, 15);
    }

    #[test]
    fn test_parse_error() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(loader.parse("{"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_extension("yaml"), None);
        assert!(ConfigLoader::auto("settings").is_err());
        assert_eq!(ConfigLoader::auto("/srv/app/.env").unwrap().format, FileFormat::Env);
    }
}
