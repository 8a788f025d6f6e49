//! Settings for the marketplace partner API clients
//!
//! Loads partner credentials and client options from environment variables,
//! a `.env` file or a JSON/TOML file, validates them, and converts them into
//! the configuration types of the client crates.
//!
//! ```no_run
//! use marketplace_config::MarketplaceSettings;
//!
//! # fn main() -> Result<(), marketplace_config::ConfigError> {
//! let settings = MarketplaceSettings::from_env()?;
//! let credentials = settings.credentials()?;
//! let http = settings.http_client_config();
//! # let _ = (credentials, http);
//! # Ok(())
//! # }
//! ```

mod error;
mod loader;
mod settings;
mod validation;

pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{DEFAULT_PREFIX, MarketplaceSettings};
pub use validation::{ConfigValidator, Validate};
