//! Client registration API of the 1C-Bitrix marketplace.
//!
//! `add_client.php` keeps a per-module list of clients, identified by a
//! 32-character client key. Requests are GET query strings signed with the
//! partner secret; the list is returned as XML.
//!
//! ```no_run
//! use marketplace_clients::{ClientDetails, ClientsApi};
//! use marketplace_core::Credentials;
//! use marketplace_http_client::HttpTransport;
//!
//! # async fn run() -> marketplace_core::Result<()> {
//! let credentials = Credentials::new("12345", "secret")?;
//! let transport = HttpTransport::default_transport()?;
//! let api = ClientsApi::new(credentials, "vendor.module", transport)?
//!     .with_client_key("0123456789abcdef0123456789abcdef")?;
//!
//! let details = ClientDetails {
//!     name: "Acme".to_string(),
//!     email: "it@acme.test".to_string(),
//!     ..Default::default()
//! };
//! api.add(&details).await?;
//!
//! for client in api.get_list(&[("email", "it@acme.test")]).await? {
//!     println!("{:?}", client.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod types;

pub use client::ClientsApi;
pub use config::{API_ENDPOINT, ClientsApiConfig};
pub use types::{ClientAction, ClientDetails, ClientKey, ClientRecord, ModuleId};

pub use marketplace_core::{MarketplaceError, Result};
