//! # Marketplace HTTP Client
//!
//! The async transport the marketplace API clients send their requests
//! through.
//!
//! ## Features
//!
//! - **Pluggable**: clients are generic over the [`Transport`] trait
//! - **Timeouts**: per round-trip and connect timeouts, surfaced as
//!   [`TransportError::Timeout`](marketplace_core::TransportError::Timeout)
//! - **Connection Pooling**: one reqwest client per transport, cheap to clone
//! - **Scripted transport**: [`MockTransport`] for tests
//!
//! No retries are performed; callers decide with
//! [`MarketplaceError::is_retryable`](marketplace_core::MarketplaceError::is_retryable).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marketplace_http_client::{HttpClientConfig, HttpTransport, Transport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(
//!         HttpClientConfig::builder()
//!             .timeout(Duration::from_secs(15))
//!             .build(),
//!     )?;
//!
//!     let body = transport
//!         .post_form("https://partners.1c-bitrix.ru/rest/", "action=help".to_string())
//!         .await?;
//!     println!("{} bytes", body.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod mock;
mod transport;

pub use client::HttpTransport;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use mock::{MockTransport, RecordedMethod, RecordedRequest};
pub use transport::Transport;
