//! Client for the 1C-Bitrix partner REST API.
//!
//! Every action is a form POST signed with the partner's shared secret:
//! the method name is mapped to a dotted wire action, parameters are encoded
//! to `windows-1251`, and `auth` is the MD5 of the allowlisted parameter
//! values, the action, the partner id and the secret joined with `|`.
//!
//! # Features
//!
//! - **Generic calls**: [`PartnersApi::call`] and [`PartnersApi::call_list`]
//!   for any action
//! - **Pagination**: list actions can follow pages to the end and merge them
//! - **Typed methods**: one method per documented action
//!
//! # Example
//!
//! ```rust,no_run
//! use marketplace_core::Credentials;
//! use marketplace_http_client::HttpTransport;
//! use marketplace_partners::PartnersApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("100", "s3cr3t")?;
//!     let api = PartnersApi::new(credentials, HttpTransport::default_transport()?)
//!         .with_fetch_all_pages(true);
//!
//!     let callbacks = api.get_callback_list(None).await?;
//!     println!("{} handlers registered", callbacks.len());
//!
//!     let id = api
//!         .add_callback_activate_coupon("vendor.module", "https://example.com/coupon")
//!         .await?;
//!     println!("handler {}", id);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod methods;
mod page;
mod types;

pub use client::PartnersApi;
pub use config::{PartnersApiConfig, REST_ENDPOINT};
pub use page::{Navigation, PageList};
pub use types::{CallbackInfo, ClientInfo, CouponRequest, IssuedCoupon, ProlongationPeriod};

pub use marketplace_core::{MarketplaceError, Result};
