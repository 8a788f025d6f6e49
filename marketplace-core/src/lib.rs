//! Core protocol pieces of the marketplace partner API.
//!
//! This crate holds everything the outbound client and the inbound callback
//! verifier share:
//!
//! - **Credentials**: partner id and shared secret
//! - **Charsets**: conversion between UTF-8 and the legacy `windows-1251`
//!   used by the partner endpoints
//! - **Form trees**: ordered, nested request parameters and their urlencoded form
//! - **Action resolution**: `addCallbackActivateCoupon` → `add.callback.activate.coupon`
//!   plus the table of parameters each action signs
//! - **Signatures**: the MD5 `auth` scheme for requests and callbacks
//!
//! # Example
//!
//! ```rust
//! use marketplace_core::{signature, Credentials, OperationDescriptor};
//!
//! let credentials = Credentials::new("100", "s3cr3t").unwrap();
//! let op = OperationDescriptor::resolve("addCallbackActivateCoupon").unwrap();
//! assert_eq!(op.rest_action, "add.callback.activate.coupon");
//!
//! let auth = signature::sign(
//!     &[],
//!     &op.rest_action,
//!     credentials.partner_id(),
//!     credentials.secret(),
//! );
//! assert_eq!(auth.len(), 32);
//! ```

pub mod action;
pub mod charset;
mod credentials;
mod error;
mod event;
pub mod form;
pub mod signature;
pub mod value;

pub use action::{OperationDescriptor, resolve_action, signed_params};
pub use charset::{ApiSurface, Charset, CharsetNormalizer};
pub use credentials::Credentials;
pub use error::{MarketplaceError, RemoteError, Result, TransportError};
pub use event::CallbackEvent;
pub use form::{FormMap, FormValue};
