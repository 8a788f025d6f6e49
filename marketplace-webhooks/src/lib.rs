//! Event callbacks of the 1C-Bitrix marketplace
//!
//! The marketplace notifies partners about coupons and Bitrix24 portals by
//! POSTing a form to a registered handler URL. This crate verifies those
//! callbacks against the partner credentials and exposes their fields.
//!
//! # Features
//!
//! - **Signature Verification**: `auth` is checked over the raw
//!   windows-1251 bytes before any decoding
//! - **Decoded Fields**: verified fields are exposed as UTF-8
//! - **Typed Views**: coupon and portal projections of a verified callback
//! - **Receiver**: event filters and HTTP status mapping for handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use marketplace_core::Credentials;
//! use marketplace_webhooks::CallbackReceiver;
//!
//! # fn main() -> marketplace_core::Result<()> {
//! let receiver = CallbackReceiver::new(Credentials::new("12345", "secret")?);
//!
//! let handler = receiver.handler("b24mp.*", |callback| {
//!     if let Some(coupon) = callback.as_coupon() {
//!         println!("coupon {:?} for {:?}", coupon.coupon(), coupon.email());
//!     }
//!     Ok(())
//! });
//!
//! let body = b"callbackType=activate.coupon&auth=...";
//! let status = handler.respond(body);
//! # let _ = status;
//! # Ok(())
//! # }
//! ```

mod receiver;
mod verifier;
mod views;

pub use receiver::{CallbackHandler, CallbackReceiver};
pub use verifier::{CallbackVerifier, VerifiedCallback};
pub use views::{CouponCallback, PortalCallback};

pub use marketplace_core::{CallbackEvent, MarketplaceError, Result};
