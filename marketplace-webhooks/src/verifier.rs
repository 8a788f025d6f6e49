//! Inbound callback verification.

use marketplace_core::charset::{ApiSurface, decode_map};
use marketplace_core::signature;
use marketplace_core::{CallbackEvent, Credentials, FormMap, MarketplaceError, Result};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::{CouponCallback, PortalCallback};

const AUTH_FIELD: &str = "auth";
const TYPE_FIELD: &str = "callbackType";

/// Verifies callback bodies against the partner credentials.
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    credentials: Credentials,
}

impl CallbackVerifier {
    /// Create a verifier for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Verify a raw `application/x-www-form-urlencoded` callback body.
    ///
    /// The signature is checked over the raw bytes before anything is
    /// decoded; a body without `auth` or `callbackType` never verifies.
    pub fn verify(&self, body: &[u8]) -> Result<VerifiedCallback> {
        let form = FormMap::<Vec<u8>>::parse(body);

        let valid = signature::verify(
            form.get_scalar(AUTH_FIELD).map(Vec::as_slice),
            form.get_scalar(TYPE_FIELD).map(Vec::as_slice),
            self.credentials.partner_id(),
            self.credentials.secret(),
        );
        if !valid {
            warn!(
                has_auth = form.contains_key(AUTH_FIELD),
                has_type = form.contains_key(TYPE_FIELD),
                "Rejected callback with invalid signature"
            );
            return Err(MarketplaceError::HashMismatch);
        }

        let mut fields = decode_map(&form, ApiSurface::Callback.charset())?;
        fields.remove(AUTH_FIELD);
        let callback_type = fields
            .remove(TYPE_FIELD)
            .and_then(|value| value.as_scalar().cloned())
            .unwrap_or_default();

        debug!(callback_type = %callback_type, fields = fields.len(), "Verified callback");
        Ok(VerifiedCallback {
            callback_type,
            fields,
        })
    }
}

/// A callback whose signature has been checked.
///
/// Fields are decoded to UTF-8 and read-only. `auth` is dropped and
/// `callbackType` is only reachable through [`callback_type`](Self::callback_type).
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedCallback {
    callback_type: String,
    fields: FormMap,
}

impl VerifiedCallback {
    /// Event type wire name, e.g. `activate.coupon`.
    pub fn callback_type(&self) -> &str {
        &self.callback_type
    }

    /// The event type, if it is a known one.
    pub fn event(&self) -> Option<CallbackEvent> {
        self.callback_type.parse().ok()
    }

    /// Id of the registered handler that produced this callback.
    pub fn callback_id(&self) -> Option<u64> {
        self.get_parsed("callbackId")
    }

    /// A field value; `None` when absent or not a scalar.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get_scalar(name).map(String::as_str)
    }

    /// A field value parsed into `T`; `None` when absent or unparsable.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.trim().parse().ok())
    }

    /// A field read as a `Y`/`1`/`true` flag; absent fields are false.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some("Y" | "y" | "1" | "true"))
    }

    /// All decoded fields.
    pub fn fields(&self) -> &FormMap {
        &self.fields
    }

    /// Coupon view, for coupon events.
    pub fn as_coupon(&self) -> Option<CouponCallback<'_>> {
        self.event()
            .filter(CallbackEvent::is_coupon_event)
            .map(|_| CouponCallback::new(self))
    }

    /// Portal view, for Bitrix24 portal events.
    pub fn as_portal(&self) -> Option<PortalCallback<'_>> {
        self.event()
            .filter(|event| !event.is_coupon_event())
            .map(|_| PortalCallback::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplace_core::Charset;
    use marketplace_core::signature::callback_signature;
    use pretty_assertions::assert_eq;

    fn verifier() -> CallbackVerifier {
        CallbackVerifier::new(Credentials::new("100", "s3cr3t").unwrap())
    }

    fn body(callback_type: &str, extra: &str) -> Vec<u8> {
        let auth = callback_signature(callback_type.as_bytes(), "100", "s3cr3t");
        format!("callbackType={}&auth={}{}", callback_type, auth, extra).into_bytes()
    }

    #[test]
    fn test_valid_callback_accepted() {
        let callback = verifier()
            .verify(&body("activate.coupon", "&partnerId=100&callbackId=9"))
            .unwrap();

        assert_eq!(callback.callback_type(), "activate.coupon");
        assert_eq!(callback.event(), Some(CallbackEvent::ActivateCoupon));
        assert_eq!(callback.callback_id(), Some(9));
        assert_eq!(callback.get("partnerId"), Some("100"));
        assert_eq!(callback.get("auth"), None);
        assert_eq!(callback.get("callbackType"), None);
        assert_eq!(callback.get("missing"), None);
    }

    #[test]
    fn test_wrong_auth_rejected() {
        let result = verifier().verify(b"callbackType=activate.coupon&partnerId=100&auth=deadbeef");
        assert!(matches!(result, Err(MarketplaceError::HashMismatch)));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(matches!(
            verifier().verify(b"callbackType=activate.coupon"),
            Err(MarketplaceError::HashMismatch)
        ));
        assert!(matches!(verifier().verify(b""), Err(MarketplaceError::HashMismatch)));
    }

    #[test]
    fn test_fields_decoded_from_windows_1251() {
        let mut raw = body("add.coupon", "&name=");
        raw.extend_from_slice(b"%C8%E2%E0%ED");
        let callback = verifier().verify(&raw).unwrap();
        assert_eq!(callback.get("name"), Some("Иван"));
    }

    #[test]
    fn test_signature_over_legacy_bytes() {
        let legacy = Charset::Windows1251.encode("тест").unwrap();
        let auth = callback_signature(&legacy, "100", "s3cr3t");
        let raw = format!("callbackType=%F2%E5%F1%F2&auth={}", auth);

        let callback = verifier().verify(raw.as_bytes()).unwrap();
        assert_eq!(callback.callback_type(), "тест");
        assert_eq!(callback.event(), None);
        assert!(callback.as_coupon().is_none());
        assert!(callback.as_portal().is_none());
    }

    #[test]
    fn test_views_follow_event_kind() {
        let coupon = verifier().verify(&body("b24mp.add.coupon", "")).unwrap();
        assert!(coupon.as_coupon().is_some());
        assert!(coupon.as_portal().is_none());

        let portal = verifier()
            .verify(&body("bitrix24.portal.change.tariff", ""))
            .unwrap();
        assert!(portal.as_portal().is_some());
        assert!(portal.as_coupon().is_none());
    }

    #[test]
    fn test_flag_and_parsed_fields() {
        let callback = verifier()
            .verify(&body("activate.coupon", "&isProlongation=Y&orderId=+42+&bad=x"))
            .unwrap();
        assert!(callback.flag("isProlongation"));
        assert!(!callback.flag("absent"));
        assert_eq!(callback.get_parsed::<u64>("orderId"), Some(42));
        assert_eq!(callback.get_parsed::<u64>("bad"), None);
    }
}
