//! Acceptance and rejection of callback signatures.

use marketplace_core::signature::joined_digest;
use marketplace_core::{Credentials, MarketplaceError};
use marketplace_webhooks::CallbackVerifier;
use proptest::prelude::*;

fn verifier() -> CallbackVerifier {
    CallbackVerifier::new(Credentials::new("100", "s3cr3t").unwrap())
}

#[test]
fn activate_coupon_with_known_auth_is_accepted() {
    let auth = joined_digest(&["activate.coupon|100|s3cr3t"]);
    let body = format!("callbackType=activate.coupon&partnerId=100&auth={}", auth);

    let callback = verifier().verify(body.as_bytes()).unwrap();
    assert_eq!(callback.callback_type(), "activate.coupon");
    assert_eq!(callback.get("partnerId"), Some("100"));
}

#[test]
fn activate_coupon_with_other_auth_is_rejected() {
    let auth = joined_digest(&["activate.coupon|100|other"]);
    let body = format!("callbackType=activate.coupon&partnerId=100&auth={}", auth);

    let err = verifier().verify(body.as_bytes()).unwrap_err();
    assert!(matches!(err, MarketplaceError::HashMismatch));
    assert_eq!(err.status_code(), 400);
}

proptest! {
    #[test]
    fn any_single_character_change_is_rejected(
        callback_type in "[a-z0-9]{1,8}(\\.[a-z0-9]{1,8}){0,3}",
        position in 0usize..32,
        replacement in proptest::char::ranges(vec!['0'..='9', 'a'..='f'].into()),
    ) {
        let auth = joined_digest(&[format!("{}|100|s3cr3t", callback_type)]);
        let body = format!("callbackType={}&auth={}", callback_type, auth);
        prop_assert!(verifier().verify(body.as_bytes()).is_ok());

        let mut tampered: Vec<char> = auth.chars().collect();
        prop_assume!(tampered[position] != replacement);
        tampered[position] = replacement;
        let tampered: String = tampered.into_iter().collect();

        let body = format!("callbackType={}&auth={}", callback_type, tampered);
        prop_assert!(matches!(
            verifier().verify(body.as_bytes()),
            Err(MarketplaceError::HashMismatch)
        ));
    }
}
