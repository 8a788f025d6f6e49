//! MD5 request and callback signatures.
//!
//! Every signature on the marketplace is the lowercase hex MD5 of its parts
//! joined with `|`. Outbound REST calls sign
//! `[signed values..] | action | partnerId | secret`; inbound callbacks carry
//! `callbackType | partnerId | secret`.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

const SEPARATOR: &[u8] = b"|";

/// MD5 over `parts` joined with `|`, as lowercase hex.
pub fn joined_digest<P: AsRef<[u8]>>(parts: &[P]) -> String {
    let mut hasher = Md5::new();
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            hasher.update(SEPARATOR);
        }
        hasher.update(part.as_ref());
    }
    hex::encode(hasher.finalize())
}

/// Compute the `auth` value of an outbound REST call.
///
/// `signed_values` must already be in the wire charset and in the order the
/// action declares them.
pub fn sign(signed_values: &[&[u8]], action: &str, partner_id: &str, secret: &str) -> String {
    let mut parts: Vec<&[u8]> = Vec::with_capacity(signed_values.len() + 3);
    parts.extend_from_slice(signed_values);
    parts.push(action.as_bytes());
    parts.push(partner_id.as_bytes());
    parts.push(secret.as_bytes());
    joined_digest(&parts)
}

/// Expected `auth` of an inbound callback.
pub fn callback_signature(callback_type: &[u8], partner_id: &str, secret: &str) -> String {
    joined_digest(&[callback_type, partner_id.as_bytes(), secret.as_bytes()])
}

/// Check the `auth` of an inbound callback.
///
/// Fails closed: a missing `auth` or `callbackType` is never valid.
pub fn verify(
    received_auth: Option<&[u8]>,
    callback_type: Option<&[u8]>,
    partner_id: &str,
    secret: &str,
) -> bool {
    let (Some(received), Some(callback_type)) = (received_auth, callback_type) else {
        return false;
    };
    let expected = callback_signature(callback_type, partner_id, secret);
    constant_time_eq(expected.as_bytes(), received)
}

/// Byte equality whose timing does not depend on where the inputs differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
