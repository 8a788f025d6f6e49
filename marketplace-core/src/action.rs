//! Mapping from method identifiers to wire actions.
//!
//! `addCallbackActivateCoupon` becomes `add.callback.activate.coupon`: the
//! identifier is split into segments (an uppercase letter followed by
//! lowercase letters and digits, or a run of lowercase letters and digits),
//! each segment is lowercased and the segments are joined with dots.

use crate::{MarketplaceError, Result};
use tracing::trace;

/// Signed parameters per wire action, in signature order.
static SIGNED_PARAMS: &[(&str, &[&str])] = &[
    ("delete.callback.bitrix24.portal.change.tariff", &["callbackId"]),
    ("delete.callback.bitrix24.portal.become.active", &["callbackId"]),
    ("delete.callback.b24mp.add.coupon", &["callbackId"]),
    ("delete.callback.activate.coupon", &["callbackId"]),
    ("delete.callback.add.bitrix24.partner.portal", &["callbackId"]),
    ("delete.callback.add.coupon", &["callbackId"]),
    ("delete.callback.b24mp.activate.coupon", &["callbackId"]),
    ("marketplace.product.check", &["key"]),
    ("marketplace.product.self.check", &["key"]),
    ("marketplace.client.add", &["key", "code"]),
    ("marketplace.client.update", &["code"]),
    ("marketplace.coupon.add", &["code"]),
    ("key.info", &["key"]),
];

/// Derive the dotted wire action from a method identifier.
///
/// Returns `None` when the identifier contains no segments.
pub fn resolve_action(method: &str) -> Option<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in method.chars() {
        if c.is_ascii_uppercase() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            current.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Names of the parameters folded into the signature of `action`.
///
/// Unknown actions sign no parameters.
pub fn signed_params(action: &str) -> &'static [&'static str] {
    SIGNED_PARAMS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, params)| *params)
        .unwrap_or(&[])
}

/// A resolved operation: method name, wire action and signed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Method identifier as called.
    pub logical_name: String,
    /// Dotted wire action.
    pub rest_action: String,
    /// Parameters entering the signature, in order.
    pub signed_param_names: &'static [&'static str],
}

impl OperationDescriptor {
    /// Resolve a method identifier, failing with [`MarketplaceError::BadAction`]
    /// when it has no segments.
    pub fn resolve(logical_name: &str) -> Result<Self> {
        let rest_action = resolve_action(logical_name)
            .ok_or_else(|| MarketplaceError::BadAction(logical_name.to_string()))?;
        let signed_param_names = signed_params(&rest_action);
        trace!(method = logical_name, action = %rest_action, "Resolved action");
        Ok(Self {
            logical_name: logical_name.to_string(),
            rest_action,
            signed_param_names,
        })
    }
}
