//! Typed projections of verified callbacks.
//!
//! Views borrow the callback and never fail: an absent or unparsable field
//! reads as `None`.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::VerifiedCallback;

/// Coupon events of both marketplaces.
#[derive(Debug, Clone, Copy)]
pub struct CouponCallback<'a> {
    callback: &'a VerifiedCallback,
}

impl<'a> CouponCallback<'a> {
    pub(crate) fn new(callback: &'a VerifiedCallback) -> Self {
        Self { callback }
    }

    /// Coupon code.
    pub fn coupon(&self) -> Option<&'a str> {
        self.callback.get("coupon")
    }

    /// Whether the coupon prolongs an existing license.
    pub fn is_prolongation(&self) -> bool {
        self.callback.flag("isProlongation")
    }

    /// Buyer name.
    pub fn name(&self) -> Option<&'a str> {
        self.callback.get("name")
    }

    /// Buyer e-mail.
    pub fn email(&self) -> Option<&'a str> {
        self.callback.get("email")
    }

    pub fn partner_id(&self) -> Option<u64> {
        self.callback.get_parsed("partnerId")
    }

    pub fn order_id(&self) -> Option<u64> {
        self.callback.get_parsed("orderId")
    }

    /// Prolongation length, in [`prolongation_period_type`](Self::prolongation_period_type) units.
    pub fn prolongation_period(&self) -> Option<u32> {
        self.callback.get_parsed("prolongationPeriod")
    }

    pub fn prolongation_period_type(&self) -> Option<&'a str> {
        self.callback.get("prolongationPeriodType")
    }

    /// Price; a decimal comma is accepted.
    pub fn price(&self) -> Option<Decimal> {
        let raw = self.callback.get("price")?.trim();
        Decimal::from_str(&raw.replace(',', ".")).ok()
    }

    pub fn currency(&self) -> Option<&'a str> {
        self.callback.get("currency")
    }

    /// Hash of the client key the coupon belongs to.
    pub fn client_key_hash(&self) -> Option<&'a str> {
        self.callback.get("clientKeyHash")
    }

    pub fn seller(&self) -> Option<&'a str> {
        self.callback.get("seller")
    }
}

/// Bitrix24 portal events.
#[derive(Debug, Clone, Copy)]
pub struct PortalCallback<'a> {
    callback: &'a VerifiedCallback,
}

impl<'a> PortalCallback<'a> {
    pub(crate) fn new(callback: &'a VerifiedCallback) -> Self {
        Self { callback }
    }

    pub fn partner_id(&self) -> Option<u64> {
        self.callback.get_parsed("partnerId")
    }

    /// Portal domain.
    pub fn domain(&self) -> Option<&'a str> {
        self.callback.get("domain")
    }

    /// Portal member id.
    pub fn member_id(&self) -> Option<&'a str> {
        self.callback.get("memberId")
    }

    /// Tariff code, for tariff changes.
    pub fn tariff(&self) -> Option<&'a str> {
        self.callback.get("tariff")
    }

    /// Any other field.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.callback.get(name)
    }
}
