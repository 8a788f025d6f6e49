//! Marketplace event types that callbacks can be registered for.

use crate::MarketplaceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An event type, as sent in `callbackType` and listed in `eventType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallbackEvent {
    /// A coupon was activated (site marketplace).
    #[serde(rename = "activate.coupon")]
    ActivateCoupon,
    /// A coupon was issued (site marketplace).
    #[serde(rename = "add.coupon")]
    AddCoupon,
    /// A coupon was activated (Bitrix24 marketplace).
    #[serde(rename = "b24mp.activate.coupon")]
    B24mpActivateCoupon,
    /// A coupon was issued (Bitrix24 marketplace).
    #[serde(rename = "b24mp.add.coupon")]
    B24mpAddCoupon,
    /// A Bitrix24 portal became active.
    #[serde(rename = "bitrix24.portal.become.active")]
    Bitrix24PortalBecomeActive,
    /// A Bitrix24 portal was attached to the partner.
    #[serde(rename = "add.bitrix24.partner.portal")]
    Bitrix24PartnerPortal,
    /// A Bitrix24 portal changed its tariff.
    #[serde(rename = "bitrix24.portal.change.tariff")]
    Bitrix24PortalChangeTariff,
}

impl CallbackEvent {
    /// Every event type.
    pub const ALL: [CallbackEvent; 7] = [
        Self::ActivateCoupon,
        Self::AddCoupon,
        Self::B24mpActivateCoupon,
        Self::B24mpAddCoupon,
        Self::Bitrix24PortalBecomeActive,
        Self::Bitrix24PartnerPortal,
        Self::Bitrix24PortalChangeTariff,
    ];

    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActivateCoupon => "activate.coupon",
            Self::AddCoupon => "add.coupon",
            Self::B24mpActivateCoupon => "b24mp.activate.coupon",
            Self::B24mpAddCoupon => "b24mp.add.coupon",
            Self::Bitrix24PortalBecomeActive => "bitrix24.portal.become.active",
            Self::Bitrix24PartnerPortal => "add.bitrix24.partner.portal",
            Self::Bitrix24PortalChangeTariff => "bitrix24.portal.change.tariff",
        }
    }

    /// API method registering a handler for this event.
    pub fn add_method(&self) -> &'static str {
        match self {
            Self::ActivateCoupon => "addCallbackActivateCoupon",
            Self::AddCoupon => "addCallbackAddCoupon",
            Self::B24mpActivateCoupon => "addCallbackB24mpActivateCoupon",
            Self::B24mpAddCoupon => "addCallbackB24mpAddCoupon",
            Self::Bitrix24PortalBecomeActive => "addCallbackBitrix24PortalBecomeActive",
            Self::Bitrix24PartnerPortal => "addCallbackBitrix24PartnerPortal",
            Self::Bitrix24PortalChangeTariff => "addCallbackBitrix24PortalChangeTariff",
        }
    }

    /// API method removing a handler of this event.
    pub fn delete_method(&self) -> &'static str {
        match self {
            Self::ActivateCoupon => "deleteCallbackActivateCoupon",
            Self::AddCoupon => "deleteCallbackAddCoupon",
            Self::B24mpActivateCoupon => "deleteCallbackB24mpActivateCoupon",
            Self::B24mpAddCoupon => "deleteCallbackB24mpAddCoupon",
            Self::Bitrix24PortalBecomeActive => "deleteCallbackBitrix24PortalBecomeActive",
            Self::Bitrix24PartnerPortal => "deleteCallbackAddBitrix24PartnerPortal",
            Self::Bitrix24PortalChangeTariff => "deleteCallbackBitrix24PortalChangeTariff",
        }
    }

    /// Coupon events are registered per module and need its code.
    pub fn needs_module_code(&self) -> bool {
        self.is_coupon_event()
    }

    /// Check if the event carries coupon fields.
    pub fn is_coupon_event(&self) -> bool {
        matches!(
            self,
            Self::ActivateCoupon
                | Self::AddCoupon
                | Self::B24mpActivateCoupon
                | Self::B24mpAddCoupon
        )
    }
}

impl fmt::Display for CallbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallbackEvent {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| MarketplaceError::InvalidArgument(format!("unknown event type: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::resolve_action;

    #[test]
    fn test_round_trip_names() {
        for event in CallbackEvent::ALL {
            assert_eq!(event.as_str().parse::<CallbackEvent>().unwrap(), event);
        }
        assert!("remove.coupon".parse::<CallbackEvent>().is_err());
    }

    #[test]
    fn test_delete_method_resolves_to_event_action() {
        for event in CallbackEvent::ALL {
            assert_eq!(
                resolve_action(event.delete_method()).unwrap(),
                format!("delete.callback.{}", event.as_str())
            );
        }
    }

    #[test]
    fn test_add_method_actions() {
        assert_eq!(
            resolve_action(CallbackEvent::ActivateCoupon.add_method()).as_deref(),
            Some("add.callback.activate.coupon")
        );
        assert_eq!(
            resolve_action(CallbackEvent::Bitrix24PartnerPortal.add_method()).as_deref(),
            Some("add.callback.bitrix24.partner.portal")
        );
    }

    #[test]
    fn test_module_code_requirement() {
        assert!(CallbackEvent::B24mpAddCoupon.needs_module_code());
        assert!(!CallbackEvent::Bitrix24PortalChangeTariff.needs_module_code());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&CallbackEvent::Bitrix24PartnerPortal).unwrap();
        assert_eq!(json, "\"add.bitrix24.partner.portal\"");
        let event: CallbackEvent = serde_json::from_str("\"b24mp.activate.coupon\"").unwrap();
        assert_eq!(event, CallbackEvent::B24mpActivateCoupon);
    }
}
