//! Request and response types of the typed partner API methods.

use marketplace_core::value::{string_or_number, u64_string_or_number};
use marketplace_core::{FormMap, MarketplaceError, Result};
use serde::{Deserialize, Serialize};

/// Contact details of a client, sent with `marketplaceClientAdd` and
/// `marketplaceClientUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub client_name: Option<String>,
    /// Client website.
    pub client_site_url: Option<String>,
    /// Client e-mail.
    pub client_email: Option<String>,
    /// Contact person.
    pub client_contact_person: Option<String>,
    /// Phone number.
    pub client_phone: Option<String>,
    /// Free-form comments.
    pub comments: Option<String>,
}

impl ClientInfo {
    /// Empty contact details.
    pub fn new() -> Self {
        Self::default()
    }

    /// With client name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// With website
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.client_site_url = Some(url.into());
        self
    }

    /// With e-mail
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.client_email = Some(email.into());
        self
    }

    /// With contact person
    pub fn contact_person(mut self, person: impl Into<String>) -> Self {
        self.client_contact_person = Some(person.into());
        self
    }

    /// With phone
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    /// With comments
    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Append the present fields to a parameter map.
    pub(crate) fn append_to(&self, params: &mut FormMap) {
        let fields = [
            ("clientName", &self.client_name),
            ("clientSiteUrl", &self.client_site_url),
            ("clientEmail", &self.client_email),
            ("clientContactPerson", &self.client_contact_person),
            ("clientPhone", &self.client_phone),
            ("comments", &self.comments),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                params.insert(key, value);
            }
        }
    }
}

/// Coupon prolongation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ProlongationPeriod {
    /// Three months.
    Months3,
    /// Six months.
    Months6,
    /// Twelve months.
    Months12,
}

impl ProlongationPeriod {
    /// Length in months.
    pub fn months(&self) -> u32 {
        match self {
            Self::Months3 => 3,
            Self::Months6 => 6,
            Self::Months12 => 12,
        }
    }
}

impl TryFrom<u32> for ProlongationPeriod {
    type Error = MarketplaceError;

    fn try_from(months: u32) -> Result<Self> {
        match months {
            3 => Ok(Self::Months3),
            6 => Ok(Self::Months6),
            12 => Ok(Self::Months12),
            other => Err(MarketplaceError::InvalidArgument(format!(
                "prolongation period must be one of 3, 6, 12; got {}",
                other
            ))),
        }
    }
}

impl From<ProlongationPeriod> for u32 {
    fn from(period: ProlongationPeriod) -> Self {
        period.months()
    }
}

/// Parameters of `marketplaceCouponAdd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRequest {
    /// Module code.
    pub code: String,
    /// Buyer name.
    pub name: String,
    /// Buyer e-mail.
    pub email: String,
    /// Issue the coupon as active.
    pub active: bool,
    /// Prolongation period, for prolongation coupons.
    pub prolongation: Option<ProlongationPeriod>,
    /// Mail the coupon to the buyer.
    pub send_coupon_to_buyer: bool,
}

impl CouponRequest {
    /// An active, non-prolongation coupon that is not mailed to the buyer.
    pub fn new(code: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            email: email.into(),
            active: true,
            prolongation: None,
            send_coupon_to_buyer: false,
        }
    }

    /// Set whether the coupon is active.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Make this a prolongation coupon.
    pub fn prolongation(mut self, period: ProlongationPeriod) -> Self {
        self.prolongation = Some(period);
        self
    }

    /// Make this a prolongation coupon for a period given in months.
    ///
    /// Only 3, 6 and 12 are accepted.
    pub fn prolongation_months(self, months: u32) -> Result<Self> {
        Ok(self.prolongation(ProlongationPeriod::try_from(months)?))
    }

    /// Set whether the coupon is mailed to the buyer.
    pub fn send_to_buyer(mut self, send: bool) -> Self {
        self.send_coupon_to_buyer = send;
        self
    }

    pub(crate) fn to_params(&self) -> FormMap {
        let mut params = FormMap::new()
            .with("code", &self.code)
            .with("name", &self.name)
            .with("email", &self.email)
            .with("active", yes_no(self.active))
            .with("prolongation", yes_no(self.prolongation.is_some()));
        if let Some(period) = self.prolongation {
            params.insert("prolongationPeriod", period.months().to_string());
        }
        params.insert("sendCouponToBuyer", yes_no(self.send_coupon_to_buyer));
        params
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

/// A coupon issued by `marketplaceCouponAdd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCoupon {
    /// Coupon code (`MPX-...`).
    pub coupon: String,
    /// Whether the coupon was mailed to the buyer.
    pub coupon_sent_to_buyer: bool,
}

/// A registered event handler, as listed by `getCallbackList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackInfo {
    /// Handler id.
    #[serde(deserialize_with = "u64_string_or_number")]
    pub callback_id: u64,
    /// Event type wire name.
    pub event_type: String,
    /// Module code, for module events.
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    /// Handler URL.
    #[serde(default)]
    pub url: String,
}
