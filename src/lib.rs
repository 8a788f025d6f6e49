// marketplace-api - client for the 1C-Bitrix marketplace partner API
//
// Signed REST calls with pagination, the client registration API, verified
// event callbacks and bulk maintenance helpers.

// Re-export core functionality
pub use marketplace_core::*;

pub use marketplace_clients::{
    ClientAction, ClientDetails, ClientKey, ClientRecord, ClientsApi, ClientsApiConfig, ModuleId,
};
pub use marketplace_http_client::{
    HttpClientConfig, HttpClientConfigBuilder, HttpTransport, MockTransport, Transport,
};
pub use marketplace_partners::{
    CallbackInfo, ClientInfo, CouponRequest, IssuedCoupon, Navigation, PageList, PartnersApi,
    PartnersApiConfig, ProlongationPeriod,
};

// Re-export member crates
pub use marketplace_clients;
pub use marketplace_http_client;
pub use marketplace_partners;

#[cfg(feature = "webhooks")]
pub use marketplace_webhooks;

#[cfg(feature = "webhooks")]
pub use marketplace_webhooks::{
    CallbackHandler, CallbackReceiver, CallbackVerifier, CouponCallback, PortalCallback,
    VerifiedCallback,
};

#[cfg(feature = "config")]
pub use marketplace_config;

mod helper;

pub use helper::Helper;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CallbackEvent, ClientDetails, ClientsApi, CouponRequest, Credentials, Helper,
        HttpTransport, MarketplaceError, PageList, PartnersApi, Result, Transport,
    };

    #[cfg(feature = "webhooks")]
    pub use crate::{CallbackReceiver, CallbackVerifier, VerifiedCallback};
}
