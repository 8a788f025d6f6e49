//! One method per partner API action.

use marketplace_core::value::{as_text, as_u64, get_path, is_true};
use marketplace_core::{CallbackEvent, FormMap, MarketplaceError, Result};
use marketplace_http_client::Transport;
use serde_json::Value;
use tracing::info;

use crate::{ClientInfo, CouponRequest, IssuedCoupon, PageList, PartnersApi};

macro_rules! module_callback_methods {
    ($($(#[$doc:meta])* $add:ident, $delete:ident => $event:ident;)+) => {
        $(
            $(#[$doc])*
            ///
            /// Returns the handler id.
            pub async fn $add(&self, code: &str, url: &str) -> Result<u64> {
                self.add_callback(CallbackEvent::$event, Some(code), url).await
            }

            /// Remove a handler registered with
            #[doc = concat!("[`", stringify!($add), "`](Self::", stringify!($add), ").")]
            pub async fn $delete(&self, callback_id: u64) -> Result<bool> {
                self.delete_callback(CallbackEvent::$event, callback_id).await
            }
        )+
    };
}

macro_rules! portal_callback_methods {
    ($($(#[$doc:meta])* $add:ident, $delete:ident => $event:ident;)+) => {
        $(
            $(#[$doc])*
            ///
            /// Returns the handler id.
            pub async fn $add(&self, url: &str) -> Result<u64> {
                self.add_callback(CallbackEvent::$event, None, url).await
            }

            /// Remove a handler registered with
            #[doc = concat!("[`", stringify!($add), "`](Self::", stringify!($add), ").")]
            pub async fn $delete(&self, callback_id: u64) -> Result<bool> {
                self.delete_callback(CallbackEvent::$event, callback_id).await
            }
        )+
    };
}

impl<T: Transport> PartnersApi<T> {
    /// Describe the response structure of another action.
    pub async fn help(&self, action_code: &str) -> Result<Value> {
        self.call("help", FormMap::new().with("actionCode", action_code))
            .await
    }

    /// Register a handler for an event.
    ///
    /// Coupon events are registered per module and need its `code`.
    pub async fn add_callback(
        &self,
        event: CallbackEvent,
        code: Option<&str>,
        url: &str,
    ) -> Result<u64> {
        let mut params = FormMap::new();
        match code {
            Some(code) => params.insert("code", code),
            None if event.needs_module_code() => {
                return Err(MarketplaceError::InvalidArgument(format!(
                    "event {} needs a module code",
                    event
                )));
            }
            None => {}
        }
        params.insert("url", url);

        let result = self.call(event.add_method(), params).await?;
        let callback_id = required(&result, "callbackId", as_u64)?;
        info!(event = %event, callback_id, "Registered callback");
        Ok(callback_id)
    }

    /// Remove a handler. Returns whether the API reported it deleted.
    pub async fn delete_callback(&self, event: CallbackEvent, callback_id: u64) -> Result<bool> {
        let result = self
            .call(
                event.delete_method(),
                FormMap::new().with("callbackId", callback_id.to_string()),
            )
            .await?;
        let deleted = flag(&result, "deleteSuccess");
        info!(event = %event, callback_id, deleted, "Deleted callback");
        Ok(deleted)
    }

    module_callback_methods! {
        /// Register a handler for coupon activation on the site marketplace.
        add_callback_activate_coupon, delete_callback_activate_coupon => ActivateCoupon;
        /// Register a handler for coupon issue on the site marketplace.
        add_callback_add_coupon, delete_callback_add_coupon => AddCoupon;
        /// Register a handler for coupon activation on the Bitrix24 marketplace.
        add_callback_b24mp_activate_coupon, delete_callback_b24mp_activate_coupon => B24mpActivateCoupon;
        /// Register a handler for coupon issue on the Bitrix24 marketplace.
        add_callback_b24mp_add_coupon, delete_callback_b24mp_add_coupon => B24mpAddCoupon;
    }

    portal_callback_methods! {
        /// Register a handler for Bitrix24 portal activation.
        add_callback_bitrix24_portal_become_active, delete_callback_bitrix24_portal_become_active => Bitrix24PortalBecomeActive;
        /// Register a handler for Bitrix24 portals attached to the partner.
        add_callback_bitrix24_partner_portal, delete_callback_add_bitrix24_partner_portal => Bitrix24PartnerPortal;
        /// Register a handler for Bitrix24 tariff changes.
        add_callback_bitrix24_portal_change_tariff, delete_callback_bitrix24_portal_change_tariff => Bitrix24PortalChangeTariff;
    }

    /// List every registered handler.
    pub async fn get_callback_list(&self, page: Option<u64>) -> Result<PageList> {
        self.call_list("getCallbackList", navigation(FormMap::new(), page))
            .await
    }

    /// List published marketplace modules.
    pub async fn marketplace_product_list(
        &self,
        filter: FormMap,
        order: Option<FormMap>,
        page: Option<u64>,
    ) -> Result<PageList> {
        let mut params = FormMap::new();
        if !filter.is_empty() {
            params.insert("filter", filter);
        }
        if let Some(order) = order.filter(|o| !o.is_empty()) {
            params.insert("order", order);
        }
        self.call_list("marketplaceProductList", navigation(params, page))
            .await
    }

    /// Check whether a module suits the edition of a product key.
    pub async fn marketplace_product_check(&self, code: &str, key: &str) -> Result<bool> {
        let result = self
            .call(
                "marketplaceProductCheck",
                FormMap::new().with("code", code).with("key", key),
            )
            .await?;
        Ok(flag(&result, "compatible"))
    }

    /// Check one of your modules against a key, including install details.
    pub async fn marketplace_product_self_check(&self, code: &str, key: &str) -> Result<Value> {
        self.call(
            "marketplaceProductSelfCheck",
            FormMap::new().with("code", code).with("key", key),
        )
        .await
    }

    /// Bind a module to a client key. Returns the coupon id.
    pub async fn marketplace_client_add(
        &self,
        code: &str,
        key: &str,
        client: &ClientInfo,
    ) -> Result<u64> {
        let mut params = FormMap::new().with("code", code).with("key", key);
        client.append_to(&mut params);
        let result = self.call("marketplaceClientAdd", params).await?;
        required(&result, "couponId", as_u64)
    }

    /// List the clients of one of your modules.
    pub async fn marketplace_client_list(
        &self,
        code: &str,
        order: Option<FormMap>,
        page: Option<u64>,
    ) -> Result<PageList> {
        let mut params = FormMap::new().with("filter", FormMap::new().with("code", code));
        if let Some(order) = order.filter(|o| !o.is_empty()) {
            params.insert("order", order);
        }
        self.call_list("marketplaceClientList", navigation(params, page))
            .await
    }

    /// Update a client's contact details. Returns whether anything changed.
    pub async fn marketplace_client_update(
        &self,
        code: &str,
        key: &str,
        client: &ClientInfo,
    ) -> Result<bool> {
        let mut params = FormMap::new().with("code", code).with("key", key);
        client.append_to(&mut params);
        let result = self.call("marketplaceClientUpdate", params).await?;
        Ok(flag(&result, "isUpdated"))
    }

    /// Describe a product key.
    pub async fn key_info(&self, key: &str) -> Result<Value> {
        self.call("keyInfo", FormMap::new().with("key", key)).await
    }

    /// Issue a coupon for a module.
    pub async fn marketplace_coupon_add(&self, request: &CouponRequest) -> Result<IssuedCoupon> {
        let result = self
            .call("marketplaceCouponAdd", request.to_params())
            .await?;
        let coupon = required(&result, "coupon", as_text)?;
        info!(code = %request.code, "Issued coupon");
        Ok(IssuedCoupon {
            coupon,
            coupon_sent_to_buyer: flag(&result, "couponSentToBuyer"),
        })
    }
}

fn navigation(mut params: FormMap, page: Option<u64>) -> FormMap {
    if let Some(page) = page {
        params.insert("navigation", FormMap::new().with("page", page.to_string()));
    }
    params
}

fn flag(result: &Value, path: &str) -> bool {
    get_path(result, path).is_some_and(is_true)
}

fn required<V>(result: &Value, path: &str, read: impl Fn(&Value) -> Option<V>) -> Result<V> {
    get_path(result, path)
        .and_then(read)
        .ok_or_else(|| MarketplaceError::MalformedResponse(format!("result has no {}", path)))
}
