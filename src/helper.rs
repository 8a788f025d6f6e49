//! Bulk operations over the partner and client registration APIs.

use marketplace_clients::{ClientsApi, ClientsApiConfig};
use marketplace_core::value::as_text;
use marketplace_core::{CallbackEvent, Credentials, FormMap, MarketplaceError, Result};
use marketplace_http_client::Transport;
use marketplace_partners::{CallbackInfo, PartnersApi, PartnersApiConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

const CALLBACK_ALREADY_EXISTS: &str = "CALLBACK_ALREADY_EXISTS";

/// Bulk maintenance of callbacks and clients for one partner account.
pub struct Helper<T> {
    partners: PartnersApi<T>,
    clients_config: ClientsApiConfig,
}

impl<T: Transport> Helper<T> {
    /// Create a helper using the production endpoints.
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self::from_shared(
            credentials,
            Arc::new(transport),
            PartnersApiConfig::default(),
            ClientsApiConfig::default(),
        )
    }

    /// Create a helper over a shared transport with explicit endpoints.
    pub fn from_shared(
        credentials: Credentials,
        transport: Arc<T>,
        partners_config: PartnersApiConfig,
        clients_config: ClientsApiConfig,
    ) -> Self {
        Self {
            partners: PartnersApi::from_shared(credentials, transport, partners_config)
                .with_fetch_all_pages(true),
            clients_config,
        }
    }

    /// The partner API client used by the helper; it always fetches all
    /// pages.
    pub fn partners(&self) -> &PartnersApi<T> {
        &self.partners
    }

    /// Delete every registered handler, or only those of one event type.
    ///
    /// Each handler is deleted through the method of its own event type;
    /// handlers of unknown types are skipped. Returns the number deleted.
    pub async fn delete_all_callbacks(&self, event_type: Option<&str>) -> Result<usize> {
        let callbacks: Vec<CallbackInfo> = self
            .partners
            .get_callback_list(None)
            .await?
            .records()?;

        let mut deleted = 0;
        for callback in callbacks
            .iter()
            .filter(|c| event_type.is_none_or(|wanted| c.event_type == wanted))
        {
            let Ok(event) = callback.event_type.parse::<CallbackEvent>() else {
                warn!(
                    callback_id = callback.callback_id,
                    event_type = %callback.event_type,
                    "Skipping handler of unknown event type"
                );
                continue;
            };
            self.partners
                .delete_callback(event, callback.callback_id)
                .await?;
            deleted += 1;
        }

        info!(deleted, "Deleted callbacks");
        Ok(deleted)
    }

    /// Register an `activate.coupon` handler for every module of the partner.
    ///
    /// `url_template` gets the module code substituted for `{code}` or `%s`.
    /// Modules that already have a handler are skipped. Returns the number
    /// of handlers registered.
    pub async fn register_callbacks_for_all_modules(&self, url_template: &str) -> Result<usize> {
        let partner_id = self.partners.credentials().partner_id();
        let modules = self
            .partners
            .marketplace_product_list(
                FormMap::new().with("modulePartnerId", partner_id),
                None,
                None,
            )
            .await?;

        let mut registered = 0;
        for module in &modules.list {
            let Some(code) = module.get("code").and_then(as_text) else {
                warn!("Skipping module without code");
                continue;
            };
            let url = render_url(url_template, &code);

            match self.partners.add_callback_activate_coupon(&code, &url).await {
                Ok(_) => registered += 1,
                Err(e) if e.remote_code() == Some(CALLBACK_ALREADY_EXISTS) => {
                    debug!(code = %code, "Handler already registered");
                }
                Err(e) => return Err(e),
            }
        }

        info!(modules = modules.len(), registered, "Registered module callbacks");
        Ok(registered)
    }

    /// Remove a client of a module.
    ///
    /// Returns `false` when the client registration API refuses; invalid
    /// arguments and transport failures are errors.
    pub async fn delete_client(&self, module_id: &str, key: &str) -> Result<bool> {
        let clients = ClientsApi::from_shared(
            self.partners.credentials().clone(),
            module_id,
            Arc::clone(self.partners.transport()),
            self.clients_config.clone(),
        )?
        .with_client_key(key)?;

        match clients.delete().await {
            Ok(_) => Ok(true),
            Err(MarketplaceError::ClientsApi(reason)) => {
                warn!(module = %module_id, reason = %reason, "Client was not deleted");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn render_url(template: &str, code: &str) -> String {
    template.replace("{code}", code).replace("%s", code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplace_http_client::MockTransport;
    use serde_json::json;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn helper(transport: MockTransport) -> Helper<MockTransport> {
        Helper::new(Credentials::new("100", "s3cr3t").unwrap(), transport)
    }

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_render_url() {
        assert_eq!(
            render_url("https://example.com/cb/{code}", "a.b"),
            "https://example.com/cb/a.b"
        );
        assert_eq!(
            render_url("https://example.com/cb?module=%s", "a.b"),
            "https://example.com/cb?module=a.b"
        );
    }

    #[tokio::test]
    async fn test_delete_all_callbacks_uses_each_event_type() {
        let transport = MockTransport::new();
        transport
            .push_body(body(json!({"result": {
                "list": [
                    {"callbackId": 1, "eventType": "activate.coupon", "code": "a.b", "url": "u"},
                    {"callbackId": 2, "eventType": "bitrix24.portal.change.tariff", "url": "u"},
                    {"callbackId": 3, "eventType": "future.event", "url": "u"}
                ],
                "navigation": {"pageNumber": 1, "pageCount": 1}
            }})))
            .push_body(body(json!({"result": true})))
            .push_body(body(json!({"result": true})));

        let helper = helper(transport);
        assert_eq!(helper.delete_all_callbacks(None).await.unwrap(), 2);

        let requests = helper.partners().transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[1].param("action").as_deref(),
            Some("delete.callback.activate.coupon")
        );
        assert_eq!(requests[1].param("callbackId").as_deref(), Some("1"));
        assert_eq!(
            requests[2].param("action").as_deref(),
            Some("delete.callback.bitrix24.portal.change.tariff")
        );
    }

    #[tokio::test]
    async fn test_delete_all_callbacks_filters_by_type() {
        let transport = MockTransport::new();
        transport
            .push_body(body(json!({"result": {
                "list": [
                    {"callbackId": 1, "eventType": "activate.coupon"},
                    {"callbackId": 2, "eventType": "add.coupon"}
                ]
            }})))
            .push_body(body(json!({"result": true})));

        let helper = helper(transport);
        let deleted = helper.delete_all_callbacks(Some("add.coupon")).await.unwrap();
        assert_eq!(deleted, 1);

        let requests = helper.partners().transport().requests();
        assert_eq!(requests[1].param("callbackId").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_register_skips_existing_callbacks() {
        let transport = MockTransport::new();
        transport
            .push_body(body(json!({"result": {
                "list": [{"code": "vendor.one"}, {"code": "vendor.two"}, {"name": "no code"}]
            }})))
            .push_body(body(json!({"error": [{"code": "CALLBACK_ALREADY_EXISTS", "id": 1}]})))
            .push_body(body(json!({"result": {"callbackId": 9}})));

        let helper = helper(transport);
        let registered = helper
            .register_callbacks_for_all_modules("https://example.com/cb/{code}")
            .await
            .unwrap();
        assert_eq!(registered, 1);

        let requests = helper.partners().transport().requests();
        assert_eq!(requests[0].param("filter[modulePartnerId]").as_deref(), Some("100"));
        assert_eq!(
            requests[2].param("url").as_deref(),
            Some("https://example.com/cb/vendor.two")
        );
    }

    #[tokio::test]
    async fn test_register_propagates_other_errors() {
        let transport = MockTransport::new();
        transport
            .push_body(body(json!({"result": {"list": [{"code": "vendor.one"}]}})))
            .push_body(body(json!({"error": [{"code": "ACCESS_DENIED", "id": 2}]})));

        let err = helper(transport)
            .register_callbacks_for_all_modules("https://example.com/%s")
            .await
            .unwrap_err();
        assert_eq!(err.remote_code(), Some("ACCESS_DENIED"));
    }

    #[tokio::test]
    async fn test_delete_client() {
        let transport = MockTransport::new();
        transport
            .push_body("OK<br />Deleted")
            .push_body("ERROR<br />Client not found");

        let helper = helper(transport);
        assert!(helper.delete_client("vendor.module", KEY).await.unwrap());
        assert!(!helper.delete_client("vendor.module", KEY).await.unwrap());
        assert!(helper.delete_client("module", KEY).await.is_err());
        assert_eq!(helper.partners().transport().request_count(), 2);
    }
}
