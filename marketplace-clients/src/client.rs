//! Client registration API.

use marketplace_core::charset::{ApiSurface, Charset, encode_map};
use marketplace_core::signature::{constant_time_eq, joined_digest};
use marketplace_core::{Credentials, FormMap, MarketplaceError, Result};
use marketplace_http_client::Transport;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{ClientAction, ClientDetails, ClientKey, ClientRecord, ClientsApiConfig, ModuleId};

const REPLY_SEPARATOR: &str = "<br />";

/// Client of `add_client.php`, bound to one module.
///
/// Requests are signed with
/// `md5(partnerId|moduleId|clientKey|action|secret)` and sent as GET
/// query strings in UTF-8.
pub struct ClientsApi<T> {
    credentials: Credentials,
    module_id: ModuleId,
    client_key: Option<ClientKey>,
    transport: Arc<T>,
    config: Arc<ClientsApiConfig>,
}

impl<T> Clone for ClientsApi<T> {
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            module_id: self.module_id.clone(),
            client_key: self.client_key.clone(),
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(Deserialize)]
struct ClientList {
    #[serde(rename = "client", default)]
    clients: Vec<ClientRecord>,
}

impl<T: Transport> ClientsApi<T> {
    /// Create a client for a module, validating its code.
    pub fn new(credentials: Credentials, module_id: &str, transport: T) -> Result<Self> {
        Self::with_config(credentials, module_id, transport, ClientsApiConfig::default())
    }

    /// Create a client with the given configuration.
    pub fn with_config(
        credentials: Credentials,
        module_id: &str,
        transport: T,
        config: ClientsApiConfig,
    ) -> Result<Self> {
        Self::from_shared(credentials, module_id, Arc::new(transport), config)
    }

    /// Create a client over a transport shared with other clients.
    pub fn from_shared(
        credentials: Credentials,
        module_id: &str,
        transport: Arc<T>,
        config: ClientsApiConfig,
    ) -> Result<Self> {
        Ok(Self {
            credentials,
            module_id: ModuleId::new(module_id)?,
            client_key: None,
            transport,
            config: Arc::new(config),
        })
    }

    /// A client identical to this one, bound to a client key.
    pub fn with_client_key(&self, key: &str) -> Result<Self> {
        let mut client = self.clone();
        client.client_key = Some(ClientKey::new(key)?);
        Ok(client)
    }

    /// The module this client manages.
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    /// The bound client key, if any.
    pub fn client_key(&self) -> Option<&ClientKey> {
        self.client_key.as_ref()
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Register the bound client for the module.
    pub async fn add(&self, details: &ClientDetails) -> Result<String> {
        let text = self.query(ClientAction::Add, Some(details)).await?;
        parse_reply(&text)
    }

    /// Update the bound client's details.
    pub async fn update(&self, details: &ClientDetails) -> Result<String> {
        let text = self.query(ClientAction::Update, Some(details)).await?;
        parse_reply(&text)
    }

    /// Remove the bound client from the module.
    pub async fn delete(&self) -> Result<String> {
        let text = self.query(ClientAction::Delete, None).await?;
        parse_reply(&text)
    }

    /// List the module's clients, keeping those matching every `filter`
    /// entry.
    pub async fn get_list(&self, filter: &[(&str, &str)]) -> Result<Vec<ClientRecord>> {
        let text = self.query(ClientAction::List, None).await?;
        if is_error_reply(&text) {
            return parse_reply(&text).map(|_| Vec::new());
        }

        let list: ClientList = quick_xml::de::from_str(&text)
            .map_err(|e| MarketplaceError::MalformedResponse(e.to_string()))?;

        Ok(list
            .clients
            .into_iter()
            .filter(|client| client.matches(filter))
            .collect())
    }

    /// Check the `hash` of an inbound request on this surface.
    ///
    /// The partner id defaults to the own one; `module_id`, `key` and
    /// `action` enter the hash only when present. A request without `hash`
    /// never matches.
    pub fn check_hash(&self, params: &FormMap) -> bool {
        let Some(received) = params.get_scalar("hash") else {
            return false;
        };

        let partner_id = params
            .get_scalar("partner_id")
            .map(String::as_str)
            .unwrap_or(self.credentials.partner_id());

        let mut parts = vec![partner_id];
        parts.extend(
            ["module_id", "key", "action"]
                .into_iter()
                .filter_map(|name| params.get_scalar(name).map(String::as_str)),
        );
        parts.push(self.credentials.secret());

        constant_time_eq(joined_digest(&parts).as_bytes(), received.as_bytes())
    }

    fn hash(&self, action: ClientAction) -> String {
        joined_digest(&[
            self.credentials.partner_id(),
            self.module_id.as_str(),
            self.client_key.as_ref().map(ClientKey::as_str).unwrap_or(""),
            action.as_str(),
            self.credentials.secret(),
        ])
    }

    fn url(&self, action: ClientAction, details: Option<&ClientDetails>) -> Result<String> {
        let mut params: FormMap = FormMap::new()
            .with("partner_id", self.credentials.partner_id())
            .with("module_id", self.module_id.as_str());
        match (&self.client_key, action) {
            (Some(key), _) => params.insert("key", key.as_str()),
            (None, ClientAction::List) => {}
            (None, _) => {
                return Err(MarketplaceError::InvalidArgument(format!(
                    "a client key is required for {}",
                    action
                )));
            }
        }
        params.insert("action", action.as_str());
        if let Some(details) = details {
            for (name, value) in details.fields() {
                params.insert(name, value);
            }
        }
        params.insert("is_utf", "Y");
        params.insert("hash", self.hash(action));

        let query = encode_map(&params, ApiSurface::Clients.charset())?.to_query_string();
        Ok(format!("{}?{}", self.config.endpoint, query))
    }

    async fn query(&self, action: ClientAction, details: Option<&ClientDetails>) -> Result<String> {
        let url = self.url(action, details)?;

        debug!(action = %action, module = %self.module_id, "Calling client registration API");
        let body = self
            .transport
            .get(&url)
            .await
            .inspect_err(|e| warn!(action = %action, error = %e, "Client registration API unreachable"))?;

        let charset = match action {
            ClientAction::List if !is_error_reply_bytes(&body) => Charset::Windows1251,
            _ => ApiSurface::Clients.charset(),
        };
        Ok(charset.decode(&body)?.into_owned())
    }
}

fn is_error_reply(text: &str) -> bool {
    is_error_reply_bytes(text.as_bytes())
}

fn is_error_reply_bytes(body: &[u8]) -> bool {
    body.trim_ascii_start()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"ERROR"))
}

/// Split an `OK<br />message` / `ERROR<br />message` reply.
fn parse_reply(text: &str) -> Result<String> {
    let mut parts = text.split(REPLY_SEPARATOR);
    let status = parts.next().unwrap_or_default().trim();
    let message = parts.next().unwrap_or_default().trim().to_string();

    if status == "OK" {
        Ok(message)
    } else {
        let reason = if message.is_empty() {
            status.to_string()
        } else {
            message
        };
        warn!(reason = %reason, "Client registration API returned an error");
        Err(MarketplaceError::ClientsApi(reason))
    }
}
