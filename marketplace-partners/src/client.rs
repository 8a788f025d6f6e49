//! Signed calls to the partner REST API.

use marketplace_core::charset::{ApiSurface, encode_map};
use marketplace_core::value::as_records;
use marketplace_core::{
    Credentials, FormMap, FormValue, MarketplaceError, OperationDescriptor, RemoteError, Result,
    signature,
};
use marketplace_http_client::Transport;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{Navigation, PageList, PartnersApiConfig};

/// Client of the partner REST API.
///
/// Each call resolves the method name to a wire action, encodes the
/// parameters to `windows-1251`, signs them and posts the form. Clones share
/// the credentials and the transport.
pub struct PartnersApi<T> {
    credentials: Credentials,
    transport: Arc<T>,
    config: Arc<PartnersApiConfig>,
}

impl<T> Clone for PartnersApi<T> {
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: Transport> PartnersApi<T> {
    /// Create a client with the default configuration.
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self::with_config(credentials, transport, PartnersApiConfig::default())
    }

    /// Create a client with the given configuration.
    pub fn with_config(credentials: Credentials, transport: T, config: PartnersApiConfig) -> Self {
        Self::from_shared(credentials, Arc::new(transport), config)
    }

    /// Create a client over a transport shared with other clients.
    pub fn from_shared(
        credentials: Credentials,
        transport: Arc<T>,
        config: PartnersApiConfig,
    ) -> Self {
        Self {
            credentials,
            transport,
            config: Arc::new(config),
        }
    }

    /// A client identical to this one with pagination following switched.
    pub fn with_fetch_all_pages(&self, fetch_all_pages: bool) -> Self {
        Self {
            credentials: self.credentials.clone(),
            transport: Arc::clone(&self.transport),
            config: Arc::new(
                self.config
                    .as_ref()
                    .clone()
                    .with_fetch_all_pages(fetch_all_pages),
            ),
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &PartnersApiConfig {
        &self.config
    }

    /// Get the credentials the client signs with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Call a method and return the `result` of the response.
    ///
    /// `method` is the camel-case method name (`marketplaceProductCheck`).
    /// A response with a non-empty `error` array fails with
    /// [`MarketplaceError::RemoteApi`].
    pub async fn call(&self, method: &str, params: FormMap) -> Result<Value> {
        let op = OperationDescriptor::resolve(method)?;
        let action = op.rest_action.as_str();
        let charset = ApiSurface::Partners.charset();

        let mut encoded = encode_map(&params, charset)?;

        let signed_values = op
            .signed_param_names
            .iter()
            .map(|name| {
                encoded.get_scalar(name).map(Vec::as_slice).ok_or_else(|| {
                    MarketplaceError::MissingSignedParam {
                        action: action.to_string(),
                        param: name.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<&[u8]>>>()?;

        let partner_id = self.credentials.partner_id();
        let auth = signature::sign(&signed_values, action, partner_id, self.credentials.secret());

        encoded.insert("action", FormValue::Scalar(action.as_bytes().to_vec()));
        encoded.insert("partnerId", FormValue::Scalar(partner_id.as_bytes().to_vec()));
        encoded.insert("auth", FormValue::Scalar(auth.into_bytes()));

        debug!(action, "Calling partner API");
        let body = self
            .transport
            .post_form(&self.config.endpoint, encoded.to_query_string())
            .await
            .inspect_err(|e| warn!(action, error = %e, "Partner API unreachable"))?;

        let text = charset.decode(&body)?;
        let mut response: Value = serde_json::from_str(&text)?;

        let errors = remote_errors(&response);
        if !errors.is_empty() {
            let err = MarketplaceError::remote(action, errors);
            warn!(action, code = err.remote_code().unwrap_or_default(), "Partner API returned an error");
            return Err(err);
        }

        Ok(response
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    /// Call a list method.
    ///
    /// With pagination following disabled this is a single call. Otherwise
    /// any `navigation` parameter is dropped and pages are requested in
    /// order until the last one. A page whose `list` is not a sequence, or
    /// whose page number does not advance, ends the walk with `truncated`
    /// set.
    pub async fn call_list(&self, method: &str, mut params: FormMap) -> Result<PageList> {
        if !self.config.fetch_all_pages {
            let result = self.call(method, params).await?;
            return Ok(PageList::from_result(&result));
        }

        params.remove("navigation");
        let first = self.call(method, params.clone()).await?;

        let Some(mut list) = first.get("list").and_then(as_records) else {
            warn!(method, page = 1, "List is not a sequence, stopping");
            return Ok(PageList {
                list: Vec::new(),
                navigation: Navigation::from_result(&first),
                truncated: true,
            });
        };

        let mut navigation = Navigation::from_result(&first);
        let page_count = navigation.map(|n| n.page_count).unwrap_or(1);
        let mut truncated = false;

        while let Some(current) = navigation.filter(|n| n.page_number < page_count) {
            let requested = current.page_number + 1;
            params.insert(
                "navigation",
                FormMap::new().with("page", requested.to_string()),
            );
            let page = self.call(method, params.clone()).await?;

            let Some(records) = page.get("list").and_then(as_records) else {
                warn!(method, page = requested, "List is not a sequence, stopping");
                truncated = true;
                break;
            };

            let next = Navigation::from_result(&page).unwrap_or(Navigation {
                page_number: requested,
                page_count,
            });
            if next.page_number <= current.page_number {
                warn!(
                    method,
                    requested,
                    received = next.page_number,
                    "Page number did not advance, stopping"
                );
                truncated = true;
                break;
            }

            debug!(method, page = next.page_number, records = records.len(), "Fetched page");
            list.extend(records);
            navigation = Some(next);
        }

        info!(
            method,
            records = list.len(),
            pages = navigation.map(|n| n.page_number).unwrap_or(1),
            truncated,
            "Fetched list"
        );

        Ok(PageList {
            list,
            navigation,
            truncated,
        })
    }
}

/// Entries of the response's `error` field. An absent or empty field means success.
fn remote_errors(response: &Value) -> Vec<RemoteError> {
    let Some(entries) = response.get("error").and_then(as_records) else {
        return Vec::new();
    };
    entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry.clone()).unwrap_or_else(|_| RemoteError {
                code: marketplace_core::value::as_text(&entry).unwrap_or_default(),
                id: String::new(),
                text: None,
            })
        })
        .collect()
}
