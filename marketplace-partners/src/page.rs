//! Paginated list results.

use marketplace_core::value::{as_records, as_u64};
use marketplace_core::{MarketplaceError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `navigation` block of a list response. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    /// Number of the page this block belongs to.
    pub page_number: u64,
    /// Total number of pages.
    pub page_count: u64,
}

impl Navigation {
    /// Read the navigation block of a list result.
    ///
    /// Numbers may arrive as strings. A missing page count is taken as the
    /// page number itself, i.e. the last page.
    pub fn from_result(result: &Value) -> Option<Self> {
        let navigation = result.get("navigation")?;
        let page_number = navigation.get("pageNumber").and_then(as_u64)?;
        let page_count = navigation
            .get("pageCount")
            .and_then(as_u64)
            .unwrap_or(page_number);
        Some(Self {
            page_number,
            page_count,
        })
    }

    /// Check if this is the last page.
    pub fn is_last(&self) -> bool {
        self.page_number >= self.page_count
    }
}

/// Records of a list action, merged across pages when pagination is followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageList {
    /// Records in page order, each page in the order received.
    pub list: Vec<Value>,
    /// Navigation block of the last page merged.
    pub navigation: Option<Navigation>,
    /// Set when fetching stopped early on a malformed page.
    pub truncated: bool,
}

impl PageList {
    /// Build from a single page's `result`.
    ///
    /// A `list` that is not a sequence yields no records.
    pub fn from_result(result: &Value) -> Self {
        Self {
            list: result.get("list").and_then(as_records).unwrap_or_default(),
            navigation: Navigation::from_result(result),
            truncated: false,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Deserialize every record.
    pub fn records<R: DeserializeOwned>(&self) -> Result<Vec<R>> {
        self.list
            .iter()
            .map(|record| {
                R::deserialize(record).map_err(|e| MarketplaceError::MalformedResponse(e.to_string()))
            })
            .collect()
    }
}
