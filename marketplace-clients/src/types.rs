//! Identifiers and payloads of the client registration API.

use marketplace_core::{MarketplaceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Module code with its vendor prefix (`vendor.module`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    /// Validate a module code: exactly one dot with text on both sides.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match value.split_once('.') {
            Some((vendor, module))
                if !vendor.is_empty() && !module.is_empty() && !module.contains('.') =>
            {
                Ok(Self(value))
            }
            _ => Err(MarketplaceError::InvalidArgument(format!(
                "module id must be a module code with vendor prefix, got {:?}",
                value
            ))),
        }
    }

    /// The module code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleId {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = MarketplaceError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ModuleId> for String {
    fn from(id: ModuleId) -> Self {
        id.0
    }
}

/// A client's license key: exactly 32 bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Length every key has.
    pub const LEN: usize = 32;

    /// Validate a client key.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() != Self::LEN {
            return Err(MarketplaceError::InvalidArgument(format!(
                "client key must be {} characters long, got {}",
                Self::LEN,
                value.len()
            )));
        }
        Ok(Self(value))
    }

    /// The key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "ClientKey({}…)", prefix)
    }
}

/// Actions of the client registration endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAction {
    /// Register a client.
    Add,
    /// Update a client's details.
    Update,
    /// Remove a client.
    Delete,
    /// List the module's clients.
    List,
}

impl ClientAction {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ClientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details sent with `add` and `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    /// Client name.
    pub name: String,
    /// E-mail.
    pub email: String,
    /// Website.
    pub site_url: String,
    /// Contact person.
    pub contact_person: String,
    /// Phone.
    pub phone: String,
    /// Comments.
    pub comments: String,
}

impl ClientDetails {
    /// Fields in wire order.
    pub(crate) fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("site_url", &self.site_url),
            ("contact_person", &self.contact_person),
            ("phone", &self.phone),
            ("comments", &self.comments),
        ]
    }
}

/// One `<client>` element of the list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientRecord {
    fields: BTreeMap<String, String>,
}

impl ClientRecord {
    /// A field by element name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterate fields ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if every filter entry equals the record's field; absent fields
    /// compare as empty.
    pub fn matches(&self, filter: &[(&str, &str)]) -> bool {
        filter
            .iter()
            .all(|(name, expected)| self.get(name).unwrap_or("") == *expected)
    }
}

impl FromIterator<(String, String)> for ClientRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
