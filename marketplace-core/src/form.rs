//! Ordered form value trees and their `x-www-form-urlencoded` representation.
//!
//! Request parameters are nested: `navigation[page]=2`, `filter[code]=vendor.module`.
//! A [`FormMap<String>`] holds them as the caller wrote them; a
//! [`FormMap<Vec<u8>>`] holds the same tree after charset encoding, which is
//! what gets signed and put on the wire.

use percent_encoding::percent_decode;
use url::form_urlencoded::byte_serialize;

/// A form value: a scalar leaf, a list, or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue<T = String> {
    /// A single leaf value.
    Scalar(T),
    /// An indexed list (`key[0]`, `key[1]`, ...).
    List(Vec<FormValue<T>>),
    /// A nested mapping (`key[name]`).
    Map(FormMap<T>),
}

impl<T> FormValue<T> {
    /// The leaf value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Build a new tree of the same shape with every leaf converted by `f`.
    ///
    /// Keys and structure are preserved; the first failing leaf aborts.
    pub fn try_map<U, E, F>(&self, f: &mut F) -> Result<FormValue<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(match self {
            Self::Scalar(value) => FormValue::Scalar(f(value)?),
            Self::List(items) => FormValue::List(
                items
                    .iter()
                    .map(|item| item.try_map(f))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Map(map) => FormValue::Map(map.try_map(f)?),
        })
    }
}

impl From<&str> for FormValue<String> {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FormValue<String> {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for FormValue<String> {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl<T> From<FormMap<T>> for FormValue<T> {
    fn from(map: FormMap<T>) -> Self {
        Self::Map(map)
    }
}

impl<T> From<Vec<FormValue<T>>> for FormValue<T> {
    fn from(items: Vec<FormValue<T>>) -> Self {
        Self::List(items)
    }
}

/// An insertion-ordered mapping of field names to form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMap<T = String> {
    entries: Vec<(String, FormValue<T>)>,
}

impl<T> Default for FormMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> FormMap<T> {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue<T>>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FormValue<T>>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&FormValue<T>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Get a scalar leaf by key.
    pub fn get_scalar(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(FormValue::as_scalar)
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FormValue<T>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Build a new mapping with every leaf converted by `f`.
    pub fn try_map<U, E, F>(&self, f: &mut F) -> Result<FormMap<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        let entries = self
            .entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.try_map(f)?)))
            .collect::<Result<_, E>>()?;
        Ok(FormMap { entries })
    }
}

impl<T, K, V> FromIterator<(K, V)> for FormMap<T>
where
    K: Into<String>,
    V: Into<FormValue<T>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FormMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<T> IntoIterator for FormMap<T> {
    type Item = (String, FormValue<T>);
    type IntoIter = std::vec::IntoIter<(String, FormValue<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FormMap<Vec<u8>> {
    /// Serialize as `application/x-www-form-urlencoded`.
    ///
    /// Nested values use bracket keys in insertion order; lists are indexed
    /// from zero. Empty lists and mappings produce no pairs.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            append_pairs(key, value, &mut pairs);
        }
        pairs.join("&")
    }

    /// Parse a flat urlencoded body, keeping values as raw bytes.
    ///
    /// Values are not assumed to be UTF-8: percent escapes are decoded to the
    /// bytes they denote, so a legacy-charset body survives intact. A repeated
    /// key keeps its last value.
    pub fn parse(body: &[u8]) -> Self {
        let mut map = FormMap::new();
        for piece in body.split(|b| *b == b'&').filter(|p| !p.is_empty()) {
            let (key, value) = match piece.iter().position(|b| *b == b'=') {
                Some(index) => (&piece[..index], &piece[index + 1..]),
                None => (piece, &b""[..]),
            };
            let key = String::from_utf8_lossy(&decode_component(key)).into_owned();
            map.insert(key, FormValue::Scalar(decode_component(value)));
        }
        map
    }
}

fn append_pairs(prefix: &str, value: &FormValue<Vec<u8>>, pairs: &mut Vec<String>) {
    match value {
        FormValue::Scalar(bytes) => pairs.push(format!(
            "{}={}",
            byte_serialize(prefix.as_bytes()).collect::<String>(),
            byte_serialize(bytes).collect::<String>()
        )),
        FormValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                append_pairs(&format!("{}[{}]", prefix, index), item, pairs);
            }
        }
        FormValue::Map(map) => {
            for (key, item) in &map.entries {
                append_pairs(&format!("{}[{}]", prefix, key), item, pairs);
            }
        }
    }
}

fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    percent_decode(&spaced).collect()
}
