//! Charset handling for the marketplace surfaces.
//!
//! The partner REST API and its webhooks still speak `windows-1251`; the
//! client-registration endpoint speaks UTF-8. Rust strings are UTF-8, so the
//! caller side of every surface is UTF-8 and conversion happens at the edge.

use crate::form::{FormMap, FormValue};
use crate::{MarketplaceError, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A charset understood by the marketplace endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// UTF-8.
    Utf8,
    /// Cyrillic Windows code page.
    Windows1251,
}

impl Charset {
    /// Canonical label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Windows1251 => "windows-1251",
        }
    }

    /// Resolve a charset label case-insensitively (`UTF8`, `cp1251`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())?;
        if encoding == UTF_8 {
            Some(Self::Utf8)
        } else if encoding == WINDOWS_1251 {
            Some(Self::Windows1251)
        } else {
            None
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::Windows1251 => WINDOWS_1251,
        }
    }

    /// Encode a UTF-8 string into this charset.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let (bytes, _, unmappable) = self.encoding().encode(text);
        if unmappable {
            return Err(encoding_error(
                Self::Utf8,
                *self,
                format!("{:?} has characters outside the target charset", text),
            ));
        }
        Ok(bytes)
    }

    /// Decode bytes in this charset into a UTF-8 string.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| {
                encoding_error(*self, Self::Utf8, "malformed byte sequence".to_string())
            })
    }

    /// Re-encode bytes from this charset into `to`.
    pub fn transcode<'a>(&self, bytes: &'a [u8], to: Charset) -> Result<Cow<'a, [u8]>> {
        if *self == to {
            return Ok(Cow::Borrowed(bytes));
        }
        let text = self.decode(bytes)?;
        let (encoded, _, unmappable) = to.encoding().encode(&text);
        if unmappable {
            return Err(encoding_error(
                *self,
                to,
                "characters outside the target charset".to_string(),
            ));
        }
        Ok(Cow::Owned(encoded.into_owned()))
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Charset {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
            .ok_or_else(|| MarketplaceError::InvalidArgument(format!("unsupported charset: {}", s)))
    }
}

fn encoding_error(from: Charset, to: Charset, message: String) -> MarketplaceError {
    MarketplaceError::Encoding {
        from: from.label(),
        to: to.label(),
        message,
    }
}

/// The endpoints of the marketplace, each with its own wire charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSurface {
    /// Partner REST API (`/rest/`).
    Partners,
    /// Inbound event callbacks.
    Callback,
    /// Client registration (`add_client.php`).
    Clients,
}

impl ApiSurface {
    /// Charset used on the wire for this surface.
    pub fn charset(&self) -> Charset {
        match self {
            Self::Partners | Self::Callback => Charset::Windows1251,
            Self::Clients => Charset::Utf8,
        }
    }
}

/// Re-encodes every leaf of a form tree from one charset to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetNormalizer {
    from: Charset,
    to: Charset,
}

impl CharsetNormalizer {
    /// Create a normalizer converting `from` into `to`.
    pub fn new(from: Charset, to: Charset) -> Self {
        Self { from, to }
    }

    /// Check if conversion leaves data untouched.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Convert a form tree. Keys and structure are kept as-is; when both
    /// charsets are equal the input is returned without visiting any leaf.
    pub fn normalize(&self, value: FormValue<Vec<u8>>) -> Result<FormValue<Vec<u8>>> {
        if self.is_noop() {
            return Ok(value);
        }
        value.try_map(&mut |leaf: &Vec<u8>| {
            self.from.transcode(leaf, self.to).map(Cow::into_owned)
        })
    }

    /// Convert every value of a form mapping.
    pub fn normalize_map(&self, map: FormMap<Vec<u8>>) -> Result<FormMap<Vec<u8>>> {
        if self.is_noop() {
            return Ok(map);
        }
        map.try_map(&mut |leaf: &Vec<u8>| {
            self.from.transcode(leaf, self.to).map(Cow::into_owned)
        })
    }
}

/// Encode caller parameters into the wire charset.
pub fn encode_map(map: &FormMap<String>, charset: Charset) -> Result<FormMap<Vec<u8>>> {
    map.try_map(&mut |leaf: &String| charset.encode(leaf).map(Cow::into_owned))
}

/// Decode wire parameters into UTF-8 strings.
pub fn decode_map(map: &FormMap<Vec<u8>>, charset: Charset) -> Result<FormMap<String>> {
    map.try_map(&mut |leaf: &Vec<u8>| charset.decode(leaf).map(Cow::into_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVET: &[u8] = &[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];

    #[test]
    fn test_from_label_aliases() {
        assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_label("utf8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_label("cp1251"), Some(Charset::Windows1251));
        assert_eq!(Charset::from_label("Windows-1251"), Some(Charset::Windows1251));
        assert_eq!(Charset::from_label("koi8-r"), None);
        assert!("latin1".parse::<Charset>().is_err());
    }

    #[test]
    fn test_surface_charsets() {
        assert_eq!(ApiSurface::Partners.charset(), Charset::Windows1251);
        assert_eq!(ApiSurface::Callback.charset(), Charset::Windows1251);
        assert_eq!(ApiSurface::Clients.charset(), Charset::Utf8);
    }

    #[test]
    fn test_encode_cyrillic() {
        let bytes = Charset::Windows1251.encode("Привет").unwrap();
        assert_eq!(bytes.as_ref(), PRIVET);
        assert_eq!(Charset::Windows1251.decode(PRIVET).unwrap(), "Привет");
    }

    #[test]
    fn test_encode_unmappable_fails() {
        let err = Charset::Windows1251.encode("日本").unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::Encoding {
                from: "utf-8",
                to: "windows-1251",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_malformed_utf8_fails() {
        assert!(Charset::Utf8.decode(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn test_normalize_noop_returns_input() {
        let normalizer = CharsetNormalizer::new(Charset::Utf8, Charset::Utf8);
        assert!(normalizer.is_noop());

        // Not valid UTF-8, yet untouched because nothing is visited.
        let value = FormValue::Scalar(vec![0xFF]);
        assert_eq!(normalizer.normalize(value.clone()).unwrap(), value);
    }

    #[test]
    fn test_normalize_nested_tree() {
        let tree: FormMap<Vec<u8>> = FormMap::new()
            .with("name", FormValue::Scalar("Привет".as_bytes().to_vec()))
            .with(
                "tags",
                vec![
                    FormValue::Scalar(b"a".to_vec()),
                    FormValue::Scalar("б".as_bytes().to_vec()),
                ],
            );

        let normalizer = CharsetNormalizer::new(Charset::Utf8, Charset::Windows1251);
        let out = normalizer.normalize_map(tree).unwrap();

        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["name", "tags"]);
        assert_eq!(out.get_scalar("name"), Some(&PRIVET.to_vec()));
        match out.get("tags") {
            Some(FormValue::List(items)) => {
                assert_eq!(items[0], FormValue::Scalar(b"a".to_vec()));
                assert_eq!(items[1], FormValue::Scalar(vec![0xE1]));
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_encode_and_decode_map() {
        let map: FormMap = FormMap::new().with("name", "Иван");
        let encoded = encode_map(&map, Charset::Windows1251).unwrap();
        assert_eq!(encoded.get_scalar("name"), Some(&vec![0xC8, 0xE2, 0xE0, 0xED]));
        assert_eq!(decode_map(&encoded, Charset::Windows1251).unwrap(), map);
    }
}
