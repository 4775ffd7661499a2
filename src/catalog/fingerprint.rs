//! Content fingerprints for cache validation and optimistic concurrency.
//!
//! A fingerprint is an opaque deterministic digest over the canonical
//! serialization of one record or an ordered collection of records. Two
//! structurally equal payloads produce the same token regardless of JSON
//! key order; any semantic field change produces a different one.
//!
//! # Canonicalization
//!
//! Hashing goes through [`serde_json::Value`], whose object representation
//! keeps keys in sorted order, so the serialized bytes are independent of
//! the order fields arrived in. The digest is SHA-256 truncated to its
//! first 8 bytes and base64-encoded, which keeps tokens short enough to
//! travel in headers.
//!
//! # Formats
//!
//! Phantom types distinguish the raw opaque token from the HTTP entity-tag
//! wire form at compile time, so an adapter cannot hand the core a quoted
//! header value where a bare token is expected:
//!
//! * [`Fingerprint`] — raw internal format (`"q0Fyg1NCRYM="`)
//! * [`EntityTag`] — weak HTTP ETag format (`W/"q0Fyg1NCRYM="`)
//!
//! ```
//! use travel_catalog::{EntityTag, Fingerprint};
//!
//! let token = Fingerprint::of(&serde_json::json!({"name": "Rome", "country": "Italy"}));
//! let reordered = Fingerprint::of(&serde_json::json!({"country": "Italy", "name": "Rome"}));
//! assert_eq!(token, reordered);
//!
//! let header = EntityTag::from(token.clone()).to_string();
//! let parsed: EntityTag = header.parse().unwrap();
//! assert_eq!(parsed, token);
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{fmt, marker::PhantomData, str::FromStr};
use thiserror::Error;

/// Marker for the raw internal token format.
#[derive(Debug, Clone, Copy)]
pub struct Raw;

/// Marker for the HTTP entity-tag wire format.
#[derive(Debug, Clone, Copy)]
pub struct Tagged;

/// Opaque content digest with compile-time format distinction.
///
/// The inner string stays private; callers compare tokens for equality and
/// render them through `Display`, nothing more.
#[derive(Debug, Clone, Eq, Hash)]
pub struct ContentDigest<Format> {
    opaque: String,
    _format: PhantomData<Format>,
}

/// Raw internal token (`"q0Fyg1NCRYM="`).
pub type Fingerprint = ContentDigest<Raw>;

/// Weak HTTP entity tag (`W/"q0Fyg1NCRYM="`).
pub type EntityTag = ContentDigest<Tagged>;

impl<Format> ContentDigest<Format> {
    /// Fingerprint of any serializable value — a single record or an
    /// ordered collection alike.
    ///
    /// Always produces the canonical [`Fingerprint`] form.
    pub fn of<T: Serialize>(value: &T) -> Fingerprint {
        // Round-tripping through Value sorts object keys, making the
        // hashed bytes order-independent. Plain data never fails here.
        let canonical = serde_json::to_value(value)
            .expect("catalog values serialize to JSON")
            .to_string();

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash = hasher.finalize();

        ContentDigest {
            opaque: BASE64.encode(&hash[..8]),
            _format: PhantomData,
        }
    }

    /// Wrap a pre-existing opaque token without hashing.
    ///
    /// Useful for tokens that round-tripped through a client and come back
    /// as plain strings.
    pub fn from_opaque(token: impl AsRef<str>) -> Fingerprint {
        ContentDigest {
            opaque: token.as_ref().to_string(),
            _format: PhantomData,
        }
    }

    /// The opaque token string. Only equality and display should be
    /// derived from it.
    pub fn as_str(&self) -> &str {
        &self.opaque
    }
}

impl fmt::Display for ContentDigest<Raw> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opaque)
    }
}

impl fmt::Display for ContentDigest<Tagged> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W/\"{}\"", self.opaque)
    }
}

impl FromStr for ContentDigest<Raw> {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(ContentDigest {
            opaque: trimmed.to_string(),
            _format: PhantomData,
        })
    }
}

impl FromStr for ContentDigest<Tagged> {
    type Err = TokenError;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        let trimmed = header.trim();
        let quoted = trimmed.strip_prefix("W/").unwrap_or(trimmed);

        let opaque = quoted
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| TokenError::InvalidTag(header.to_string()))?;

        if opaque.is_empty() {
            return Err(TokenError::InvalidTag(header.to_string()));
        }

        Ok(ContentDigest {
            opaque: opaque.to_string(),
            _format: PhantomData,
        })
    }
}

impl From<ContentDigest<Raw>> for ContentDigest<Tagged> {
    fn from(raw: ContentDigest<Raw>) -> Self {
        ContentDigest {
            opaque: raw.opaque,
            _format: PhantomData,
        }
    }
}

impl From<ContentDigest<Tagged>> for ContentDigest<Raw> {
    fn from(tag: ContentDigest<Tagged>) -> Self {
        ContentDigest {
            opaque: tag.opaque,
            _format: PhantomData,
        }
    }
}

// Token equality is format-independent: the same content yields the same
// token whether it traveled as a header or a bare string.
impl<F1, F2> PartialEq<ContentDigest<F2>> for ContentDigest<F1> {
    fn eq(&self, other: &ContentDigest<F2>) -> bool {
        self.opaque == other.opaque
    }
}

impl<Format> Serialize for ContentDigest<Format> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.opaque.serialize(serializer)
    }
}

impl<'de, Format> Deserialize<'de> for ContentDigest<Format> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opaque = String::deserialize(deserializer)?;
        Ok(ContentDigest {
            opaque,
            _format: PhantomData,
        })
    }
}

/// Errors raised while parsing tokens handed in by adapters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    /// The entity-tag header form was malformed.
    #[error("invalid entity tag: {0}")]
    InvalidTag(String),

    /// An empty string is not a usable token.
    #[error("empty fingerprint token")]
    Empty,
}
