//! # Decentralized Identifiers
//!
//! The DID string type, the document model, the generator, the method
//! registry, and the resolver façade. Grounded on
//! `pkg/did/core/dids/document.go` (`generateDID`, `DocumentInterface`) and
//! `pkg/did/core/driver/byd50.go` from the source this spec was distilled
//! from, with the RPC transport those two files wire to stripped out per
//! `spec.md` §1 — the document store and method registry are injected
//! directly instead.

pub mod document;
pub mod driver;
pub mod generator;
pub mod registry;
pub mod resolver;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `did:<method>:<mid>` string (`spec.md` §6, "bit-exact" format).
///
/// `method` matches `[a-z0-9]+`; `mid` is opaque to this type — its shape is
/// a property of the [`generator`] rule that produced it, not something
/// [`Did`] itself validates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Parses and validates a DID string.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let rest = value
            .strip_prefix("did:")
            .ok_or_else(|| Error::InvalidInput(format!("not a DID: {value}")))?;
        let Some((method, mid)) = rest.split_once(':') else {
            return Err(Error::InvalidInput(format!("missing method-specific id: {value}")));
        };
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!("invalid DID method: {value}")));
        }
        if mid.is_empty() {
            return Err(Error::InvalidInput(format!("empty method-specific id: {value}")));
        }
        Ok(Self(value))
    }

    /// The method segment, e.g. `byd50` in `did:byd50:abc123`.
    #[must_use]
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// The method-specific identifier segment.
    #[must_use]
    pub fn mid(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }

    /// The full DID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Did {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

/// Selects how [`generator::generate`] derives a DID's method-specific
/// identifier (`spec.md` §4.4, and the `GenerationRule` configuration knob
/// of §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationRule {
    /// 20 random bytes, lowercase hex encoded.
    Hexdigit,
    /// RFC 4122 v4 textual form.
    Uuid,
    /// Base58 of SHA-256 over the public key's Base58 string.
    Base58,
}
