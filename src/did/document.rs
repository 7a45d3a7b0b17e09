//! DID Document model (C3).
//!
//! Field names and shapes follow `pkg/did/core/dids/document.go`'s
//! `DocumentInterface`/`AuthenticationProperty`, with the `@context` URI and
//! indentation corrected to `spec.md` §2/§4.3 (see `DESIGN.md`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Did;
use crate::error::{Error, Result};

const CONTEXT_URI: &str = "https://www.w3.org/ns/did/v1";

/// A verification method entry, used for both `authentication` and
/// `verificationMethod` (`spec.md` §3).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// `<DID>#keys-1` for the document's first authentication entry.
    pub id: String,
    /// The verification method's type string, e.g. `"Ed25519VerificationKey2018"`.
    #[serde(rename = "type", default)]
    pub type_: String,
    /// The DID that controls this verification method.
    #[serde(default)]
    pub controller: String,
    /// Base58-encoded PKIX public key bytes.
    #[serde(default)]
    pub public_key_base58: String,
}

/// A service endpoint entry (`spec.md` §3, may be empty).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// The service's identifier.
    pub id: String,
    /// The service's type string.
    #[serde(rename = "type", default)]
    pub type_: String,
    /// The network address at which the service operates.
    #[serde(default)]
    pub service_endpoint: String,
}

/// The DID Document (`spec.md` §3).
///
/// Fields not modelled explicitly round-trip through `extra`, satisfying
/// `spec.md` §6's "unknown fields MUST be preserved on read-modify-write".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Always begins with [`CONTEXT_URI`].
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The DID this document is for.
    pub id: String,
    /// The controlling DID, or empty.
    #[serde(default)]
    pub controller: String,
    /// Non-empty; `authentication[0]` is the canonical authentication key.
    pub authentication: Vec<VerificationMethod>,
    /// May be empty.
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    /// May be empty.
    #[serde(default)]
    pub service: Vec<Service>,
    /// Fields this struct doesn't model, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Builds the initial document for a freshly created DID: a single
    /// authentication entry at `<did>#keys-1` carrying `public_key_base58`.
    #[must_use]
    pub fn new(did: &Did, public_key_base58: &str) -> Self {
        let key_id = format!("{did}#keys-1");
        Self {
            context: vec![CONTEXT_URI.to_string()],
            id: did.as_str().to_string(),
            controller: String::new(),
            authentication: vec![VerificationMethod {
                id: key_id,
                type_: String::new(),
                controller: did.as_str().to_string(),
                public_key_base58: public_key_base58.to_string(),
            }],
            verification_method: Vec::new(),
            service: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The canonical JSON encoding: 2-space indent (`spec.md` §4.3).
    pub fn to_json_pretty(&self) -> Result<String> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(self, &mut ser).map_err(Error::internal)?;
        String::from_utf8(buf).map_err(Error::internal)
    }

    /// Deserializes `bytes` and checks `id` matches `did`, per the `update`
    /// operation of `spec.md` §4.3. Whitespace in `bytes` is otherwise
    /// unconstrained — arbitrary indentation parses.
    pub fn update(did: &Did, bytes: &[u8]) -> Result<Self> {
        let doc: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::InvalidInput(format!("malformed document: {e}")))?;
        if doc.id != did.as_str() {
            return Err(Error::InvalidInput(format!(
                "document id {} does not match {did}",
                doc.id
            )));
        }
        Ok(doc)
    }
}
