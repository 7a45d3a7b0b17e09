//! Resolver Façade (C6).
//!
//! Grounded on `did/pkg/controller/controller.go`'s `ResolveDID`/
//! `GetPublicKey`, with the `keyId`-aware lookup promoted to first-class
//! behaviour (`spec.md` §9, `DESIGN.md` Open Question 2) rather than the
//! source's `keyId`-ignoring legacy behaviour.

use super::document::Document;
use super::registry::MethodRegistry;
use super::Did;
use crate::error::{Error, Result};

/// The two operations an embedder needs to go from a DID to usable key
/// material (`spec.md` §4.6).
pub struct Resolver {
    registry: MethodRegistry,
}

impl Resolver {
    /// Builds a resolver over `registry`.
    #[must_use]
    pub fn new(registry: MethodRegistry) -> Self {
        Self { registry }
    }

    /// Resolves `did` to its document.
    ///
    /// Failure mapping (`spec.md` §4.6): empty DID → `invalid_input`; no
    /// driver registered for the method, or the driver itself fails →
    /// `upstream_error`; a resolved-but-unparsable document → `not_found`.
    pub async fn resolve(&self, did: &Did) -> Result<Document> {
        if did.as_str().is_empty() {
            return Err(Error::InvalidInput("empty DID".into()));
        }
        let driver = self
            .registry
            .driver(did.method())
            .ok_or_else(|| Error::UpstreamError(format!("no driver for method {}", did.method())))?;
        let resolution = driver.resolve(did).await?;
        if !resolution.resolution_error.is_empty() {
            return Err(Error::UpstreamError(resolution.resolution_error));
        }
        let doc: Document = serde_json::from_str(&resolution.document_json)
            .map_err(|_| Error::NotFound(format!("no document for {did}")))?;
        tracing::debug!(did = %did, "resolved DID document");
        Ok(doc)
    }

    /// Resolves `did` and returns the Base58 public key of the entry in
    /// `authentication` whose `id` is `<did>#<key_id>`, or the first entry
    /// when `key_id` is empty (`spec.md` §4.6).
    pub async fn public_key_of(&self, did: &Did, key_id: &str) -> Result<String> {
        let doc = self.resolve(did).await?;
        let entry = if key_id.is_empty() {
            doc.authentication.first()
        } else {
            let wanted = format!("{did}#{key_id}");
            doc.authentication.iter().find(|vm| vm.id == wanted)
        };
        let vm = entry.ok_or_else(|| Error::NotFound(format!("no authentication entry for {did}")))?;
        if vm.public_key_base58.is_empty() {
            return Err(Error::EmptyKey(format!("authentication key for {did} is empty")));
        }
        Ok(vm.public_key_base58.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::did::document::VerificationMethod;
    use crate::did::registry::{MethodDriver, MethodRegistryBuilder, ResolutionResult};

    struct StaticDriver {
        document: Document,
    }

    #[async_trait]
    impl MethodDriver for StaticDriver {
        fn method(&self) -> &str {
            "byd50"
        }

        async fn create(&self, _public_key_base58: &str) -> Result<Did> {
            unimplemented!("not exercised by these tests")
        }

        async fn resolve(&self, _did: &Did) -> Result<ResolutionResult> {
            Ok(ResolutionResult {
                document_json: serde_json::to_string(&self.document).unwrap(),
                document_metadata_json: "{}".into(),
                resolution_error: String::new(),
            })
        }
    }

    fn resolver_with(document: Document) -> Resolver {
        let registry =
            MethodRegistryBuilder::new().register(Arc::new(StaticDriver { document })).build();
        Resolver::new(registry)
    }

    #[tokio::test]
    async fn empty_did_is_invalid_input() {
        let resolver = resolver_with(Document::new(&Did::parse("did:byd50:x").unwrap(), "pk"));
        let did = Did("".to_string());
        let err = resolver.resolve(&did).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn unregistered_method_is_upstream_error() {
        let registry = MethodRegistryBuilder::new().build();
        let resolver = Resolver::new(registry);
        let did = Did::parse("did:nowhere:x").unwrap();
        let err = resolver.resolve(&did).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::UpstreamError);
    }

    #[tokio::test]
    async fn empty_key_id_returns_first_authentication_entry() {
        let did = Did::parse("did:byd50:x").unwrap();
        let doc = Document::new(&did, "the-public-key");
        let resolver = resolver_with(doc);
        let key = resolver.public_key_of(&did, "").await.unwrap();
        assert_eq!(key, "the-public-key");
    }

    #[tokio::test]
    async fn non_empty_key_id_matches_by_suffix() {
        let did = Did::parse("did:byd50:x").unwrap();
        let mut doc = Document::new(&did, "first-key");
        doc.authentication.push(VerificationMethod {
            id: format!("{did}#second"),
            type_: String::new(),
            controller: did.as_str().to_string(),
            public_key_base58: "second-key".to_string(),
        });
        let resolver = resolver_with(doc);
        let key = resolver.public_key_of(&did, "second").await.unwrap();
        assert_eq!(key, "second-key");
    }

    #[tokio::test]
    async fn empty_authentication_key_is_empty_key_error() {
        let did = Did::parse("did:byd50:x").unwrap();
        let doc = Document::new(&did, "");
        let resolver = resolver_with(doc);
        let err = resolver.public_key_of(&did, "").await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::EmptyKey);
    }

    #[tokio::test]
    async fn missing_authentication_entry_is_not_found() {
        let did = Did::parse("did:byd50:x").unwrap();
        let doc = Document::new(&did, "pk");
        let resolver = resolver_with(doc);
        let err = resolver.public_key_of(&did, "unknown").await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NotFound);
    }
}
