//! The default method driver (`spec.md` §4.2).
//!
//! Grounded on `pkg/did/core/driver/byd50.go`'s `CreateDid`/`ResolveDid`,
//! with the gRPC transport stripped per `spec.md` §1 — this driver
//! delegates straight to an injected [`DocumentStore`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::did::document::Document;
use crate::did::generator;
use crate::did::registry::{MethodDriver, ResolutionResult};
use crate::did::store::DocumentStore;
use crate::did::{Did, GenerationRule};
use crate::error::Result;

/// Delegates DID creation and resolution to a [`DocumentStore`].
pub struct Byd50Driver {
    method: String,
    rule: GenerationRule,
    store: Arc<dyn DocumentStore>,
}

impl Byd50Driver {
    /// Builds a driver for `method`, deriving new DIDs with `rule` and
    /// persisting documents through `store`.
    #[must_use]
    pub fn new(method: impl Into<String>, rule: GenerationRule, store: Arc<dyn DocumentStore>) -> Self {
        Self { method: method.into(), rule, store }
    }
}

#[async_trait]
impl MethodDriver for Byd50Driver {
    fn method(&self) -> &str {
        &self.method
    }

    async fn create(&self, public_key_base58: &str) -> Result<Did> {
        let did = generator::generate(public_key_base58, &self.method, self.rule)?;
        let document = Document::new(&did, public_key_base58);
        let bytes = document.to_json_pretty()?.into_bytes();
        self.store.put(&did, bytes).await?;
        tracing::debug!(did = %did, "created DID document");
        Ok(did)
    }

    async fn resolve(&self, did: &Did) -> Result<ResolutionResult> {
        let bytes = self.store.get(did).await?;
        let document_json =
            String::from_utf8(bytes).map_err(|e| crate::error::Error::internal(e))?;
        Ok(ResolutionResult {
            document_json,
            document_metadata_json: "{}".to_string(),
            resolution_error: String::new(),
        })
    }
}
