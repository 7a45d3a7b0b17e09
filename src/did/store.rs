//! Document Store (C5).
//!
//! The trait is the entirety of what the core depends on; concrete backends
//! (embedded KV, on-chain, in-memory) are external collaborators per
//! `spec.md` §1/§4.5. Object-safe via `async-trait`, matching the shape of
//! `examples/credibil-vc/examples/kms/mod.rs`'s `DidResolver` trait.

use async_trait::async_trait;

use super::Did;
use crate::error::Result;

/// `(did → bytes)` storage for DID documents (`spec.md` §3/§4.5).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Idempotent insert/update.
    async fn put(&self, did: &Did, bytes: Vec<u8>) -> Result<()>;

    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) when
    /// `did` has no stored document.
    async fn get(&self, did: &Did) -> Result<Vec<u8>>;

    /// `true` iff a document is stored for `did`.
    async fn has(&self, did: &Did) -> Result<bool>;

    /// Releases resources held by this store.
    async fn close(&self) -> Result<()>;
}

#[cfg(feature = "in-memory-store")]
mod in_memory {
    use std::collections::HashMap;

    use tokio::sync::Mutex;

    use super::{Did, DocumentStore, Result};
    use crate::error::Error;

    /// A `tokio::sync::Mutex`-backed [`DocumentStore`] for tests and
    /// examples. Not suitable as the sole store in a multi-process
    /// deployment — state does not survive the process (`spec.md` §4.5:
    /// "the concrete backend ... is an external collaborator").
    #[derive(Default)]
    pub struct InMemoryStore {
        documents: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl InMemoryStore {
        /// An empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for InMemoryStore {
        async fn put(&self, did: &Did, bytes: Vec<u8>) -> Result<()> {
            self.documents.lock().await.insert(did.as_str().to_string(), bytes);
            Ok(())
        }

        async fn get(&self, did: &Did) -> Result<Vec<u8>> {
            self.documents
                .lock()
                .await
                .get(did.as_str())
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("no document for {did}")))
        }

        async fn has(&self, did: &Did) -> Result<bool> {
            Ok(self.documents.lock().await.contains_key(did.as_str()))
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }
}

#[cfg(feature = "in-memory-store")]
pub use in_memory::InMemoryStore;

#[cfg(all(test, feature = "in-memory-store"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryStore::new();
        let did = Did::parse("did:byd50:abc").unwrap();
        store.put(&did, b"hello".to_vec()).await.unwrap();
        assert_eq!(store.get(&did).await.unwrap(), b"hello");
        assert!(store.has(&did).await.unwrap());
    }

    #[tokio::test]
    async fn get_on_missing_did_is_not_found() {
        let store = InMemoryStore::new();
        let did = Did::parse("did:byd50:missing").unwrap();
        let err = store.get(&did).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NotFound);
    }
}
