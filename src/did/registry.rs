//! DID Method Registry (C2).
//!
//! Process-wide, write-once-at-init, lock-free-on-read (`spec.md` §5, §9
//! "Method-driver plugin model"). Grounded on `pkg/did/core/driver/byd50.go`'s
//! driver registration shape, with RPC transport stripped per `spec.md` §1.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::Did;
use crate::error::Result;

/// The result of resolving a DID through its method driver (`spec.md` §6's
/// `resolve` method-driver interface).
#[derive(Clone, Debug, Default)]
pub struct ResolutionResult {
    /// The raw document JSON.
    pub document_json: String,
    /// Resolution metadata JSON; `"{}"` when the driver has none to report.
    pub document_metadata_json: String,
    /// A resolution-layer diagnostic distinct from a hard error; empty on
    /// success.
    pub resolution_error: String,
}

/// A DID method implementation (`spec.md` §4.2/§6).
#[async_trait]
pub trait MethodDriver: Send + Sync {
    /// The method name this driver handles, e.g. `"byd50"`.
    fn method(&self) -> &str;

    /// Creates a document for a freshly generated DID, returning the DID.
    async fn create(&self, public_key_base58: &str) -> Result<Did>;

    /// Resolves `did` to its document.
    async fn resolve(&self, did: &Did) -> Result<ResolutionResult>;
}

/// Builds a [`MethodRegistry`]. Registration happens once per process; the
/// built table is never mutated again (`spec.md` §9).
#[derive(Default)]
pub struct MethodRegistryBuilder {
    drivers: HashMap<String, Arc<dyn MethodDriver>>,
}

impl MethodRegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `driver` under its own [`MethodDriver::method`] name,
    /// replacing any driver previously registered for that method.
    #[must_use]
    pub fn register(mut self, driver: Arc<dyn MethodDriver>) -> Self {
        self.drivers.insert(driver.method().to_string(), driver);
        self
    }

    /// Freezes the table into a [`MethodRegistry`].
    #[must_use]
    pub fn build(self) -> MethodRegistry {
        tracing::debug!(methods = ?self.drivers.keys().collect::<Vec<_>>(), "DID method registry built");
        MethodRegistry { drivers: Arc::new(self.drivers) }
    }
}

/// A frozen, process-wide table of method drivers (`spec.md` §5: "reads are
/// lock-free on a stable table").
#[derive(Clone)]
pub struct MethodRegistry {
    drivers: Arc<HashMap<String, Arc<dyn MethodDriver>>>,
}

impl MethodRegistry {
    /// The driver registered for `method`, if any.
    #[must_use]
    pub fn driver(&self, method: &str) -> Option<Arc<dyn MethodDriver>> {
        self.drivers.get(method).cloned()
    }

    /// The method names accepted by this registry (the `AdoptedDriverList`
    /// configuration knob of `spec.md` §6, derived rather than duplicated).
    #[must_use]
    pub fn adopted_methods(&self) -> Vec<String> {
        self.drivers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDriver(&'static str);

    #[async_trait]
    impl MethodDriver for StubDriver {
        fn method(&self) -> &str {
            self.0
        }

        async fn create(&self, _public_key_base58: &str) -> Result<Did> {
            Did::parse(format!("did:{}:stub", self.0))
        }

        async fn resolve(&self, _did: &Did) -> Result<ResolutionResult> {
            Ok(ResolutionResult::default())
        }
    }

    #[test]
    fn registers_and_looks_up_by_method_name() {
        let registry =
            MethodRegistryBuilder::new().register(Arc::new(StubDriver("byd50"))).build();
        assert!(registry.driver("byd50").is_some());
        assert!(registry.driver("unregistered").is_none());
    }

    #[test]
    fn adopted_methods_reflects_registrations() {
        let registry = MethodRegistryBuilder::new()
            .register(Arc::new(StubDriver("byd50")))
            .register(Arc::new(StubDriver("onchain")))
            .build();
        let mut methods = registry.adopted_methods();
        methods.sort();
        assert_eq!(methods, vec!["byd50".to_string(), "onchain".to_string()]);
    }
}
