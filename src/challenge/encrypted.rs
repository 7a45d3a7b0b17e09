//! Encrypted-challenge authentication (`spec.md` §4.9(a)).
//!
//! Verifier draws a plaintext, encrypts it to the claimant's RSA
//! authentication key, and holds the plaintext in a short-TTL cache keyed
//! by claimant DID until the claimant's response arrives. Grounded on
//! `did/pkg/controller/controller.go`'s `GetAuthChallengeString`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::core::generate;
use crate::did::resolver::Resolver;
use crate::did::Did;
use crate::error::{Error, Result};
use crate::kms::{self, Algorithm, KeyPair, PublicKey};

const DEFAULT_TTL: Duration = Duration::from_secs(60);
const PLAINTEXT_BYTES: usize = 16;

/// Draws a random plaintext, resolves `claimant`'s RSA authentication key,
/// and encrypts the plaintext to it. Returns the RSAES-OAEP/SHA-512
/// ciphertext (base64-standard, `spec.md` §4.1) and the plaintext the
/// caller must retain — via [`ChallengeStore`] — to compare against the
/// claimant's response.
pub async fn issue(resolver: &Resolver, claimant: &Did) -> Result<(String, String)> {
    let public_key_base58 = resolver.public_key_of(claimant, "").await?;
    let public_key = PublicKey::from_base58(&public_key_base58, Algorithm::Rsa2048)?;
    let plaintext = generate::random_hex(PLAINTEXT_BYTES);
    let ciphertext = public_key.encrypt(plaintext.as_bytes())?;
    Ok((kms::base64_standard(&ciphertext), plaintext))
}

/// The claimant side: decrypts `ciphertext_b64` with its own private key
/// and returns the recovered plaintext for transmission back to the
/// verifier.
pub fn respond(key: &KeyPair, ciphertext_b64: &str) -> Result<String> {
    let ciphertext = kms::from_base64_standard(ciphertext_b64)?;
    let plaintext = key.decrypt(&ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|e| Error::InvalidInput(format!("challenge plaintext is not valid utf-8: {e}")))
}

/// Verifier-local binding `claimant_did -> (plaintext, issued_at)`,
/// per `spec.md` §9's "Challenge-response state": entries expire on use or
/// after `ttl` elapses, whichever comes first. Not shared across verifier
/// instances (`spec.md` §5).
pub struct ChallengeStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl ChallengeStore {
    /// A store with the recommended default TTL of 60 seconds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// A store with an explicit TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Binds `plaintext` to `claimant`, overwriting any prior entry.
    pub fn put(&self, claimant: &Did, plaintext: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(claimant.as_str().to_string(), (plaintext.into(), Instant::now()));
    }

    /// Compares `response` byte-for-byte against the plaintext bound to
    /// `claimant`. The entry is consumed regardless of outcome — a second
    /// call with the same claimant always returns `false` until a fresh
    /// [`ChallengeStore::put`].
    #[must_use]
    pub fn verify(&self, claimant: &Did, response: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some((plaintext, issued_at)) = entries.remove(claimant.as_str()) else {
            return false;
        };
        issued_at.elapsed() < self.ttl && plaintext == response
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::did::driver::byd50::Byd50Driver;
    use crate::did::registry::MethodRegistryBuilder;
    use crate::did::registry::MethodDriver;
    use crate::did::store::InMemoryStore;
    use crate::did::GenerationRule;
    use crate::kms::Algorithm as KmsAlgorithm;

    async fn claimant_resolver() -> (Resolver, KeyPair, Did) {
        let store = Arc::new(InMemoryStore::new());
        let driver = Arc::new(Byd50Driver::new("byd50", GenerationRule::Uuid, store));
        let key = KeyPair::generate(KmsAlgorithm::Rsa2048).unwrap();
        let did = driver.create(key.public_base58()).await.unwrap();
        let registry = MethodRegistryBuilder::new().register(driver).build();
        (Resolver::new(registry), key, did)
    }

    #[tokio::test]
    async fn round_trips_plaintext_through_decrypt_and_store_verify() {
        let (resolver, key, did) = claimant_resolver().await;
        let (ciphertext_b64, plaintext) = issue(&resolver, &did).await.unwrap();

        let store = ChallengeStore::new();
        store.put(&did, plaintext);

        let response = respond(&key, &ciphertext_b64).unwrap();
        assert!(store.verify(&did, &response));
    }

    #[tokio::test]
    async fn wrong_response_fails_verification() {
        let (resolver, _key, did) = claimant_resolver().await;
        let (_ciphertext_b64, plaintext) = issue(&resolver, &did).await.unwrap();

        let store = ChallengeStore::new();
        store.put(&did, plaintext);

        assert!(!store.verify(&did, "not-the-plaintext"));
    }

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let (resolver, key, did) = claimant_resolver().await;
        let (ciphertext_b64, plaintext) = issue(&resolver, &did).await.unwrap();

        let store = ChallengeStore::with_ttl(Duration::from_millis(10));
        store.put(&did, plaintext);
        thread::sleep(Duration::from_millis(30));

        let response = respond(&key, &ciphertext_b64).unwrap();
        assert!(!store.verify(&did, &response));
    }

    #[tokio::test]
    async fn entry_is_consumed_on_first_verify() {
        let (resolver, key, did) = claimant_resolver().await;
        let (ciphertext_b64, plaintext) = issue(&resolver, &did).await.unwrap();

        let store = ChallengeStore::new();
        store.put(&did, plaintext);
        let response = respond(&key, &ciphertext_b64).unwrap();

        assert!(store.verify(&did, &response));
        assert!(!store.verify(&did, &response));
    }
}
