//! End-to-end coverage spanning DID creation, VC issuance, VP verification,
//! and both challenge protocols through the crate's public API only —
//! the universally-quantified invariants and seed scenarios this project's
//! design documents enumerate.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use veridid::challenge::{encrypted, simple};
use veridid::did::driver::byd50::Byd50Driver;
use veridid::did::registry::{MethodDriver, MethodRegistryBuilder};
use veridid::did::resolver::Resolver;
use veridid::did::store::InMemoryStore;
use veridid::{Algorithm, Did, GenerationRule, KeyPair, VcBuilder, VpBuilder};

async fn setup(method: &str, rule: GenerationRule) -> (Resolver, Arc<Byd50Driver>) {
    let store = Arc::new(InMemoryStore::new());
    let driver = Arc::new(Byd50Driver::new(method, rule, store));
    let registry = MethodRegistryBuilder::new().register(driver.clone()).build();
    (Resolver::new(registry), driver)
}

async fn create_identity(
    driver: &Byd50Driver,
    algorithm: Algorithm,
) -> (Did, KeyPair) {
    let key = KeyPair::generate(algorithm).unwrap();
    let did = driver.create(key.public_base58()).await.unwrap();
    (did, key)
}

#[tokio::test]
async fn every_generation_rule_produces_a_well_formed_did_that_resolves_back_to_its_key() {
    for rule in [GenerationRule::Hexdigit, GenerationRule::Uuid, GenerationRule::Base58] {
        let (resolver, driver) = setup("byd50", rule).await;
        let (did, key) = create_identity(&driver, Algorithm::EcdsaP256).await;

        assert!(did.as_str().starts_with("did:byd50:"));

        let document = resolver.resolve(&did).await.unwrap();
        assert_eq!(document.id, did.as_str());
        assert_eq!(document.authentication[0].public_key_base58, key.public_base58());
    }
}

#[tokio::test]
async fn key_material_round_trips_through_pem_and_base58_for_both_algorithms() {
    for algorithm in [Algorithm::EcdsaP256, Algorithm::Rsa2048] {
        let key = KeyPair::generate(algorithm).unwrap();

        let from_pem = KeyPair::import_pem(key.private_pem(), algorithm).unwrap();
        assert_eq!(from_pem.public_base58(), key.public_base58());

        let from_base58 = KeyPair::import_base58(key.private_base58(), algorithm).unwrap();
        assert_eq!(from_base58.public_base58(), key.public_base58());
    }
}

// Seed scenario 1 + 2: issuer issues a VC to a holder, holder wraps it in a
// VP for a specific verifier audience and nonce, verifier checks both.
#[tokio::test]
async fn happy_path_vc_issuance_and_vp_verification() {
    let (resolver, driver) = setup("byd50", GenerationRule::Uuid).await;
    let (issuer_did, issuer_key) = create_identity(&driver, Algorithm::EcdsaP256).await;
    let (holder_did, holder_key) = create_identity(&driver, Algorithm::EcdsaP256).await;

    let now = Utc::now();
    let vc = VcBuilder::new(serde_json::json!({"degree": "BachelorDegree"}))
        .add_type("UniversityDegreeCredential")
        .subject(holder_did.as_str())
        .signer(&issuer_key, issuer_did.as_str())
        .issued_at(now)
        .expires_at(now + TimeDelta::seconds(300))
        .build()
        .unwrap();

    assert!(veridid::vc::verify(&vc, &resolver).await.unwrap());

    let vp = VpBuilder::new(vec![vc])
        .signer(&holder_key, holder_did.as_str())
        .audience("did:byd50:rental1")
        .nonce("abc123")
        .issued_at(now)
        .expires_at(now + TimeDelta::seconds(300))
        .build()
        .unwrap();

    let report = veridid::vp::verify(&vp, &resolver, "did:byd50:rental1", "abc123", now).await.unwrap();
    assert!(report.is_success());
}

// Seed scenario 6: a simple presentation signed fifteen seconds in the past
// is rejected as a time-out without its signature being checked.
#[tokio::test]
async fn stale_simple_presentation_times_out() {
    let (resolver, driver) = setup("byd50", GenerationRule::Uuid).await;
    let (did, key) = create_identity(&driver, Algorithm::EcdsaP256).await;

    let presentation = simple::sign(&did, &key).unwrap();
    let fifteen_seconds_later = Utc::now() + TimeDelta::seconds(15);

    let outcome = simple::verify(&presentation, &resolver, fifteen_seconds_later).await.unwrap();
    assert_eq!(outcome, simple::SimpleOutcome::TimeOut);
}

// Challenge (a): decrypting the envelope with the bound private key yields
// exactly the plaintext the verifier drew, end to end through the public
// `encrypted` module and a real `ChallengeStore`.
#[tokio::test]
async fn encrypted_challenge_round_trips_through_store() {
    let (resolver, driver) = setup("byd50", GenerationRule::Uuid).await;
    let (did, key) = create_identity(&driver, Algorithm::Rsa2048).await;

    let (ciphertext_b64, plaintext) = encrypted::issue(&resolver, &did).await.unwrap();
    let store = encrypted::ChallengeStore::new();
    store.put(&did, plaintext);

    let response = encrypted::respond(&key, &ciphertext_b64).unwrap();
    assert!(store.verify(&did, &response));
}
