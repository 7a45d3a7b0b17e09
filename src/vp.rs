//! # Verifiable Presentation Builder/Verifier (C8)
//!
//! Typestate builder analogous to [`crate::vc::VcBuilder`], grounded on the
//! teacher's `VerifiablePresentation`/`VpClaims` shape
//! (`examples/credibil-vc/src/w3c_vc/vp.rs`,
//! `examples/credibil-vc/src/w3c_vc/proof/jose.rs`) and the seven-step
//! verification pipeline of `spec.md` §4.8.

use chrono::serde::ts_seconds_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::OneOrMany;
use crate::did::resolver::Resolver;
use crate::error::{Error, Result};
use crate::jose::jwa::Algorithm;
use crate::jose::jws;
use crate::kms::KeyPair;
use crate::vc::{self, VcClaims};

const VP_CONTEXTS: [&str; 1] = ["https://www.w3.org/2018/credentials/v1"];

/// The `vp` object nested in [`VpClaims`] (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VpPayload {
    /// W3C VC contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// Begins with `"VerifiablePresentation"`.
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    /// Always serialized as an array (`spec.md` §9, Open Question 3);
    /// decoding accepts either a bare string or an array.
    #[serde(rename = "verifiableCredential")]
    pub verifiable_credential: OneOrMany<String>,
}

/// A Verifiable Presentation JWT payload (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VpClaims {
    /// The holder's DID.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub iss: Option<String>,
    /// The presentation id.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jti: Option<String>,
    /// The verifier's `client_id` — string or array of strings.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aud: Option<OneOrMany<String>>,
    /// The verifier's challenge.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nonce: Option<String>,
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub iat: Option<DateTime<Utc>>,
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub nbf: Option<DateTime<Utc>>,
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub exp: Option<DateTime<Utc>>,
    /// The presentation body.
    pub vp: VpPayload,
}

/// Builder has no signer yet.
#[doc(hidden)]
pub struct NoSigner;
/// Builder has a signer bound; [`VpBuilder::build`] is available.
#[doc(hidden)]
pub struct HasSigner<'a> {
    key: &'a KeyPair,
    kid: String,
}

/// Assembles a [`VpClaims`] payload and signs it into a compact JWS.
pub struct VpBuilder<S> {
    claims: VpClaims,
    signer: S,
}

impl VpBuilder<NoSigner> {
    /// Starts a new presentation wrapping `verifiable_credentials` (VC JWTs).
    #[must_use]
    pub fn new(verifiable_credentials: Vec<String>) -> Self {
        Self {
            claims: VpClaims {
                iss: None,
                jti: None,
                aud: None,
                nonce: None,
                iat: None,
                nbf: None,
                exp: None,
                vp: VpPayload {
                    context: VP_CONTEXTS.iter().map(ToString::to_string).collect(),
                    type_: vec!["VerifiablePresentation".to_string()],
                    verifiable_credential: OneOrMany::Many(verifiable_credentials),
                },
            },
            signer: NoSigner,
        }
    }

    /// Binds the holder DID (`kid`, and `iss` unless already set) and its
    /// ECDSA private key.
    #[must_use]
    pub fn signer(mut self, key: &KeyPair, did: impl Into<String>) -> VpBuilder<HasSigner<'_>> {
        let did = did.into();
        if self.claims.iss.is_none() {
            self.claims.iss = Some(did.clone());
        }
        VpBuilder { claims: self.claims, signer: HasSigner { key, kid: did } }
    }
}

impl<S> VpBuilder<S> {
    /// Appends a concrete presentation type after `"VerifiablePresentation"`.
    #[must_use]
    pub fn add_type(mut self, type_: impl Into<String>) -> Self {
        self.claims.vp.type_.push(type_.into());
        self
    }

    /// Sets `aud` — the verifier's DID.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.claims.aud = Some(OneOrMany::One(aud.into()));
        self
    }

    /// Sets `nonce` — the verifier's challenge.
    #[must_use]
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.claims.nonce = Some(nonce.into());
        self
    }

    /// Sets `jti`.
    #[must_use]
    pub fn id(mut self, jti: impl Into<String>) -> Self {
        self.claims.jti = Some(jti.into());
        self
    }

    /// Sets `iat`.
    #[must_use]
    pub fn issued_at(mut self, iat: DateTime<Utc>) -> Self {
        self.claims.iat = Some(iat);
        self
    }

    /// Sets `nbf`.
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.claims.nbf = Some(nbf);
        self
    }

    /// Sets `exp`.
    #[must_use]
    pub fn expires_at(mut self, exp: DateTime<Utc>) -> Self {
        self.claims.exp = Some(exp);
        self
    }
}

impl VpBuilder<HasSigner<'_>> {
    /// Signs the assembled claims with `ES256`, `kid` set to the holder DID.
    pub fn build(self) -> Result<String> {
        jws::encode(&self.claims, &self.signer.kid, self.signer.key)
    }
}

/// Which of the seven pipeline steps of `spec.md` §4.8 failed, and why.
/// Named so a failing step is identifiable by callers and tests (§8's
/// `"audience mismatch"`, `"vc expired"`, `"vc holder mismatch"`).
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// Step 1: the VP's own signature did not verify.
    SignatureInvalid(String),
    /// Step 3: `aud` does not contain the expected audience.
    AudienceMismatch,
    /// Step 4: `nonce` does not equal the expected nonce.
    NonceMismatch,
    /// Step 5: the VP itself is expired (`exp ≤ now`).
    Expired,
    /// Step 5: the VP is not yet valid (`nbf > now`).
    NotYetValid,
    /// Step 6: the presentation carries no verifiable credentials at all.
    NoCredentials,
    /// Step 6: an inner VC's signature did not verify.
    VcInvalid(String),
    /// Step 6: an inner VC failed temporal validation.
    VcExpired,
    /// Step 7: the holder DID matches neither the VC's `sub` nor any of
    /// `holderDid`/`id`/`did` in `credentialSubject`.
    HolderMismatch,
}

/// The outcome of the seven-step pipeline — every step runs and reports
/// independently rather than failing early silently (`spec.md` §4.8).
#[derive(Clone, Debug, Default)]
pub struct VerificationReport {
    /// Step 1.
    pub signature_ok: bool,
    /// Step 3.
    pub audience_ok: bool,
    /// Step 4.
    pub nonce_ok: bool,
    /// Step 5.
    pub temporal_ok: bool,
    /// Step 6, for every inner VC.
    pub credentials_ok: bool,
    /// Step 7.
    pub holder_binding_ok: bool,
    /// One entry per failed step, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    /// `true` iff every step passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn fail(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(?diagnostic, "VP verification step failed");
        self.diagnostics.push(diagnostic);
    }
}

/// Runs the seven-step VP verification pipeline of `spec.md` §4.8.
///
/// Step 1 (signature) is a hard prerequisite: if it fails, claims cannot be
/// trusted and the remaining steps do not run. Steps 3–7 are independent
/// checks over already-trusted claims and all run regardless of earlier
/// failures, so a caller always learns every sub-check's outcome.
pub async fn verify(
    token: &str,
    resolver: &Resolver,
    expected_audience: &str,
    expected_nonce: &str,
    now: DateTime<Utc>,
) -> Result<VerificationReport> {
    let mut report = VerificationReport::default();

    let (header, _payload) = jws::decode_unverified(token)?;
    if header.alg != Algorithm::Es256 {
        return Err(Error::InvalidInput(format!("unsupported VP algorithm: {:?}", header.alg)));
    }
    let holder = crate::did::Did::parse(header.kid.clone())?;
    let public_key_base58 = resolver.public_key_of(&holder, "").await?;

    let claims: VpClaims = match jws::verify(token, &public_key_base58, header.alg) {
        Ok(claims) => {
            report.signature_ok = true;
            claims
        }
        Err(e) => {
            report.fail(Diagnostic::SignatureInvalid(e.to_string()));
            return Ok(report);
        }
    };

    // Step 3: audience.
    report.audience_ok = claims
        .aud
        .as_ref()
        .is_some_and(|aud| aud.contains(&expected_audience.to_string()));
    if !report.audience_ok {
        report.fail(Diagnostic::AudienceMismatch);
    }

    // Step 4: nonce.
    report.nonce_ok = claims.nonce.as_deref() == Some(expected_nonce);
    if !report.nonce_ok {
        report.fail(Diagnostic::NonceMismatch);
    }

    // Step 5: temporal.
    report.temporal_ok = true;
    if let Some(exp) = claims.exp {
        if exp <= now {
            report.temporal_ok = false;
            report.fail(Diagnostic::Expired);
        }
    }
    if let Some(nbf) = claims.nbf {
        if nbf > now {
            report.temporal_ok = false;
            report.fail(Diagnostic::NotYetValid);
        }
    }

    // Step 6 + 7: per-VC verification and holder binding. An empty
    // credential list has nothing to bind the holder to and is not a vacuous
    // pass — it fails step 6 outright.
    if claims.vp.verifiable_credential.is_empty() {
        report.fail(Diagnostic::NoCredentials);
        return Ok(report);
    }
    report.credentials_ok = true;
    report.holder_binding_ok = true;
    let holder_id = claims.iss.clone().unwrap_or_default();
    for vc_token in claims.vp.verifiable_credential.iter() {
        match verify_inner_vc(vc_token, resolver, now).await {
            Ok(vc_claims) => {
                if !holder_bound(&holder_id, &vc_claims) {
                    report.holder_binding_ok = false;
                    report.fail(Diagnostic::HolderMismatch);
                }
            }
            Err(diagnostic) => {
                report.credentials_ok = false;
                report.fail(diagnostic);
            }
        }
    }

    Ok(report)
}

async fn verify_inner_vc(
    token: &str,
    resolver: &Resolver,
    now: DateTime<Utc>,
) -> std::result::Result<VcClaims, Diagnostic> {
    let ok = vc::verify(token, resolver).await.map_err(|e| Diagnostic::VcInvalid(e.to_string()))?;
    if !ok {
        return Err(Diagnostic::VcInvalid("signature verification failed".into()));
    }
    let claims: VcClaims =
        jws::decode_claims_unverified(token).map_err(|e| Diagnostic::VcInvalid(e.to_string()))?;
    match vc::validate(&claims, now) {
        Ok(()) => Ok(claims),
        Err(vc::ValidationError::Expired) => Err(Diagnostic::VcExpired),
        Err(other) => Err(Diagnostic::VcInvalid(format!("{other:?}"))),
    }
}

/// Step 7: the VP's holder equals the VC's `sub`, or a `holderDid`/`id`/`did`
/// field in `credentialSubject`.
fn holder_bound(holder_id: &str, vc_claims: &VcClaims) -> bool {
    if vc_claims.sub.as_deref() == Some(holder_id) {
        return true;
    }
    let subject = &vc_claims.vc.credential_subject;
    ["holderDid", "id", "did"]
        .iter()
        .any(|field| subject.get(field).and_then(serde_json::Value::as_str) == Some(holder_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;

    use super::*;
    use crate::did::driver::byd50::Byd50Driver;
    use crate::did::registry::MethodRegistryBuilder;
    use crate::did::registry::MethodDriver;
    use crate::did::store::InMemoryStore;
    use crate::did::{Did, GenerationRule};
    use crate::kms::{Algorithm as KmsAlgorithm, KeyPair};
    use crate::vc::VcBuilder;

    struct Scenario {
        resolver: Resolver,
        issuer_did: String,
        issuer_key: KeyPair,
        holder_did: String,
        holder_key: KeyPair,
    }

    async fn setup() -> Scenario {
        let store = Arc::new(InMemoryStore::new());
        let driver = Arc::new(Byd50Driver::new("byd50", GenerationRule::Uuid, store));

        let issuer_key = KeyPair::generate(KmsAlgorithm::EcdsaP256).unwrap();
        let issuer_did: Did = driver.create(issuer_key.public_base58()).await.unwrap();
        let holder_key = KeyPair::generate(KmsAlgorithm::EcdsaP256).unwrap();
        let holder_did: Did = driver.create(holder_key.public_base58()).await.unwrap();

        let registry = MethodRegistryBuilder::new().register(driver).build();
        Scenario {
            resolver: Resolver::new(registry),
            issuer_did: issuer_did.as_str().to_string(),
            issuer_key,
            holder_did: holder_did.as_str().to_string(),
            holder_key,
        }
    }

    fn issue_vc(s: &Scenario, sub: &str, exp_offset: TimeDelta) -> String {
        let now = Utc::now();
        VcBuilder::new(serde_json::json!({"degree": "BachelorDegree"}))
            .subject(sub)
            .signer(&s.issuer_key, &s.issuer_did)
            .issued_at(now)
            .expires_at(now + exp_offset)
            .build()
            .unwrap()
    }

    fn present(s: &Scenario, vc: String, aud: &str, nonce: &str) -> String {
        VpBuilder::new(vec![vc])
            .audience(aud)
            .nonce(nonce)
            .signer(&s.holder_key, &s.holder_did)
            .issued_at(Utc::now())
            .expires_at(Utc::now() + TimeDelta::seconds(300))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn happy_path_passes_every_step() {
        let s = setup().await;
        let vc = issue_vc(&s, &s.holder_did, TimeDelta::seconds(300));
        let vp = present(&s, vc, "did:byd50:rental1", "abc123");

        let report = verify(&vp, &s.resolver, "did:byd50:rental1", "abc123", Utc::now()).await.unwrap();
        assert!(report.is_success(), "{:?}", report.diagnostics);
    }

    #[tokio::test]
    async fn audience_mismatch_fails_but_signature_still_checks_out() {
        let s = setup().await;
        let vc = issue_vc(&s, &s.holder_did, TimeDelta::seconds(300));
        let vp = present(&s, vc, "did:byd50:rental1", "abc123");

        let report = verify(&vp, &s.resolver, "did:byd50:other", "abc123", Utc::now()).await.unwrap();
        assert!(report.signature_ok);
        assert!(!report.is_success());
        assert!(report.diagnostics.contains(&Diagnostic::AudienceMismatch));
    }

    #[tokio::test]
    async fn stale_vc_reports_vc_expired() {
        let s = setup().await;
        let vc = issue_vc(&s, &s.holder_did, TimeDelta::seconds(-1));
        let vp = present(&s, vc, "did:byd50:rental1", "abc123");

        let report = verify(&vp, &s.resolver, "did:byd50:rental1", "abc123", Utc::now()).await.unwrap();
        assert!(report.diagnostics.contains(&Diagnostic::VcExpired));
    }

    #[tokio::test]
    async fn empty_credential_list_is_not_a_vacuous_pass() {
        let s = setup().await;
        let vp = VpBuilder::new(Vec::new())
            .audience("did:byd50:rental1")
            .nonce("abc123")
            .signer(&s.holder_key, &s.holder_did)
            .issued_at(Utc::now())
            .expires_at(Utc::now() + TimeDelta::seconds(300))
            .build()
            .unwrap();

        let report = verify(&vp, &s.resolver, "did:byd50:rental1", "abc123", Utc::now()).await.unwrap();
        assert!(!report.is_success());
        assert!(report.diagnostics.contains(&Diagnostic::NoCredentials));
    }

    #[tokio::test]
    async fn holder_mismatch_is_reported() {
        let s = setup().await;
        let vc = issue_vc(&s, "did:byd50:someoneElse", TimeDelta::seconds(300));
        let vp = present(&s, vc, "did:byd50:rental1", "abc123");

        let report = verify(&vp, &s.resolver, "did:byd50:rental1", "abc123", Utc::now()).await.unwrap();
        assert!(report.diagnostics.contains(&Diagnostic::HolderMismatch));
    }
}
