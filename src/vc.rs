//! # Verifiable Credential Builder/Verifier (C7)
//!
//! Typestate builder grounded on `W3cVcBuilder<NoSigner>`/`HasSigner`
//! (`examples/credibil-vc/src/w3c_vc.rs`); claims layout grounded on
//! `VcClaims` (`examples/credibil-vc/src/w3c_vc/proof/jose.rs`) and
//! `pkg/did/core/byd50-jwt/vc-jwt.go`'s `CreateVc`/`VerifyVc`.

use chrono::serde::ts_seconds_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::generate;
use crate::core::OneOrMany;
use crate::did::resolver::Resolver;
use crate::error::{Error, Result};
use crate::jose::jwa::Algorithm;
use crate::jose::jws;
use crate::kms::KeyPair;

const VC_CONTEXTS: [&str; 2] =
    ["https://www.w3.org/2018/credentials/v1", "https://www.w3.org/2018/credentials/examples/v1"];

/// The `vc` object nested in [`VcClaims`] (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VcPayload {
    /// W3C VC contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// Begins with `"VerifiableCredential"`; may carry one concrete type.
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    /// Opaque subject data, contents defined by the issuer.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: serde_json::Value,
}

/// A Verifiable Credential JWT payload (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VcClaims {
    /// Fresh random string (12 chars, alphanumerics + punctuation).
    pub nonce: String,
    /// The credential body.
    pub vc: VcPayload,
    /// Non-empty when present (`spec.md` §3 invariant).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub iss: Option<String>,
    /// The credential subject's DID, W3C-VC-DM `credentialSubject.id`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub: Option<String>,
    /// String or array of strings.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aud: Option<OneOrMany<String>>,
    /// Issuance time.
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub iat: Option<DateTime<Utc>>,
    /// `nbf ≤ iat` when present (W3C-VC-DM `issuanceDate`).
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub nbf: Option<DateTime<Utc>>,
    /// `exp > iat` when present (W3C-VC-DM `expirationDate`).
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none", default)]
    pub exp: Option<DateTime<Utc>>,
    /// W3C-VC-DM credential id.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jti: Option<String>,
}

/// Builder has no signer yet.
#[doc(hidden)]
pub struct NoSigner;
/// Builder has a signer bound; [`VcBuilder::build`] is available.
#[doc(hidden)]
pub struct HasSigner<'a> {
    key: &'a KeyPair,
    kid: String,
}

/// Assembles a [`VcClaims`] payload and signs it into a compact JWS.
pub struct VcBuilder<S> {
    claims: VcClaims,
    signer: S,
}

impl VcBuilder<NoSigner> {
    /// Starts a new credential with `credential_subject` as the opaque
    /// subject body. `nonce` is filled with a fresh random string; override
    /// with [`VcBuilder::nonce`] if the caller supplies its own.
    #[must_use]
    pub fn new(credential_subject: serde_json::Value) -> Self {
        Self {
            claims: VcClaims {
                nonce: generate::nonce(12),
                vc: VcPayload {
                    context: VC_CONTEXTS.iter().map(ToString::to_string).collect(),
                    type_: vec!["VerifiableCredential".to_string()],
                    credential_subject,
                },
                iss: None,
                sub: None,
                aud: None,
                iat: None,
                nbf: None,
                exp: None,
                jti: None,
            },
            signer: NoSigner,
        }
    }

    /// Binds the signer DID (`kid`, and `iss` unless already set) and its
    /// ECDSA private key.
    #[must_use]
    pub fn signer(mut self, key: &KeyPair, did: impl Into<String>) -> VcBuilder<HasSigner<'_>> {
        let did = did.into();
        if self.claims.iss.is_none() {
            self.claims.iss = Some(did.clone());
        }
        VcBuilder { claims: self.claims, signer: HasSigner { key, kid: did } }
    }
}

impl<S> VcBuilder<S> {
    /// Appends a concrete credential type after `"VerifiableCredential"`.
    #[must_use]
    pub fn add_type(mut self, type_: impl Into<String>) -> Self {
        self.claims.vc.type_.push(type_.into());
        self
    }

    /// Overrides the default random `nonce`.
    #[must_use]
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.claims.nonce = nonce.into();
        self
    }

    /// Sets `iss` explicitly (otherwise defaults to the signer DID).
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.iss = Some(iss.into());
        self
    }

    /// Sets `sub`.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims.sub = Some(sub.into());
        self
    }

    /// Sets `aud`.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.claims.aud = Some(OneOrMany::One(aud.into()));
        self
    }

    /// Sets `jti` (W3C-VC-DM credential id).
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

    /// Sets `nbf` (W3C-VC-DM `issuanceDate`).
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.claims.nbf = Some(nbf);
        self
    }

    /// Sets `exp` (W3C-VC-DM `expirationDate`).
    #[must_use]
    pub fn expires_at(mut self, exp: DateTime<Utc>) -> Self {
        self.claims.exp = Some(exp);
        self
    }
}

impl VcBuilder<HasSigner<'_>> {
    /// Signs the assembled claims with `ES256`, `kid` set to the signer DID.
    pub fn build(self) -> Result<String> {
        jws::encode(&self.claims, &self.signer.kid, self.signer.key)
    }
}

/// Verifies `token`'s signature only — the four-step pipeline of `spec.md`
/// §4.7. Issuance-time checks (`nbf`, `exp`) are the caller's policy; see
/// [`validate`].
pub async fn verify(token: &str, resolver: &Resolver) -> Result<bool> {
    let (header, _payload) = jws::decode_unverified(token)?;
    if header.alg != Algorithm::Es256 {
        return Err(Error::InvalidInput(format!("unsupported VC algorithm: {:?}", header.alg)));
    }
    let kid = crate::did::Did::parse(header.kid.clone())?;
    let public_key_base58 = resolver.public_key_of(&kid, "").await?;

    let _claims: VcClaims = jws::verify(token, &public_key_base58, header.alg)?;
    tracing::debug!(kid = %kid, "VC signature verified");
    Ok(true)
}

/// Why [`validate`] rejected a credential's claims (`spec.md` §4.7's policy
/// layer, §8's "vc expired" diagnostic).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// `iss` is missing or empty.
    MissingIssuer,
    /// `iat` or `exp` is missing.
    MissingTimestamps,
    /// `exp` is not strictly after `iat`.
    ExpiryNotAfterIssuance,
    /// `nbf` is present and after `iat`.
    NotBeforeAfterIssuance,
    /// `exp` is not after the reference time.
    Expired,
}

/// The pure policy layer of `spec.md` §4.7's last paragraph: `iss`
/// non-empty; `exp`/`iat` present; `exp > iat`; `nbf ≤ iat` when present;
/// `exp > now`.
pub fn validate(claims: &VcClaims, now: DateTime<Utc>) -> std::result::Result<(), ValidationError> {
    if claims.iss.as_deref().unwrap_or_default().is_empty() {
        return Err(ValidationError::MissingIssuer);
    }
    let (Some(iat), Some(exp)) = (claims.iat, claims.exp) else {
        return Err(ValidationError::MissingTimestamps);
    };
    if exp <= iat {
        return Err(ValidationError::ExpiryNotAfterIssuance);
    }
    if let Some(nbf) = claims.nbf {
        if nbf > iat {
            return Err(ValidationError::NotBeforeAfterIssuance);
        }
    }
    if exp <= now {
        return Err(ValidationError::Expired);
    }
    Ok(())
}
