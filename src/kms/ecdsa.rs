//! ECDSA P-256 key material (JWS `ES256`).
//!
//! Grounded on `did/core/dkms.go` (`ecdsa.GenerateKey(elliptic.P256(),
//! ...)`) and `pkg/did/core/byd50-jwt/vc-jwt.go` (`jwt.SigningMethodES256`).
//! The source exports ECDSA PEM under its own non-standard labels
//! (`ECDSA PRIVATE KEY` over SEC1 DER, `ECDSA PUBLIC KEY` over PKIX DER);
//! this module uses the RFC-standard labels instead (`EC PRIVATE KEY`,
//! `PUBLIC KEY`) since `spec.md` fixes no ECDSA label requirement the way
//! it does for the RSA public key.

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use p256::{PublicKey, SecretKey};

use crate::error::{Error, Result};

pub struct EcdsaKeyPair {
    secret: SecretKey,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl EcdsaKeyPair {
    pub fn generate() -> Self {
        let secret = SecretKey::random(&mut rand::rngs::OsRng);
        Self::from_secret(secret)
    }

    pub fn from_pem(encoded: &str) -> Result<Self> {
        let secret = SecretKey::from_sec1_pem(encoded)
            .map_err(|e| Error::InvalidKey(format!("invalid SEC1 EC private key PEM: {e}")))?;
        Ok(Self::from_secret(secret))
    }

    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_sec1_der(der)
            .map_err(|e| Error::InvalidKey(format!("invalid SEC1 EC private key: {e}")))?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let signing_key = SigningKey::from(&secret);
        let verifying_key = VerifyingKey::from(&signing_key);
        Self { secret, signing_key, verifying_key }
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// PEM-encodes the private key as SEC1, block label `EC PRIVATE KEY`.
    pub fn private_pem(&self) -> Result<String> {
        self.secret
            .to_sec1_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| Error::InternalError(format!("SEC1 encode failed: {e}")))
    }

    /// PEM-encodes the public key as PKIX, block label `PUBLIC KEY`.
    pub fn public_pem(&self) -> Result<String> {
        public_key_pem(&self.secret.public_key())
    }

    pub fn private_base58(&self) -> Result<String> {
        let der = self
            .secret
            .to_sec1_der()
            .map_err(|e| Error::InternalError(format!("SEC1 encode failed: {e}")))?;
        Ok(bs58::encode(der.as_slice()).into_string())
    }

    pub fn public_base58(&self) -> Result<String> {
        public_key_base58(&self.secret.public_key())
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signature: Signature = self.signing_key.sign(message);
        Ok(signature.to_bytes().to_vec())
    }
}

/// PEM-encodes a [`PublicKey`] as PKIX `SubjectPublicKeyInfo`, block label
/// `PUBLIC KEY`.
pub fn public_key_pem(pk: &PublicKey) -> Result<String> {
    pk.to_public_key_pem(LineEnding::LF)
        .map_err(|e| Error::InternalError(format!("PKIX encode failed: {e}")))
}

/// Base58-encodes a [`PublicKey`]'s PKIX DER bytes.
pub fn public_key_base58(pk: &PublicKey) -> Result<String> {
    let der = pk
        .to_public_key_der()
        .map_err(|e| Error::InternalError(format!("PKIX encode failed: {e}")))?;
    Ok(bs58::encode(der.as_bytes()).into_string())
}

/// Parses PKIX `SubjectPublicKeyInfo` DER bytes into a [`VerifyingKey`].
pub fn verifying_key_from_pkix_der(der: &[u8]) -> Result<VerifyingKey> {
    let pk = PublicKey::from_public_key_der(der)
        .map_err(|e| Error::InvalidKey(format!("invalid PKIX ECDSA public key: {e}")))?;
    Ok(VerifyingKey::from(pk))
}

/// Parses a `PUBLIC KEY` PEM block, the only label this module ever writes
/// for an ECDSA public key.
pub fn verifying_key_from_pem(encoded: &str) -> Result<VerifyingKey> {
    let pk = PublicKey::from_public_key_pem(encoded)
        .map_err(|e| Error::InvalidKey(format!("invalid PKIX ECDSA public key PEM: {e}")))?;
    Ok(VerifyingKey::from(pk))
}

pub fn verify(pk: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<bool> {
    let Ok(sig) = Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(pk.verify(message, &sig).is_ok())
}
