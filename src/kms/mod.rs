//! # Key Material (KMS)
//!
//! Supports RSA-2048 and ECDSA P-256 key pairs with PEM and Base58 export,
//! sign/verify, and encrypt/decrypt. Grounded on `did/core/dkms.go` and
//! `pkg/did/core/algorithm.go` from the source this spec was distilled from
//! — see `DESIGN.md` for the PEM block labelling this module intentionally
//! reproduces, including the mislabeled `RSA PUBLIC KEY` block that actually
//! carries PKIX bytes.

mod ecdsa;
mod pem;
mod rsa;

use crate::did::Did;
use crate::error::{Error, Result};

/// Base64-standard encodes bytes for transport (`spec.md` §4.1: "signatures
/// are base64-standard encoded for transport"), reused by the encrypted
/// challenge protocol for its ciphertext envelope.
#[must_use]
pub fn base64_standard(bytes: &[u8]) -> String {
    rsa::base64_standard(bytes)
}

/// Decodes a base64-standard string produced by [`base64_standard`].
pub fn from_base64_standard(encoded: &str) -> Result<Vec<u8>> {
    rsa::from_base64_standard(encoded)
}

/// The two algorithms this crate supports (`spec.md` Non-goals: "no
/// cryptographic agility beyond RSA-2048 and ECDSA-P256").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSA with a 2048-bit modulus.
    Rsa2048,
    /// ECDSA over the NIST P-256 curve.
    EcdsaP256,
}

enum PrivateInner {
    Rsa(Box<rsa::RsaKeyPair>),
    Ecdsa(Box<ecdsa::EcdsaKeyPair>),
}

enum PublicInner {
    Rsa(::rsa::RsaPublicKey),
    Ecdsa(p256::ecdsa::VerifyingKey),
}

/// A generated or imported key pair: algorithm fixed at construction,
/// private and public halves paired, with PEM and Base58 encodings of both
/// precomputed eagerly at construction time (`spec.md` §3's "PEM/Base58 are
/// deterministic encodings of the same key object" invariant, and
/// `dkms.go`'s `InitDKMS` always deriving all four encodings together).
pub struct KeyPair {
    algorithm: Algorithm,
    inner: PrivateInner,
    private_pem: String,
    public_pem: String,
    private_base58: String,
    public_base58: String,
    did: Option<Did>,
}

/// The public half of a key pair, as resolved from a DID document's
/// `publicKeyBase58` rather than generated locally.
pub struct PublicKey {
    algorithm: Algorithm,
    inner: PublicInner,
}

impl KeyPair {
    /// Generates a fresh key pair for `algorithm`.
    pub fn generate(algorithm: Algorithm) -> Result<Self> {
        match algorithm {
            Algorithm::Rsa2048 => {
                let inner = rsa::RsaKeyPair::generate()?;
                Self::from_rsa(inner)
            }
            Algorithm::EcdsaP256 => {
                let inner = ecdsa::EcdsaKeyPair::generate();
                Self::from_ecdsa(inner)
            }
        }
    }

    /// Imports a private key from its PEM encoding (`RSA PRIVATE KEY` /
    /// PKCS#1 for RSA, `EC PRIVATE KEY` / SEC1 for ECDSA).
    pub fn import_pem(encoded: &str, algorithm: Algorithm) -> Result<Self> {
        match algorithm {
            Algorithm::Rsa2048 => Self::from_rsa(rsa::RsaKeyPair::from_pem(encoded)?),
            Algorithm::EcdsaP256 => Self::from_ecdsa(ecdsa::EcdsaKeyPair::from_pem(encoded)?),
        }
    }

    /// Imports a private key from its Base58 encoding (Base58 over the same
    /// DER bytes the PEM encoding wraps).
    pub fn import_base58(encoded: &str, algorithm: Algorithm) -> Result<Self> {
        let der = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| Error::InvalidKey(format!("invalid base58: {e}")))?;
        match algorithm {
            Algorithm::Rsa2048 => Self::from_rsa(rsa::RsaKeyPair::from_pkcs1_der(&der)?),
            Algorithm::EcdsaP256 => Self::from_ecdsa(ecdsa::EcdsaKeyPair::from_sec1_der(&der)?),
        }
    }

    fn from_rsa(inner: rsa::RsaKeyPair) -> Result<Self> {
        let private_pem = inner.private_pem()?;
        let public_pem = inner.public_pem()?;
        let private_base58 = inner.private_base58()?;
        let public_base58 = inner.public_base58()?;
        Ok(Self {
            algorithm: Algorithm::Rsa2048,
            inner: PrivateInner::Rsa(Box::new(inner)),
            private_pem,
            public_pem,
            private_base58,
            public_base58,
            did: None,
        })
    }

    fn from_ecdsa(inner: ecdsa::EcdsaKeyPair) -> Result<Self> {
        let private_pem = inner.private_pem()?;
        let public_pem = inner.public_pem()?;
        let private_base58 = inner.private_base58()?;
        let public_base58 = inner.public_base58()?;
        Ok(Self {
            algorithm: Algorithm::EcdsaP256,
            inner: PrivateInner::Ecdsa(Box::new(inner)),
            private_pem,
            public_pem,
            private_base58,
            public_base58,
            did: None,
        })
    }

    /// The algorithm this key pair was constructed with.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// PEM encoding of the private half.
    #[must_use]
    pub fn private_pem(&self) -> &str {
        &self.private_pem
    }

    /// PEM encoding of the public half.
    #[must_use]
    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }

    /// Base58 encoding of the private half.
    #[must_use]
    pub fn private_base58(&self) -> &str {
        &self.private_base58
    }

    /// Base58 encoding of the public half.
    #[must_use]
    pub fn public_base58(&self) -> &str {
        &self.public_base58
    }

    /// Binds a DID to this key pair. The only mutation this type allows
    /// post-construction, per `spec.md` §3's key-material lifecycle.
    pub fn bind_did(&mut self, did: Did) {
        self.did = Some(did);
    }

    /// The DID bound to this key pair, if any.
    #[must_use]
    pub fn did(&self) -> Option<&Did> {
        self.did.as_ref()
    }

    /// The public half, usable anywhere a [`PublicKey`] is needed.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match &self.inner {
            PrivateInner::Rsa(kp) => PublicKey {
                algorithm: Algorithm::Rsa2048,
                inner: PublicInner::Rsa(kp.public_key().clone()),
            },
            PrivateInner::Ecdsa(kp) => PublicKey {
                algorithm: Algorithm::EcdsaP256,
                inner: PublicInner::Ecdsa(*kp.verifying_key()),
            },
        }
    }

    /// Signs `message`.
    ///
    /// RSA uses RSASSA-PKCS1-v1_5 with SHA-256 (`spec.md` §4.1); ECDSA uses
    /// ES256 (ECDSA over SHA-256 of the input) (`spec.md` §4.1).
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            PrivateInner::Rsa(kp) => kp.sign(message),
            PrivateInner::Ecdsa(kp) => kp.sign(message),
        }
    }

    /// Decrypts `ciphertext` with RSAES-OAEP/SHA-512 (`spec.md` §4.1, the
    /// resolved Open Question in `DESIGN.md`). Returns
    /// [`Error::InvalidInput`] for an ECDSA key pair — ECDSA keys are used
    /// for signing only (`spec.md` §3, "Signed Token").
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            PrivateInner::Rsa(kp) => kp.decrypt(ciphertext),
            PrivateInner::Ecdsa(_) => {
                Err(Error::InvalidInput("ECDSA keys do not support decryption".into()))
            }
        }
    }
}

impl PublicKey {
    /// Parses a public key from its Base58 encoding. For RSA, decodes
    /// Base58 then parses PKIX `SubjectPublicKeyInfo` — the same bytes a
    /// resolver's `publicKeyBase58` carries regardless of the PEM block
    /// label it was exported under (`spec.md` Design Notes, "Polymorphic
    /// keys").
    pub fn from_base58(encoded: &str, algorithm: Algorithm) -> Result<Self> {
        if encoded.is_empty() {
            return Err(Error::EmptyKey("public key base58 is empty".into()));
        }
        let der = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| Error::InvalidKey(format!("invalid base58: {e}")))?;
        match algorithm {
            Algorithm::Rsa2048 => Ok(Self {
                algorithm,
                inner: PublicInner::Rsa(rsa::public_key_from_pkix_der(&der)?),
            }),
            Algorithm::EcdsaP256 => Ok(Self {
                algorithm,
                inner: PublicInner::Ecdsa(ecdsa::verifying_key_from_pkix_der(&der)?),
            }),
        }
    }

    /// Parses a public key from its PEM encoding. RSA accepts either block
    /// label `spec.md` §9 requires a reader accept — the source's
    /// idiosyncratic `RSA PUBLIC KEY` (PKIX bytes despite the PKCS#1-looking
    /// label) or the standard `PUBLIC KEY` — and always parses the DER as
    /// PKIX `SubjectPublicKeyInfo` regardless of which label was declared.
    /// ECDSA accepts only `PUBLIC KEY`, the sole label this crate ever
    /// writes for it (`DESIGN.md`, `src/kms/` grounding notes).
    pub fn from_pem(encoded: &str, algorithm: Algorithm) -> Result<Self> {
        match algorithm {
            Algorithm::Rsa2048 => Ok(Self {
                algorithm,
                inner: PublicInner::Rsa(rsa::public_key_from_pem(encoded)?),
            }),
            Algorithm::EcdsaP256 => Ok(Self {
                algorithm,
                inner: PublicInner::Ecdsa(ecdsa::verifying_key_from_pem(encoded)?),
            }),
        }
    }

    /// The algorithm this public key was parsed for.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        match &self.inner {
            PublicInner::Rsa(pk) => rsa::verify(pk, message, signature),
            PublicInner::Ecdsa(pk) => ecdsa::verify(pk, message, signature),
        }
    }

    /// Encrypts `plaintext` with RSAES-OAEP/SHA-512. Returns
    /// [`Error::InvalidInput`] for an ECDSA public key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            PublicInner::Rsa(pk) => rsa::encrypt(pk, plaintext),
            PublicInner::Ecdsa(_) => {
                Err(Error::InvalidInput("ECDSA keys do not support encryption".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdsa_round_trip_sign_verify() {
        let kp = KeyPair::generate(Algorithm::EcdsaP256).unwrap();
        let msg = b"hello did";
        let sig = kp.sign(msg).unwrap();
        let pk = PublicKey::from_base58(kp.public_base58(), Algorithm::EcdsaP256).unwrap();
        assert!(pk.verify(msg, &sig).unwrap());
    }

    #[test]
    fn rsa_round_trip_encrypt_decrypt() {
        let kp = KeyPair::generate(Algorithm::Rsa2048).unwrap();
        let plaintext = b"challenge-plaintext";
        let pk = PublicKey::from_base58(kp.public_base58(), Algorithm::Rsa2048).unwrap();
        let ciphertext = pk.encrypt(plaintext).unwrap();
        let decrypted = kp.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn rsa_round_trip_sign_verify() {
        let kp = KeyPair::generate(Algorithm::Rsa2048).unwrap();
        let msg = b"sign me";
        let sig = kp.sign(msg).unwrap();
        let pk = PublicKey::from_base58(kp.public_base58(), Algorithm::Rsa2048).unwrap();
        assert!(pk.verify(msg, &sig).unwrap());
    }

    #[test]
    fn pem_round_trips_back_to_an_equivalent_key() {
        let kp = KeyPair::generate(Algorithm::EcdsaP256).unwrap();
        let imported = KeyPair::import_pem(kp.private_pem(), Algorithm::EcdsaP256).unwrap();
        assert_eq!(kp.public_base58(), imported.public_base58());
    }

    #[test]
    fn ecdsa_key_rejects_encryption() {
        let kp = KeyPair::generate(Algorithm::EcdsaP256).unwrap();
        assert!(kp.decrypt(b"anything").is_err());
    }

    #[test]
    fn public_key_from_pem_round_trips_for_both_algorithms() {
        let rsa_kp = KeyPair::generate(Algorithm::Rsa2048).unwrap();
        let rsa_pk = PublicKey::from_pem(rsa_kp.public_pem(), Algorithm::Rsa2048).unwrap();
        let msg = b"pem import";
        let sig = rsa_kp.sign(msg).unwrap();
        assert!(rsa_pk.verify(msg, &sig).unwrap());

        let ecdsa_kp = KeyPair::generate(Algorithm::EcdsaP256).unwrap();
        let ecdsa_pk = PublicKey::from_pem(ecdsa_kp.public_pem(), Algorithm::EcdsaP256).unwrap();
        let sig = ecdsa_kp.sign(msg).unwrap();
        assert!(ecdsa_pk.verify(msg, &sig).unwrap());
    }
}
