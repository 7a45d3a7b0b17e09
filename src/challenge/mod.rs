//! # Challenge-Response Authentication Protocols (C9)
//!
//! Two low-level flows that authenticate "a holder of a DID" without
//! touching the VC/VP pipeline, grounded on `did/pkg/controller/
//! controller.go`'s `GetAuthChallengeString`/`GetAuthResponseString` and
//! `GetSimplePresent`/`VerifySimplePresent`.

pub mod encrypted;
pub mod simple;

use crate::error::Result;
use crate::kms::{Algorithm, PublicKey};

/// Parses a public key whose algorithm isn't carried alongside the Base58
/// string, for the one protocol (`simple`) the source describes as usable
/// with "any algorithm" despite the source's own `PvKeySign`/`PbKeyVerify`
/// being RSA-only (`algorithm.go`). DID authentication keys in this crate
/// are ordinarily ECDSA (`jose::jws` signs VC/VP with `ES256` exclusively),
/// so ECDSA is tried first; RSA is the fallback for callers who issued an
/// RSA key pair as a bare authentication key outside the VC/VP pipeline.
fn any_algorithm_public_key(public_key_base58: &str) -> Result<PublicKey> {
    PublicKey::from_base58(public_key_base58, Algorithm::EcdsaP256)
        .or_else(|_| PublicKey::from_base58(public_key_base58, Algorithm::Rsa2048))
}
