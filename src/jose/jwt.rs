//! A typed view over a compact JWS.
//!
//! Thin convenience wrapper so callers working with a specific claims type
//! don't thread `serde_json::Value` through their own code, mirroring the
//! `jwt` submodule named alongside `jwa`/`jws` in
//! `examples/credibil-vc/crates/datasec/src/jose.rs`'s module plan.

use serde::de::DeserializeOwned;

use super::jwa::Algorithm;
use super::jws::{self, Header};
use crate::error::Result;

/// A compact JWS with its claims decoded as `T`.
#[derive(Debug)]
pub struct Jwt<T> {
    /// The protected header.
    pub header: Header,
    /// The decoded claims.
    pub claims: T,
}

impl<T: DeserializeOwned> Jwt<T> {
    /// Decodes `token`'s header and claims without checking the signature.
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let (header, payload) = jws::decode_unverified(token)?;
        let claims = serde_json::from_value(payload)
            .map_err(|e| crate::error::Error::InvalidInput(format!("bad claims: {e}")))?;
        Ok(Self { header, claims })
    }

    /// Decodes and verifies `token`, returning the typed claims.
    pub fn decode_verified(token: &str, public_key_base58: &str, algorithm: Algorithm) -> Result<Self> {
        let claims: T = jws::verify(token, public_key_base58, algorithm)?;
        let (header, _payload) = jws::decode_unverified(token)?;
        Ok(Self { header, claims })
    }
}
