//! Compact JWS encode/decode/verify.
//!
//! Grounded on `pkg/did/core/byd50-jwt/vc-jwt.go`'s `CreateVc`/`VerifyVc`:
//! header carries `alg` and `kid`, `kid` is the signer's DID, and on verify
//! the public key is Base58-decoded then parsed as PKIX before the
//! signature check (`spec.md` §3/§4.7 step 3).

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::jwa::Algorithm;
use crate::error::{Error, Result};
use crate::kms::{KeyPair, PublicKey};

/// The JWS protected header this crate produces and expects.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Header {
    /// The signing algorithm.
    pub alg: Algorithm,
    /// The signer's DID.
    pub kid: String,
}

/// Signs `claims` with `key`, setting `kid` in the protected header.
pub fn encode<T: Serialize>(claims: &T, kid: &str, key: &KeyPair) -> Result<String> {
    let header = Header { alg: key.algorithm().into(), kid: kid.to_string() };
    let header_json = serde_json::to_vec(&header).map_err(Error::internal)?;
    let payload_json = serde_json::to_vec(claims).map_err(Error::internal)?;

    let header_b64 = Base64UrlUnpadded::encode_string(&header_json);
    let payload_b64 = Base64UrlUnpadded::encode_string(&payload_json);
    let signing_input = format!("{header_b64}.{payload_b64}");

    let signature = key.sign(signing_input.as_bytes())?;
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Splits `token` into its three segments without checking the signature.
fn split(token: &str) -> Result<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(Error::InvalidInput("not a compact JWS (expected 3 segments)".into())),
    }
}

/// Parses `token`'s header and payload without checking the signature,
/// used to read `kid`/`alg` before a key has been resolved (`spec.md` §4.7
/// step 1).
pub fn decode_unverified(token: &str) -> Result<(Header, serde_json::Value)> {
    let (header_b64, payload_b64, _signature_b64) = split(token)?;

    let header_bytes = Base64UrlUnpadded::decode_vec(header_b64)
        .map_err(|e| Error::InvalidInput(format!("bad JWS header encoding: {e}")))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|e| Error::InvalidInput(format!("bad JWS header: {e}")))?;

    let payload_bytes = Base64UrlUnpadded::decode_vec(payload_b64)
        .map_err(|e| Error::InvalidInput(format!("bad JWS payload encoding: {e}")))?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| Error::InvalidInput(format!("bad JWS payload: {e}")))?;

    Ok((header, payload))
}

/// Decodes `token`'s payload into `T` without checking the signature.
pub fn decode_claims_unverified<T: DeserializeOwned>(token: &str) -> Result<T> {
    let (_header, payload) = decode_unverified(token)?;
    serde_json::from_value(payload).map_err(|e| Error::InvalidInput(format!("bad claims: {e}")))
}

/// Full decode and signature check: decodes Base58 then parses PKIX
/// (`spec.md` §4.1), verifies the signature over `header.payload`, and
/// returns the parsed claims.
pub fn verify<T: DeserializeOwned>(
    token: &str,
    public_key_base58: &str,
    algorithm: Algorithm,
) -> Result<T> {
    let (header_b64, payload_b64, signature_b64) = split(token)?;

    let signature = Base64UrlUnpadded::decode_vec(signature_b64)
        .map_err(|e| Error::InvalidInput(format!("bad JWS signature encoding: {e}")))?;
    let public_key = PublicKey::from_base58(public_key_base58, algorithm.kms_algorithm())?;

    let signing_input = format!("{header_b64}.{payload_b64}");
    if !public_key.verify(signing_input.as_bytes(), &signature)? {
        return Err(Error::InvalidInput("JWS signature verification failed".into()));
    }

    let payload_bytes = Base64UrlUnpadded::decode_vec(payload_b64)
        .map_err(|e| Error::InvalidInput(format!("bad JWS payload encoding: {e}")))?;
    serde_json::from_slice(&payload_bytes)
        .map_err(|e| Error::InvalidInput(format!("bad claims: {e}")))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::kms::Algorithm as KmsAlgorithm;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Claims {
        sub: String,
    }

    #[test]
    fn encode_then_verify_round_trips() {
        let key = KeyPair::generate(KmsAlgorithm::EcdsaP256).unwrap();
        let claims = Claims { sub: "did:byd50:holder".into() };
        let token = encode(&claims, "did:byd50:issuer", &key).unwrap();

        let decoded: Claims = verify(&token, key.public_base58(), Algorithm::Es256).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn decode_unverified_reads_kid_without_checking_signature() {
        let key = KeyPair::generate(KmsAlgorithm::EcdsaP256).unwrap();
        let claims = Claims { sub: "did:byd50:holder".into() };
        let token = encode(&claims, "did:byd50:issuer", &key).unwrap();

        let (header, _payload) = decode_unverified(&token).unwrap();
        assert_eq!(header.kid, "did:byd50:issuer");
        assert_eq!(header.alg, Algorithm::Es256);
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let key = KeyPair::generate(KmsAlgorithm::EcdsaP256).unwrap();
        let claims = Claims { sub: "did:byd50:holder".into() };
        let token = encode(&claims, "did:byd50:issuer", &key).unwrap();

        let mut segments: Vec<&str> = token.split('.').collect();
        let tampered_payload = Base64UrlUnpadded::encode_string(br#"{"sub":"did:byd50:attacker"}"#);
        segments[1] = &tampered_payload;
        let tampered = segments.join(".");

        let result: Result<Claims> = verify(&tampered, key.public_base58(), Algorithm::Es256);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_token_is_invalid_input() {
        let result: Result<Claims> = verify("not-a-jws", "irrelevant", Algorithm::Es256);
        assert_eq!(result.unwrap_err().code(), crate::error::ErrorCode::InvalidInput);
    }
}
