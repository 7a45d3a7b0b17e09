//! Minimal PEM text armor.
//!
//! The RustCrypto PEM traits (`pkcs1`, `pkcs8`, `sec1`) always pair a DER
//! payload with the label that actually matches its contents. The source
//! this spec was distilled from labels its RSA public key PEM block
//! `RSA PUBLIC KEY` even though the bytes inside are PKIX
//! `SubjectPublicKeyInfo`, not a PKCS#1 `RSAPublicKey` (`did/core/dkms.go`,
//! `ExportPublicKeyAsPEM`) — there is no crate flag for "encode this DER as
//! that label", so this module does the RFC 1421 text framing by hand.

use base64ct::{Base64, Encoding};

use crate::error::{Error, Result};

/// Wraps `der` in a PEM block labelled `label`.
#[must_use]
pub fn encode(label: &str, der: &[u8]) -> String {
    let body = Base64::encode_string(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    for line in body.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(line).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

/// Parses a PEM block, returning its label and decoded DER bytes.
pub fn decode(pem: &str) -> Result<(String, Vec<u8>)> {
    let pem = pem.trim();
    let first_line_end = pem
        .find('\n')
        .ok_or_else(|| Error::InvalidKey("PEM has no header line".into()))?;
    let first_line = pem[..first_line_end].trim();
    let label = first_line
        .strip_prefix("-----BEGIN ")
        .and_then(|s| s.strip_suffix("-----"))
        .ok_or_else(|| Error::InvalidKey("malformed PEM header".into()))?;

    let end_marker = format!("-----END {label}-----");
    let end_pos = pem
        .find(&end_marker)
        .ok_or_else(|| Error::InvalidKey("malformed PEM footer".into()))?;

    let body: String = pem[first_line_end + 1..end_pos]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let der = Base64::decode_vec(&body).map_err(|e| Error::InvalidKey(format!("bad PEM body: {e}")))?;
    Ok((label.to_string(), der))
}
