//! Random-token generation.
//!
//! Grounded on `pkg/did/core/algorithm.go`'s `RandomHex`/`RandomString` from
//! the source this spec was distilled from, reimplemented over a CSPRNG
//! (`rand::rngs::OsRng`) rather than the source's seeded `math/rand` use in
//! `RandomString` — the Go source draws `nonce` material from a
//! non-cryptographic PRNG, which this crate does not reproduce.

use rand::Rng;
use rand::rngs::OsRng;

/// The alphabet `RandomString` draws from in the source: lower + upper
/// case ASCII letters, digits, and a fixed punctuation set.
const NONCE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890!@#$%^&*()-=_+";

/// A random string of length `len` drawn from [`NONCE_ALPHABET`], used for
/// the VC `nonce` claim.
#[must_use]
pub fn nonce(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..NONCE_ALPHABET.len());
            NONCE_ALPHABET[idx] as char
        })
        .collect()
}

/// `n` CSPRNG bytes, lowercase hex-encoded. Backs the `hexdigit` DID
/// generation rule (`spec.md` §4.4).
#[must_use]
pub fn random_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    OsRng.fill(bytes.as_mut_slice());
    hex::encode(bytes)
}
