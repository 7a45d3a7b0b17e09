//! # JOSE Plumbing
//!
//! The compact-JWS subset the credential/presentation layer needs. Not a
//! numbered component in `spec.md`, but required by C7/C8 and flagged in the
//! teacher's own module plan (`crates/datasec/src/jose.rs` declares
//! `jwa`/`jwk`/`jws`/`jwt` submodules — this crate keeps that shape, minus
//! `jwk` since neither C7 nor C8 needs JWK serialization).

pub mod jwa;
pub mod jws;
pub mod jwt;
