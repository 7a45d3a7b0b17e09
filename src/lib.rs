//! A self-sovereign identity credential engine: DID creation and
//! resolution, Verifiable Credential and Verifiable Presentation issuance
//! and verification, and two holder-authentication challenge protocols.
//!
//! This crate is deliberately not an HTTP service — it is the engine an
//! embedder wires behind whatever transport and persistence it already
//! runs. [`did::store::DocumentStore`] and [`did::registry::MethodDriver`]
//! are the seams an embedder implements; [`did::store::InMemoryStore`] is
//! the only concrete store shipped here, gated behind the
//! `in-memory-store` feature for tests and small deployments.
//!
//! # Feature Flags
//!
//! * `in-memory-store` — enables [`did::store::InMemoryStore`], a
//!   `tokio::sync::Mutex`-backed [`did::store::DocumentStore`] suitable for
//!   tests and single-process deployments.

pub mod challenge;
pub mod core;
pub mod did;
pub mod error;
pub mod jose;
pub mod kms;
pub mod vc;
pub mod vp;

pub use crate::core::OneOrMany;
pub use crate::did::{Did, GenerationRule};
pub use crate::error::{Error, ErrorCode, Result};
pub use crate::kms::{Algorithm, KeyPair, PublicKey};
pub use crate::vc::{VcBuilder, VcClaims};
pub use crate::vp::{VerificationReport, VpBuilder, VpClaims};
