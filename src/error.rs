//! # Error Taxonomy
//!
//! A closed set of stable error codes surfaced to callers. Every public
//! operation in this crate maps its failure modes into one of these six
//! variants; the message carried alongside is free-form and intended for
//! logs, never for control flow — machine clients branch on [`ErrorCode`].

use thiserror::Error;

/// Stable, closed enumeration of error codes a caller can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed DID, unknown generation rule, wrong JWS algorithm, bad
    /// JSON, missing required field.
    InvalidInput,
    /// DID with no document; document with no authentication entries.
    NotFound,
    /// Document present but the authentication key is an empty string.
    EmptyKey,
    /// Key bytes unparsable, or encoding mismatch between PEM block and
    /// algorithm.
    InvalidKey,
    /// Method driver or store reported failure; deadline elapsed.
    UpstreamError,
    /// Invariant violated that should have been impossible.
    InternalError,
}

/// Errors surfaced by this crate's public API.
#[derive(Error, Debug)]
pub enum Error {
    /// See [`ErrorCode::InvalidInput`].
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// See [`ErrorCode::NotFound`].
    #[error("not found: {0}")]
    NotFound(String),

    /// See [`ErrorCode::EmptyKey`].
    #[error("empty key: {0}")]
    EmptyKey(String),

    /// See [`ErrorCode::InvalidKey`].
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// See [`ErrorCode::UpstreamError`].
    #[error("upstream error: {0}")]
    UpstreamError(String),

    /// See [`ErrorCode::InternalError`]. Carries the original error from an
    /// internal helper that should have been impossible to fail.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// The stable code a machine caller should branch on.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::EmptyKey(_) => ErrorCode::EmptyKey,
            Self::InvalidKey(_) => ErrorCode::InvalidKey,
            Self::UpstreamError(_) => ErrorCode::UpstreamError,
            Self::InternalError(_) => ErrorCode::InternalError,
        }
    }

    /// Wrap an upstream collaborator's failure (method driver, document
    /// store, deadline) as `upstream_error` with the original message
    /// attached, per the error-handling design (`spec.md` §7): public
    /// boundaries translate raw errors from external collaborators rather
    /// than remapping internal helper errors.
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::UpstreamError(err.to_string())
    }

    /// Wrap a violated invariant that should have been impossible.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

/// Convenience alias used throughout the public API.
pub type Result<T> = std::result::Result<T, Error>;
