//! # Core Claim-Value Helpers
//!
//! The source's `map[string]interface{}` claim body boiled down to a handful
//! of recurring shapes. The one this crate models explicitly is the
//! "string, or array of strings" duality that `aud` and
//! `verifiableCredential` both exhibit — [`OneOrMany`] normalizes it at the
//! serde boundary so the rest of the crate can work with a `Vec<T>` and not
//! worry about which shape a given token was serialized in.

pub mod generate;

use serde::{Deserialize, Serialize};

/// A value that serializes as either a single `T` or an array of `T`,
/// deserializing either shape back into the same representation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// An array of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns the values as an iterator regardless of which shape was used
    /// on the wire.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        match self {
            Self::One(t) => std::slice::from_ref(t).iter(),
            Self::Many(v) => v.iter(),
        }
    }

    /// Returns `true` if `value` is present among the wrapped values.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// The number of values wrapped.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    /// `true` if there are no wrapped values (only reachable via `Many(vec![])`).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(v) => v.is_empty(),
        }
    }

    /// Converts into a `Vec<T>` regardless of which shape was used.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(t) => vec![t],
            Self::Many(v) => v,
        }
    }

    /// Always-array form, per `spec.md` §9's guidance that new encoders
    /// SHOULD always emit arrays even though decoders must accept either
    /// shape.
    pub fn into_many(self) -> Self {
        Self::Many(self.into_vec())
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_shapes() {
        let one: OneOrMany<String> = serde_json::from_str(r#""did:byd50:abc""#).unwrap();
        assert_eq!(one, OneOrMany::One("did:byd50:abc".to_string()));

        let many: OneOrMany<String> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many, OneOrMany::Many(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn contains_checks_either_shape() {
        let one = OneOrMany::One("aud-1".to_string());
        assert!(one.contains(&"aud-1".to_string()));
        assert!(!one.contains(&"aud-2".to_string()));

        let many = OneOrMany::Many(vec!["aud-1".to_string(), "aud-2".to_string()]);
        assert!(many.contains(&"aud-2".to_string()));
    }

    #[test]
    fn into_many_always_serializes_as_array() {
        let one = OneOrMany::One("x".to_string()).into_many();
        let json = serde_json::to_string(&one).unwrap();
        assert_eq!(json, r#"["x"]"#);
    }
}
