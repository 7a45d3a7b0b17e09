//! DID generation (C4).
//!
//! Grounded on `pkg/did/core/dids/document.go`'s `generateDID`: three rules
//! producing the method-specific identifier half of a [`Did`](super::Did).

use sha2::{Digest, Sha256};

use super::{Did, GenerationRule};
use crate::core::generate::random_hex;
use crate::error::Result;

/// Produces `did:<method>:<mid>` for `method` under `rule`, deriving `mid`
/// from `public_key_base58` when the rule is content-addressed.
pub fn generate(public_key_base58: &str, method: &str, rule: GenerationRule) -> Result<Did> {
    let mid = match rule {
        GenerationRule::Hexdigit => random_hex(20),
        GenerationRule::Uuid => uuid::Uuid::new_v4().to_string(),
        GenerationRule::Base58 => {
            let digest = Sha256::digest(public_key_base58.as_bytes());
            bs58::encode(digest).into_string()
        }
    };
    let did = Did::parse(format!("did:{method}:{mid}"))?;
    tracing::debug!(did = %did, rule = ?rule, "generated DID");
    Ok(did)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexdigit_rule_yields_forty_hex_chars() {
        let did = generate("ignored", "byd50", GenerationRule::Hexdigit).unwrap();
        assert_eq!(did.mid().len(), 40);
        assert!(did.mid().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uuid_rule_yields_a_parseable_uuid() {
        let did = generate("ignored", "byd50", GenerationRule::Uuid).unwrap();
        assert!(uuid::Uuid::parse_str(did.mid()).is_ok());
    }

    #[test]
    fn base58_rule_is_deterministic_in_the_public_key() {
        let a = generate("samekey", "byd50", GenerationRule::Base58).unwrap();
        let b = generate("samekey", "byd50", GenerationRule::Base58).unwrap();
        assert_eq!(a.mid(), b.mid());

        let c = generate("otherkey", "byd50", GenerationRule::Base58).unwrap();
        assert_ne!(a.mid(), c.mid());
    }

    #[test]
    fn every_rule_produces_a_well_formed_did() {
        for rule in [GenerationRule::Hexdigit, GenerationRule::Uuid, GenerationRule::Base58] {
            let did = generate("pk", "byd50", rule).unwrap();
            assert!(did.as_str().starts_with("did:byd50:"));
        }
    }
}
