//! JWS `alg` header values (`spec.md` §3, "Signed Token").

use serde::{Deserialize, Serialize};

use crate::kms;

/// The two JWS algorithms this crate signs or verifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// ECDSA P-256 over SHA-256, used for VC/VP signing (`spec.md` §4.7/§4.8).
    #[serde(rename = "ES256")]
    Es256,
    /// RSASSA-PKCS1-v1_5 with SHA-256, used by the legacy simple-presentation
    /// challenge path when the claimant holds an RSA key (`spec.md` §3).
    #[serde(rename = "RS256")]
    Rs256,
}

impl Algorithm {
    /// The key-management algorithm that backs this JWS algorithm.
    #[must_use]
    pub const fn kms_algorithm(self) -> kms::Algorithm {
        match self {
            Self::Es256 => kms::Algorithm::EcdsaP256,
            Self::Rs256 => kms::Algorithm::Rsa2048,
        }
    }

    /// The JWS registered name, e.g. `"ES256"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es256 => "ES256",
            Self::Rs256 => "RS256",
        }
    }
}

impl From<kms::Algorithm> for Algorithm {
    fn from(algorithm: kms::Algorithm) -> Self {
        match algorithm {
            kms::Algorithm::EcdsaP256 => Self::Es256,
            kms::Algorithm::Rsa2048 => Self::Rs256,
        }
    }
}
