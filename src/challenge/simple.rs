//! Simple signed presentation (`spec.md` §4.9(b)).
//!
//! Wire format `<DID>;<RFC3339-UTC-timestamp>;<signature-base64>`, fixed
//! 10-second window. Grounded on `did/pkg/controller/controller.go`'s
//! `GetSimplePresent`/`VerifySimplePresent`.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use super::any_algorithm_public_key;
use crate::did::resolver::Resolver;
use crate::did::Did;
use crate::error::Result;
use crate::kms::{self, KeyPair};

/// Half the verification window: a presentation is accepted iff
/// `|now - t| < WINDOW` (`spec.md` §8: "a simple presentation signed at
/// time `t` verifies iff `|now − t| < 10s`").
const WINDOW: TimeDelta = TimeDelta::seconds(10);

/// Forms `<did>;<timestamp>` and signs it with `key`, returning the full
/// `<did>;<timestamp>;<signature-base64>` presentation.
pub fn sign(did: &Did, key: &KeyPair) -> Result<String> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let message = format!("{did};{timestamp}");
    let signature = key.sign(message.as_bytes())?;
    Ok(format!("{message};{}", kms::base64_standard(&signature)))
}

/// The closed outcome set of `spec.md` §4.9(b).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimpleOutcome {
    /// Signature verified and the timestamp is within the window.
    Success,
    /// The timestamp is outside the 10-second window; the signature is not
    /// checked.
    TimeOut,
    /// Malformed presentation, or the signature does not verify.
    Fail,
}

/// Splits `presentation` on `;`, checks the timestamp window, resolves the
/// claimant's public key, and verifies the signature over
/// `<did>;<timestamp>`.
///
/// Resolver failures (unregistered method, no document) propagate as
/// `Err`; every other failure mode collapses into
/// [`SimpleOutcome::Fail`], matching the closed three-outcome result this
/// protocol returns to its caller.
pub async fn verify(presentation: &str, resolver: &Resolver, now: DateTime<Utc>) -> Result<SimpleOutcome> {
    let mut parts = presentation.splitn(3, ';');
    let (Some(did_str), Some(timestamp_str), Some(signature_b64)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Ok(SimpleOutcome::Fail);
    };

    let Ok(did) = Did::parse(did_str) else {
        return Ok(SimpleOutcome::Fail);
    };
    let Ok(timestamp) = DateTime::parse_from_rfc3339(timestamp_str) else {
        return Ok(SimpleOutcome::Fail);
    };
    let timestamp = timestamp.with_timezone(&Utc);

    if (now - timestamp).abs() >= WINDOW {
        return Ok(SimpleOutcome::TimeOut);
    }

    let Ok(signature) = kms::from_base64_standard(signature_b64) else {
        return Ok(SimpleOutcome::Fail);
    };
    let public_key_base58 = resolver.public_key_of(&did, "").await?;
    let Ok(public_key) = any_algorithm_public_key(&public_key_base58) else {
        return Ok(SimpleOutcome::Fail);
    };

    let message = format!("{did_str};{timestamp_str}");
    match public_key.verify(message.as_bytes(), &signature) {
        Ok(true) => Ok(SimpleOutcome::Success),
        _ => Ok(SimpleOutcome::Fail),
    }
}
