//! Loggable identity for the session cookie key.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const DIGEST_PREFIX: usize = 8;

/// Short hex digest of the master key.
///
/// Two servers that print the same value can read each other's session
/// cookies. The digest reveals nothing usable about the key itself.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use blog::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let printed = key_fingerprint(&Key::generate());
/// assert_eq!(printed.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.master());
    digest
        .get(..DIGEST_PREFIX)
        .map(hex::encode)
        .unwrap_or_default()
}
