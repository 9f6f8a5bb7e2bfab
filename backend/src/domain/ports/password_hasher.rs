//! Port for one-way password hashing.
//!
//! Hashing is CPU-bound and synchronous; adapters must salt every hash so
//! equal passwords never produce equal digests.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Producing a new hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted one-way hashing of login passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `password` against a stored digest.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError>;
}
