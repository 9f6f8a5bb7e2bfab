//! Driving port for registration and credential verification.
//!
//! Inbound adapters call it without knowing the backing infrastructure,
//! which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{AuthError, UserId};

/// Account registration and password verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account for `username`.
    ///
    /// Fails with [`AuthError::MissingField`] when the trimmed username or the
    /// password is empty (username first) and with
    /// [`AuthError::DuplicateUsername`] when the name is taken.
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError>;

    /// Check a username/password pair.
    ///
    /// Fails with [`AuthError::UnknownUser`] or [`AuthError::BadPassword`].
    /// Never writes.
    async fn verify(&self, username: &str, password: &str) -> Result<UserId, AuthError>;
}
