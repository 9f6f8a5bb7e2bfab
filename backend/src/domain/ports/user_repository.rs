//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, StoredCredentials, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already held by another row.
        UniqueViolation { username: String } => "username {username} is already taken",
    }
}

/// Persistence of user accounts and their password digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user row and return its storage-assigned id.
    ///
    /// A username clash is reported as
    /// [`UserPersistenceError::UniqueViolation`] by the storage constraint;
    /// callers must not check for existence first.
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the id and password hash stored for `username`.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}
