//! Credential store backed by the user repository and a password hasher.
//!
//! Username uniqueness is left to the storage constraint: registration
//! inserts directly and translates the write conflict, so two concurrent
//! registrations for one name cannot both succeed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::port_error_mapping::{map_password_hash_error, map_user_persistence_error};
use crate::domain::ports::{CredentialStore, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{AuthError, Credentials, NewUser, UserId, Username};

/// [`CredentialStore`] implementation over driven ports.
#[derive(Clone)]
pub struct CredentialService<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: ?Sized, H: ?Sized> CredentialService<U, H> {
    /// Create a credential store from a user repository and a hasher.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use blog::domain::CredentialService;
    /// # use blog::domain::ports::CredentialStore;
    /// # use blog::outbound::password::Argon2PasswordHasher;
    /// # use blog::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("instance/blog.sqlite")).await?;
    /// let store = CredentialService::new(
    ///     Arc::new(DieselUserRepository::new(pool)),
    ///     Arc::new(Argon2PasswordHasher::default()),
    /// );
    /// let id = store.register("alice", "secret").await?;
    /// assert_eq!(store.verify("alice", "secret").await?, id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> CredentialStore for CredentialService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let credentials = Credentials::try_from_parts(username, password)?;
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .map_err(map_password_hash_error)?;
        let new_user = NewUser {
            username: credentials.username().clone(),
            password_hash,
        };

        match self.users.insert(&new_user).await {
            Ok(user_id) => {
                info!(%user_id, username = %new_user.username, "user registered");
                Ok(user_id)
            }
            Err(UserPersistenceError::UniqueViolation { .. }) => {
                info!(username = %new_user.username, "registration rejected: username taken");
                Err(AuthError::duplicate_username(new_user.username.as_ref()))
            }
            Err(error) => Err(map_user_persistence_error(error).into()),
        }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let Ok(username) = Username::new(username) else {
            return Err(AuthError::UnknownUser);
        };

        let Some(stored) = self
            .users
            .find_credentials(&username)
            .await
            .map_err(map_user_persistence_error)?
        else {
            warn!(%username, "login failed: unknown user");
            return Err(AuthError::UnknownUser);
        };

        let matches = self
            .hasher
            .verify(password, &stored.password_hash)
            .map_err(map_password_hash_error)?;
        if !matches {
            warn!(%username, user_id = %stored.user_id, "login failed: bad password");
            return Err(AuthError::BadPassword);
        }

        info!(%username, user_id = %stored.user_id, "login succeeded");
        Ok(stored.user_id)
    }
}

#[cfg(test)]
mod tests;
