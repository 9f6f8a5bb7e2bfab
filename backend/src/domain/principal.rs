//! Session principal resolution.
//!
//! A session is either anonymous (no `user_id` claim) or authenticated. The
//! resolver turns the claim into a full [`User`] and owns the only two
//! transitions between those states: [`PrincipalResolver::establish`] after a
//! successful login and [`PrincipalResolver::clear`] on logout. A claim whose
//! user row has disappeared is purged and treated as anonymous.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::port_error_mapping::{map_session_claims_error, map_user_persistence_error};
use crate::domain::ports::{SessionClaims, UserRepository};
use crate::domain::{AuthError, Error, User, UserId};

/// Resolves and mutates the principal carried by a session.
#[derive(Clone)]
pub struct PrincipalResolver {
    users: Arc<dyn UserRepository>,
}

impl PrincipalResolver {
    /// Resolve principals against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Load the user named by the session's `user_id` claim.
    ///
    /// Returns `Ok(None)` for anonymous sessions and for stale claims. Stale
    /// claims are removed so the next request starts anonymous.
    pub async fn resolve(&self, claims: &dyn SessionClaims) -> Result<Option<User>, Error> {
        match self.load(claims).await {
            Ok(user) => Ok(user),
            Err(AuthError::StaleSession) => {
                claims.clear();
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Replace every prior claim with `user_id`, rotating the session.
    pub fn establish(&self, claims: &dyn SessionClaims, user_id: UserId) -> Result<(), Error> {
        claims.clear();
        claims.renew();
        claims
            .set_user_id(user_id)
            .map_err(map_session_claims_error)?;
        debug!(%user_id, "session established");
        Ok(())
    }

    /// Drop every claim, returning the session to anonymous.
    pub fn clear(&self, claims: &dyn SessionClaims) {
        claims.clear();
    }

    async fn load(&self, claims: &dyn SessionClaims) -> Result<Option<User>, AuthError> {
        let Some(user_id) = claims.user_id().map_err(map_session_claims_error)? else {
            return Ok(None);
        };

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?;
        match user {
            Some(user) => Ok(Some(user)),
            None => {
                let stale = AuthError::StaleSession;
                warn!(%user_id, code = stale.code(), "session refers to a missing user");
                Err(stale)
            }
        }
    }
}
