//! Port over the per-request session claim map.
//!
//! The HTTP adapter implements this on top of the cookie session so the
//! principal resolver can be exercised without a web framework.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised while reading or writing session claims.
    pub enum SessionClaimsError {
        /// The session could not be read.
        Read { message: String } => "failed to read session: {message}",
        /// The session could not be written.
        Write { message: String } => "failed to persist session: {message}",
    }
}

/// Read and write access to the `user_id` claim of a session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionClaims {
    /// The `user_id` claim, if present and well formed.
    fn user_id(&self) -> Result<Option<UserId>, SessionClaimsError>;

    /// Store the `user_id` claim.
    fn set_user_id(&self, user_id: UserId) -> Result<(), SessionClaimsError>;

    /// Remove every claim.
    fn clear(&self);

    /// Rotate the session identity while keeping its claims.
    fn renew(&self);
}
