//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod password_hasher;
mod post_command;
mod post_repository;
mod session_claims;
mod user_repository;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::CredentialStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::{MockPostCommand, MockPostQuery};
pub use post_command::{PostCommand, PostQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use session_claims::MockSessionClaims;
pub use session_claims::{SessionClaims, SessionClaimsError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
