//! Mapping from port failures to transport-agnostic domain errors.

use crate::domain::Error;
use crate::domain::ports::{
    PasswordHashError, PostPersistenceError, SessionClaimsError, UserPersistenceError,
};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::UniqueViolation { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

pub(crate) fn map_post_persistence_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

pub(crate) fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_session_claims_error(error: SessionClaimsError) -> Error {
    Error::internal(error.to_string())
}
