//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and the authentication and blog
//! use-cases independently of HTTP and SQL. Adapters live in `inbound` and
//! `outbound` and talk to this module only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User / UserId / Username: resolved account identity.
//! - AuthError / Credentials: authentication taxonomy and validated input.
//! - Post / PostDraft / PostSummary: blog entries.
//! - CredentialService: registration and verification.
//! - PrincipalResolver: session claim to user resolution.
//! - guard / Access: gate for operations that need a user.
//! - BlogService: post CRUD with author checks.

pub mod access;
pub mod auth;
pub mod blog_service;
pub mod credential_service;
pub mod error;
mod port_error_mapping;
pub mod ports;
pub mod post;
pub mod principal;
pub mod trace_id;
pub mod user;

pub use self::access::{Access, guard};
pub use self::auth::{
    AuthError, Credentials, NewUser, PasswordDigest, RequiredField, StoredCredentials,
};
pub use self::blog_service::BlogService;
pub use self::credential_service::CredentialService;
pub use self::error::{Error, ErrorCode};
pub use self::post::{Post, PostDraft, PostId, PostSummary, PostValidationError};
pub use self::principal::PrincipalResolver;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError, Username};

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use blog::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
