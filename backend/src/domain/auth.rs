//! Authentication primitives: credentials, stored password hashes and the
//! authentication failure taxonomy.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde_json::json;
use zeroize::Zeroizing;

use super::{Error, UserId, Username};

/// Form fields that must be present for an operation to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// Login name on the auth forms.
    Username,
    /// Password on the auth forms.
    Password,
    /// Post title.
    Title,
}

impl RequiredField {
    /// Form field name as submitted by the browser.
    pub fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Title => "Title",
        };
        f.write_str(label)
    }
}

/// Recoverable authentication failures.
///
/// Every variant except [`AuthError::Backend`] is shown to the user as a form
/// message. `Backend` carries infrastructure failures that must not be
/// rendered as a credential problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// A required form field was blank.
    #[error("{field} is required.")]
    MissingField {
        /// The blank field.
        field: RequiredField,
    },
    /// Registration picked a taken username.
    #[error("User {username} is already registered.")]
    DuplicateUsername {
        /// The taken name.
        username: String,
    },
    /// Login named an account that does not exist.
    #[error("Incorrect username.")]
    UnknownUser,
    /// Login gave the wrong password.
    #[error("Incorrect password.")]
    BadPassword,
    /// The session names an account that no longer exists.
    #[error("Your session has expired. Please log in again.")]
    StaleSession,
    /// Storage or hashing failed.
    #[error(transparent)]
    Backend(#[from] Error),
}

impl AuthError {
    /// A required form field was blank.
    pub fn missing_field(field: RequiredField) -> Self {
        Self::MissingField { field }
    }

    /// The username is already taken.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    /// Stable snake_case identifier reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::DuplicateUsername { .. } => "duplicate_username",
            Self::UnknownUser => "unknown_user",
            Self::BadPassword => "bad_password",
            Self::StaleSession => "stale_session",
            Self::Backend(_) => "backend",
        }
    }

    /// Form field the failure relates to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } => Some(field.name()),
            Self::DuplicateUsername { .. } | Self::UnknownUser => Some("username"),
            Self::BadPassword => Some("password"),
            Self::StaleSession | Self::Backend(_) => None,
        }
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        let details = match value.field() {
            Some(field) => json!({ "field": field, "code": value.code() }),
            None => json!({ "code": value.code() }),
        };
        let message = value.to_string();
        match value {
            AuthError::Backend(error) => error,
            AuthError::MissingField { .. } => Error::invalid_request(message).with_details(details),
            AuthError::DuplicateUsername { .. } => Error::conflict(message).with_details(details),
            AuthError::UnknownUser | AuthError::BadPassword | AuthError::StaleSession => {
                Error::unauthorized(message).with_details(details)
            }
        }
    }
}

/// Validated registration credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming. It is
///   checked before the password.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use blog::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "secret").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AuthError> {
        let username = Username::new(username)
            .map_err(|_| AuthError::missing_field(RequiredField::Username))?;
        if password.is_empty() {
            return Err(AuthError::missing_field(RequiredField::Password));
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Encoded one-way password hash (PHC string format).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an already encoded PHC string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// User row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: Username,
    /// Digest of the chosen password.
    pub password_hash: PasswordDigest,
}

/// Identifier and password hash looked up by username for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the credentials belong to.
    pub user_id: UserId,
    /// Digest to verify against.
    pub password_hash: PasswordDigest,
}
