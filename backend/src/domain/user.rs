//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The username was blank.
    EmptyUsername,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Storage-assigned user identifier.
///
/// This is also the value carried by the `user_id` session claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw row id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer key as stored in the `user` table.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name, unique across users.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed.
/// - Must not be empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use blog::domain::Username;
    ///
    /// let name = Username::new("  alice ").expect("valid username");
    /// assert_eq!(name.as_ref(), "alice");
    /// assert!(Username::new("   ").is_err());
    /// ```
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Resolved user record.
///
/// The password hash never leaves the credential path, so a `User` is safe
/// to hand to templates and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Pair an id with its username.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Row id.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }
}
