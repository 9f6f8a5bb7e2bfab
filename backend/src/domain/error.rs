//! The error every domain service returns.
//!
//! Nothing here knows about HTTP. The inbound adapter maps an [`ErrorCode`]
//! to a status and chooses between the JSON envelope and a re-rendered form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Failure category. Serialised in `snake_case` and stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation.
    InvalidRequest,
    /// No valid login, or the credentials were wrong.
    Unauthorized,
    /// Logged in, but the resource belongs to someone else.
    Forbidden,
    /// No row matches the id or name.
    NotFound,
    /// A unique value such as a username is already taken.
    Conflict,
    /// The database could not be reached.
    ServiceUnavailable,
    /// Anything unexpected. The message is hidden from clients.
    InternalError,
}

/// A categorised, client-presentable failure.
///
/// Built inside a request, it remembers that request's trace id.
///
/// ```
/// use blog::domain::{Error, ErrorCode};
///
/// let err = Error::conflict("User alice is already registered.");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.to_string(), "User alice is already registered.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

macro_rules! shorthand {
    ($($name:ident => $code:ident),+ $(,)?) => {
        $(
            #[doc = concat!("An [`ErrorCode::", stringify!($code), "`] error.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// An error of category `code`, tagged with the current trace id.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    shorthand! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Text safe to show the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Id of the request the error was raised in.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Machine-readable context, e.g. the offending field.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Overrides the captured trace id. Used when an error is rebuilt
    /// outside the request task.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// ```
    /// use blog::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("Title is required.").with_details(json!({"field": "title"}));
    /// assert_eq!(err.details(), Some(&json!({"field": "title"})));
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
