//! Blog post data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Error, RequiredField, UserId, Username};

/// Validation errors returned by [`PostDraft::try_from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The title was blank.
    #[error("{} is required.", RequiredField::Title)]
    MissingTitle,
}

impl From<PostValidationError> for Error {
    fn from(value: PostValidationError) -> Self {
        match value {
            PostValidationError::MissingTitle => Error::invalid_request(value.to_string())
                .with_details(json!({
                    "field": RequiredField::Title.name(),
                    "code": "missing_field",
                })),
        }
    }
}

/// Storage-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw row id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row id.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title and body submitted through the create and update forms.
///
/// ## Invariants
/// - `title` is not blank. It is stored as submitted.
/// - `body` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    body: String,
}

impl PostDraft {
    /// Validate raw form values.
    ///
    /// # Examples
    /// ```
    /// use blog::domain::PostDraft;
    ///
    /// let draft = PostDraft::try_from_parts("Hello", "").expect("title present");
    /// assert_eq!(draft.title(), "Hello");
    /// assert!(PostDraft::try_from_parts(" ", "body").is_err());
    /// ```
    pub fn try_from_parts(title: &str, body: &str) -> Result<Self, PostValidationError> {
        if title.trim().is_empty() {
            return Err(PostValidationError::MissingTitle);
        }
        Ok(Self {
            title: title.to_owned(),
            body: body.to_owned(),
        })
    }

    /// Validated title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Body text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}

/// Persisted post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Row id.
    pub id: PostId,
    /// Account that wrote the post.
    pub author_id: UserId,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Creation time, set by the service.
    pub created_at: DateTime<Utc>,
}

/// Post joined with its author's username, as listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// Author's username.
    pub username: Username,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_title_is_rejected(#[case] title: &str) {
        assert_eq!(
            PostDraft::try_from_parts(title, "body"),
            Err(PostValidationError::MissingTitle)
        );
    }

    #[rstest]
    fn empty_body_is_accepted() {
        let draft = PostDraft::try_from_parts("Title", "").expect("valid draft");
        assert_eq!(draft.title(), "Title");
        assert_eq!(draft.body(), "");
    }

    #[rstest]
    fn missing_title_maps_to_invalid_request() {
        let error = Error::from(PostValidationError::MissingTitle);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Title is required.");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "title", "code": "missing_field" }))
        );
    }

    #[rstest]
    fn summary_flattens_post_fields() {
        let summary = PostSummary {
            post: Post {
                id: PostId::new(1),
                author_id: UserId::new(2),
                title: "Hello".to_owned(),
                body: "World".to_owned(),
                created_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            username: Username::new("alice").expect("valid username"),
        };
        let value = serde_json::to_value(&summary).expect("serialise summary");
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["author_id"], 2);
        assert_eq!(value["username"], "alice");
    }
}
