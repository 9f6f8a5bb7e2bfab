//! Port abstraction for post persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Post, PostDraft, PostId, PostSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Persistence of blog posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts with their author's username, newest first.
    async fn list_recent(&self) -> Result<Vec<PostSummary>, PostPersistenceError>;

    /// Fetch a single post.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a post and return its id.
    async fn insert(
        &self,
        author_id: UserId,
        draft: &PostDraft,
        created_at: DateTime<Utc>,
    ) -> Result<PostId, PostPersistenceError>;

    /// Overwrite title and body. Returns `false` when no row matched.
    async fn update(&self, id: PostId, draft: &PostDraft) -> Result<bool, PostPersistenceError>;

    /// Delete a post. Returns `false` when no row matched.
    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError>;
}
