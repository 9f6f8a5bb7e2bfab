//! Driving ports for blog post use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostDraft, PostId, PostSummary, User};

/// Mutating post operations. Every call acts on behalf of `author`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    async fn create(&self, author: &User, draft: &PostDraft) -> Result<PostId, Error>;

    /// Fails with `NotFound` for a missing post and `Forbidden` when `author`
    /// did not write it.
    async fn update(&self, author: &User, id: PostId, draft: &PostDraft) -> Result<(), Error>;

    /// Same ownership rules as [`PostCommand::update`].
    async fn delete(&self, author: &User, id: PostId) -> Result<(), Error>;
}

/// Read-only post operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Every post, newest first.
    async fn list(&self) -> Result<Vec<PostSummary>, Error>;

    /// Look up a post, optionally requiring `viewer` to be its author.
    ///
    /// `NotFound` when the id does not exist; `Forbidden` when `check_author`
    /// holds and `viewer` is not the author.
    async fn get_post(&self, id: PostId, viewer: &User, check_author: bool)
        -> Result<Post, Error>;
}
