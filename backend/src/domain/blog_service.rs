//! Blog post service implementing the post command and query ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::port_error_mapping::map_post_persistence_error;
use crate::domain::ports::{PostCommand, PostQuery, PostRepository};
use crate::domain::{Error, Post, PostDraft, PostId, PostSummary, User};

/// Post use-cases over a [`PostRepository`].
#[derive(Clone)]
pub struct BlogService<R: ?Sized> {
    posts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> BlogService<R> {
    /// Create a service; `clock` stamps `created_at` on new posts.
    pub fn new(posts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, clock }
    }
}

impl<R> BlogService<R>
where
    R: PostRepository + ?Sized,
{
    async fn find(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_persistence_error)?
            .ok_or_else(|| missing_post(id))
    }
}

fn missing_post(id: PostId) -> Error {
    Error::not_found(format!("Post id {id} doesn't exist."))
}

#[async_trait]
impl<R> PostQuery for BlogService<R>
where
    R: PostRepository + ?Sized,
{
    async fn list(&self) -> Result<Vec<PostSummary>, Error> {
        self.posts
            .list_recent()
            .await
            .map_err(map_post_persistence_error)
    }

    async fn get_post(
        &self,
        id: PostId,
        viewer: &User,
        check_author: bool,
    ) -> Result<Post, Error> {
        let post = self.find(id).await?;
        if check_author && post.author_id != viewer.id() {
            return Err(Error::forbidden(format!(
                "Post id {id} belongs to another author."
            )));
        }
        Ok(post)
    }
}

#[async_trait]
impl<R> PostCommand for BlogService<R>
where
    R: PostRepository + ?Sized,
{
    async fn create(&self, author: &User, draft: &PostDraft) -> Result<PostId, Error> {
        let id = self
            .posts
            .insert(author.id(), draft, self.clock.utc())
            .await
            .map_err(map_post_persistence_error)?;
        info!(post_id = %id, author_id = %author.id(), "post created");
        Ok(id)
    }

    async fn update(&self, author: &User, id: PostId, draft: &PostDraft) -> Result<(), Error> {
        self.get_post(id, author, true).await?;
        let updated = self
            .posts
            .update(id, draft)
            .await
            .map_err(map_post_persistence_error)?;
        if !updated {
            return Err(missing_post(id));
        }
        info!(post_id = %id, author_id = %author.id(), "post updated");
        Ok(())
    }

    async fn delete(&self, author: &User, id: PostId) -> Result<(), Error> {
        self.get_post(id, author, true).await?;
        let deleted = self
            .posts
            .delete(id)
            .await
            .map_err(map_post_persistence_error)?;
        if !deleted {
            return Err(missing_post(id));
        }
        info!(post_id = %id, author_id = %author.id(), "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockPostRepository, PostPersistenceError};
    use crate::domain::{ErrorCode, UserId, Username};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    struct FixtureClock;

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            fixed_time().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            fixed_time()
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn user(id: i64, name: &str) -> User {
        User::new(UserId::new(id), Username::new(name).expect("valid username"))
    }

    fn post_by(author: i64) -> Post {
        Post {
            id: PostId::new(10),
            author_id: UserId::new(author),
            title: "Hello".to_owned(),
            body: "World".to_owned(),
            created_at: fixed_time(),
        }
    }

    #[fixture]
    fn draft() -> PostDraft {
        PostDraft::try_from_parts("New title", "New body").expect("valid draft")
    }

    fn service(posts: MockPostRepository) -> BlogService<MockPostRepository> {
        BlogService::new(Arc::new(posts), Arc::new(FixtureClock))
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_author_and_time(draft: PostDraft) {
        let mut posts = MockPostRepository::new();
        posts
            .expect_insert()
            .withf(|author, draft, created_at| {
                *author == UserId::new(1)
                    && draft.title() == "New title"
                    && *created_at == fixed_time()
            })
            .times(1)
            .return_once(|_, _, _| Ok(PostId::new(3)));

        let id = service(posts)
            .create(&user(1, "alice"), &draft)
            .await
            .expect("create");

        assert_eq!(id, PostId::new(3));
    }

    #[rstest]
    #[tokio::test]
    async fn get_post_missing_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().return_once(|_| Ok(None));

        let error = service(posts)
            .get_post(PostId::new(10), &user(1, "alice"), true)
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Post id 10 doesn't exist.");
    }

    #[rstest]
    #[case(true, Some(ErrorCode::Forbidden))]
    #[case(false, None)]
    #[tokio::test]
    async fn get_post_checks_author_on_request(
        #[case] check_author: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .with(eq(PostId::new(10)))
            .return_once(|_| Ok(Some(post_by(2))));

        let result = service(posts)
            .get_post(PostId::new(10), &user(1, "alice"), check_author)
            .await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn update_by_non_author_does_not_write(draft: PostDraft) {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(|_| Ok(Some(post_by(2))));
        posts.expect_update().never();

        let error = service(posts)
            .update(&user(1, "alice"), PostId::new(10), &draft)
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn update_by_author_writes(draft: PostDraft) {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(|_| Ok(Some(post_by(1))));
        posts
            .expect_update()
            .with(eq(PostId::new(10)), eq(draft.clone()))
            .times(1)
            .return_once(|_, _| Ok(true));

        service(posts)
            .update(&user(1, "alice"), PostId::new(10), &draft)
            .await
            .expect("update");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_vanished_row_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(|_| Ok(Some(post_by(1))));
        posts.expect_delete().return_once(|_| Ok(false));

        let error = service(posts)
            .delete(&user(1, "alice"), PostId::new(10))
            .await
            .expect_err("gone");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_maps_connection_errors() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_list_recent()
            .return_once(|| Err(PostPersistenceError::connection("locked")));

        let error = service(posts).list().await.expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
