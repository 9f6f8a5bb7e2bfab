//! SQLite-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{Post, PostDraft, PostId, PostSummary, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{post, user};

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn row_to_post(row: PostRow) -> Post {
    let PostRow {
        id,
        author_id,
        created_at,
        title,
        body,
    } = row;

    Post {
        id: PostId::new(id),
        author_id: UserId::new(author_id),
        title,
        body,
        created_at: DateTime::from_naive_utc_and_offset(created_at, Utc),
    }
}

fn row_to_summary(
    (row, username): (PostRow, String),
) -> Result<PostSummary, PostPersistenceError> {
    let username = Username::new(username)
        .map_err(|err| PostPersistenceError::query(format!("stored username invalid: {err}")))?;
    Ok(PostSummary {
        post: row_to_post(row),
        username,
    })
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn list_recent(&self) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(PostRow, String)> = post::table
            .inner_join(user::table)
            .order((post::created_at.desc(), post::id.desc()))
            .select((PostRow::as_select(), user::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = post::table
            .filter(post::id.eq(id.as_i64()))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_post))
    }

    async fn insert(
        &self,
        author_id: UserId,
        draft: &PostDraft,
        created_at: DateTime<Utc>,
    ) -> Result<PostId, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPostRow {
            author_id: author_id.as_i64(),
            created_at: created_at.naive_utc(),
            title: draft.title(),
            body: draft.body(),
        };

        diesel::insert_into(post::table)
            .values(&row)
            .returning(post::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(PostId::new)
            .map_err(map_diesel_error)
    }

    async fn update(&self, id: PostId, draft: &PostDraft) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = PostUpdate {
            title: draft.title(),
            body: draft.body(),
        };

        let affected = diesel::update(post::table.filter(post::id.eq(id.as_i64())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(post::table.filter(post::id.eq(id.as_i64())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }
}
