//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{post, user};

/// Row struct for reading from the user table without the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
}

/// Row struct for credential verification lookups.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CredentialRow {
    pub id: i64,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the post table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = post)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PostRow {
    pub id: i64,
    pub author_id: i64,
    pub created_at: NaiveDateTime,
    pub title: String,
    pub body: String,
}

/// Insertable struct for creating new posts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post)]
pub(crate) struct NewPostRow<'a> {
    pub author_id: i64,
    pub created_at: NaiveDateTime,
    pub title: &'a str,
    pub body: &'a str,
}

/// Changeset struct for editing a post.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = post)]
pub(crate) struct PostUpdate<'a> {
    pub title: &'a str,
    pub body: &'a str,
}
