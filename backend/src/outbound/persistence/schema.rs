//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `schema.sql` exactly. SQLite stores integer
//! primary keys as 64-bit values, hence `BigInt`.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` carries a `UNIQUE` constraint; it is the only guard against
    /// duplicate registrations.
    user (id) {
        /// Primary key assigned by SQLite (`INTEGER PRIMARY KEY AUTOINCREMENT`).
        id -> BigInt,
        /// Trimmed login name.
        username -> Text,
        /// Argon2 PHC string. Never the plaintext.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Blog entries.
    post (id) {
        id -> BigInt,
        /// Foreign key to `user.id`.
        author_id -> BigInt,
        /// Creation time in UTC.
        created_at -> Timestamp,
        title -> Text,
        body -> Text,
    }
}

diesel::joinable!(post -> user (author_id));

diesel::allow_tables_to_appear_in_same_query!(post, user);
