//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: SQLite-backed repositories using Diesel ORM
//! - **password**: Argon2id password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod password;
pub mod persistence;
