//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by a single SQLite file via the Diesel ORM, with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Constraint-backed invariants**: username uniqueness is enforced by the
//!   `UNIQUE` column, not by a lookup before insert.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use blog::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("instance/blog.sqlite")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_post_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;
mod schema_init;

pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbConnection, DbPool, PoolConfig, PoolError};
pub use schema_init::{SchemaInitError, initialize_schema};
