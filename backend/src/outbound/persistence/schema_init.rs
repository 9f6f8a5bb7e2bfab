//! Destructive schema (re)creation used by the `init-db` command.
//!
//! The schema is a static script embedded at compile time. Running it drops
//! both tables, so every stored user and post is lost.

use diesel_async::SimpleAsyncConnection;
use tracing::info;

use super::pool::{DbPool, PoolError};

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Errors raised while applying the schema script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaInitError {
    /// No connection could be obtained.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The script failed part way.
    #[error("failed to apply schema: {message}")]
    Execute { message: String },
}

/// Drop and recreate the `user` and `post` tables.
///
/// # Errors
///
/// Returns [`SchemaInitError`] when the connection cannot be checked out or
/// the script fails.
pub async fn initialize_schema(pool: &DbPool) -> Result<(), SchemaInitError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(SCHEMA_SQL)
        .await
        .map_err(|error| SchemaInitError::Execute {
            message: error.to_string(),
        })?;
    info!("database schema initialised");
    Ok(())
}
