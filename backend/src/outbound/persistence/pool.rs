//! bb8 pool of SQLite connections.
//!
//! Diesel's SQLite driver is blocking, so each connection sits behind
//! [`SyncConnectionWrapper`] and runs its queries off the async executor.
//! New connections get `foreign_keys` and `busy_timeout` set before first use.

use std::time::Duration;

use diesel::ConnectionError;
use diesel::sqlite::SqliteConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use futures_util::future::BoxFuture;

/// Connection type handed out by [`DbPool`].
pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Failure to obtain a usable database connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free before the checkout timeout.
    #[error("database connection unavailable: {message}")]
    Checkout { message: String },
    /// The database file could not be opened when the pool started.
    #[error("database pool did not start: {message}")]
    Build { message: String },
}

impl PoolError {
    /// A [`Self::Checkout`] error.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// A [`Self::Build`] error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Where the database lives and how many connections may be open on it.
///
/// SQLite serialises writers, so a handful of connections is plenty. The
/// pool keeps one warm and waits up to `checkout_timeout` for a free one.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    const DEFAULT_MAX_SIZE: u32 = 4;
    const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Configuration for the SQLite file at `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            checkout_timeout: Self::DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap on open connections. Zero is raised to one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// How long `get` waits for a free connection.
    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Path of the SQLite file.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

fn establish_connection(url: &str) -> BoxFuture<'_, diesel::ConnectionResult<DbConnection>> {
    Box::pin(async move {
        let mut conn = DbConnection::establish(url).await?;
        conn.batch_execute(CONNECTION_PRAGMAS)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

/// Shared handle to the SQLite connection pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<DbConnection>,
}

impl DbPool {
    /// Open the pool and its first connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when that first connection cannot be set up, for
    /// example because the parent directory of the file does not exist.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(establish_connection);
        let manager = AsyncDieselConnectionManager::<DbConnection>::new_with_config(
            config.database_url(),
            manager_config,
        );

        Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(1))
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::build(err.to_string()))
    }

    /// Borrow a connection until the guard drops.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when every connection stays busy past the
    /// checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, DbConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
