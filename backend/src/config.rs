//! Application settings loaded via OrthoConfig.
//!
//! Values come from `BLOG_*` environment variables or a configuration file.
//! Unset values fall back to development defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATABASE_PATH: &str = "instance/blog.sqlite";
const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, 8080));

/// Configuration values for the server and the CLI commands.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// SQLite database file. Its parent directory is the instance folder.
    pub database_path: Option<PathBuf>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 4)]
    pub pool_max_size: u32,
    /// Password for `init-administrator`.
    pub administrator_password: Option<String>,
}

impl AppSettings {
    /// Return the configured database path, falling back to the default.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// The folder holding the database file, created at startup.
    pub fn instance_dir(&self) -> PathBuf {
        self.database_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Return the configured bind address, falling back to `127.0.0.1:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the pool size cap.
    pub const fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }
}
