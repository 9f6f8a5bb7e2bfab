//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            session,
            bind_addr,
            db_pool,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
