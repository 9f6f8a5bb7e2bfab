//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::PrincipalResolver;
use crate::domain::ports::{CredentialStore, PostCommand, PostQuery, UserRepository};
use crate::inbound::http::templates::Templates;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Registration and login.
    pub credentials: Arc<dyn CredentialStore>,
    /// Account lookup for the principal resolver.
    pub users: Arc<dyn UserRepository>,
    /// Create, update and delete.
    pub posts: Arc<dyn PostCommand>,
    /// Index listing and single-post reads.
    pub posts_query: Arc<dyn PostQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login.
    pub credentials: Arc<dyn CredentialStore>,
    /// Maps the session cookie to a user.
    pub principals: PrincipalResolver,
    /// Create, update and delete.
    pub posts: Arc<dyn PostCommand>,
    /// Index listing and single-post reads.
    pub posts_query: Arc<dyn PostQuery>,
    /// Compiled page templates.
    pub templates: Arc<Templates>,
}

impl HttpState {
    /// Construct state from a ports bundle and the compiled templates.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use blog::inbound::http::state::{HttpState, HttpStatePorts};
    /// use blog::inbound::http::templates::Templates;
    ///
    /// # fn build(ports: HttpStatePorts) -> Result<(), minijinja::Error> {
    /// let state = HttpState::new(ports, Arc::new(Templates::new()?));
    /// let _credentials = state.credentials.clone();
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(ports: HttpStatePorts, templates: Arc<Templates>) -> Self {
        let HttpStatePorts {
            credentials,
            users,
            posts,
            posts_query,
        } = ports;
        Self {
            credentials,
            principals: PrincipalResolver::new(users),
            posts,
            posts_query,
            templates,
        }
    }
}
