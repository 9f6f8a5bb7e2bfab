//! Builders wiring the Diesel adapters into the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{BlogService, CredentialService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::templates::Templates;
use crate::outbound::password::Argon2PasswordHasher;
use crate::outbound::persistence::{DbPool, DieselPostRepository, DieselUserRepository};

/// Build the production port bundle over `pool`.
pub fn build_http_state_ports(pool: &DbPool) -> HttpStatePorts {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let posts = Arc::new(BlogService::new(
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ));
    HttpStatePorts {
        credentials: Arc::new(CredentialService::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::default()),
        )),
        users,
        posts: posts.clone(),
        posts_query: posts,
    }
}

/// Build the HTTP state, compiling the embedded templates.
///
/// # Errors
/// Returns [`std::io::Error`] if a template fails to compile.
pub fn build_http_state(pool: &DbPool) -> std::io::Result<HttpState> {
    let templates = Templates::new()
        .map_err(|err| std::io::Error::other(format!("template compilation failed: {err}")))?;
    Ok(HttpState::new(
        build_http_state_ports(pool),
        Arc::new(templates),
    ))
}
