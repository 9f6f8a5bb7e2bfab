//! Builds the Actix app and server for the blog.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{build_http_state, build_http_state_ports};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::Trace;
use crate::inbound::http::auth::{login, login_form, logout, register, register_form};
use crate::inbound::http::blog::{
    create, create_form, delete, hello, index, update, update_form,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;

/// Shared pieces cloned into every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness and liveness flags.
    pub health_state: web::Data<HealthState>,
    /// Ports and templates for the handlers.
    pub http_state: web::Data<HttpState>,
    /// Cookie session configuration.
    pub session: SessionSettings,
}

fn session_middleware(session: SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    let SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    } = session;
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(ttl))
        .build()
}

/// Assemble the application: auth and blog pages behind the session
/// middleware, health probes outside it.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let auth = web::scope("/auth")
        .service(register_form)
        .service(register)
        .service(login_form)
        .service(login)
        .service(logout);

    let pages = web::scope("")
        .wrap(session_middleware(session))
        .service(auth)
        .service(hello)
        .service(index)
        .service(create_form)
        .service(create)
        .service(update_form)
        .service(update)
        .service(delete);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(pages)
}

/// Bind the blog to `config.bind_addr` and flip `health_state` to ready.
///
/// Nothing is served until the returned [`Server`] is awaited.
///
/// # Errors
/// Template compilation failures and bind errors, as [`std::io::Error`].
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.db_pool)?);
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
    } = config;
    session.log_summary();

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
