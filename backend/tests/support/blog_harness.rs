//! Spawned-server harness and shared world for the blog behaviour suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Each world serves the full application
//! over a fresh SQLite file; the `WorldFixture` stops the server even if a
//! step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{HttpServer, web};
use awc::Client;
use blog::inbound::http::health::HealthState;
use blog::inbound::http::session_config::SessionSettings;
use blog::outbound::persistence::{DbPool, PoolConfig, initialize_schema};
use blog::server::{AppDependencies, build_app, build_http_state};
use tempfile::TempDir;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct BlogWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) session_cookie: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_location: Option<String>,
    pub(crate) last_body: Option<String>,
    _database_dir: TempDir,
}

pub(crate) type SharedWorld = Rc<RefCell<BlogWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

/// Outcome of one request, as recorded into the world.
pub(crate) struct Exchange {
    pub(crate) status: u16,
    pub(crate) location: Option<String>,
    pub(crate) set_cookie: Option<String>,
    pub(crate) body: String,
}

/// A form submission or a plain GET issued against the spawned server.
pub(crate) enum Request<'a> {
    Get(&'a str),
    Form(&'a str, &'a [(&'a str, &'a str)]),
}

/// Send `request` with the stored session cookie and record the outcome.
///
/// Redirects are not followed so steps can assert on `Location`. A fresh
/// `Set-Cookie` for the session replaces the stored cookie, mirroring a
/// browser.
pub(crate) fn perform(world: &SharedWorld, request: Request<'_>) {
    let cookie = world.borrow().session_cookie.clone();
    let exchange = with_world_async(world, |base_url| async move {
        let client = Client::builder().disable_redirects().finish();
        let mut pending = match request {
            Request::Get(path) => {
                let mut builder = client.get(format!("{base_url}{path}"));
                if let Some(cookie) = cookie {
                    builder = builder.insert_header((header::COOKIE, cookie));
                }
                builder.send().await.expect("GET request")
            }
            Request::Form(path, fields) => {
                let mut builder = client.post(format!("{base_url}{path}"));
                if let Some(cookie) = cookie {
                    builder = builder.insert_header((header::COOKIE, cookie));
                }
                builder.send_form(&fields).await.expect("form request")
            }
        };

        let header_value = |name: header::HeaderName| {
            pending
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let location = header_value(header::LOCATION);
        let set_cookie = header_value(header::SET_COOKIE);
        let status = pending.status().as_u16();
        let body = pending.body().await.expect("response body");
        Exchange {
            status,
            location,
            set_cookie,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(exchange.status);
    ctx.last_location = exchange.location;
    ctx.last_body = Some(exchange.body);
    if let Some(set_cookie) = exchange.set_cookie {
        let pair = set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_owned();
        if pair.starts_with("session=") {
            ctx.session_cookie = Some(pair);
        }
    }
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: CookieDuration::hours(2),
    }
}

async fn spawn_blog_server(pool: DbPool) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let http_state = web::Data::new(build_http_state(&pool).map_err(|err| err.to_string())?);
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    let session = test_session_settings();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

/// Spawn a server over a fresh database and wrap it in a world.
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let database_dir = TempDir::new().expect("temp dir");
    let database_path = database_dir.path().join("blog.sqlite");

    let (base_url, server) = local.block_on(&runtime, async {
        let pool = DbPool::new(PoolConfig::new(database_path.to_string_lossy()))
            .await
            .expect("pool builds");
        initialize_schema(&pool).await.expect("schema loads");
        spawn_blog_server(pool).await.expect("server spawns")
    });

    WorldFixture {
        world: Rc::new(RefCell::new(BlogWorld {
            runtime,
            local,
            base_url,
            server,
            session_cookie: None,
            last_status: None,
            last_location: None,
            last_body: None,
            _database_dir: database_dir,
        })),
    }
}
