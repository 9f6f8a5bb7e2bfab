//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, web};
use async_trait::async_trait;

use crate::domain::ports::{
    CredentialStore, MockCredentialStore, MockPostCommand, MockPostQuery, PostCommand, PostQuery,
    UserPersistenceError, UserRepository,
};
use crate::domain::{NewUser, StoredCredentials, User, UserId, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::templates::Templates;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`, if any.
pub fn session_cookie(response: &HttpResponse) -> Option<Cookie<'static>> {
    response
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Test-only route binding the session to `/{id}`, standing in for a login.
pub async fn establish_session(
    session: SessionContext,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> HttpResponse {
    match state
        .principals
        .establish(&session, UserId::new(id.into_inner()))
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub fn alice() -> User {
    User::new(UserId::new(1), Username::new("alice").expect("valid username"))
}

pub fn bob() -> User {
    User::new(UserId::new(2), Username::new("bob").expect("valid username"))
}

/// Read-only user table that counts principal lookups.
#[derive(Default)]
pub struct StubUsers {
    rows: Vec<User>,
    pub lookups: AtomicUsize,
}

impl StubUsers {
    pub fn with(rows: Vec<User>) -> Self {
        Self {
            rows,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserRepository for StubUsers {
    async fn insert(&self, _user: &NewUser) -> Result<UserId, UserPersistenceError> {
        Err(UserPersistenceError::query("stub users are read-only"))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_credentials(
        &self,
        _username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(None)
    }
}

/// Ports for a handler test; unset ports reject every call.
pub struct TestPorts {
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            credentials: Arc::new(MockCredentialStore::new()),
            users: Arc::new(StubUsers::with(vec![alice(), bob()])),
            posts: Arc::new(MockPostCommand::new()),
            posts_query: Arc::new(MockPostQuery::new()),
        }
    }
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        let Self {
            credentials,
            users,
            posts,
            posts_query,
        } = self;
        HttpState::new(
            HttpStatePorts {
                credentials,
                users,
                posts,
                posts_query,
            },
            Arc::new(Templates::new().expect("embedded templates compile")),
        )
    }
}

/// State whose only working port is `users`.
pub fn test_state(users: Arc<StubUsers>) -> HttpState {
    TestPorts {
        users,
        ..TestPorts::default()
    }
    .into_state()
}
