//! Authentication pages.
//!
//! ```text
//! GET  /auth/register   POST /auth/register  username=..&password=..
//! GET  /auth/login      POST /auth/login     username=..&password=..
//! GET  /auth/logout
//! ```
//!
//! Form failures re-render the form with the message flashed and the status
//! of the matching domain error. Infrastructure failures use the JSON error
//! envelope.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use minijinja::context;
use serde::Deserialize;
use tracing::info;

use crate::domain::{AuthError, Error};
use crate::inbound::http::error::status_for;
use crate::inbound::http::principal::CurrentUser;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::Page;
use crate::inbound::http::{ApiResult, see_other};

const REGISTER_TEMPLATE: &str = "auth/register.html";
const LOGIN_TEMPLATE: &str = "auth/login.html";

/// Body of the register and login forms. Absent fields read as empty so
/// validation reports them as missing.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    /// Submitted username.
    #[serde(default)]
    pub username: String,
    /// Submitted plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Empty registration form.
#[get("/register")]
pub async fn register_form(
    state: web::Data<HttpState>,
    principal: CurrentUser,
) -> ApiResult<HttpResponse> {
    state
        .templates
        .respond(StatusCode::OK, &Page::new(REGISTER_TEMPLATE, principal.user()))
}

/// Create an account, then send the browser to the login page.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    principal: CurrentUser,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    match state
        .credentials
        .register(&form.username, &form.password)
        .await
    {
        Ok(_) => Ok(see_other("/auth/login")),
        Err(err) => form_failure(&state, REGISTER_TEMPLATE, &principal, &form, err),
    }
}

/// Empty login form.
#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    principal: CurrentUser,
) -> ApiResult<HttpResponse> {
    state
        .templates
        .respond(StatusCode::OK, &Page::new(LOGIN_TEMPLATE, principal.user()))
}

/// Verify credentials and bind the session to the user.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    principal: CurrentUser,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    match state.credentials.verify(&form.username, &form.password).await {
        Ok(user_id) => {
            state.principals.establish(&session, user_id)?;
            Ok(see_other("/"))
        }
        Err(err) => form_failure(&state, LOGIN_TEMPLATE, &principal, &form, err),
    }
}

/// Drop every session claim and return to the index.
#[get("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
    principal: CurrentUser,
) -> HttpResponse {
    state.principals.clear(&session);
    if let Some(user) = principal.user() {
        info!(user_id = %user.id(), "logout");
    }
    see_other("/")
}

fn form_failure(
    state: &HttpState,
    template: &'static str,
    principal: &CurrentUser,
    form: &CredentialsForm,
    err: AuthError,
) -> ApiResult<HttpResponse> {
    if let AuthError::Backend(error) = err {
        return Err(error);
    }
    let message = err.to_string();
    let status = status_for(Error::from(err).code());
    let page = Page::new(template, principal.user())
        .flash(message)
        .values(context! { username => form.username.as_str() });
    state.templates.respond(status, &page)
}
