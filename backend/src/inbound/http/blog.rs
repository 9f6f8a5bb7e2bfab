//! Blog pages.
//!
//! ```text
//! GET  /                 public index, newest first
//! GET  /hello            plain text smoke test
//! GET  /create           POST /create          title=..&body=..
//! GET  /{id}/update      POST /{id}/update     title=..&body=..
//! POST /{id}/delete
//! ```
//!
//! Everything except the index and `/hello` passes through the access gate;
//! anonymous visitors are redirected to the login page.

use std::future::Future;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use minijinja::context;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Access, PostDraft, PostId, User, guard};
use crate::inbound::http::principal::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::Page;
use crate::inbound::http::{ApiResult, LOGIN_PATH, see_other};

const INDEX_TEMPLATE: &str = "blog/index.html";
const CREATE_TEMPLATE: &str = "blog/create.html";
const UPDATE_TEMPLATE: &str = "blog/update.html";

/// Body of the create and update forms.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    /// Post title. Must not be blank.
    #[serde(default)]
    pub title: String,
    /// Post body. May be empty.
    #[serde(default)]
    pub body: String,
}

/// Await `action` for a logged-in principal, otherwise redirect to login.
async fn gated<'u, F, Fut>(principal: &'u CurrentUser, action: F) -> ApiResult<HttpResponse>
where
    F: FnOnce(&'u User) -> Fut,
    Fut: Future<Output = ApiResult<HttpResponse>>,
{
    match guard(principal.user(), action) {
        Access::Granted(response) => response.await,
        Access::RedirectToLogin => {
            debug!("anonymous request redirected to login");
            Ok(see_other(LOGIN_PATH))
        }
    }
}

/// Every post, newest first.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    principal: CurrentUser,
) -> ApiResult<HttpResponse> {
    let posts = state.posts_query.list().await?;
    let page = Page::new(INDEX_TEMPLATE, principal.user()).values(context! { posts => posts });
    state.templates.respond(StatusCode::OK, &page)
}

/// Plain-text greeting used as a smoke test.
#[get("/hello")]
pub async fn hello() -> &'static str {
    "Hello, World!"
}

/// Empty post form. Requires a login.
#[get("/create")]
pub async fn create_form(
    state: web::Data<HttpState>,
    principal: CurrentUser,
) -> ApiResult<HttpResponse> {
    gated(&principal, |user| async move {
        state
            .templates
            .respond(StatusCode::OK, &Page::new(CREATE_TEMPLATE, Some(user)))
    })
    .await
}

/// Publish a post as the current user, then return to the index.
#[post("/create")]
pub async fn create(
    state: web::Data<HttpState>,
    principal: CurrentUser,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    gated(&principal, |user| async move {
        let draft = match PostDraft::try_from_parts(&form.title, &form.body) {
            Ok(draft) => draft,
            Err(err) => {
                let page = Page::new(CREATE_TEMPLATE, Some(user))
                    .flash(err.to_string())
                    .values(context! { title => form.title, body => form.body });
                return state.templates.respond(StatusCode::BAD_REQUEST, &page);
            }
        };
        state.posts.create(user, &draft).await?;
        Ok(see_other("/"))
    })
    .await
}

/// Edit form for a post the current user wrote.
#[get("/{id}/update")]
pub async fn update_form(
    state: web::Data<HttpState>,
    principal: CurrentUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    gated(&principal, |user| async move {
        let post = state.posts_query.get_post(id, user, true).await?;
        let page = Page::new(UPDATE_TEMPLATE, Some(user)).values(context! { post => post });
        state.templates.respond(StatusCode::OK, &page)
    })
    .await
}

/// Save changes to a post the current user wrote.
#[post("/{id}/update")]
pub async fn update(
    state: web::Data<HttpState>,
    principal: CurrentUser,
    id: web::Path<i64>,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    let form = form.into_inner();
    gated(&principal, |user| async move {
        let post = state.posts_query.get_post(id, user, true).await?;
        let draft = match PostDraft::try_from_parts(&form.title, &form.body) {
            Ok(draft) => draft,
            Err(err) => {
                let page = Page::new(UPDATE_TEMPLATE, Some(user))
                    .flash(err.to_string())
                    .values(context! { post => post, title => form.title, body => form.body });
                return state.templates.respond(StatusCode::BAD_REQUEST, &page);
            }
        };
        state.posts.update(user, id, &draft).await?;
        Ok(see_other("/"))
    })
    .await
}

/// Remove a post the current user wrote.
#[post("/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    principal: CurrentUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    gated(&principal, |user| async move {
        state.posts.delete(user, id).await?;
        Ok(see_other("/"))
    })
    .await
}
