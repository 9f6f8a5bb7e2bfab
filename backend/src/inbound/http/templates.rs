//! Embedded HTML templates for the auth and blog pages.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Every page is rendered with the resolved principal as `g_user` and an
//! optional `flash` message; there is no ambient per-request global.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use minijinja::{Environment, Value, context};

use crate::domain::{Error, User};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../templates/base.html")),
    (
        "auth/register.html",
        include_str!("../../../templates/auth/register.html"),
    ),
    (
        "auth/login.html",
        include_str!("../../../templates/auth/login.html"),
    ),
    (
        "blog/index.html",
        include_str!("../../../templates/blog/index.html"),
    ),
    (
        "blog/create.html",
        include_str!("../../../templates/blog/create.html"),
    ),
    (
        "blog/update.html",
        include_str!("../../../templates/blog/update.html"),
    ),
];

/// A page to render: template name, viewer, flash message and page values.
pub struct Page<'a> {
    template: &'static str,
    user: Option<&'a User>,
    flash: Option<String>,
    values: Value,
}

impl<'a> Page<'a> {
    /// Render `template` for `user` (or an anonymous visitor).
    pub fn new(template: &'static str, user: Option<&'a User>) -> Self {
        Self {
            template,
            user,
            flash: None,
            values: context! {},
        }
    }

    /// Message shown above the page content.
    pub fn flash(mut self, message: impl Into<String>) -> Self {
        self.flash = Some(message.into());
        self
    }

    /// Template-specific values, e.g. `context! { posts => posts }`.
    pub fn values(mut self, values: Value) -> Self {
        self.values = values;
        self
    }
}

/// Compiled template set shared by all workers.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Register every embedded template.
    ///
    /// # Errors
    /// Returns the template syntax error if any embedded template fails to
    /// compile.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `page` to an HTML string.
    pub fn render(&self, page: &Page<'_>) -> Result<String, Error> {
        let template = self
            .env
            .get_template(page.template)
            .map_err(|err| Error::internal(format!("unknown template {}: {err}", page.template)))?;
        template
            .render(context! {
                g_user => page.user,
                flash => page.flash.as_deref(),
                ..page.values.clone()
            })
            .map_err(|err| Error::internal(format!("failed to render {}: {err}", page.template)))
    }

    /// Render `page` into an HTML response with `status`.
    pub fn respond(&self, status: StatusCode, page: &Page<'_>) -> Result<HttpResponse, Error> {
        let body = self.render(page)?;
        Ok(HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body))
    }
}
