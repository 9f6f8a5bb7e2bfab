//! HTTP inbound adapter serving the auth and blog pages.

pub mod auth;
pub mod blog;
pub mod error;
pub mod health;
pub mod principal;
pub mod session;
pub mod session_config;
pub mod state;
pub mod templates;
#[cfg(test)]
pub mod test_utils;

use actix_web::HttpResponse;
use actix_web::http::header;

pub use error::ApiResult;

/// Where the access gate sends anonymous visitors.
pub const LOGIN_PATH: &str = "/auth/login";

/// `303 See Other` to `location`, so a form POST is followed by a GET.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
