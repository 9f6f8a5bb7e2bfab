//! Request-scoped principal extractor.
//!
//! [`CurrentUser`] resolves the session's `user_id` claim once per request
//! and caches the result in the request extensions, so several extractors or
//! a handler and its page rendering all see the same principal.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The user behind the current request, or `None` when anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    /// The logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if let Some(cached) = req.extensions().get::<CurrentUser>() {
            let cached = cached.clone();
            return Box::pin(async move { Ok(cached) });
        }

        let session = SessionContext::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move {
            let session = session.await?;
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let principal = CurrentUser(state.principals.resolve(&session).await?);
            req.extensions_mut().insert(principal.clone());
            Ok(principal)
        })
    }
}
