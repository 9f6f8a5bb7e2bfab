//! The cookie session seen through the domain's claims port.
//!
//! [`SessionContext`] wraps the Actix cookie session and implements the
//! domain's [`SessionClaims`] port, so the principal resolver only ever sees
//! a `user_id` claim.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use tracing::warn;

use crate::domain::UserId;
use crate::domain::ports::{SessionClaims, SessionClaimsError};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Actix [`Session`] as [`SessionClaims`]. Extracted like the session itself.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the request's session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

impl SessionClaims for SessionContext {
    fn user_id(&self) -> Result<Option<UserId>, SessionClaimsError> {
        let raw = self
            .0
            .get::<Value>(USER_ID_KEY)
            .map_err(|error| SessionClaimsError::read(error.to_string()))?;
        match raw {
            None => Ok(None),
            Some(value) => match value.as_i64() {
                Some(id) => Ok(Some(UserId::new(id))),
                None => {
                    warn!(claim = %value, "invalid user id in session cookie");
                    Ok(None)
                }
            },
        }
    }

    fn set_user_id(&self, user_id: UserId) -> Result<(), SessionClaimsError> {
        self.0
            .insert(USER_ID_KEY, user_id.as_i64())
            .map_err(|error| SessionClaimsError::write(error.to_string()))
    }

    fn clear(&self) {
        self.0.clear();
    }

    fn renew(&self) {
        self.0.renew();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
