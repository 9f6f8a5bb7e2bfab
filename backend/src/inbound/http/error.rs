//! Rendering of domain errors as HTTP responses.
//!
//! Errors that reach Actix become the JSON envelope
//! `{code, message, traceId, details}` with the trace id repeated in the
//! `trace-id` header. Form pages render their own HTML but take the status
//! from [`status_for`], so both surfaces agree on what a failure means.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// HTTP status for an error `code`.
pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The error as a client may see it. Internal errors lose their message and
/// details but keep the trace id for support requests.
fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
            }
            ErrorCode::ServiceUnavailable => {
                warn!(message = self.message(), trace_id = ?self.trace_id(), "backend unavailable");
            }
            _ => {}
        }

        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_view(self))
    }
}

/// Framework errors (bad form bodies, session failures) are re-raised as
/// domain errors. Client mistakes stay 400; anything else is internal.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        if status.is_client_error() {
            warn!(error = %err, %status, "rejected malformed request");
            Error::invalid_request("Malformed request.")
        } else {
            error!(error = %err, %status, "framework error");
            Error::internal(INTERNAL_MESSAGE)
        }
    }
}
