//! Per-request trace identifier and access log.
//!
//! Every request runs inside a [`TraceId::scope`], so domain errors built
//! while handling it carry the id. The id is returned in the `trace-id`
//! header and repeated in the single access-log line written when the
//! response is ready. That line also names the user when the handler
//! resolved one through [`CurrentUser`].

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};
use crate::inbound::http::principal::CurrentUser;

/// Middleware that scopes a fresh [`TraceId`] around each request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn stamp_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => error!(%error, %trace_id, "trace id is not a valid header value"),
    }
}

fn log_completed<B>(res: &ServiceResponse<B>, trace_id: TraceId) {
    let request = res.request();
    let user_id = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|principal| principal.user().map(|user| user.id().as_i64()));
    let status = res.status().as_u16();
    if res.status().is_server_error() {
        warn!(%trace_id, method = %request.method(), path = request.path(), status, ?user_id, "request failed");
    } else {
        info!(%trace_id, method = %request.method(), path = request.path(), status, ?user_id, "request completed");
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            stamp_header(&mut res, trace_id);
            log_completed(&res, trace_id);
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Trace header and scope coverage.
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use crate::inbound::http::see_other;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    fn header_of<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn redirects_carry_the_trace_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::post().to(|| async { see_other("/") })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::post().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(!header_of(&res).is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn handlers_see_the_header_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let trace_id = header_of(&res);

        assert_eq!(test::read_body(res).await, trace_id.as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn error_envelope_repeats_the_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { ApiResult::<HttpResponse>::Err(DomainError::forbidden("no")) }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let trace_id = header_of(&res);
        let body: DomainError = test::read_body_json(res).await;

        assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    }

    #[rstest]
    #[actix_web::test]
    async fn each_request_gets_a_fresh_id() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::NoContent().finish() })),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_ne!(header_of(&first), header_of(&second));
    }
}
