//! Request tracing middleware.
//!
//! Every request runs inside a fresh [`TraceId`] scope, gets a `trace-id`
//! response header, and emits one structured log line with method, path,
//! status and latency once the response is ready.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware attaching a request-scoped [`TraceId`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use taxon_sets::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
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

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
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
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, %trace_id, "failed to encode trace identifier header");
                }
            }
            info!(
                %trace_id,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis(),
                "request completed"
            );
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error as DomainError;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn adds_trace_id_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res.headers().get(TRACE_ID_HEADER).expect("trace id header");
        let parsed: Result<TraceId, _> = header.to_str().expect("ascii").parse();
        assert!(parsed.is_ok());
    }

    #[actix_web::test]
    async fn handler_errors_carry_header_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { Err::<HttpResponse, _>(DomainError::not_found("nope")) }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii")
            .to_owned();
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
    }
}
