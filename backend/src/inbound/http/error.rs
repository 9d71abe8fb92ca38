//! HTTP adapter mapping for domain errors.
//!
//! Keeps [`Error`] free of HTTP types while giving every handler the same JSON
//! envelope and status mapping. Internal errors are redacted before they leave
//! the process; the trace id is kept so operators can find the log line.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
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

fn redact_if_internal(error: &Error) -> Error {
    if status_for(error.code()) == StatusCode::INTERNAL_SERVER_ERROR {
        error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
        let redacted = Error::internal(REDACTED_MESSAGE);
        match error.trace_id() {
            Some(id) => redacted.with_trace_id(id),
            None => redacted,
        }
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

/// Turn JSON body extraction failures into `400 invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}")).into()
}

/// Turn path extraction failures into `400 invalid_request`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid path: {err}")).into()
}

/// Default service answering unmatched routes with a JSON `404`.
pub async fn unknown_endpoint() -> ApiResult<HttpResponse> {
    Err(Error::not_found("unknown endpoint"))
}
