//! Domain-level error payload shared by services and adapters.
//!
//! Errors are transport agnostic. The HTTP adapter maps [`ErrorCode`] onto
//! status codes and serialises the payload as the JSON error envelope; the
//! REST client parses the same envelope back into client errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::trace_id::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// A dependency is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Error payload returned by domain services.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id`, when present, is non-empty.
///
/// Constructors capture the ambient [`TraceId`] so adapters can correlate
/// responses with logs.
///
/// # Examples
/// ```
/// use taxon_sets::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("set not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "set not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error. A blank message is replaced with a generic
    /// description of `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            trace_id: current_trace_id(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: current_trace_id(),
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was created.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use taxon_sets::domain::Error;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Replace the trace identifier. Blank values clear it.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        self.trace_id = (!trace_id.trim().is_empty()).then_some(trace_id);
        self
    }

    /// Replace the trace identifier, rejecting blank values.
    pub fn try_with_trace_id(
        mut self,
        trace_id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let trace_id = trace_id.into();
        if trace_id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

fn current_trace_id() -> Option<String> {
    TraceId::current().map(|id| id.to_string())
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.trace_id = None;
        if let Some(trace_id) = trace_id {
            error = error.try_with_trace_id(trace_id)?;
        }
        error.details = details;
        Ok(error)
    }
}
