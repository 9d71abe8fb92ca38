//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialized shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "2f1d7c4e-8a3b-4c5d-9e6f-0a1b2c3d4e5f")]
    trace_id: Option<String>,
    /// Supplementary error details, usually `{field, code}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Unique login name.
    #[schema(example = "ada")]
    username: String,
}

/// OpenAPI schema for [`crate::domain::AuthenticatedSession`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AuthenticatedSession)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SessionSchema {
    /// Bearer token for the `Authorization` header.
    token: String,
    /// Login name.
    #[schema(example = "ada")]
    username: String,
    /// User identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
}

/// OpenAPI schema for [`crate::domain::SpeciesSet`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SpeciesSet, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SpeciesSetSchema {
    /// Set identifier.
    #[schema(example = "0b6d2a4e-7c1f-4e3a-9d8b-5f2e1a0c3b4d")]
    id: String,
    /// Set title.
    #[schema(example = "Birds")]
    title: String,
    /// Identifier of the owning user.
    owner_id: String,
    /// Ordered taxon identifiers; duplicates are preserved.
    #[schema(example = json!(["3", "7"]))]
    taxon_ids: Vec<String>,
}
