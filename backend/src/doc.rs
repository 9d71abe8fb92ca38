//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with schema wrappers for the domain payloads, so domain types stay free
//! of utoipa derives. The document backs Swagger UI in debug builds and is
//! exported by the `openapi-dump` binary.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, SessionSchema, SpeciesSetSchema, UserSchema,
};
use crate::inbound::http::sets::SetRequest;
use crate::inbound::http::users::{LoginRequest, SignupRequest};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        // Tokens are issued by POST /api/login.
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taxon sets API",
        description = "Accounts and curated species sets with bearer-token ownership checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::login,
        crate::inbound::http::sets::list_sets,
        crate::inbound::http::sets::get_set,
        crate::inbound::http::sets::create_set,
        crate::inbound::http::sets::update_set,
        crate::inbound::http::sets::delete_set,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        SessionSchema,
        SpeciesSetSchema,
        ErrorSchema,
        ErrorCodeSchema,
        SignupRequest,
        LoginRequest,
        SetRequest
    )),
    tags(
        (name = "users", description = "Account creation and login"),
        (name = "sets", description = "Species set curation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
