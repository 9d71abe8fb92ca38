//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::{json_error_handler, path_error_handler, unknown_endpoint};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::sets::{create_set, delete_set, get_set, list_sets, update_set};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, sign_up};

/// Assemble the application with every route, extractor config and
/// middleware.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(sign_up)
        .service(login)
        .service(list_sets)
        .service(get_set)
        .service(create_set)
        .service(update_set)
        .service(delete_set);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.default_service(web::to(unknown_endpoint))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Returns the server, which must be awaited to drive the listener, and the
/// address it actually bound (useful when the configured port is `0`).
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<(Server, SocketAddr)> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let bound = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?;
    let local_addr = bound
        .addrs()
        .into_iter()
        .next()
        .unwrap_or(config.bind_addr);
    let server = bound.run();

    health_state.mark_ready();
    info!(%local_addr, store = config.store_name(), "server listening");
    Ok((server, local_addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestPorts, mock_state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    #[rstest]
    #[case("/nowhere")]
    #[case("/api/nowhere")]
    #[actix_web::test]
    async fn unknown_routes_answer_json_not_found(#[case] uri: &str) {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new("memory")),
            web::Data::new(mock_state(TestPorts::default())),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["message"], "unknown endpoint");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new("memory")),
            web::Data::new(mock_state(TestPorts::default())),
        ))
        .await;
        let req = test::TestRequest::post()
            .uri("/api/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
