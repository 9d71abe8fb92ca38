//! Liveness and readiness probes.
//!
//! Readiness flips once the server has bound its listener and the set store
//! is wired; liveness drops when shutdown begins so orchestrators stop routing
//! early. Responses carry a small JSON body naming the active store.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde_json::json;

/// Shared probe state.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: &'static str,
}

impl HealthState {
    /// Create a state that is live but not yet ready, reporting `store` as the
    /// persistence backend (`"postgres"` or `"memory"`).
    pub fn new(store: &'static str) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store,
        }
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so probes report draining during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(&self, probe_ok: bool, ok: &str, failing: &str) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        let status = if probe_ok { ok } else { failing };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(json!({ "status": status, "store": self.store }))
    }
}

/// Readiness probe: `200` once the server accepts traffic, `503` before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_ready(), "ready", "starting")
}

/// Liveness probe: `200` while alive, `503` once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_alive(), "alive", "draining")
}
