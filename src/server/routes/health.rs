//! Health check endpoint

use crate::server::types::HealthStatus;
use actix_web::{HttpResponse, web};
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Liveness probe. No auth, no store access.
async fn health_check() -> HttpResponse {
    debug!("Health check requested");
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
    })
}
