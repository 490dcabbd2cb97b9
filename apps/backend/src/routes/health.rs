use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::store::{Collection, Filter};

/// GET / liveness probe.
pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Server working")
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    store: &'static str,
    time: String,
}

/// GET /health
///
/// Probes the store with a lookup that matches nothing. A failing store
/// reports `degraded` but still answers 200.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let probe = app_state
        .store
        .find_one(Collection::Jobs, &Filter::by_id("health-probe"))
        .await;

    let status = match probe {
        Ok(_) => "ok",
        Err(e) => {
            warn!(error = %e, "store health probe failed");
            "degraded"
        }
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status,
        app_version: env!("CARGO_PKG_VERSION"),
        store: app_state.store.backend_name(),
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}
