use crate::api::MgmtState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub cache: String,
}

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: checks connectivity to the database and Redis. Only the
/// database gates readiness; the cache degrades gracefully so its state is
/// reported without failing the probe.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let (db_res, cache_res) = tokio::join!(state.health_service.check_db(), state.health_service.check_cache());

    let mut status_code = StatusCode::OK;
    let db_status = if let Err(e) = db_res {
        tracing::warn!(error = %e, component = "database", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let cache_status = if let Err(e) = cache_res {
        tracing::warn!(error = %e, component = "cache", "Cache unreachable");
        "error"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        database: db_status.to_string(),
        cache: cache_status.to_string(),
    };

    (status_code, Json(response))
}
