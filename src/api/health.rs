/// Health check endpoints
///
/// - `/api/healthz`: liveness, plain "OK" whenever the process can answer
/// - `/api/readyz`: readiness, 503 when the database is unreachable
use crate::{context::AppContext, db};
use axum::{extract::State, http::StatusCode, routing::get, Router};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/healthz", get(liveness_probe))
        .route("/api/readyz", get(readiness_probe))
}

pub async fn liveness_probe() -> &'static str {
    "OK"
}

pub async fn readiness_probe(State(ctx): State<AppContext>) -> (StatusCode, &'static str) {
    if let Err(e) = db::test_connection(&ctx.db).await {
        tracing::warn!(error = %e, "readiness_probe_failed: database check failed");
        return (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    (StatusCode::OK, "OK")
}
