/// Admin endpoints: hit counter page, Prometheus exposition, dev reset
use crate::{auth::policy, context::AppContext, error::ChirpResult};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

/// Build admin routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/admin/metrics", get(metrics_page))
        .route("/admin/metrics/prometheus", get(prometheus_metrics))
        .route("/admin/reset", post(reset))
}

async fn metrics_page(State(ctx): State<AppContext>) -> Html<String> {
    Html(format!(
        "<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>",
        ctx.metrics.file_server_hits()
    ))
}

async fn prometheus_metrics(State(ctx): State<AppContext>) -> ChirpResult<impl IntoResponse> {
    let body = ctx.metrics.render()?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

/// Wipe all users (and with them chirps and refresh tokens) and zero the hit
/// counter. Dev deployments only.
async fn reset(State(ctx): State<AppContext>) -> ChirpResult<&'static str> {
    policy::authorize_admin_reset(&ctx.config.service.platform).map_err(|denial| {
        tracing::warn!(platform = %ctx.config.service.platform, "admin reset refused");
        denial
    })?;

    let removed = ctx.users.delete_all_users().await?;
    ctx.metrics.reset_file_server_hits();

    tracing::info!(removed_users = removed, "server state reset");
    Ok("Hits reset to 0 and database reset to initial state.")
}
