/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ChirpError, ChirpResult, ErrorResponse},
    metrics::{record_requests, track_file_server_hits},
};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::Json,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Static files under /app/, every request counted as a hit
    let file_server = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            ctx.metrics.clone(),
            track_file_server_hits,
        ))
        .service(ServeDir::new(&ctx.config.service.filepath_root));

    Router::new()
        .merge(crate::api::routes())
        .nest_service("/app", file_server)
        .fallback(not_found)
        .with_state(ctx.clone())
        .layer(middleware::from_fn_with_state(ctx.metrics.clone(), record_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Endpoint not found".to_string(),
        }),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ChirpResult<()> {
    let addr = format!("{}:{}", ctx.config.service.hostname, ctx.config.service.port);

    info!("Chirpy listening on {}", addr);
    info!("   Service URL: {}", ctx.service_url());
    info!("   Platform: {}", ctx.config.service.platform);
    info!("   Serving files from {:?} under /app/", ctx.config.service.filepath_root);

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChirpError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ChirpError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
