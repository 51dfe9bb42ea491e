/// Session endpoints: login, access token refresh, refresh token revocation
use crate::{
    api::extract::JsonBody,
    auth::BearerToken,
    context::AppContext,
    error::ChirpResult,
    session::{CredentialsRequest, LoginResponse, RefreshResponse},
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// Build session routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

async fn login(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> ChirpResult<Json<LoginResponse>> {
    let outcome = ctx.sessions.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse::from(outcome)))
}

/// Exchange the refresh token in the Authorization header for a new access token
async fn refresh(
    State(ctx): State<AppContext>,
    BearerToken(refresh_token): BearerToken,
) -> ChirpResult<Json<RefreshResponse>> {
    let token = ctx.sessions.refresh(&refresh_token).await?;

    Ok(Json(RefreshResponse { token }))
}

async fn revoke(
    State(ctx): State<AppContext>,
    BearerToken(refresh_token): BearerToken,
) -> ChirpResult<StatusCode> {
    ctx.sessions.revoke(&refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
