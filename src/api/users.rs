/// Account endpoints: registration and credential updates
use crate::{
    api::extract::JsonBody,
    auth::BearerToken,
    context::AppContext,
    error::ChirpResult,
    session::{CredentialsRequest, UserResponse},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};

/// Build account routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/users", post(create_user).put(update_user))
}

/// Register a new account
async fn create_user(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> ChirpResult<(StatusCode, Json<UserResponse>)> {
    let user = ctx.sessions.register(&req.email, &req.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Replace the caller's email and password
async fn update_user(
    State(ctx): State<AppContext>,
    BearerToken(access_token): BearerToken,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> ChirpResult<Json<UserResponse>> {
    let user = ctx
        .sessions
        .update_credentials(&access_token, &req.email, &req.password)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
