/// Chirp endpoints
use crate::{
    api::extract::JsonBody,
    auth::{policy, AuthUser},
    context::AppContext,
    db::Chirp,
    error::{ChirpError, ChirpResult},
    validation::{censor_profanity, validate_request},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Build chirp routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/chirps", get(list_chirps).post(create_chirp))
        .route("/api/chirps/:chirp_id", get(get_chirp).delete(delete_chirp))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChirpRequest {
    #[validate(length(max = 140, message = "Chirp is too long"))]
    pub body: String,
}

/// Chirp as shown to clients, body already censored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: censor_profanity(&chirp.body),
            user_id: chirp.user_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsParams {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Only an explicit "desc" reverses the default order
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

async fn create_chirp(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    JsonBody(req): JsonBody<CreateChirpRequest>,
) -> ChirpResult<(StatusCode, Json<ChirpResponse>)> {
    validate_request(&req)?;

    let chirp = ctx.chirps.create_chirp(user_id, &req.body).await?;

    tracing::debug!(chirp_id = %chirp.id, user_id = %user_id, "chirp created");
    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

async fn list_chirps(
    State(ctx): State<AppContext>,
    Query(params): Query<ListChirpsParams>,
) -> ChirpResult<Json<Vec<ChirpResponse>>> {
    let chirps = match params.author_id.as_deref().filter(|id| !id.is_empty()) {
        Some(raw) => {
            let author_id = parse_id(raw, "Couldn't parse author ID")?;
            ctx.chirps.list_chirps_by_author(author_id).await?
        }
        None => ctx.chirps.list_chirps().await?,
    };

    let mut chirps: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    if SortOrder::parse(params.sort.as_deref()) == SortOrder::Descending {
        chirps.reverse();
    }

    Ok(Json(chirps))
}

async fn get_chirp(
    State(ctx): State<AppContext>,
    Path(chirp_id): Path<String>,
) -> ChirpResult<Json<ChirpResponse>> {
    let chirp_id = parse_id(&chirp_id, "Invalid chirp ID")?;

    let chirp = ctx
        .chirps
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| ChirpError::NotFound("Chirp not found".to_string()))?;

    Ok(Json(ChirpResponse::from(chirp)))
}

/// Delete one of the caller's own chirps
async fn delete_chirp(
    State(ctx): State<AppContext>,
    AuthUser { user_id }: AuthUser,
    Path(chirp_id): Path<String>,
) -> ChirpResult<StatusCode> {
    // A malformed id cannot name an existing chirp
    let chirp = match Uuid::parse_str(&chirp_id) {
        Ok(id) => ctx.chirps.get_chirp(id).await?,
        Err(_) => None,
    };

    policy::authorize_chirp_deletion(user_id, chirp.as_ref()).map_err(|denial| {
        tracing::warn!(user_id = %user_id, chirp_id = %chirp_id, ?denial, "chirp deletion denied");
        denial
    })?;

    if let Some(chirp) = chirp {
        ctx.chirps.delete_chirp(chirp.id).await?;
        tracing::debug!(chirp_id = %chirp.id, "chirp deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str, message: &str) -> ChirpResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ChirpError::Validation(message.to_string()))
}
