/// Polka billing webhook
use crate::{
    api::extract::JsonBody,
    auth::{extract_api_key, policy, WebhookAction},
    context::AppContext,
    error::{ChirpError, ChirpResult},
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Build webhook routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/polka/webhooks", post(polka_webhook))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    /// Shape depends on the event, so it is only interpreted once the event is known
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
struct UpgradeData {
    user_id: Uuid,
}

/// Proof that the caller presented the shared webhook key
pub struct PolkaCaller;

#[async_trait]
impl FromRequestParts<AppContext> for PolkaCaller {
    type Rejection = ChirpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let presented = extract_api_key(&parts.headers).ok();

        policy::authorize_webhook(presented.as_deref(), &state.config.authentication.polka_key)
            .map_err(|denial| {
                tracing::warn!("webhook rejected: invalid API key");
                denial
            })?;

        Ok(PolkaCaller)
    }
}

async fn polka_webhook(
    State(ctx): State<AppContext>,
    _caller: PolkaCaller,
    JsonBody(req): JsonBody<WebhookRequest>,
) -> ChirpResult<StatusCode> {
    match policy::classify_webhook_event(&req.event) {
        WebhookAction::Ignore => {
            tracing::debug!(event = %req.event, "ignoring webhook event");
            Ok(StatusCode::NO_CONTENT)
        }
        WebhookAction::UpgradeUser => {
            let data: UpgradeData = serde_json::from_value(req.data)
                .map_err(|_| ChirpError::Validation("Couldn't decode webhook data".to_string()))?;

            ctx.users
                .upgrade_to_chirpy_red(data.user_id)
                .await?
                .ok_or_else(|| ChirpError::NotFound("User not found".to_string()))?;

            tracing::info!(user_id = %data.user_id, "user upgraded to Chirpy Red");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
