/// Authentication core: password hashing, access and refresh tokens,
/// credential extraction, authorization policy, and the request extractors
/// that tie them to axum.
pub mod credentials;
pub mod password;
pub mod policy;
pub mod refresh;
pub mod token;

pub use credentials::{extract_api_key, extract_bearer, CredentialError};
pub use password::{PasswordError, PasswordHasher};
pub use policy::{Denial, WebhookAction};
pub use refresh::{mint_refresh_token, EntropyError};
pub use token::{AccessTokenCodec, TokenError, ACCESS_TOKEN_TTL};

use crate::{context::AppContext, error::ChirpError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

impl From<Denial> for ChirpError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthorized(msg) => ChirpError::Authentication(msg.to_string()),
            Denial::Forbidden(msg) => ChirpError::Authorization(msg.to_string()),
            Denial::NotFound(msg) => ChirpError::NotFound(msg.to_string()),
        }
    }
}

impl From<CredentialError> for ChirpError {
    fn from(err: CredentialError) -> Self {
        ChirpError::Authentication(err.to_string())
    }
}

impl From<TokenError> for ChirpError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => ChirpError::Internal(err.to_string()),
            _ => ChirpError::Authentication(err.to_string()),
        }
    }
}

impl From<PasswordError> for ChirpError {
    fn from(err: PasswordError) -> Self {
        ChirpError::Internal(err.to_string())
    }
}

impl From<EntropyError> for ChirpError {
    fn from(err: EntropyError) -> Self {
        ChirpError::Internal(err.to_string())
    }
}

/// Raw credential from an `Authorization: Bearer <value>` header
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ChirpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(extract_bearer(&parts.headers)?))
    }
}

/// Authenticated caller, resolved from a valid access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ChirpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)?;
        let user_id = policy::resolve_actor(state.sessions.codec(), &token)?;

        Ok(AuthUser { user_id })
    }
}
