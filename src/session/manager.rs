/// Session orchestration over the user and refresh token stores
use crate::{
    auth::{mint_refresh_token, policy, AccessTokenCodec, PasswordHasher, ACCESS_TOKEN_TTL},
    db::{RefreshTokenStore, User, UserStore},
    error::{ChirpError, ChirpResult},
};

/// Message for every login failure, so a caller cannot tell a missing
/// account from a wrong password
const LOGIN_FAILED: &str = "Incorrect email or password";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Session manager service
pub struct SessionManager {
    users: UserStore,
    refresh_tokens: RefreshTokenStore,
    codec: AccessTokenCodec,
}

impl SessionManager {
    pub fn new(users: UserStore, refresh_tokens: RefreshTokenStore, codec: AccessTokenCodec) -> Self {
        Self {
            users,
            refresh_tokens,
            codec,
        }
    }

    /// Access token codec shared with request extractors
    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    /// Create a new account
    pub async fn register(&self, email: &str, password: &str) -> ChirpResult<User> {
        let hashed_password = hash_password(password.to_string()).await?;
        let user = self.users.create_user(email, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate and issue an access token plus a persisted refresh token
    pub async fn login(&self, email: &str, password: &str) -> ChirpResult<LoginOutcome> {
        let user = match self.users.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                // Spend the same work as a verification so timing doesn't reveal the miss
                hash_password(password.to_string()).await?;
                tracing::debug!("login rejected: unknown email");
                return Err(ChirpError::Authentication(LOGIN_FAILED.to_string()));
            }
        };

        if !verify_password(password.to_string(), user.hashed_password.clone()).await? {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(ChirpError::Authentication(LOGIN_FAILED.to_string()));
        }

        let access_token = self.codec.mint(user.id, ACCESS_TOKEN_TTL)?;
        let record = self
            .refresh_tokens
            .create_refresh_token(&mint_refresh_token()?, user.id)
            .await?;

        tracing::info!(user_id = %user.id, refresh_expires_at = %record.expires_at, "session created");
        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token: record.token,
        })
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh token is not rotated; it stays valid until revoked.
    pub async fn refresh(&self, refresh_token: &str) -> ChirpResult<String> {
        let user = self
            .refresh_tokens
            .get_user_from_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| ChirpError::Authentication("Couldn't access refresh token".to_string()))?;

        let access_token = self.codec.mint(user.id, ACCESS_TOKEN_TTL)?;

        tracing::debug!(user_id = %user.id, "access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token. Unknown and already revoked tokens succeed silently.
    pub async fn revoke(&self, refresh_token: &str) -> ChirpResult<()> {
        let revoked = self.refresh_tokens.revoke_refresh_token(refresh_token).await?;

        tracing::debug!(revoked, "refresh token revocation processed");
        Ok(())
    }

    /// Replace the email and password of the user named by `access_token`
    pub async fn update_credentials(
        &self,
        access_token: &str,
        email: &str,
        password: &str,
    ) -> ChirpResult<User> {
        let user_id = policy::resolve_actor(&self.codec, access_token)?;
        let hashed_password = hash_password(password.to_string()).await?;

        let user = self
            .users
            .update_email_and_password(user_id, email, &hashed_password)
            .await?
            .ok_or_else(|| ChirpError::Authentication("Couldn't update email and password".to_string()))?;

        tracing::info!(user_id = %user.id, "credentials updated");
        Ok(user)
    }
}

/// Argon2 is deliberately slow, keep it off the async workers
async fn hash_password(password: String) -> ChirpResult<String> {
    let hashed = tokio::task::spawn_blocking(move || PasswordHasher::hash(&password))
        .await
        .map_err(|e| ChirpError::Internal(format!("Password hashing task failed: {}", e)))??;

    Ok(hashed)
}

async fn verify_password(password: String, hash: String) -> ChirpResult<bool> {
    let matches = tokio::task::spawn_blocking(move || PasswordHasher::verify(&password, &hash))
        .await
        .map_err(|e| ChirpError::Internal(format!("Password verification task failed: {}", e)))??;

    Ok(matches)
}
