/// Refresh token persistence
///
/// Tokens are stored by their raw value. All validity state (owner, expiry,
/// revocation) lives here; the token string itself carries nothing.
use crate::{
    db::models::{RefreshToken, User},
    error::ChirpResult,
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// How long a refresh token may be exchanged before it lapses
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

/// Typed access to the refresh_tokens table
#[derive(Clone)]
pub struct RefreshTokenStore {
    db: SqlitePool,
}

impl RefreshTokenStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Persist a freshly minted token for `user_id`
    pub async fn create_refresh_token(&self, token: &str, user_id: Uuid) -> ChirpResult<RefreshToken> {
        let now = Utc::now();
        let record = RefreshToken {
            token: token.to_string(),
            created_at: now,
            updated_at: now,
            user_id,
            expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
        };

        sqlx::query(
            "INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
        )
        .bind(&record.token)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.user_id)
        .bind(record.expires_at)
        .execute(&self.db)
        .await?;

        Ok(record)
    }

    /// Owner of a token that is neither revoked nor expired
    pub async fn get_user_from_refresh_token(&self, token: &str) -> ChirpResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT users.id, users.created_at, users.updated_at, users.email,
                    users.hashed_password, users.is_chirpy_red
             FROM refresh_tokens
             JOIN users ON users.id = refresh_tokens.user_id
             WHERE refresh_tokens.token = ?1
               AND refresh_tokens.revoked_at IS NULL
               AND refresh_tokens.expires_at > ?2",
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Mark a token revoked. Unknown or already revoked tokens are left alone.
    ///
    /// Returns the number of rows that changed state.
    pub async fn revoke_refresh_token(&self, token: &str) -> ChirpResult<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ?1, updated_at = ?1
             WHERE token = ?2 AND revoked_at IS NULL",
        )
        .bind(now)
        .bind(token)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, UserStore};

    #[tokio::test]
    async fn test_token_lifecycle() {
        let pool = test_pool().await;
        let users = UserStore::new(pool.clone());
        let store = RefreshTokenStore::new(pool);

        let user = users.create_user("a@b.com", "hash").await.unwrap();
        let record = store.create_refresh_token("abc123", user.id).await.unwrap();
        assert_eq!(
            record.expires_at - record.created_at,
            Duration::days(REFRESH_TOKEN_LIFETIME_DAYS)
        );

        let owner = store.get_user_from_refresh_token("abc123").await.unwrap().unwrap();
        assert_eq!(owner.id, user.id);

        // Lookup does not consume the token
        assert!(store.get_user_from_refresh_token("abc123").await.unwrap().is_some());

        assert_eq!(store.revoke_refresh_token("abc123").await.unwrap(), 1);
        assert!(store.get_user_from_refresh_token("abc123").await.unwrap().is_none());

        // Second revoke is a no-op
        assert_eq!(store.revoke_refresh_token("abc123").await.unwrap(), 0);
        assert_eq!(store.revoke_refresh_token("unknown").await.unwrap(), 0);
    }

    async fn revoked_at(pool: &SqlitePool, token: &str) -> Option<chrono::DateTime<Utc>> {
        sqlx::query_scalar("SELECT revoked_at FROM refresh_tokens WHERE token = ?1")
            .bind(token)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_revocation_is_recorded_in_table() {
        let pool = test_pool().await;
        let users = UserStore::new(pool.clone());
        let store = RefreshTokenStore::new(pool.clone());

        let user = users.create_user("a@b.com", "hash").await.unwrap();
        store.create_refresh_token("abc123", user.id).await.unwrap();

        assert!(revoked_at(&pool, "abc123").await.is_none());
        store.revoke_refresh_token("abc123").await.unwrap();
        let first = revoked_at(&pool, "abc123").await.unwrap();

        // A second revoke keeps the original timestamp
        store.revoke_refresh_token("abc123").await.unwrap();
        assert_eq!(revoked_at(&pool, "abc123").await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let pool = test_pool().await;
        let users = UserStore::new(pool.clone());
        let store = RefreshTokenStore::new(pool.clone());

        let user = users.create_user("a@b.com", "hash").await.unwrap();
        store.create_refresh_token("old", user.id).await.unwrap();

        sqlx::query("UPDATE refresh_tokens SET expires_at = ?1 WHERE token = 'old'")
            .bind(Utc::now() - Duration::seconds(1))
            .execute(&pool)
            .await
            .unwrap();

        assert!(store.get_user_from_refresh_token("old").await.unwrap().is_none());
    }
}
