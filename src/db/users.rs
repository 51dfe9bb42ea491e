/// User persistence
use crate::{
    db::{conflict_on_unique, models::User},
    error::ChirpResult,
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, created_at, updated_at, email, hashed_password, is_chirpy_red";

/// Typed access to the users table
#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new user, failing with a conflict when the email is taken
    pub async fn create_user(&self, email: &str, hashed_password: &str) -> ChirpResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };

        sqlx::query(
            "INSERT INTO users (id, created_at, updated_at, email, hashed_password, is_chirpy_red)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(user.id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_chirpy_red)
        .execute(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with that email already exists"))?;

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> ChirpResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> ChirpResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Replace email and password hash; `None` when no user has this id
    pub async fn update_email_and_password(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> ChirpResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = ?1, hashed_password = ?2, updated_at = ?3
             WHERE id = ?4
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with that email already exists"))?;

        Ok(user)
    }

    /// Set the premium flag; `None` when no user has this id
    pub async fn upgrade_to_chirpy_red(&self, id: Uuid) -> ChirpResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = ?1
             WHERE id = ?2
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Remove every user; chirps and refresh tokens go with them
    pub async fn delete_all_users(&self) -> ChirpResult<u64> {
        let result = sqlx::query("DELETE FROM users").execute(&self.db).await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::ChirpError;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let store = UserStore::new(test_pool().await);

        let user = store.create_user("a@b.com", "hash").await.unwrap();
        assert!(!user.is_chirpy_red);

        let by_id = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");

        let by_email = store.get_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(store.get_user_by_email("missing@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = UserStore::new(test_pool().await);

        store.create_user("a@b.com", "hash").await.unwrap();
        let err = store.create_user("a@b.com", "other").await.unwrap_err();
        assert!(matches!(err, ChirpError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let store = UserStore::new(test_pool().await);

        let updated = store
            .update_email_and_password(Uuid::new_v4(), "x@y.com", "hash")
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_upgrade_and_delete_all() {
        let store = UserStore::new(test_pool().await);

        let user = store.create_user("a@b.com", "hash").await.unwrap();
        let upgraded = store.upgrade_to_chirpy_red(user.id).await.unwrap().unwrap();
        assert!(upgraded.is_chirpy_red);

        assert!(store.upgrade_to_chirpy_red(Uuid::new_v4()).await.unwrap().is_none());

        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.get_user(user.id).await.unwrap().is_none());
    }
}
