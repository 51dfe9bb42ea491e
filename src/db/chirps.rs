/// Chirp persistence
use crate::{
    db::models::Chirp,
    error::{ChirpError, ChirpResult},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Typed access to the chirps table
#[derive(Clone)]
pub struct ChirpStore {
    db: SqlitePool,
}

impl ChirpStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a chirp owned by `user_id`
    ///
    /// The owner must exist; a dangling owner is reported as an authentication
    /// failure because the caller's token names a user that is gone.
    pub async fn create_chirp(&self, user_id: Uuid, body: &str) -> ChirpResult<Chirp> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };

        sqlx::query(
            "INSERT INTO chirps (id, created_at, updated_at, body, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(chirp.id)
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .bind(&chirp.body)
        .bind(chirp.user_id)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return ChirpError::Authentication("User no longer exists".to_string());
                }
            }
            ChirpError::Database(e)
        })?;

        Ok(chirp)
    }

    pub async fn get_chirp(&self, id: Uuid) -> ChirpResult<Option<Chirp>> {
        let chirp = sqlx::query_as::<_, Chirp>(&format!(
            "SELECT {} FROM chirps WHERE id = ?1",
            CHIRP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(chirp)
    }

    /// All chirps, oldest first
    pub async fn list_chirps(&self) -> ChirpResult<Vec<Chirp>> {
        let chirps = sqlx::query_as::<_, Chirp>(&format!(
            "SELECT {} FROM chirps ORDER BY created_at ASC, rowid ASC",
            CHIRP_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(chirps)
    }

    /// Chirps of one author, oldest first
    pub async fn list_chirps_by_author(&self, user_id: Uuid) -> ChirpResult<Vec<Chirp>> {
        let chirps = sqlx::query_as::<_, Chirp>(&format!(
            "SELECT {} FROM chirps WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC",
            CHIRP_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(chirps)
    }

    /// Delete a chirp, returning whether a row was removed
    pub async fn delete_chirp(&self, id: Uuid) -> ChirpResult<bool> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, UserStore};

    #[tokio::test]
    async fn test_create_list_delete() {
        let pool = test_pool().await;
        let users = UserStore::new(pool.clone());
        let store = ChirpStore::new(pool);

        let alice = users.create_user("alice@example.com", "hash").await.unwrap();
        let bob = users.create_user("bob@example.com", "hash").await.unwrap();

        let first = store.create_chirp(alice.id, "first").await.unwrap();
        let second = store.create_chirp(bob.id, "second").await.unwrap();
        let third = store.create_chirp(alice.id, "third").await.unwrap();

        let all: Vec<Uuid> = store.list_chirps().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(all, vec![first.id, second.id, third.id]);

        let by_alice: Vec<Uuid> = store
            .list_chirps_by_author(alice.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(by_alice, vec![first.id, third.id]);

        assert!(store.delete_chirp(second.id).await.unwrap());
        assert!(!store.delete_chirp(second.id).await.unwrap());
        assert!(store.get_chirp(second.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chirp_requires_existing_owner() {
        let store = ChirpStore::new(test_pool().await);

        let err = store.create_chirp(Uuid::new_v4(), "orphan").await.unwrap_err();
        assert!(matches!(err, ChirpError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_chirps() {
        let pool = test_pool().await;
        let users = UserStore::new(pool.clone());
        let store = ChirpStore::new(pool);

        let alice = users.create_user("alice@example.com", "hash").await.unwrap();
        store.create_chirp(alice.id, "hello").await.unwrap();

        users.delete_all_users().await.unwrap();
        assert!(store.list_chirps().await.unwrap().is_empty());
    }
}
