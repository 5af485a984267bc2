use async_trait::async_trait;
use portal_core::model::UserId;

use super::SqliteRepository;
use super::mapping::db_err;
use crate::repository::{PreferencesStore, StorageError};

#[async_trait]
impl PreferencesStore for SqliteRepository {
    async fn get(&self, user_id: &UserId, key: &str) -> Result<Option<String>, StorageError> {
        sqlx::query_scalar("SELECT value FROM user_preferences WHERE user_id = ?1 AND key = ?2")
            .bind(user_id.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn set(&self, user_id: &UserId, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO user_preferences (user_id, key, value)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(user_id.as_str())
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn remove(&self, user_id: &UserId, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM user_preferences WHERE user_id = ?1 AND key = ?2")
            .bind(user_id.as_str())
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
