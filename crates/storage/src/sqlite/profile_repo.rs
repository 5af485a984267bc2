use async_trait::async_trait;
use portal_core::model::{Profile, ProfileContact, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_profile_row};
use crate::repository::{ProfileRepository, StorageError};

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id, name, email, phone, avatar_url
                FROM profiles
                WHERE user_id = ?1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO profiles (user_id, name, email, phone, avatar_url)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(user_id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email,
                    phone = excluded.phone,
                    avatar_url = excluded.avatar_url
            ",
        )
        .bind(profile.user_id.as_str())
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.phone.as_deref())
        .bind(profile.avatar_url.as_deref())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update_profile_contact(
        &self,
        user_id: &UserId,
        contact: &ProfileContact,
    ) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE profiles SET name = ?1, phone = ?2 WHERE user_id = ?3")
            .bind(contact.name())
            .bind(contact.phone())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_avatar_url(
        &self,
        user_id: &UserId,
        avatar_url: Option<&str>,
    ) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE profiles SET avatar_url = ?1 WHERE user_id = ?2")
            .bind(avatar_url)
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn count_profiles(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        u64::try_from(count)
            .map_err(|_| StorageError::Serialization(format!("invalid count: {count}")))
    }
}
