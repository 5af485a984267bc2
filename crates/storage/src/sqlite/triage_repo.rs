use async_trait::async_trait;
use portal_core::model::{Triage, TriageUpdate, UserId};
use sqlx::types::Json;

use super::SqliteRepository;
use super::mapping::{db_err, map_triage_row};
use crate::repository::{StorageError, TriageRepository};

#[async_trait]
impl TriageRepository for SqliteRepository {
    async fn get_triage(&self, user_id: &UserId) -> Result<Option<Triage>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id, legal_status, work_status, language_level, interests, urgencies
                FROM triage
                WHERE user_id = ?1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_triage_row).transpose()
    }

    async fn upsert_triage(&self, triage: &Triage) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO triage (
                    user_id, legal_status, work_status, language_level, interests, urgencies
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(user_id) DO UPDATE SET
                    legal_status = excluded.legal_status,
                    work_status = excluded.work_status,
                    language_level = excluded.language_level,
                    interests = excluded.interests,
                    urgencies = excluded.urgencies
            ",
        )
        .bind(triage.user_id.as_str())
        .bind(triage.legal_status.as_deref())
        .bind(triage.work_status.as_deref())
        .bind(triage.language_level.as_deref())
        .bind(Json(&triage.interests))
        .bind(Json(&triage.urgencies))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update_triage(
        &self,
        user_id: &UserId,
        update: &TriageUpdate,
    ) -> Result<(), StorageError> {
        let query = match update {
            TriageUpdate::Legal {
                legal_status,
                urgencies,
            } => sqlx::query("UPDATE triage SET legal_status = ?1, urgencies = ?2 WHERE user_id = ?3")
                .bind(legal_status.as_deref())
                .bind(Json(urgencies)),
            TriageUpdate::Work {
                work_status,
                interests,
            } => sqlx::query("UPDATE triage SET work_status = ?1, interests = ?2 WHERE user_id = ?3")
                .bind(work_status.as_deref())
                .bind(Json(interests)),
            TriageUpdate::Urgencies(urgencies) => {
                sqlx::query("UPDATE triage SET urgencies = ?1 WHERE user_id = ?2")
                    .bind(Json(urgencies))
            }
        };

        let res = query
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
