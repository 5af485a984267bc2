use async_trait::async_trait;
use portal_core::model::{Session, SortOrder, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_session_row};
use crate::repository::{SessionRepository, StorageError};

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn sessions_for_participant(
        &self,
        participant_id: &UserId,
        order: SortOrder,
    ) -> Result<Vec<Session>, StorageError> {
        let sql = match order {
            SortOrder::Asc => {
                r"
                    SELECT id, session_type, scheduled_date, scheduled_time,
                           migrant_id, professional_id, status
                    FROM sessions
                    WHERE migrant_id = ?1
                    ORDER BY scheduled_date ASC, scheduled_time ASC, rowid ASC
                "
            }
            SortOrder::Desc => {
                r"
                    SELECT id, session_type, scheduled_date, scheduled_time,
                           migrant_id, professional_id, status
                    FROM sessions
                    WHERE migrant_id = ?1
                    ORDER BY scheduled_date DESC, scheduled_time DESC, rowid ASC
                "
            }
        };

        let rows = sqlx::query(sql)
            .bind(participant_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_session_row).collect()
    }

    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO sessions (
                    id, session_type, scheduled_date, scheduled_time,
                    migrant_id, professional_id, status
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    session_type = excluded.session_type,
                    scheduled_date = excluded.scheduled_date,
                    scheduled_time = excluded.scheduled_time,
                    migrant_id = excluded.migrant_id,
                    professional_id = excluded.professional_id,
                    status = excluded.status
            ",
        )
        .bind(session.id.as_str())
        .bind(&session.session_type)
        .bind(session.scheduled_date)
        .bind(session.scheduled_time)
        .bind(session.participant_id.as_str())
        .bind(session.professional_id.as_ref().map(|id| id.as_str()))
        .bind(session.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
