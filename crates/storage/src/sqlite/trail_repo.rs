use async_trait::async_trait;
use portal_core::model::{Trail, TrailId, TrailProgress, UserId};
use sqlx::{QueryBuilder, Sqlite};

use super::SqliteRepository;
use super::mapping::{db_err, map_progress_row, map_trail_row};
use crate::repository::{StorageError, TrailProgressRepository, TrailRepository};

#[async_trait]
impl TrailProgressRepository for SqliteRepository {
    async fn progress_for_user(&self, user_id: &UserId) -> Result<Vec<TrailProgress>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT user_id, trail_id, progress_percent, modules_completed, completed_at
                FROM user_trail_progress
                WHERE user_id = ?1
                ORDER BY trail_id ASC
            ",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_progress_row).collect()
    }

    async fn upsert_progress(&self, progress: &TrailProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO user_trail_progress (
                    user_id, trail_id, progress_percent, modules_completed, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(user_id, trail_id) DO UPDATE SET
                    progress_percent = excluded.progress_percent,
                    modules_completed = excluded.modules_completed,
                    completed_at = excluded.completed_at
            ",
        )
        .bind(progress.user_id.as_str())
        .bind(progress.trail_id.as_str())
        .bind(progress.progress_percent)
        .bind(progress.modules_completed)
        .bind(progress.completed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl TrailRepository for SqliteRepository {
    async fn trails_by_ids(&self, ids: &[TrailId]) -> Result<Vec<Trail>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, title, modules_count FROM trails WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_trail_row).collect()
    }

    async fn upsert_trail(&self, trail: &Trail) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO trails (id, title, modules_count)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    modules_count = excluded.modules_count
            ",
        )
        .bind(trail.id.as_str())
        .bind(&trail.title)
        .bind(trail.modules_count)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
