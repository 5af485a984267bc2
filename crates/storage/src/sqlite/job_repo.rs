use async_trait::async_trait;
use portal_core::model::{JobApplication, JobOffer, JobOfferId, UserId};
use sqlx::{QueryBuilder, Sqlite};

use super::SqliteRepository;
use super::mapping::{db_err, map_application_row, map_offer_row};
use crate::repository::{JobApplicationRepository, JobOfferRepository, StorageError};

#[async_trait]
impl JobApplicationRepository for SqliteRepository {
    async fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, applicant_id, job_id, created_at, status
                FROM job_applications
                WHERE applicant_id = ?1
                ORDER BY created_at DESC
            ",
        )
        .bind(applicant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_application_row).collect()
    }

    async fn upsert_application(&self, application: &JobApplication) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO job_applications (id, applicant_id, job_id, created_at, status)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                    applicant_id = excluded.applicant_id,
                    job_id = excluded.job_id,
                    created_at = excluded.created_at,
                    status = excluded.status
            ",
        )
        .bind(application.id.as_str())
        .bind(application.applicant_id.as_str())
        .bind(application.job_id.as_str())
        .bind(application.created_at)
        .bind(application.status.as_deref())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl JobOfferRepository for SqliteRepository {
    async fn offers_by_ids(&self, ids: &[JobOfferId]) -> Result<Vec<JobOffer>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, title FROM job_offers WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_offer_row).collect()
    }

    async fn upsert_offer(&self, offer: &JobOffer) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO job_offers (id, title)
                VALUES (?1, ?2)
                ON CONFLICT(id) DO UPDATE SET title = excluded.title
            ",
        )
        .bind(offer.id.as_str())
        .bind(&offer.title)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
