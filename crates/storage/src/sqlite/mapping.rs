use portal_core::model::{
    ApplicationId, JobApplication, JobOffer, JobOfferId, Profile, Session, SessionId,
    SessionStatus, Trail, TrailId, TrailProgress, Triage, UserId,
};
use sqlx::Row;
use sqlx::types::Json;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Translate a driver error, surfacing absent tables as `RelationMissing`.
pub(crate) fn db_err(err: sqlx::Error) -> StorageError {
    if let Some(db) = err.as_database_error() {
        if let Some(relation) = db.message().strip_prefix("no such table: ") {
            let relation = relation.rsplit('.').next().unwrap_or(relation);
            tracing::warn!(relation, "backing table is missing");
            return StorageError::RelationMissing {
                relation: relation.to_owned(),
            };
        }
    }
    StorageError::Connection(err.to_string())
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<Profile, StorageError> {
    Ok(Profile {
        user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        name: row.try_get("name").map_err(ser)?,
        email: row.try_get("email").map_err(ser)?,
        phone: row.try_get("phone").map_err(ser)?,
        avatar_url: row.try_get("avatar_url").map_err(ser)?,
    })
}

pub(crate) fn map_session_row(row: &SqliteRow) -> Result<Session, StorageError> {
    let status: Option<String> = row.try_get("status").map_err(ser)?;
    Ok(Session {
        id: SessionId::new(row.try_get::<String, _>("id").map_err(ser)?),
        session_type: row.try_get("session_type").map_err(ser)?,
        scheduled_date: row.try_get("scheduled_date").map_err(ser)?,
        scheduled_time: row.try_get("scheduled_time").map_err(ser)?,
        participant_id: UserId::new(row.try_get::<String, _>("migrant_id").map_err(ser)?),
        professional_id: row
            .try_get::<Option<String>, _>("professional_id")
            .map_err(ser)?
            .map(UserId::new),
        status: SessionStatus::from_raw(status.as_deref()),
    })
}

pub(crate) fn map_trail_row(row: &SqliteRow) -> Result<Trail, StorageError> {
    Ok(Trail {
        id: TrailId::new(row.try_get::<String, _>("id").map_err(ser)?),
        title: row.try_get("title").map_err(ser)?,
        modules_count: row.try_get("modules_count").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<TrailProgress, StorageError> {
    Ok(TrailProgress {
        user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        trail_id: TrailId::new(row.try_get::<String, _>("trail_id").map_err(ser)?),
        progress_percent: row.try_get("progress_percent").map_err(ser)?,
        modules_completed: row.try_get("modules_completed").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}

pub(crate) fn map_offer_row(row: &SqliteRow) -> Result<JobOffer, StorageError> {
    Ok(JobOffer {
        id: JobOfferId::new(row.try_get::<String, _>("id").map_err(ser)?),
        title: row.try_get("title").map_err(ser)?,
    })
}

pub(crate) fn map_application_row(row: &SqliteRow) -> Result<JobApplication, StorageError> {
    Ok(JobApplication {
        id: ApplicationId::new(row.try_get::<String, _>("id").map_err(ser)?),
        applicant_id: UserId::new(row.try_get::<String, _>("applicant_id").map_err(ser)?),
        job_id: JobOfferId::new(row.try_get::<String, _>("job_id").map_err(ser)?),
        created_at: row.try_get("created_at").map_err(ser)?,
        status: row.try_get("status").map_err(ser)?,
    })
}

pub(crate) fn map_triage_row(row: &SqliteRow) -> Result<Triage, StorageError> {
    let interests: Json<Vec<String>> = row.try_get("interests").map_err(ser)?;
    let urgencies: Json<Vec<String>> = row.try_get("urgencies").map_err(ser)?;
    Ok(Triage {
        user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        legal_status: row.try_get("legal_status").map_err(ser)?,
        work_status: row.try_get("work_status").map_err(ser)?,
        language_level: row.try_get("language_level").map_err(ser)?,
        interests: interests.0,
        urgencies: urgencies.0,
    })
}
