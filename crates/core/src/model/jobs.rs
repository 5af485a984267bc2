use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ApplicationId, JobOfferId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: JobOfferId,
    pub title: String,
}

/// A candidate's application to a job offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub applicant_id: UserId,
    pub job_id: JobOfferId,
    pub created_at: DateTime<Utc>,
    pub status: Option<String>,
}
