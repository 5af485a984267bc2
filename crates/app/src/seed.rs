use chrono::{Duration, NaiveTime};

use portal_core::Clock;
use portal_core::model::{
    ApplicationId, JobApplication, JobOffer, JobOfferId, Profile, Session, SessionId,
    SessionStatus, Trail, TrailId, TrailProgress, Triage, UserId,
};
use storage::repository::{Storage, StorageError};

pub const DEMO_MIGRANT: &str = "migrant-maria";
pub const DEMO_CANDIDATE: &str = "migrant-ahmed";

/// Insert a small demo data set. Re-running overwrites the same rows.
pub async fn seed_demo(storage: &Storage, clock: Clock) -> Result<usize, StorageError> {
    let now = clock.now();
    let today = clock.today();
    let maria = UserId::new(DEMO_MIGRANT);
    let ahmed = UserId::new(DEMO_CANDIDATE);
    let mut written = 0;

    for (user, name, email) in [
        (&maria, "Maria Silva", "maria.silva@example.com"),
        (&ahmed, "Ahmed Hassan", "ahmed.hassan@example.com"),
    ] {
        storage
            .profiles
            .upsert_profile(&Profile {
                user_id: user.clone(),
                name: name.to_owned(),
                email: email.to_owned(),
                phone: None,
                avatar_url: None,
            })
            .await?;
        written += 1;
    }

    let at = |hour| NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let sessions = [
        ("sess-1", &maria, "legal", -7, 10, SessionStatus::Completed),
        ("sess-2", &maria, "psychological", 0, 15, SessionStatus::Confirmed),
        ("sess-3", &maria, "legal", 3, 9, SessionStatus::Scheduled),
        ("sess-4", &maria, "psychological", 12, 11, SessionStatus::Cancelled),
        ("sess-5", &ahmed, "legal", 2, 14, SessionStatus::Scheduled),
    ];
    for (id, user, kind, offset, hour, status) in sessions {
        storage
            .sessions
            .upsert_session(&Session {
                id: SessionId::new(id),
                session_type: kind.to_owned(),
                scheduled_date: today + Duration::days(offset),
                scheduled_time: at(hour),
                participant_id: user.clone(),
                professional_id: Some(UserId::new("pro-lawyer-1")),
                status,
            })
            .await?;
        written += 1;
    }

    for (id, title, modules) in [
        ("trail-rights", "Workers' rights", 5),
        ("trail-language", "Portuguese for work", 12),
        ("trail-cv", "Writing a CV", 3),
    ] {
        storage
            .trails
            .upsert_trail(&Trail {
                id: TrailId::new(id),
                title: title.to_owned(),
                modules_count: Some(modules),
            })
            .await?;
        written += 1;
    }

    let progress = [
        (&maria, "trail-rights", 100, 5, Some(now - Duration::days(4))),
        (&maria, "trail-language", 25, 3, None),
        (&ahmed, "trail-cv", 66, 2, None),
    ];
    for (user, trail, percent, modules, completed_at) in progress {
        storage
            .progress
            .upsert_progress(&TrailProgress {
                user_id: user.clone(),
                trail_id: TrailId::new(trail),
                progress_percent: Some(percent),
                modules_completed: Some(modules),
                completed_at,
            })
            .await?;
        written += 1;
    }

    for (id, title) in [("job-kitchen", "Kitchen assistant"), ("job-driver", "Delivery driver")] {
        storage
            .offers
            .upsert_offer(&JobOffer {
                id: JobOfferId::new(id),
                title: title.to_owned(),
            })
            .await?;
        written += 1;
    }

    for (id, job, days_ago, status) in [
        ("app-1", "job-kitchen", 9, "reviewing"),
        ("app-2", "job-driver", 2, "pending"),
    ] {
        storage
            .applications
            .upsert_application(&JobApplication {
                id: ApplicationId::new(id),
                applicant_id: ahmed.clone(),
                job_id: JobOfferId::new(job),
                created_at: now - Duration::days(days_ago),
                status: Some(status.to_owned()),
            })
            .await?;
        written += 1;
    }

    storage
        .triage
        .upsert_triage(&Triage {
            user_id: maria.clone(),
            legal_status: Some("Awaiting residence permit".to_owned()),
            work_status: Some("Seeking work".to_owned()),
            language_level: Some("A2".to_owned()),
            interests: vec!["hospitality".to_owned(), "cooking".to_owned()],
            urgencies: vec!["legal".to_owned()],
        })
        .await?;
    written += 1;

    Ok(written)
}
