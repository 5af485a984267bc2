use chrono::{Duration, NaiveDate, NaiveTime};

use portal_core::model::{
    ApplicationId, JobApplication, JobOffer, JobOfferId, Profile, ProfileContactDraft, Session,
    SessionId, SessionStatus, Trail, TrailId, TrailProgress, Triage, TriageUpdate, UserId,
};
use portal_core::time::fixed_now;
use services::{AppServices, Clock, ProfileServiceError, ResumeSections, SessionListQuery};
use storage::repository::Storage;

fn session(id: &str, user: &UserId, date: NaiveDate, status: SessionStatus) -> Session {
    Session {
        id: SessionId::new(id),
        session_type: "psychological".into(),
        scheduled_date: date,
        scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        participant_id: user.clone(),
        professional_id: Some(UserId::new("pro-1")),
        status,
    }
}

async fn seed(storage: &Storage, user: &UserId) {
    let today = fixed_now().date_naive();
    for s in [
        session("s-past", user, today - Duration::days(3), SessionStatus::Completed),
        session("s-later", user, today + Duration::days(5), SessionStatus::Scheduled),
        session("s-today", user, today, SessionStatus::Confirmed),
    ] {
        storage.sessions.upsert_session(&s).await.unwrap();
    }

    for (id, title, modules) in [("t-law", "Labour law", 4), ("t-lang", "Portuguese A2", 10)] {
        storage
            .trails
            .upsert_trail(&Trail {
                id: TrailId::new(id),
                title: title.into(),
                modules_count: Some(modules),
            })
            .await
            .unwrap();
    }
    storage
        .progress
        .upsert_progress(&TrailProgress {
            user_id: user.clone(),
            trail_id: TrailId::new("t-law"),
            progress_percent: Some(100),
            modules_completed: Some(4),
            completed_at: Some(fixed_now() - Duration::days(1)),
        })
        .await
        .unwrap();
    storage
        .progress
        .upsert_progress(&TrailProgress {
            user_id: user.clone(),
            trail_id: TrailId::new("t-lang"),
            progress_percent: Some(30),
            modules_completed: Some(3),
            completed_at: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn migrant_dashboard_over_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_migrant_dashboard?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let user = UserId::new("migrant-1");
    seed(&storage, &user).await;
    let mut triage = Triage::empty(user.clone());
    triage.language_level = Some("A1".into());
    storage.triage.upsert_triage(&triage).await.unwrap();

    let app = AppServices::new(storage, Clock::fixed(fixed_now()));
    app.preferences()
        .toggle_favorite(&user, &TrailId::new("t-lang"))
        .await
        .expect("toggle favorite");

    let dashboard = app
        .migrant_dashboard()
        .load(&user)
        .await
        .expect("load dashboard");

    let upcoming: Vec<_> = dashboard
        .session_view
        .upcoming
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(upcoming, ["s-today", "s-later"]);
    assert_eq!(dashboard.session_view.past.len(), 1);

    assert_eq!(
        dashboard.status_options,
        ["All", "Completed", "Confirmed", "Scheduled"]
    );

    assert_eq!(dashboard.trails.completed.len(), 1);
    assert_eq!(dashboard.trails.completed[0].title, "Labour law");
    assert_eq!(dashboard.trails.in_progress.len(), 1);
    assert_eq!(dashboard.trails.in_progress[0].total_modules, 10);
    assert!(dashboard.trails.in_progress[0].is_favorite);
    assert_eq!(dashboard.trails.favorites.len(), 1);
    assert_eq!(
        dashboard.triage.as_ref().and_then(|t| t.language_level.as_deref()),
        Some("A1")
    );

    let page = dashboard.session_page(&SessionListQuery {
        page_size: 2,
        ..SessionListQuery::default()
    });
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].id.as_str(), "s-past");
}

#[tokio::test]
async fn candidate_profile_joins_offers_and_hides_resume_without_profile() {
    let storage = Storage::in_memory();
    let candidate = UserId::new("cand-1");
    seed(&storage, &candidate).await;

    storage
        .offers
        .upsert_offer(&JobOffer {
            id: JobOfferId::new("job-1"),
            title: "Warehouse assistant".into(),
        })
        .await
        .unwrap();
    for (id, job, days_ago) in [("a-old", "job-1", 10), ("a-new", "job-gone", 1)] {
        storage
            .applications
            .upsert_application(&JobApplication {
                id: ApplicationId::new(id),
                applicant_id: candidate.clone(),
                job_id: JobOfferId::new(job),
                created_at: fixed_now() - Duration::days(days_ago),
                status: Some("pending".into()),
            })
            .await
            .unwrap();
    }

    let app = AppServices::new(storage.clone(), Clock::fixed(fixed_now()));
    app.preferences()
        .set_resume_url(&candidate, "https://files.example.com/cv/cand-1.pdf")
        .await
        .unwrap();

    let view = app
        .candidate_profiles()
        .load(&candidate)
        .await
        .expect("load candidate");
    assert!(view.profile.is_none());
    assert!(view.resume_url.is_none());
    let titles: Vec<_> = view
        .applications
        .iter()
        .map(|a| a.job_title.as_str())
        .collect();
    assert_eq!(titles, ["Offer", "Warehouse assistant"]);
    assert_eq!(view.sessions.first().unwrap().id.as_str(), "s-past");
    assert!(view.trails.favorites.is_empty());

    storage
        .profiles
        .upsert_profile(&Profile {
            user_id: candidate.clone(),
            name: "Maria Silva".into(),
            email: "maria@example.com".into(),
            phone: None,
            avatar_url: None,
        })
        .await
        .unwrap();
    let view = app.candidate_profiles().load(&candidate).await.unwrap();
    assert_eq!(
        view.resume_url.as_deref(),
        Some("https://files.example.com/cv/cand-1.pdf")
    );
}

#[tokio::test]
async fn profile_edits_over_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_profile_edits?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let user = UserId::new("migrant-2");
    storage
        .profiles
        .upsert_profile(&Profile {
            user_id: user.clone(),
            name: "Ahmed".into(),
            email: "ahmed@example.com".into(),
            phone: None,
            avatar_url: None,
        })
        .await
        .unwrap();
    storage
        .triage
        .upsert_triage(&Triage::empty(user.clone()))
        .await
        .unwrap();

    let app = AppServices::new(storage, Clock::fixed(fixed_now()));
    let profiles = app.profiles();

    let rejected = profiles
        .save_contact(
            &user,
            ProfileContactDraft {
                name: "   ".into(),
                phone: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(rejected, ProfileServiceError::Profile(_)));

    profiles
        .save_contact(
            &user,
            ProfileContactDraft {
                name: " Ahmed Hassan ".into(),
                phone: Some("+351 910 000 002".into()),
            },
        )
        .await
        .expect("save contact");
    profiles
        .set_avatar_url(&user, Some("https://cdn.example.com/avatars/a.png"))
        .await
        .expect("set avatar");

    let stored = profiles.get(&user).await.unwrap().expect("profile");
    assert_eq!(stored.name, "Ahmed Hassan");
    assert_eq!(stored.phone.as_deref(), Some("+351 910 000 002"));
    assert_eq!(
        stored.avatar_url.as_deref(),
        Some("https://cdn.example.com/avatars/a.png")
    );

    let triage = profiles
        .update_triage(&user, &TriageUpdate::work("Employed", "logistics, driving"))
        .await
        .expect("update triage");
    assert_eq!(triage.interests, ["logistics", "driving"]);

    let resume = profiles
        .generate_resume(
            &user,
            &ResumeSections {
                skills: "Forklift licence".into(),
                ..ResumeSections::default()
            },
        )
        .await
        .unwrap();
    assert!(resume.contains("Phone: +351 910 000 002\n"));
    assert!(resume.contains("Skills:\nForklift licence\n"));
}
