use async_trait::async_trait;
use portal_core::model::{
    JobApplication, JobOffer, JobOfferId, Profile, ProfileContact, Session, SortOrder, Trail,
    TrailId, TrailProgress, Triage, TriageUpdate, UserId,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("relation '{relation}' does not exist")]
    RelationMissing { relation: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Code recognized upstream when a backing table is absent.
    pub const RELATION_MISSING: &'static str = "relation missing";

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::RelationMissing { .. } => Self::RELATION_MISSING,
            Self::Connection(_) => "connection",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Identity-service profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by user id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing profile is `Ok(None)`.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StorageError>;

    /// Upsert a profile row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError>;

    /// Overwrite name and phone of an existing profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the profile does not exist.
    async fn update_profile_contact(
        &self,
        user_id: &UserId,
        contact: &ProfileContact,
    ) -> Result<(), StorageError>;

    /// Point the profile at a new avatar; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the profile does not exist.
    async fn update_avatar_url(
        &self,
        user_id: &UserId,
        avatar_url: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Count all profiles; used as a connectivity probe.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::RelationMissing` when the table is absent.
    async fn count_profiles(&self) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Sessions of one participant, ordered by scheduled date then time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn sessions_for_participant(
        &self,
        participant_id: &UserId,
        order: SortOrder,
    ) -> Result<Vec<Session>, StorageError>;

    /// Persist or update a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError>;
}

#[async_trait]
pub trait TrailProgressRepository: Send + Sync {
    /// All progress rows of a user (one per trail).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn progress_for_user(&self, user_id: &UserId) -> Result<Vec<TrailProgress>, StorageError>;

    /// Persist or update the row keyed by `(user_id, trail_id)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_progress(&self, progress: &TrailProgress) -> Result<(), StorageError>;
}

#[async_trait]
pub trait TrailRepository: Send + Sync {
    /// Trails whose id is in `ids`. Unknown ids are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn trails_by_ids(&self, ids: &[TrailId]) -> Result<Vec<Trail>, StorageError>;

    /// Persist or update a trail.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the trail cannot be stored.
    async fn upsert_trail(&self, trail: &Trail) -> Result<(), StorageError>;
}

#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// Applications of one candidate, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StorageError>;

    /// Persist or update an application.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the application cannot be stored.
    async fn upsert_application(&self, application: &JobApplication) -> Result<(), StorageError>;
}

#[async_trait]
pub trait JobOfferRepository: Send + Sync {
    /// Offers whose id is in `ids`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn offers_by_ids(&self, ids: &[JobOfferId]) -> Result<Vec<JobOffer>, StorageError>;

    /// Persist or update an offer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the offer cannot be stored.
    async fn upsert_offer(&self, offer: &JobOffer) -> Result<(), StorageError>;
}

/// User-scoped key/value store for advisory UI preferences.
///
/// Values are opaque strings; callers own the payload format.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing key is `Ok(None)`.
    async fn get(&self, user_id: &UserId, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, user_id: &UserId, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. Removing a missing key is not an error.
    async fn remove(&self, user_id: &UserId, key: &str) -> Result<(), StorageError>;
}

/// Intake records, one per migrant.
#[async_trait]
pub trait TriageRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; no record is `Ok(None)`.
    async fn get_triage(&self, user_id: &UserId) -> Result<Option<Triage>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_triage(&self, triage: &Triage) -> Result<(), StorageError>;

    /// Apply a partial edit to an existing record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user has no record.
    async fn update_triage(
        &self,
        user_id: &UserId,
        update: &TriageUpdate,
    ) -> Result<(), StorageError>;
}

pub(crate) fn compare_schedule(a: &Session, b: &Session, order: SortOrder) -> Ordering {
    let asc = (a.scheduled_date, a.scheduled_time).cmp(&(b.scheduled_date, b.scheduled_time));
    match order {
        SortOrder::Asc => asc,
        SortOrder::Desc => asc.reverse(),
    }
}

#[derive(Default)]
struct Tables {
    profiles: BTreeMap<UserId, Profile>,
    sessions: Vec<Session>,
    progress: BTreeMap<(UserId, TrailId), TrailProgress>,
    trails: BTreeMap<TrailId, Trail>,
    applications: Vec<JobApplication>,
    offers: BTreeMap<JobOfferId, JobOffer>,
    preferences: HashMap<(UserId, String), String>,
    triage: BTreeMap<UserId, Triage>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StorageError> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StorageError> {
        self.with_tables(|t| t.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.profiles.insert(profile.user_id.clone(), profile.clone());
        })
    }

    async fn update_profile_contact(
        &self,
        user_id: &UserId,
        contact: &ProfileContact,
    ) -> Result<(), StorageError> {
        self.with_tables(|t| {
            let profile = t.profiles.get_mut(user_id).ok_or(StorageError::NotFound)?;
            profile.name = contact.name().to_owned();
            profile.phone = contact.phone().map(str::to_owned);
            Ok(())
        })?
    }

    async fn update_avatar_url(
        &self,
        user_id: &UserId,
        avatar_url: Option<&str>,
    ) -> Result<(), StorageError> {
        self.with_tables(|t| {
            let profile = t.profiles.get_mut(user_id).ok_or(StorageError::NotFound)?;
            profile.avatar_url = avatar_url.map(str::to_owned);
            Ok(())
        })?
    }

    async fn count_profiles(&self) -> Result<u64, StorageError> {
        self.with_tables(|t| t.profiles.len() as u64)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn sessions_for_participant(
        &self,
        participant_id: &UserId,
        order: SortOrder,
    ) -> Result<Vec<Session>, StorageError> {
        self.with_tables(|t| {
            let mut found: Vec<Session> = t
                .sessions
                .iter()
                .filter(|s| &s.participant_id == participant_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| compare_schedule(a, b, order));
            found
        })
    }

    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError> {
        self.with_tables(|t| {
            match t.sessions.iter_mut().find(|s| s.id == session.id) {
                Some(existing) => *existing = session.clone(),
                None => t.sessions.push(session.clone()),
            }
        })
    }
}

#[async_trait]
impl TrailProgressRepository for InMemoryRepository {
    async fn progress_for_user(&self, user_id: &UserId) -> Result<Vec<TrailProgress>, StorageError> {
        self.with_tables(|t| {
            t.progress
                .values()
                .filter(|p| &p.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn upsert_progress(&self, progress: &TrailProgress) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.progress.insert(
                (progress.user_id.clone(), progress.trail_id.clone()),
                progress.clone(),
            );
        })
    }
}

#[async_trait]
impl TrailRepository for InMemoryRepository {
    async fn trails_by_ids(&self, ids: &[TrailId]) -> Result<Vec<Trail>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.with_tables(|t| {
            t.trails
                .values()
                .filter(|trail| ids.contains(&trail.id))
                .cloned()
                .collect()
        })
    }

    async fn upsert_trail(&self, trail: &Trail) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.trails.insert(trail.id.clone(), trail.clone());
        })
    }
}

#[async_trait]
impl JobApplicationRepository for InMemoryRepository {
    async fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StorageError> {
        self.with_tables(|t| {
            let mut found: Vec<JobApplication> = t
                .applications
                .iter()
                .filter(|a| &a.applicant_id == applicant_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            found
        })
    }

    async fn upsert_application(&self, application: &JobApplication) -> Result<(), StorageError> {
        self.with_tables(|t| {
            match t.applications.iter_mut().find(|a| a.id == application.id) {
                Some(existing) => *existing = application.clone(),
                None => t.applications.push(application.clone()),
            }
        })
    }
}

#[async_trait]
impl JobOfferRepository for InMemoryRepository {
    async fn offers_by_ids(&self, ids: &[JobOfferId]) -> Result<Vec<JobOffer>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.with_tables(|t| {
            t.offers
                .values()
                .filter(|offer| ids.contains(&offer.id))
                .cloned()
                .collect()
        })
    }

    async fn upsert_offer(&self, offer: &JobOffer) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.offers.insert(offer.id.clone(), offer.clone());
        })
    }
}

#[async_trait]
impl PreferencesStore for InMemoryRepository {
    async fn get(&self, user_id: &UserId, key: &str) -> Result<Option<String>, StorageError> {
        self.with_tables(|t| t.preferences.get(&(user_id.clone(), key.to_owned())).cloned())
    }

    async fn set(&self, user_id: &UserId, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.preferences
                .insert((user_id.clone(), key.to_owned()), value.to_owned());
        })
    }

    async fn remove(&self, user_id: &UserId, key: &str) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.preferences.remove(&(user_id.clone(), key.to_owned()));
        })
    }
}

#[async_trait]
impl TriageRepository for InMemoryRepository {
    async fn get_triage(&self, user_id: &UserId) -> Result<Option<Triage>, StorageError> {
        self.with_tables(|t| t.triage.get(user_id).cloned())
    }

    async fn upsert_triage(&self, triage: &Triage) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.triage.insert(triage.user_id.clone(), triage.clone());
        })
    }

    async fn update_triage(
        &self,
        user_id: &UserId,
        update: &TriageUpdate,
    ) -> Result<(), StorageError> {
        self.with_tables(|t| {
            t.triage
                .get_mut(user_id)
                .ok_or(StorageError::NotFound)?
                .apply(update);
            Ok(())
        })?
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub progress: Arc<dyn TrailProgressRepository>,
    pub trails: Arc<dyn TrailRepository>,
    pub applications: Arc<dyn JobApplicationRepository>,
    pub offers: Arc<dyn JobOfferRepository>,
    pub preferences: Arc<dyn PreferencesStore>,
    pub triage: Arc<dyn TriageRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repo(InMemoryRepository::new())
    }

    pub(crate) fn from_repo<R>(repo: R) -> Self
    where
        R: ProfileRepository
            + SessionRepository
            + TrailProgressRepository
            + TrailRepository
            + JobApplicationRepository
            + JobOfferRepository
            + PreferencesStore
            + TriageRepository
            + Clone
            + 'static,
    {
        Self {
            profiles: Arc::new(repo.clone()),
            sessions: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            trails: Arc::new(repo.clone()),
            applications: Arc::new(repo.clone()),
            offers: Arc::new(repo.clone()),
            preferences: Arc::new(repo.clone()),
            triage: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use portal_core::model::{ApplicationId, SessionId, SessionStatus};
    use portal_core::time::fixed_now;

    fn session(id: &str, user: &str, day: u32, hour: u32) -> Session {
        Session {
            id: SessionId::new(id),
            session_type: "legal".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            scheduled_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            participant_id: UserId::new(user),
            professional_id: None,
            status: SessionStatus::Scheduled,
        }
    }

    #[tokio::test]
    async fn sessions_are_scoped_and_ordered() {
        let repo = InMemoryRepository::new();
        repo.upsert_session(&session("s1", "u1", 3, 9)).await.unwrap();
        repo.upsert_session(&session("s2", "u1", 1, 15)).await.unwrap();
        repo.upsert_session(&session("s3", "u2", 2, 9)).await.unwrap();
        repo.upsert_session(&session("s4", "u1", 1, 8)).await.unwrap();

        let asc = repo
            .sessions_for_participant(&UserId::new("u1"), SortOrder::Asc)
            .await
            .unwrap();
        let ids: Vec<&str> = asc.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s4", "s2", "s1"]);

        let desc = repo
            .sessions_for_participant(&UserId::new("u1"), SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(desc.first().unwrap().id.as_str(), "s1");
    }

    #[tokio::test]
    async fn applications_are_newest_first() {
        let repo = InMemoryRepository::new();
        let applicant = UserId::new("c1");
        for (id, age) in [("a1", 3), ("a2", 1), ("a3", 2)] {
            repo.upsert_application(&JobApplication {
                id: ApplicationId::new(id),
                applicant_id: applicant.clone(),
                job_id: JobOfferId::new("j1"),
                created_at: fixed_now() - Duration::days(age),
                status: None,
            })
            .await
            .unwrap();
        }

        let apps = repo.applications_for_applicant(&applicant).await.unwrap();
        let ids: Vec<&str> = apps.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);
    }

    #[tokio::test]
    async fn update_contact_requires_existing_profile() {
        let repo = InMemoryRepository::new();
        let contact = portal_core::model::ProfileContactDraft {
            name: "Ana".into(),
            phone: None,
        }
        .validate()
        .unwrap();
        let err = repo
            .update_profile_contact(&UserId::new("nobody"), &contact)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn avatar_url_is_set_and_cleared() {
        let repo = InMemoryRepository::new();
        let user = UserId::new("m1");
        assert!(matches!(
            repo.update_avatar_url(&user, Some("https://cdn/a.png")).await,
            Err(StorageError::NotFound)
        ));

        repo.upsert_profile(&Profile {
            user_id: user.clone(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: None,
            avatar_url: None,
        })
        .await
        .unwrap();
        repo.update_avatar_url(&user, Some("https://cdn/a.png"))
            .await
            .unwrap();
        let stored = repo.get_profile(&user).await.unwrap().unwrap();
        assert_eq!(stored.avatar_url.as_deref(), Some("https://cdn/a.png"));

        repo.update_avatar_url(&user, None).await.unwrap();
        assert_eq!(repo.get_profile(&user).await.unwrap().unwrap().avatar_url, None);
    }

    #[tokio::test]
    async fn triage_update_needs_existing_record() {
        let repo = InMemoryRepository::new();
        let user = UserId::new("m1");
        let update = TriageUpdate::Urgencies(vec!["legal".into()]);
        assert!(matches!(
            repo.update_triage(&user, &update).await,
            Err(StorageError::NotFound)
        ));

        let mut triage = Triage::empty(user.clone());
        triage.language_level = Some("B1".into());
        repo.upsert_triage(&triage).await.unwrap();
        repo.update_triage(&user, &update).await.unwrap();

        let stored = repo.get_triage(&user).await.unwrap().unwrap();
        assert_eq!(stored.urgencies, vec!["legal".to_owned()]);
        assert_eq!(stored.language_level.as_deref(), Some("B1"));
    }

    #[tokio::test]
    async fn preferences_are_user_scoped() {
        let repo = InMemoryRepository::new();
        let a = UserId::new("a");
        let b = UserId::new("b");
        repo.set(&a, "resume", "https://cdn/a.pdf").await.unwrap();

        assert_eq!(
            repo.get(&a, "resume").await.unwrap().as_deref(),
            Some("https://cdn/a.pdf")
        );
        assert_eq!(repo.get(&b, "resume").await.unwrap(), None);

        repo.remove(&a, "resume").await.unwrap();
        assert_eq!(repo.get(&a, "resume").await.unwrap(), None);
    }

    #[test]
    fn relation_missing_has_stable_code() {
        let err = StorageError::RelationMissing {
            relation: "profiles".into(),
        };
        assert_eq!(err.code(), "relation missing");
        assert_eq!(err.to_string(), "relation 'profiles' does not exist");
    }
}
