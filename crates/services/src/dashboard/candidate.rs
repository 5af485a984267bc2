use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use portal_core::model::{FavoriteTrails, Profile, Session, SortOrder, UserId};
use storage::repository::{
    JobApplicationRepository, JobOfferRepository, ProfileRepository, SessionRepository,
    TrailProgressRepository, TrailRepository,
};

use super::aggregate::{
    ApplicationSummary, TrailView, build_trail_view, distinct_job_ids, distinct_trail_ids,
    index_trails, join_applications_with_offers,
};
use crate::error::DashboardError;
use crate::preferences_service::PreferencesService;

/// A candidate as seen from a company dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub candidate_id: UserId,
    /// `None` when the identity service has no profile for the candidate.
    pub profile: Option<Profile>,
    pub resume_url: Option<String>,
    /// Newest application first.
    pub applications: Vec<ApplicationSummary>,
    /// Earliest session first.
    pub sessions: Vec<Session>,
    pub trails: TrailView,
}

#[derive(Clone)]
pub struct CandidateProfileService {
    profiles: Arc<dyn ProfileRepository>,
    applications: Arc<dyn JobApplicationRepository>,
    offers: Arc<dyn JobOfferRepository>,
    sessions: Arc<dyn SessionRepository>,
    progress: Arc<dyn TrailProgressRepository>,
    trails: Arc<dyn TrailRepository>,
    preferences: PreferencesService,
}

impl CandidateProfileService {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        applications: Arc<dyn JobApplicationRepository>,
        offers: Arc<dyn JobOfferRepository>,
        sessions: Arc<dyn SessionRepository>,
        progress: Arc<dyn TrailProgressRepository>,
        trails: Arc<dyn TrailRepository>,
        preferences: PreferencesService,
    ) -> Self {
        Self {
            profiles,
            applications,
            offers,
            sessions,
            progress,
            trails,
            preferences,
        }
    }

    /// Fetch and assemble the candidate view.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` if any fetch fails.
    pub async fn load(&self, candidate_id: &UserId) -> Result<CandidateProfile, DashboardError> {
        let (profile, applications, sessions, progress) = tokio::try_join!(
            self.profiles.get_profile(candidate_id),
            self.applications.applications_for_applicant(candidate_id),
            self.sessions
                .sessions_for_participant(candidate_id, SortOrder::Asc),
            self.progress.progress_for_user(candidate_id),
        )?;

        let job_ids = distinct_job_ids(&applications);
        let trail_ids = distinct_trail_ids(&progress);
        let (offers, trails) = tokio::try_join!(
            self.offers.offers_by_ids(&job_ids),
            self.trails.trails_by_ids(&trail_ids),
        )?;

        tracing::debug!(
            candidate = %candidate_id,
            has_profile = profile.is_some(),
            applications = applications.len(),
            offers = offers.len(),
            sessions = sessions.len(),
            "loaded candidate profile data"
        );

        // A stored resume is only trusted for candidates the identity service knows.
        let resume_url = if profile.is_some() {
            self.preferences.resume_url(candidate_id).await?
        } else {
            None
        };

        let trails_by_id: HashMap<_, _> = index_trails(trails);
        let trails = build_trail_view(&progress, &trails_by_id, &FavoriteTrails::new());

        Ok(CandidateProfile {
            candidate_id: candidate_id.clone(),
            profile,
            resume_url,
            applications: join_applications_with_offers(&applications, &offers),
            sessions,
            trails,
        })
    }
}
