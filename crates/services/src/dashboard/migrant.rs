use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use portal_core::Clock;
use portal_core::model::{Session, SortOrder, Triage, UserId};
use storage::repository::{
    SessionRepository, TrailProgressRepository, TrailRepository, TriageRepository,
};

use super::aggregate::{
    self, Page, SessionListQuery, SessionView, TrailView, build_session_view, build_trail_view,
    distinct_trail_ids, index_trails,
};
use crate::error::DashboardError;
use crate::preferences_service::PreferencesService;

/// Everything the migrant's own dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrantDashboard {
    pub user_id: UserId,
    pub sessions: Vec<Session>,
    pub session_view: SessionView,
    pub status_options: Vec<String>,
    pub trails: TrailView,
    /// Intake record; `None` until the migrant has completed intake.
    pub triage: Option<Triage>,
}

impl MigrantDashboard {
    /// One page of the appointments list.
    #[must_use]
    pub fn session_page(&self, query: &SessionListQuery) -> Page<Session> {
        aggregate::list_sessions(&self.sessions, query)
    }
}

/// Loads a user's sessions, trail progress and favorites, then assembles the view.
#[derive(Clone)]
pub struct MigrantDashboardService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    progress: Arc<dyn TrailProgressRepository>,
    trails: Arc<dyn TrailRepository>,
    triage: Arc<dyn TriageRepository>,
    preferences: PreferencesService,
}

impl MigrantDashboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn SessionRepository>,
        progress: Arc<dyn TrailProgressRepository>,
        trails: Arc<dyn TrailRepository>,
        triage: Arc<dyn TriageRepository>,
        preferences: PreferencesService,
    ) -> Self {
        Self {
            clock,
            sessions,
            progress,
            trails,
            triage,
            preferences,
        }
    }

    /// Fetch and assemble the dashboard for `user_id`.
    ///
    /// Sessions, progress and the intake record are fetched together; trail
    /// metadata is fetched once the referenced trail ids are known.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` if any fetch fails.
    pub async fn load(&self, user_id: &UserId) -> Result<MigrantDashboard, DashboardError> {
        let (sessions, progress, triage) = tokio::try_join!(
            self.sessions.sessions_for_participant(user_id, SortOrder::Asc),
            self.progress.progress_for_user(user_id),
            self.triage.get_triage(user_id),
        )?;

        let trail_ids = distinct_trail_ids(&progress);
        let trails_by_id = if trail_ids.is_empty() {
            HashMap::new()
        } else {
            index_trails(self.trails.trails_by_ids(&trail_ids).await?)
        };
        let favorites = self.preferences.favorites(user_id).await?;

        tracing::debug!(
            user = %user_id,
            sessions = sessions.len(),
            progress = progress.len(),
            trails = trails_by_id.len(),
            "loaded migrant dashboard data"
        );

        let session_view = build_session_view(&sessions, self.clock.today());
        let status_options = aggregate::status_options(&sessions);
        let trails = build_trail_view(&progress, &trails_by_id, &favorites);

        Ok(MigrantDashboard {
            user_id: user_id.clone(),
            sessions,
            session_view,
            status_options,
            trails,
            triage,
        })
    }
}
