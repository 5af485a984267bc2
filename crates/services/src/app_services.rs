use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::dashboard::{CandidateProfileService, MigrantDashboardService};
use crate::diagnostics::ConnectionCheck;
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::profile_service::ProfileService;

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    migrant_dashboard: Arc<MigrantDashboardService>,
    candidate_profiles: Arc<CandidateProfileService>,
    preferences: Arc<PreferencesService>,
    profiles: Arc<ProfileService>,
    connection_check: Arc<ConnectionCheck>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: Storage, clock: Clock) -> Self {
        let preferences = PreferencesService::new(clock, Arc::clone(&storage.preferences));
        let migrant_dashboard = Arc::new(MigrantDashboardService::new(
            clock,
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.trails),
            Arc::clone(&storage.triage),
            preferences.clone(),
        ));
        let candidate_profiles = Arc::new(CandidateProfileService::new(
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.applications),
            Arc::clone(&storage.offers),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.trails),
            preferences.clone(),
        ));
        let profiles = Arc::new(ProfileService::new(
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.triage),
        ));
        let connection_check = Arc::new(ConnectionCheck::new(Arc::clone(&storage.profiles)));

        Self {
            storage,
            migrant_dashboard,
            candidate_profiles,
            preferences: Arc::new(preferences),
            profiles,
            connection_check,
        }
    }

    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage, clock))
    }

    /// Underlying repositories, for seeding and tooling.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn migrant_dashboard(&self) -> Arc<MigrantDashboardService> {
        Arc::clone(&self.migrant_dashboard)
    }

    #[must_use]
    pub fn candidate_profiles(&self) -> Arc<CandidateProfileService> {
        Arc::clone(&self.candidate_profiles)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn connection_check(&self) -> Arc<ConnectionCheck> {
        Arc::clone(&self.connection_check)
    }
}
