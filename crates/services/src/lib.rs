#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod preferences_service;
pub mod profile_service;
pub mod resume;

pub use portal_core::Clock;

pub use app_services::AppServices;
pub use dashboard::aggregate;
pub use dashboard::{
    ApplicationSummary, CandidateProfile, CandidateProfileService, MigrantDashboard,
    MigrantDashboardService, Page, SessionListQuery, SessionView, TrailRow, TrailView,
};
pub use diagnostics::{CheckStatus, ConnectionCheck, ConnectionReport};
pub use error::{AppServicesError, DashboardError, PreferencesError, ProfileServiceError};
pub use preferences_service::PreferencesService;
pub use profile_service::ProfileService;
pub use resume::{ResumeSections, render_resume_text};
