pub mod aggregate;
mod candidate;
mod migrant;

pub use aggregate::{
    ApplicationSummary, Page, SessionListQuery, SessionView, TrailRow, TrailView,
};
pub use candidate::{CandidateProfile, CandidateProfileService};
pub use migrant::{MigrantDashboard, MigrantDashboardService};
