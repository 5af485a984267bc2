mod favorites;
mod ids;
mod jobs;
mod preferences;
mod profile;
mod session;
mod trail;
mod triage;

pub use favorites::FavoriteTrails;
pub use ids::{ApplicationId, JobOfferId, ParseIdError, SessionId, TrailId, UserId};
pub use jobs::{JobApplication, JobOffer};
pub use preferences::{
    ContactPreference, LastModuleViewed, Notification, PreferenceKey, ProfileExtras,
};
pub use profile::{Profile, ProfileContact, ProfileContactDraft, ProfileError};
pub use session::{Session, SessionStatus, SortOrder, StatusFilter};
pub use trail::{Trail, TrailProgress};
pub use triage::{Triage, TriageUpdate, split_interests};
