use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::TrailId;

/// Keys of the user-scoped preference store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    FavoriteTrails,
    Resume,
    Notifications,
    ProfileExtras,
    LastModuleViewed(TrailId),
}

impl PreferenceKey {
    /// Storage key for this preference.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::FavoriteTrails => "favoriteTrails".to_owned(),
            Self::Resume => "resume".to_owned(),
            Self::Notifications => "notifications".to_owned(),
            Self::ProfileExtras => "profileExtras".to_owned(),
            Self::LastModuleViewed(trail_id) => format!("lastModuleViewed:{trail_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub date: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification with a fresh random id.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            read: false,
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPreference {
    #[default]
    Email,
    Phone,
}

/// Extended profile fields kept client-side only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileExtras {
    pub nationality: String,
    pub origin_country: String,
    pub arrival_date: String,
    pub skills: String,
    pub languages_list: String,
    pub main_needs: String,
    pub professional_experience: String,
    pub professional_title: String,
    pub contact_preference: ContactPreference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModuleViewed {
    pub module_id: String,
    pub title: String,
}
