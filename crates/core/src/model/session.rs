use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{SessionId, UserId};

//
// ─── STATUS ───────────────────────────────────────────────────────────────────
//

/// Effective status of a scheduled session.
///
/// Raw rows may carry no status at all; `from_raw` is the only place where that
/// is turned into `Scheduled`. Labels outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Other(String),
}

impl SessionStatus {
    pub const SCHEDULED: &'static str = "Scheduled";
    pub const CONFIRMED: &'static str = "Confirmed";
    pub const COMPLETED: &'static str = "Completed";
    pub const CANCELLED: &'static str = "Cancelled";

    /// Resolve a raw status column into its effective status.
    ///
    /// Matching is exact: no trimming, no case folding.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(Self::SCHEDULED) => Self::Scheduled,
            Some(Self::CONFIRMED) => Self::Confirmed,
            Some(Self::COMPLETED) => Self::Completed,
            Some(Self::CANCELLED) => Self::Cancelled,
            Some(other) => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => Self::SCHEDULED,
            Self::Confirmed => Self::CONFIRMED,
            Self::Completed => Self::COMPLETED,
            Self::Cancelled => Self::CANCELLED,
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for SessionStatus {
    fn from(raw: Option<String>) -> Self {
        Self::from_raw(raw.as_deref())
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

/// Status selection for session lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SessionStatus),
}

impl StatusFilter {
    /// Sentinel label meaning "no filtering".
    pub const ALL: &'static str = "All";

    /// Parse a user-selected label. Matching is exact against effective
    /// statuses, so `""` selects nothing: no effective status is empty.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::ALL => Self::All,
            "" => Self::Only(SessionStatus::Other(String::new())),
            label => Self::Only(SessionStatus::from_raw(Some(label))),
        }
    }

    #[must_use]
    pub fn matches(&self, status: &SessionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Caller-chosen ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// A scheduled appointment between a service recipient and a professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub session_type: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub participant_id: UserId,
    pub professional_id: Option<UserId>,
    #[serde(default)]
    pub status: SessionStatus,
}

impl Session {
    /// Upcoming iff the scheduled date is on or after `today` (date-only).
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.scheduled_date >= today
    }
}
