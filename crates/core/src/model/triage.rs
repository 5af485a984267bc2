use serde::{Deserialize, Serialize};

use crate::model::UserId;

/// Intake answers recorded for a migrant: legal and work situation, and
/// which kinds of help are urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triage {
    pub user_id: UserId,
    pub legal_status: Option<String>,
    pub work_status: Option<String>,
    pub language_level: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub urgencies: Vec<String>,
}

impl Triage {
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            legal_status: None,
            work_status: None,
            language_level: None,
            interests: Vec::new(),
            urgencies: Vec::new(),
        }
    }

    /// Overwrite the fields covered by `update`; other fields are kept.
    pub fn apply(&mut self, update: &TriageUpdate) {
        match update {
            TriageUpdate::Legal {
                legal_status,
                urgencies,
            } => {
                self.legal_status = legal_status.clone();
                self.urgencies = urgencies.clone();
            }
            TriageUpdate::Work {
                work_status,
                interests,
            } => {
                self.work_status = work_status.clone();
                self.interests = interests.clone();
            }
            TriageUpdate::Urgencies(urgencies) => self.urgencies = urgencies.clone(),
        }
    }

    /// Add or remove one urgency, keeping first-added order.
    ///
    /// Returns `true` when the urgency is now set.
    pub fn toggle_urgency(&mut self, urgency: &str) -> bool {
        if let Some(pos) = self.urgencies.iter().position(|u| u == urgency) {
            self.urgencies.remove(pos);
            false
        } else {
            self.urgencies.push(urgency.to_owned());
            true
        }
    }
}

/// One of the partial edits a migrant can save from their profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageUpdate {
    Legal {
        legal_status: Option<String>,
        urgencies: Vec<String>,
    },
    Work {
        work_status: Option<String>,
        interests: Vec<String>,
    },
    Urgencies(Vec<String>),
}

impl TriageUpdate {
    /// Legal situation edit. A blank status is stored as unset.
    #[must_use]
    pub fn legal(legal_status: &str, urgencies: Vec<String>) -> Self {
        Self::Legal {
            legal_status: non_blank(legal_status),
            urgencies,
        }
    }

    /// Work situation edit. `interests` is the comma-separated form field.
    #[must_use]
    pub fn work(work_status: &str, interests: &str) -> Self {
        Self::Work {
            work_status: non_blank(work_status),
            interests: split_interests(interests),
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Split a comma-separated list, dropping empty entries.
#[must_use]
pub fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
