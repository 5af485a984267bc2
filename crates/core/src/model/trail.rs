use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{TrailId, UserId};

/// Reference metadata for a learning trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    pub id: TrailId,
    pub title: String,
    pub modules_count: Option<i32>,
}

/// Per-user progress through one trail.
///
/// Values are carried as stored; a percent outside 0..=100 is not rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailProgress {
    pub user_id: UserId,
    pub trail_id: TrailId,
    pub progress_percent: Option<i32>,
    pub modules_completed: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TrailProgress {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Some work recorded (modules or percent) on a trail that is not completed.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        !self.is_completed()
            && (self.modules_completed.unwrap_or(0) > 0 || self.progress_percent.unwrap_or(0) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn row(percent: Option<i32>, modules: Option<i32>) -> TrailProgress {
        TrailProgress {
            user_id: UserId::new("u1"),
            trail_id: TrailId::new("t1"),
            progress_percent: percent,
            modules_completed: modules,
            completed_at: None,
        }
    }

    #[test]
    fn untouched_trail_is_not_in_progress() {
        assert!(!row(None, None).is_in_progress());
        assert!(!row(Some(0), Some(0)).is_in_progress());
    }

    #[test]
    fn either_counter_marks_progress() {
        assert!(row(Some(10), None).is_in_progress());
        assert!(row(None, Some(1)).is_in_progress());
    }

    #[test]
    fn completed_trail_is_never_in_progress() {
        let mut done = row(Some(40), Some(2));
        done.completed_at = Some(fixed_now());
        assert!(done.is_completed());
        assert!(!done.is_in_progress());
    }
}
