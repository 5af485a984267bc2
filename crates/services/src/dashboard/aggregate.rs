//! Pure view-model assembly for the dashboards.
//!
//! Every function here is total: missing reference data degrades to a
//! documented fallback instead of an error, and nothing touches storage.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use portal_core::model::{
    ApplicationId, FavoriteTrails, JobApplication, JobOffer, JobOfferId, Session, SortOrder,
    StatusFilter, Trail, TrailId, TrailProgress,
};

/// Title shown for an application whose offer cannot be resolved.
pub const OFFER_PLACEHOLDER_TITLE: &str = "Offer";

/// Default page size of the session list.
pub const DEFAULT_PAGE_SIZE: usize = 5;

//
// ─── SESSIONS ─────────────────────────────────────────────────────────────────
//

/// Sessions partitioned around a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionView {
    /// Scheduled on or after the reference date, earliest first.
    pub upcoming: Vec<Session>,
    /// Everything else, in input order.
    pub past: Vec<Session>,
}

/// Split sessions into upcoming and past relative to `today` (date-only).
///
/// `upcoming` is sorted by date then time; equal keys keep their input order.
#[must_use]
pub fn build_session_view(sessions: &[Session], today: NaiveDate) -> SessionView {
    let (mut upcoming, past): (Vec<Session>, Vec<Session>) = sessions
        .iter()
        .cloned()
        .partition(|session| session.is_upcoming(today));
    upcoming.sort_by_key(|session| (session.scheduled_date, session.scheduled_time));
    SessionView { upcoming, past }
}

/// Sessions whose effective status matches `filter`. `All` returns a copy of the input.
#[must_use]
pub fn filter_by_status(sessions: &[Session], filter: &StatusFilter) -> Vec<Session> {
    sessions
        .iter()
        .filter(|session| filter.matches(&session.status))
        .cloned()
        .collect()
}

/// Stable sort by scheduled date only; times do not participate.
#[must_use]
pub fn sort_sessions(sessions: &[Session], order: SortOrder) -> Vec<Session> {
    let mut sorted = sessions.to_vec();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date)),
    }
    sorted
}

/// Filter choices for the session list: the `All` sentinel, then each
/// distinct effective status in first-seen order.
#[must_use]
pub fn status_options(sessions: &[Session]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![StatusFilter::ALL.to_owned()];
    for session in sessions {
        let label = session.status.as_str();
        if seen.insert(label) {
            options.push(label.to_owned());
        }
    }
    options
}

//
// ─── PAGINATION ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// Slice out 1-based page `page` of `list`.
///
/// The page is not clamped: an out-of-range page (including 0) yields no items.
/// A zero page size is treated as a single empty page.
#[must_use]
pub fn paginate<T: Clone>(list: &[T], page: usize, page_size: usize) -> Page<T> {
    if page_size == 0 {
        return Page {
            items: Vec::new(),
            total_pages: 1,
        };
    }

    let total_pages = list.len().div_ceil(page_size).max(1);
    let items = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(page_size))
        .filter(|start| *start < list.len())
        .map(|start| {
            let end = start.saturating_add(page_size).min(list.len());
            list[start..end].to_vec()
        })
        .unwrap_or_default();

    Page { items, total_pages }
}

/// Knobs of the "my appointments" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListQuery {
    pub status: StatusFilter,
    pub order: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SessionListQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            order: SortOrder::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filter, then sort, then paginate.
#[must_use]
pub fn list_sessions(sessions: &[Session], query: &SessionListQuery) -> Page<Session> {
    let filtered = filter_by_status(sessions, &query.status);
    let sorted = sort_sessions(&filtered, query.order);
    paginate(&sorted, query.page, query.page_size)
}

//
// ─── TRAILS ───────────────────────────────────────────────────────────────────
//

/// One progress row enriched with its trail metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailRow {
    pub trail_id: TrailId,
    /// Trail title, or the raw trail id when the trail is unknown.
    pub title: String,
    /// Module count of the trail, 0 when unknown.
    pub total_modules: i32,
    pub completed_modules: i32,
    pub progress_percent: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_favorite: bool,
}

impl TrailRow {
    #[must_use]
    pub fn from_progress(progress: &TrailProgress, trail: Option<&Trail>, is_favorite: bool) -> Self {
        Self {
            trail_id: progress.trail_id.clone(),
            title: trail.map_or_else(
                || progress.trail_id.as_str().to_owned(),
                |t| t.title.clone(),
            ),
            total_modules: trail.and_then(|t| t.modules_count).unwrap_or(0),
            completed_modules: progress.modules_completed.unwrap_or(0),
            progress_percent: progress.progress_percent.unwrap_or(0),
            completed_at: progress.completed_at,
            is_favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrailView {
    pub in_progress: Vec<TrailRow>,
    /// Ordered like the favorite set, not like the progress rows.
    pub favorites: Vec<TrailRow>,
    pub completed: Vec<TrailRow>,
}

/// Index trail metadata by id; the first record wins on duplicate ids.
#[must_use]
pub fn index_trails(trails: Vec<Trail>) -> HashMap<TrailId, Trail> {
    let mut by_id = HashMap::with_capacity(trails.len());
    for trail in trails {
        by_id.entry(trail.id.clone()).or_insert(trail);
    }
    by_id
}

/// Unique trail ids referenced by `progress`, in first-seen order.
#[must_use]
pub fn distinct_trail_ids(progress: &[TrailProgress]) -> Vec<TrailId> {
    let mut seen = HashSet::new();
    progress
        .iter()
        .filter(|row| !row.trail_id.as_str().is_empty())
        .filter(|row| seen.insert(&row.trail_id))
        .map(|row| row.trail_id.clone())
        .collect()
}

/// Classify progress rows into in-progress, favorite and completed lists.
///
/// Rows whose trail is absent from `trails_by_id` are kept with fallback values.
#[must_use]
pub fn build_trail_view(
    progress: &[TrailProgress],
    trails_by_id: &HashMap<TrailId, Trail>,
    favorites: &FavoriteTrails,
) -> TrailView {
    let row = |p: &TrailProgress| {
        TrailRow::from_progress(p, trails_by_id.get(&p.trail_id), favorites.contains(&p.trail_id))
    };

    let in_progress = progress
        .iter()
        .filter(|p| p.is_in_progress())
        .map(row)
        .collect();
    let completed = progress
        .iter()
        .filter(|p| p.is_completed())
        .map(row)
        .collect();
    let favorite_rows = favorites
        .iter()
        .flat_map(|id| progress.iter().filter(move |p| &p.trail_id == id))
        .map(row)
        .collect();

    TrailView {
        in_progress,
        favorites: favorite_rows,
        completed,
    }
}

//
// ─── APPLICATIONS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    pub status: Option<String>,
}

/// Resolve each application's job title; input order is preserved.
///
/// Unknown offers, and offers with an empty title, use `OFFER_PLACEHOLDER_TITLE`.
#[must_use]
pub fn join_applications_with_offers(
    applications: &[JobApplication],
    offers: &[JobOffer],
) -> Vec<ApplicationSummary> {
    let mut titles: HashMap<&JobOfferId, &str> = HashMap::with_capacity(offers.len());
    for offer in offers {
        titles.entry(&offer.id).or_insert(offer.title.as_str());
    }

    applications
        .iter()
        .map(|app| ApplicationSummary {
            id: app.id.clone(),
            job_title: titles
                .get(&app.job_id)
                .filter(|title| !title.is_empty())
                .map_or(OFFER_PLACEHOLDER_TITLE, |title| *title)
                .to_owned(),
            created_at: app.created_at,
            status: app.status.clone(),
        })
        .collect()
}

/// Unique offer ids referenced by `applications`, in first-seen order.
#[must_use]
pub fn distinct_job_ids(applications: &[JobApplication]) -> Vec<JobOfferId> {
    let mut seen = HashSet::new();
    applications
        .iter()
        .filter(|app| seen.insert(&app.job_id))
        .map(|app| app.job_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use portal_core::model::{SessionId, SessionStatus, UserId};
    use portal_core::time::fixed_now;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn session(id: &str, day: u32, hour: u32, status: Option<&str>) -> Session {
        Session {
            id: SessionId::new(id),
            session_type: "legal".into(),
            scheduled_date: date(day),
            scheduled_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            participant_id: UserId::new("m1"),
            professional_id: None,
            status: SessionStatus::from_raw(status),
        }
    }

    fn progress(
        trail: &str,
        percent: Option<i32>,
        modules: Option<i32>,
        done: bool,
    ) -> TrailProgress {
        TrailProgress {
            user_id: UserId::new("m1"),
            trail_id: TrailId::new(trail),
            progress_percent: percent,
            modules_completed: modules,
            completed_at: done.then(fixed_now),
        }
    }

    fn ids(sessions: &[Session]) -> Vec<&str> {
        sessions.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn session_view_partitions_without_loss() {
        let sessions = vec![
            session("a", 12, 9, None),
            session("b", 8, 9, None),
            session("c", 10, 9, None),
            session("d", 9, 9, None),
        ];
        let view = build_session_view(&sessions, date(10));

        assert_eq!(ids(&view.upcoming), vec!["c", "a"]);
        assert_eq!(ids(&view.past), vec!["b", "d"]);
        assert_eq!(view.upcoming.len() + view.past.len(), sessions.len());
    }

    #[test]
    fn upcoming_breaks_date_ties_by_time_then_input_order() {
        let sessions = vec![
            session("late", 15, 16, None),
            session("early", 15, 9, None),
            session("tie-1", 14, 10, None),
            session("tie-2", 14, 10, None),
        ];
        let view = build_session_view(&sessions, date(1));
        assert_eq!(ids(&view.upcoming), vec!["tie-1", "tie-2", "early", "late"]);
    }

    #[test]
    fn session_view_is_idempotent() {
        let sessions = vec![session("a", 3, 9, None), session("b", 20, 9, None)];
        assert_eq!(
            build_session_view(&sessions, date(10)),
            build_session_view(&sessions, date(10))
        );
    }

    #[test]
    fn paginate_twelve_by_five() {
        let list: Vec<u32> = (1..=12).collect();

        let first = paginate(&list, 1, 5);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&list, 3, 5);
        assert_eq!(last.items, vec![11, 12]);
    }

    #[test]
    fn paginate_out_of_range_is_empty_not_error() {
        let list: Vec<u32> = (1..=12).collect();
        assert!(paginate(&list, 4, 5).items.is_empty());
        assert!(paginate(&list, 0, 5).items.is_empty());
        assert_eq!(paginate(&list, 0, 0).total_pages, 1);
    }

    #[test]
    fn paginate_empty_list_has_one_page() {
        let page = paginate::<u32>(&[], 1, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn filter_all_returns_input_in_order() {
        let sessions = vec![
            session("a", 3, 9, Some("Completed")),
            session("b", 1, 9, None),
        ];
        assert_eq!(filter_by_status(&sessions, &StatusFilter::All), sessions);
    }

    #[test]
    fn filter_uses_effective_status_exactly() {
        let sessions = vec![
            session("a", 3, 9, Some("Completed")),
            session("b", 1, 9, None),
            session("c", 2, 9, Some("completed")),
            session("d", 4, 9, Some("Scheduled")),
        ];
        let scheduled = filter_by_status(&sessions, &StatusFilter::parse("Scheduled"));
        assert_eq!(ids(&scheduled), vec!["b", "d"]);

        let completed = filter_by_status(&sessions, &StatusFilter::parse("Completed"));
        assert_eq!(ids(&completed), vec!["a"]);
    }

    #[test]
    fn empty_filter_label_selects_nothing() {
        let sessions = vec![session("a", 1, 9, None), session("b", 2, 9, Some(""))];
        assert!(filter_by_status(&sessions, &StatusFilter::parse("")).is_empty());
    }

    #[test]
    fn status_options_lead_with_all() {
        let sessions = vec![
            session("a", 3, 9, Some("Completed")),
            session("b", 1, 9, None),
            session("c", 2, 9, Some("Completed")),
        ];
        assert_eq!(status_options(&sessions), vec!["All", "Completed", "Scheduled"]);
    }

    #[test]
    fn list_sessions_filters_sorts_and_pages() {
        let sessions: Vec<Session> = (1..=7)
            .map(|day| {
                let status = if day % 2 == 0 { Some("Cancelled") } else { None };
                session(&format!("s{day}"), day, 9, status)
            })
            .collect();
        let query = SessionListQuery {
            status: StatusFilter::parse("Scheduled"),
            order: SortOrder::Desc,
            page: 1,
            page_size: 3,
        };
        let page = list_sessions(&sessions, &query);
        assert_eq!(ids(&page.items), vec!["s7", "s5", "s3"]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn unknown_trail_falls_back_to_id_and_zero_modules() {
        let rows = vec![progress("t1", Some(40), Some(2), false)];
        let view = build_trail_view(&rows, &HashMap::new(), &FavoriteTrails::new());

        assert_eq!(view.in_progress.len(), 1);
        let row = &view.in_progress[0];
        assert_eq!(row.title, "t1");
        assert_eq!(row.total_modules, 0);
        assert_eq!(row.completed_modules, 2);
        assert!(view.completed.is_empty());
    }

    #[test]
    fn completed_row_is_never_in_progress() {
        let rows = vec![progress("t1", Some(10), Some(1), true)];
        let view = build_trail_view(&rows, &HashMap::new(), &FavoriteTrails::new());
        assert!(view.in_progress.is_empty());
        assert_eq!(view.completed.len(), 1);
    }

    #[test]
    fn favorites_follow_favorite_order_and_are_enriched() {
        let rows = vec![
            progress("t1", Some(10), None, false),
            progress("t2", None, None, false),
            progress("t3", Some(100), Some(5), true),
        ];
        let trails = index_trails(vec![Trail {
            id: TrailId::new("t3"),
            title: "Housing".into(),
            modules_count: Some(5),
        }]);
        let favorites: FavoriteTrails = ["t3", "t9", "t1"].into_iter().map(TrailId::new).collect();

        let view = build_trail_view(&rows, &trails, &favorites);
        let fav_ids: Vec<&str> = view.favorites.iter().map(|r| r.trail_id.as_str()).collect();
        assert_eq!(fav_ids, vec!["t3", "t1"]);
        assert_eq!(view.favorites[0].title, "Housing");
        assert_eq!(view.favorites[0].total_modules, 5);
        assert!(view.in_progress[0].is_favorite);
        assert_eq!(view.in_progress.len(), 1);
    }

    #[test]
    fn trail_view_ignores_metadata_order() {
        let rows = vec![
            progress("t1", Some(10), None, false),
            progress("t2", None, Some(3), true),
        ];
        let a = Trail {
            id: TrailId::new("t1"),
            title: "Language".into(),
            modules_count: Some(4),
        };
        let b = Trail {
            id: TrailId::new("t2"),
            title: "Work".into(),
            modules_count: Some(3),
        };
        let favorites = FavoriteTrails::from(vec![TrailId::new("t2")]);

        let forward = build_trail_view(&rows, &index_trails(vec![a.clone(), b.clone()]), &favorites);
        let backward = build_trail_view(&rows, &index_trails(vec![b, a]), &favorites);
        assert_eq!(forward, backward);
    }

    #[test]
    fn distinct_trail_ids_keep_first_seen_order() {
        let rows = vec![
            progress("t2", None, None, false),
            progress("t1", None, None, false),
            progress("t2", None, None, false),
            progress("", None, None, false),
        ];
        let ids: Vec<String> = distinct_trail_ids(&rows)
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    fn application(id: &str, job: &str) -> JobApplication {
        JobApplication {
            id: ApplicationId::new(id),
            applicant_id: UserId::new("c1"),
            job_id: JobOfferId::new(job),
            created_at: fixed_now(),
            status: None,
        }
    }

    #[test]
    fn unmatched_offer_uses_placeholder() {
        let summaries = join_applications_with_offers(&[application("a1", "j9")], &[]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].job_title, "Offer");
    }

    #[test]
    fn applications_keep_input_order_with_titles() {
        let offers = vec![
            JobOffer {
                id: JobOfferId::new("j1"),
                title: "Cook".into(),
            },
            JobOffer {
                id: JobOfferId::new("j2"),
                title: String::new(),
            },
        ];
        let apps = vec![
            application("a2", "j2"),
            application("a1", "j1"),
            application("a3", "j1"),
        ];
        let titles: Vec<(String, String)> = join_applications_with_offers(&apps, &offers)
            .into_iter()
            .map(|s| (s.id.to_string(), s.job_title))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("a2".to_owned(), "Offer".to_owned()),
                ("a1".to_owned(), "Cook".to_owned()),
                ("a3".to_owned(), "Cook".to_owned()),
            ]
        );
        assert_eq!(distinct_job_ids(&apps).len(), 2);
    }
}
