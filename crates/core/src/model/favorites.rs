use serde::{Deserialize, Serialize};

use crate::model::TrailId;

/// User-scoped favorite trails, kept in the order they were added.
///
/// Serialized as a plain JSON array of trail ids; duplicates in a stored
/// payload are dropped on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TrailId>", into = "Vec<TrailId>")]
pub struct FavoriteTrails(Vec<TrailId>);

impl FavoriteTrails {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, trail_id: &TrailId) -> bool {
        self.0.contains(trail_id)
    }

    /// Flip membership of `trail_id`. Returns `true` if it is now a favorite.
    pub fn toggle(&mut self, trail_id: &TrailId) -> bool {
        if let Some(pos) = self.0.iter().position(|id| id == trail_id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(trail_id.clone());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TrailId>> for FavoriteTrails {
    fn from(ids: Vec<TrailId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FavoriteTrails> for Vec<TrailId> {
    fn from(favorites: FavoriteTrails) -> Self {
        favorites.0
    }
}

impl FromIterator<TrailId> for FavoriteTrails {
    fn from_iter<I: IntoIterator<Item = TrailId>>(iter: I) -> Self {
        let mut out = Vec::new();
        for id in iter {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut favs = FavoriteTrails::new();
        let t1 = TrailId::new("t1");
        assert!(favs.toggle(&t1));
        assert!(favs.contains(&t1));
        assert!(!favs.toggle(&t1));
        assert!(favs.is_empty());
    }

    #[test]
    fn keeps_insertion_order_and_drops_duplicates() {
        let favs: FavoriteTrails = ["t3", "t1", "t3", "t2"]
            .into_iter()
            .map(TrailId::new)
            .collect();
        let ids: Vec<&str> = favs.iter().map(TrailId::as_str).collect();
        assert_eq!(ids, vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn reads_plain_json_array() {
        let favs: FavoriteTrails = serde_json::from_str(r#"["b","a","b"]"#).unwrap();
        assert_eq!(favs.len(), 2);
        assert_eq!(serde_json::to_string(&favs).unwrap(), r#"["b","a"]"#);
    }
}
