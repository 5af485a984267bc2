use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use portal_core::Clock;
use portal_core::model::{
    FavoriteTrails, LastModuleViewed, Notification, PreferenceKey, ProfileExtras, TrailId, UserId,
};
use storage::repository::PreferencesStore;

use crate::error::PreferencesError;

/// Typed access to the user-scoped preference store.
///
/// Payloads are advisory: anything that fails to decode is treated as unset.
#[derive(Clone)]
pub struct PreferencesService {
    clock: Clock,
    store: Arc<dyn PreferencesStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn PreferencesStore>) -> Self {
        Self { clock, store }
    }

    async fn load_json<T>(&self, user_id: &UserId, key: &PreferenceKey) -> Result<T, PreferencesError>
    where
        T: DeserializeOwned + Default,
    {
        let key = key.as_key();
        let Some(raw) = self.store.get(user_id, &key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    user = %user_id,
                    key = %key,
                    error = %err,
                    "discarding malformed preference"
                );
                Ok(T::default())
            }
        }
    }

    async fn store_json<T: Serialize>(
        &self,
        user_id: &UserId,
        key: &PreferenceKey,
        value: &T,
    ) -> Result<(), PreferencesError> {
        let encoded = serde_json::to_string(value)?;
        self.store.set(user_id, &key.as_key(), &encoded).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on store failures.
    pub async fn favorites(&self, user_id: &UserId) -> Result<FavoriteTrails, PreferencesError> {
        self.load_json(user_id, &PreferenceKey::FavoriteTrails).await
    }

    /// Flip a trail in or out of the favorite set and persist the result.
    ///
    /// Returns `true` when the trail is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if the set cannot be stored.
    pub async fn toggle_favorite(
        &self,
        user_id: &UserId,
        trail_id: &TrailId,
    ) -> Result<bool, PreferencesError> {
        let mut favorites = self.favorites(user_id).await?;
        let now_favorite = favorites.toggle(trail_id);
        self.store_json(user_id, &PreferenceKey::FavoriteTrails, &favorites)
            .await?;
        tracing::debug!(user = %user_id, trail = %trail_id, now_favorite, "toggled favorite");
        Ok(now_favorite)
    }

    /// Last stored resume link. Stored as a bare URL, not JSON.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on store failures.
    pub async fn resume_url(&self, user_id: &UserId) -> Result<Option<String>, PreferencesError> {
        let raw = self
            .store
            .get(user_id, &PreferenceKey::Resume.as_key())
            .await?;
        Ok(raw.filter(|url| !url.is_empty()))
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::InvalidUrl` if `url` does not parse.
    pub async fn set_resume_url(&self, user_id: &UserId, url: &str) -> Result<(), PreferencesError> {
        let parsed = Url::parse(url)?;
        self.store
            .set(user_id, &PreferenceKey::Resume.as_key(), parsed.as_str())
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on store failures.
    pub async fn notifications(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, PreferencesError> {
        self.load_json(user_id, &PreferenceKey::Notifications).await
    }

    /// Append an unread notification dated now.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if the list cannot be stored.
    pub async fn push_notification(
        &self,
        user_id: &UserId,
        title: &str,
        body: &str,
    ) -> Result<Notification, PreferencesError> {
        let mut list = self.notifications(user_id).await?;
        let notification = Notification::new(title, body, self.clock.now());
        list.push(notification.clone());
        self.store_json(user_id, &PreferenceKey::Notifications, &list)
            .await?;
        Ok(notification)
    }

    /// Returns `false` if no notification has the given id.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if the list cannot be stored.
    pub async fn mark_notification_read(
        &self,
        user_id: &UserId,
        notification_id: &str,
    ) -> Result<bool, PreferencesError> {
        let mut list = self.notifications(user_id).await?;
        let Some(target) = list.iter_mut().find(|n| n.id == notification_id) else {
            return Ok(false);
        };
        target.read = true;
        self.store_json(user_id, &PreferenceKey::Notifications, &list)
            .await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `PreferencesError` if the empty list cannot be stored.
    pub async fn clear_notifications(&self, user_id: &UserId) -> Result<(), PreferencesError> {
        self.store_json(user_id, &PreferenceKey::Notifications, &Vec::<Notification>::new())
            .await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on store failures.
    pub async fn profile_extras(&self, user_id: &UserId) -> Result<ProfileExtras, PreferencesError> {
        self.load_json(user_id, &PreferenceKey::ProfileExtras).await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError` if the fields cannot be stored.
    pub async fn save_profile_extras(
        &self,
        user_id: &UserId,
        extras: &ProfileExtras,
    ) -> Result<(), PreferencesError> {
        self.store_json(user_id, &PreferenceKey::ProfileExtras, extras)
            .await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on store failures.
    pub async fn last_module_viewed(
        &self,
        user_id: &UserId,
        trail_id: &TrailId,
    ) -> Result<Option<LastModuleViewed>, PreferencesError> {
        self.load_json(user_id, &PreferenceKey::LastModuleViewed(trail_id.clone()))
            .await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError` if the value cannot be stored.
    pub async fn set_last_module_viewed(
        &self,
        user_id: &UserId,
        trail_id: &TrailId,
        module: &LastModuleViewed,
    ) -> Result<(), PreferencesError> {
        self.store_json(
            user_id,
            &PreferenceKey::LastModuleViewed(trail_id.clone()),
            module,
        )
        .await
    }
}
