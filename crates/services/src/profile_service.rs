use std::sync::Arc;

use url::Url;

use portal_core::model::{
    Profile, ProfileContact, ProfileContactDraft, Triage, TriageUpdate, UserId,
};
use storage::repository::{ProfileRepository, StorageError, TriageRepository};

use crate::error::ProfileServiceError;
use crate::resume::{ResumeSections, render_resume_text};

/// Edits a migrant makes on their own profile page.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
    triage: Arc<dyn TriageRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProfileRepository>, triage: Arc<dyn TriageRepository>) -> Self {
        Self { repo, triage }
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` on repository failures.
    pub async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileServiceError> {
        Ok(self.repo.get_profile(user_id).await?)
    }

    /// Validate and persist new contact fields.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError` if validation fails or the profile does not exist.
    pub async fn save_contact(
        &self,
        user_id: &UserId,
        draft: ProfileContactDraft,
    ) -> Result<ProfileContact, ProfileServiceError> {
        let contact = draft.validate()?;
        self.repo.update_profile_contact(user_id, &contact).await?;
        Ok(contact)
    }

    /// Point the profile at an already uploaded avatar. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::InvalidUrl` if `avatar_url` does not parse,
    /// or `Storage(NotFound)` if the profile does not exist.
    pub async fn set_avatar_url(
        &self,
        user_id: &UserId,
        avatar_url: Option<&str>,
    ) -> Result<(), ProfileServiceError> {
        let parsed = avatar_url.map(Url::parse).transpose()?;
        self.repo
            .update_avatar_url(user_id, parsed.as_ref().map(Url::as_str))
            .await?;
        tracing::debug!(user = %user_id, cleared = parsed.is_none(), "updated avatar");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` on repository failures.
    pub async fn triage(&self, user_id: &UserId) -> Result<Option<Triage>, ProfileServiceError> {
        Ok(self.triage.get_triage(user_id).await?)
    }

    /// Apply one intake edit and return the resulting record.
    ///
    /// # Errors
    ///
    /// Returns `Storage(NotFound)` if the user has no intake record.
    pub async fn update_triage(
        &self,
        user_id: &UserId,
        update: &TriageUpdate,
    ) -> Result<Triage, ProfileServiceError> {
        self.triage.update_triage(user_id, update).await?;
        self.triage
            .get_triage(user_id)
            .await?
            .ok_or(ProfileServiceError::Storage(StorageError::NotFound))
    }

    /// Plain-text CV for `user_id` built from their profile and `sections`.
    ///
    /// # Errors
    ///
    /// Returns `Storage(NotFound)` if the profile does not exist.
    pub async fn generate_resume(
        &self,
        user_id: &UserId,
        sections: &ResumeSections,
    ) -> Result<String, ProfileServiceError> {
        let profile = self
            .repo
            .get_profile(user_id)
            .await?
            .ok_or(ProfileServiceError::Storage(StorageError::NotFound))?;
        Ok(render_resume_text(&profile, sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::ProfileError;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn save_contact_validates_before_writing() {
        let repo = InMemoryRepository::new();
        let user = UserId::new("m1");
        repo.upsert_profile(&Profile {
            user_id: user.clone(),
            name: "Ahmed".into(),
            email: "ahmed@example.com".into(),
            phone: None,
            avatar_url: None,
        })
        .await
        .unwrap();
        let svc = ProfileService::new(Arc::new(repo.clone()), Arc::new(repo));

        let err = svc
            .save_contact(
                &user,
                ProfileContactDraft {
                    name: String::new(),
                    phone: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileServiceError::Profile(ProfileError::EmptyName)
        ));

        svc.save_contact(
            &user,
            ProfileContactDraft {
                name: "Ahmed Hassan".into(),
                phone: Some("+351 910 000 002".into()),
            },
        )
        .await
        .unwrap();
        let stored = svc.get(&user).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ahmed Hassan");
        assert_eq!(stored.phone.as_deref(), Some("+351 910 000 002"));
    }

    async fn service_with_profile(user: &UserId) -> ProfileService {
        let repo = InMemoryRepository::new();
        repo.upsert_profile(&Profile {
            user_id: user.clone(),
            name: "Maria Silva".into(),
            email: "maria@example.com".into(),
            phone: None,
            avatar_url: None,
        })
        .await
        .unwrap();
        ProfileService::new(Arc::new(repo.clone()), Arc::new(repo))
    }

    #[tokio::test]
    async fn avatar_url_must_parse() {
        let user = UserId::new("m1");
        let svc = service_with_profile(&user).await;

        let err = svc.set_avatar_url(&user, Some("no scheme")).await.unwrap_err();
        assert!(matches!(err, ProfileServiceError::InvalidUrl(_)));

        svc.set_avatar_url(&user, Some("https://cdn.example.com/avatars/m1.png"))
            .await
            .unwrap();
        let stored = svc.get(&user).await.unwrap().unwrap();
        assert_eq!(
            stored.avatar_url.as_deref(),
            Some("https://cdn.example.com/avatars/m1.png")
        );
    }

    #[tokio::test]
    async fn resume_requires_a_profile() {
        let user = UserId::new("m1");
        let svc = service_with_profile(&user).await;
        let text = svc
            .generate_resume(&user, &ResumeSections::default())
            .await
            .unwrap();
        assert!(text.starts_with("Name: Maria Silva\n"));

        let err = svc
            .generate_resume(&UserId::new("ghost"), &ResumeSections::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileServiceError::Storage(StorageError::NotFound)
        ));
    }
}
