use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("name cannot be empty")]
    EmptyName,
}

/// Display fields owned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Validated contact fields a user may edit on their own profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContact {
    name: String,
    phone: Option<String>,
}

impl ProfileContact {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileContactDraft {
    pub name: String,
    pub phone: Option<String>,
}

impl ProfileContactDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::EmptyName` if the name is blank.
    pub fn validate(self) -> Result<ProfileContact, ProfileError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let phone = self
            .phone
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        Ok(ProfileContact { name, phone })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let draft = ProfileContactDraft {
            name: "  ".into(),
            phone: None,
        };
        assert_eq!(draft.validate(), Err(ProfileError::EmptyName));
    }

    #[test]
    fn empty_phone_normalizes_to_none() {
        let contact = ProfileContactDraft {
            name: " Maria Silva ".into(),
            phone: Some(" ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(contact.name(), "Maria Silva");
        assert_eq!(contact.phone(), None);
    }
}
