use thiserror::Error;

use crate::model::{ParseIdError, ProfileError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
