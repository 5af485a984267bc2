use std::sync::Arc;

use serde::Serialize;

use storage::repository::{ProfileRepository, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    pub database: CheckStatus,
    pub profile_count: Option<u64>,
    pub details: Vec<String>,
}

/// Probes the backing store by counting profiles.
#[derive(Clone)]
pub struct ConnectionCheck {
    profiles: Arc<dyn ProfileRepository>,
}

impl ConnectionCheck {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Never fails; problems are reported in the returned `ConnectionReport`.
    pub async fn run(&self) -> ConnectionReport {
        match self.profiles.count_profiles().await {
            Ok(count) => ConnectionReport {
                database: CheckStatus::Success,
                profile_count: Some(count),
                details: vec![
                    "database connection successful".to_owned(),
                    format!("found 'profiles' table with {count} records"),
                ],
            },
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "connection check failed");
                ConnectionReport {
                    database: CheckStatus::Error,
                    profile_count: None,
                    details: describe(&err),
                }
            }
        }
    }
}

fn describe(err: &StorageError) -> Vec<String> {
    match err {
        StorageError::RelationMissing { relation } => vec![
            format!("database error: table '{relation}' does not exist"),
            "the schema migrations have not been run".to_owned(),
        ],
        other => vec![format!("database error: {other} (code: {})", other.code())],
    }
}
