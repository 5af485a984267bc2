use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Remote rows are keyed by opaque strings (UUIDs upstream, short slugs in fixtures),
// so identifiers wrap a `String` rather than a numeric row id.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(s.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identity-service user id (migrant, company member, or professional)
    UserId
);
string_id!(
    /// Unique identifier for a scheduled session
    SessionId
);
string_id!(
    /// Unique identifier for a learning trail
    TrailId
);
string_id!(
    /// Unique identifier for a job application
    ApplicationId
);
string_id!(
    /// Unique identifier for a job offer
    JobOfferId
);

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_id_display() {
        let id = TrailId::new("t1");
        assert_eq!(id.to_string(), "t1");
    }

    #[test]
    fn test_user_id_from_str() {
        let id: UserId = "u-42".parse().unwrap();
        assert_eq!(id, UserId::new("u-42"));
    }

    #[test]
    fn test_user_id_from_str_blank() {
        let result = "   ".parse::<UserId>();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_names_kind() {
        assert_eq!(format!("{:?}", JobOfferId::new("j9")), "JobOfferId(j9)");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&SessionId::new("s1")).unwrap();
        assert_eq!(json, "\"s1\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SessionId::new("s1"));
    }
}
