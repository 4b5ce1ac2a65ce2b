//! Follow relationship between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directed edge: `source_user` follows `target_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Follow {
    pub id: i32,
    #[serde(rename = "sourceuser")]
    pub source_user: String,
    #[serde(rename = "targetuser")]
    pub target_user: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Follow creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewFollow {
    /// Follower user name (must exist)
    #[serde(rename = "sourceuser")]
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    pub source_user: String,
    /// Followee user name
    #[serde(rename = "targetuser")]
    #[cfg_attr(feature = "openapi", schema(example = "bob"))]
    pub target_user: String,
}

impl NewFollow {
    pub fn new(source_user: impl Into<String>, target_user: impl Into<String>) -> Self {
        Self {
            source_user: source_user.into(),
            target_user: target_user.into(),
        }
    }
}

/// Result of asking whether one user follows another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    /// A live edge from source to target exists
    Following,
    /// The source user exists but does not follow the target
    NotFollowing,
    /// No user with the source name exists
    SourceNotFound,
}

impl FollowStatus {
    pub fn is_following(&self) -> bool {
        matches!(self, FollowStatus::Following)
    }
}
