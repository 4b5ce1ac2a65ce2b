//! Tweet domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_TWEET_LENGTH;
use crate::error::{DomainError, DomainResult};

/// A short text post with a single author.
///
/// The author is referenced by user name, serialized as `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Tweet {
    pub id: i32,
    #[serde(rename = "name")]
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Tweet creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTweet {
    /// Author user name
    #[serde(rename = "name")]
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    pub author: String,
    /// Tweet text (must not be empty)
    #[cfg_attr(feature = "openapi", schema(example = "hello world"))]
    pub content: String,
}

impl NewTweet {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }

    /// Reject empty content.
    pub fn ensure_content(&self) -> DomainResult<()> {
        if self.content.len() < MIN_TWEET_LENGTH {
            return Err(DomainError::validation("Tweet content cannot be empty"));
        }
        Ok(())
    }
}
