//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainResult;

/// User domain entity
///
/// The password is stored and compared as plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User registration data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
    /// Unique user name (minimum 3 characters)
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "alice", min_length = 3))]
    pub name: String,
    /// Password (minimum 3 characters)
    #[validate(length(min = 3, message = "Password must be at least 3 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "secret1", min_length = 3))]
    pub password: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    /// Check the registration rules, returning the first violation.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        self.validate()?;
        Ok(())
    }
}

/// Sign-in credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Credentials {
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "secret1"))]
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Surrogate user identifier
    pub id: i32,
    /// User name
    pub name: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
