//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum user name length, in characters
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Minimum tweet content length, in bytes
pub const MIN_TWEET_LENGTH: usize = 1;

// =============================================================================
// Messages
// =============================================================================

/// Body returned after a tweet is deleted
pub const TWEET_DELETED_MESSAGE: &str = "deleted tweet";

/// Body returned after a follow edge is deleted
pub const FOLLOWEE_DELETED_MESSAGE: &str = "deleted followee";
