//! Repository layer for data access.
//!
//! Every predicate on a user name compares byte-exactly: SeaORM's `eq`
//! compiles to `=`, which is case-sensitive under PostgreSQL's default
//! collation and SQLite's `BINARY` collation.

pub mod entities;
mod follow_repository;
mod tweet_repository;
mod user_repository;

use sea_orm::SqlErr;

use common::AppError;

use crate::infra::transaction;

pub use follow_repository::{FollowRepository, FollowStore};
pub use tweet_repository::{TweetRepository, TweetStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use follow_repository::MockFollowRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tweet_repository::MockTweetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Map a write that lost to a concurrent one to `Conflict`.
///
/// Covers unique-index violations and transactions aborted by the store
/// for a serialization failure or a held write lock.
fn write_conflict_as_conflict(err: AppError, entity: &str) -> AppError {
    match err {
        AppError::Database(db_err) => {
            let unique = matches!(
                db_err.sql_err(),
                Some(SqlErr::UniqueConstraintViolation(_))
            );
            if unique || transaction::is_write_conflict(&db_err) {
                tracing::debug!(entity, "Concurrent write rejected: {}", db_err);
                AppError::conflict(entity)
            } else {
                AppError::Database(db_err)
            }
        }
        other => other,
    }
}
