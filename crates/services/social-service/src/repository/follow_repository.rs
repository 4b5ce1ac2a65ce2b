//! Follow edge repository implementation with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::follow::{self, ActiveModel, Entity as FollowEntity};
use super::user_repository::find_active;
use super::write_conflict_as_conflict;
use crate::infra::transaction;
use common::{AppError, AppResult};
use domain::{Follow, FollowStatus, NewFollow};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Follow repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create an edge.
    ///
    /// Fails with `NotFound` unless exactly one active user carries the
    /// source name, then with `Conflict` if a live edge already exists.
    /// The target is not checked.
    async fn create(&self, new_follow: NewFollow) -> AppResult<Follow>;

    /// List live edges leaving `source`, oldest first
    async fn list_by_source(&self, source: &str) -> AppResult<Vec<Follow>>;

    /// Soft delete every live edge from `source` to `target`
    async fn delete(&self, source: &str, target: &str) -> AppResult<()>;

    /// Whether `source` follows `target`
    async fn status(&self, source: &str, target: &str) -> AppResult<FollowStatus>;
}

/// Live edges for an exact (source, target) pair.
async fn find_edges<C: ConnectionTrait>(
    conn: &C,
    source: &str,
    target: &str,
) -> AppResult<Vec<follow::Model>> {
    FollowEntity::find()
        .filter(follow::Column::SourceUser.eq(source))
        .filter(follow::Column::TargetUser.eq(target))
        .filter(follow::Column::DeletedAt.is_null())
        .all(conn)
        .await
        .map_err(AppError::from)
}

/// Concrete implementation of FollowRepository backed by SeaORM
pub struct FollowStore {
    db: DatabaseConnection,
}

impl FollowStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowRepository for FollowStore {
    async fn create(&self, new_follow: NewFollow) -> AppResult<Follow> {
        transaction::serializable(&self.db, move |txn| Box::pin(insert_follow(txn, new_follow)))
            .await
            .map_err(|e| write_conflict_as_conflict(e, "Follow"))
    }

    async fn list_by_source(&self, source: &str) -> AppResult<Vec<Follow>> {
        let models = FollowEntity::find()
            .filter(follow::Column::SourceUser.eq(source))
            .filter(follow::Column::DeletedAt.is_null())
            .order_by_asc(follow::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Follow::from).collect())
    }

    async fn delete(&self, source: &str, target: &str) -> AppResult<()> {
        let now = Utc::now();
        let result = FollowEntity::update_many()
            .col_expr(follow::Column::DeletedAt, Expr::value(now))
            .col_expr(follow::Column::UpdatedAt, Expr::value(now))
            .filter(follow::Column::SourceUser.eq(source))
            .filter(follow::Column::TargetUser.eq(target))
            .filter(follow::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::debug!(source, target, rows = result.rows_affected, "Follow deleted");
        Ok(())
    }

    async fn status(&self, source: &str, target: &str) -> AppResult<FollowStatus> {
        if find_active(&self.db, source).await?.len() != 1 {
            return Ok(FollowStatus::SourceNotFound);
        }

        let status = if find_edges(&self.db, source, target).await?.is_empty() {
            FollowStatus::NotFollowing
        } else {
            FollowStatus::Following
        };
        Ok(status)
    }
}

/// Source check, duplicate check and insert, run inside one transaction.
async fn insert_follow(txn: &DatabaseTransaction, new_follow: NewFollow) -> AppResult<Follow> {
    if find_active(txn, &new_follow.source_user).await?.len() != 1 {
        return Err(AppError::not_found("User"));
    }
    if !find_edges(txn, &new_follow.source_user, &new_follow.target_user)
        .await?
        .is_empty()
    {
        return Err(AppError::conflict("Follow"));
    }

    let now = Utc::now();
    let active_model = ActiveModel {
        id: NotSet,
        source_user: Set(new_follow.source_user),
        target_user: Set(new_follow.target_user),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    let model = active_model.insert(txn).await.map_err(AppError::from)?;
    Ok(Follow::from(model))
}
