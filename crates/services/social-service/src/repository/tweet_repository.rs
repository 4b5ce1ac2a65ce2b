//! Tweet repository implementation with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::tweet::{self, ActiveModel, Entity as TweetEntity};
use super::user_repository::find_active;
use super::write_conflict_as_conflict;
use crate::infra::transaction;
use common::{AppError, AppResult};
use domain::{NewTweet, Tweet};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Tweet repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// Create a tweet.
    ///
    /// Fails with `NotFound` unless exactly one active user carries the
    /// author name, then with `Validation` if the content is empty.
    async fn create(&self, new_tweet: NewTweet) -> AppResult<Tweet>;

    /// List active tweets whose author matches exactly, oldest first
    async fn list_by_author(&self, author: &str) -> AppResult<Vec<Tweet>>;

    /// Soft delete a tweet by id; absent ids are not an error
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of TweetRepository backed by SeaORM
pub struct TweetStore {
    db: DatabaseConnection,
}

impl TweetStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TweetRepository for TweetStore {
    async fn create(&self, new_tweet: NewTweet) -> AppResult<Tweet> {
        transaction::serializable(&self.db, move |txn| Box::pin(insert_tweet(txn, new_tweet)))
            .await
            .map_err(|e| write_conflict_as_conflict(e, "Tweet"))
    }

    async fn list_by_author(&self, author: &str) -> AppResult<Vec<Tweet>> {
        let models = TweetEntity::find()
            .filter(tweet::Column::UserName.eq(author))
            .filter(tweet::Column::DeletedAt.is_null())
            .order_by_asc(tweet::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Tweet::from).collect())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let now = Utc::now();
        let result = TweetEntity::update_many()
            .col_expr(tweet::Column::DeletedAt, Expr::value(now))
            .col_expr(tweet::Column::UpdatedAt, Expr::value(now))
            .filter(tweet::Column::Id.eq(id))
            .filter(tweet::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::debug!(tweet_id = id, rows = result.rows_affected, "Tweet deleted");
        Ok(())
    }
}

/// Author check, content check and insert, run inside one transaction.
async fn insert_tweet(txn: &DatabaseTransaction, new_tweet: NewTweet) -> AppResult<Tweet> {
    if find_active(txn, &new_tweet.author).await?.len() != 1 {
        return Err(AppError::not_found("User"));
    }
    new_tweet.ensure_content()?;

    let now = Utc::now();
    let active_model = ActiveModel {
        id: NotSet,
        user_name: Set(new_tweet.author),
        content: Set(new_tweet.content),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    let model = active_model.insert(txn).await.map_err(AppError::from)?;
    Ok(Tweet::from(model))
}
