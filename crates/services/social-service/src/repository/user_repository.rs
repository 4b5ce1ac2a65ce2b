//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::write_conflict_as_conflict;
use crate::infra::transaction;
use common::{AppError, AppResult};
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// All queries exclude soft-deleted records and compare names byte-exactly.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find active user by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Find the user matching both name and password.
    ///
    /// Returns `Some` only when exactly one row matches.
    async fn find_by_credentials(&self, name: &str, password: &str) -> AppResult<Option<User>>;

    /// Create a new user, rejecting a taken name with `Conflict`
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// List all active users
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Find an active user row by exact name, on any connection or transaction.
pub(crate) async fn find_active<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> AppResult<Vec<user::Model>> {
    UserEntity::find()
        .filter(user::Column::Name.eq(name))
        .filter(user::Column::DeletedAt.is_null())
        .all(conn)
        .await
        .map_err(AppError::from)
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let mut rows = find_active(&self.db, name).await?;
        Ok(rows.pop().map(User::from))
    }

    async fn find_by_credentials(&self, name: &str, password: &str) -> AppResult<Option<User>> {
        let mut rows = UserEntity::find()
            .filter(user::Column::Name.eq(name))
            .filter(user::Column::Password.eq(password))
            .filter(user::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if rows.len() != 1 {
            return Ok(None);
        }
        Ok(rows.pop().map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        transaction::serializable(&self.db, move |txn| Box::pin(insert_user(txn, new_user)))
            .await
            .map_err(|e| write_conflict_as_conflict(e, "User"))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

/// Uniqueness check and insert, run inside one transaction.
async fn insert_user(txn: &DatabaseTransaction, new_user: NewUser) -> AppResult<User> {
    // Soft-deleted users still hold their name
    let taken = UserEntity::find()
        .filter(user::Column::Name.eq(new_user.name.as_str()))
        .one(txn)
        .await?
        .is_some();
    if taken {
        return Err(AppError::conflict("User"));
    }

    let now = Utc::now();
    let active_model = ActiveModel {
        id: NotSet,
        name: Set(new_user.name),
        password: Set(new_user.password),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    let model = active_model.insert(txn).await.map_err(AppError::from)?;
    Ok(User::from(model))
}
