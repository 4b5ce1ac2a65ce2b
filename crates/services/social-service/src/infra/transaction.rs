//! Transaction helper for check-then-write sequences.
//!
//! Existence and duplicate checks must observe the same snapshot as the
//! write that depends on them, so the stores run those sequences through
//! [`serializable`]. The transaction is committed when the closure returns
//! `Ok` and rolled back otherwise.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, RuntimeErr,
    TransactionTrait,
};

use common::{AppError, AppResult};

/// Boxed future returned by a transactional closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Execute a closure within a transaction with serializable isolation.
pub async fn serializable<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    execute(db, IsolationLevel::Serializable, f).await
}

/// Internal transaction execution with configurable isolation level
async fn execute<F, T>(db: &DatabaseConnection, isolation: IsolationLevel, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Whether the store aborted a statement because a concurrent transaction won.
///
/// PostgreSQL reports serialization failures (`40001`) and deadlocks
/// (`40P01`). SQLite reports `SQLITE_BUSY` / `SQLITE_LOCKED` and their
/// extended codes.
pub fn is_write_conflict(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return false,
    };
    let RuntimeErr::SqlxError(sqlx_err) = runtime else {
        return false;
    };

    sqlx_err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| {
            matches!(
                code.as_ref(),
                "40001" | "40P01" | "5" | "6" | "261" | "262" | "517" | "773"
            )
        })
}
