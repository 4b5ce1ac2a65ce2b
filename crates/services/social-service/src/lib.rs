//! Social Service Library
//!
//! This crate provides users, tweets and follow edges on top of a
//! relational store. It is embedded in the gateway binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::SocialServiceConfig;
use crate::infra::Database;
use crate::repository::{FollowStore, TweetStore, UserStore};
use crate::service::{SocialManager, SocialService};

/// Wire the stores and the service over one connection pool.
pub fn build_service(db: DatabaseConnection) -> Arc<dyn SocialService> {
    let users = Arc::new(UserStore::new(db.clone()));
    let tweets = Arc::new(TweetStore::new(db.clone()));
    let follows = Arc::new(FollowStore::new(db));

    Arc::new(SocialManager::new(users, tweets, follows))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = SocialServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.close().await?;
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
