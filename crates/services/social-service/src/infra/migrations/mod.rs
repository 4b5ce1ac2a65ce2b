//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_tweets_table;
mod m20240101_000003_create_follows_table;
mod m20240102_000001_add_live_follow_unique_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_tweets_table::Migration),
            Box::new(m20240101_000003_create_follows_table::Migration),
            Box::new(m20240102_000001_add_live_follow_unique_index::Migration),
        ]
    }
}
