//! Infrastructure layer - database, migrations and transactions.

mod db;
pub mod migrations;
pub mod transaction;

pub use db::Database;
pub use migrations::Migrator;
