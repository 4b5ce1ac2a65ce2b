//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod follow;
pub mod tweet;
pub mod user;
