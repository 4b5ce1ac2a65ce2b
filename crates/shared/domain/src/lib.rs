//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users, tweets and the directed follow edges between users.

pub mod constants;
pub mod error;
pub mod follow;
pub mod tweet;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use follow::{Follow, FollowStatus, NewFollow};
pub use tweet::{NewTweet, Tweet};
pub use user::{Credentials, NewUser, User, UserResponse};
