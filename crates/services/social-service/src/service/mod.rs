//! Domain service layer.

mod social_service;

pub use social_service::{SocialManager, SocialService};
