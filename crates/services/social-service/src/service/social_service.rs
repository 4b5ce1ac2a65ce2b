//! Social service - registration, sign-in, tweets and follows.
//!
//! Business rules that are not storage constraints are checked here;
//! everything else is forwarded to the repositories unchanged.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{Credentials, Follow, FollowStatus, NewFollow, NewTweet, NewUser, Tweet, User};

use crate::repository::{FollowRepository, TweetRepository, UserRepository};

/// Social service trait for dependency injection.
#[async_trait]
pub trait SocialService: Send + Sync {
    /// Register a new user (name and password of at least 3 characters)
    async fn register_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Check credentials by exact, case-sensitive comparison
    async fn sign_in(&self, credentials: Credentials) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Post a tweet for an existing author
    async fn post_tweet(&self, new_tweet: NewTweet) -> AppResult<Tweet>;

    /// List the tweets written by `username`
    async fn list_tweets_by_user(&self, username: &str) -> AppResult<Vec<Tweet>>;

    /// List the edges leaving `username`
    async fn list_followees(&self, username: &str) -> AppResult<Vec<Follow>>;

    /// Follow a user
    async fn follow(&self, new_follow: NewFollow) -> AppResult<Follow>;

    /// Remove an edge; removing a missing edge succeeds
    async fn unfollow(&self, source: &str, target: &str) -> AppResult<()>;

    /// Delete a tweet; deleting a missing tweet succeeds
    async fn delete_tweet(&self, id: i32) -> AppResult<()>;

    /// Whether `source` follows `target`
    async fn is_following(&self, source: &str, target: &str) -> AppResult<FollowStatus>;
}

/// Concrete implementation of SocialService using repositories.
pub struct SocialManager {
    users: Arc<dyn UserRepository>,
    tweets: Arc<dyn TweetRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl SocialManager {
    /// Create new service instance with repositories
    pub fn new(
        users: Arc<dyn UserRepository>,
        tweets: Arc<dyn TweetRepository>,
        follows: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            users,
            tweets,
            follows,
        }
    }
}

#[async_trait]
impl SocialService for SocialManager {
    async fn register_user(&self, new_user: NewUser) -> AppResult<User> {
        if let Err(e) = new_user.ensure_valid() {
            tracing::debug!(name = %new_user.name, "Registration rejected: {}", e);
            return Err(e.into());
        }

        self.users.create(new_user).await
    }

    async fn sign_in(&self, credentials: Credentials) -> AppResult<User> {
        self.users
            .find_by_credentials(&credentials.name, &credentials.password)
            .await?
            .ok_or(AppError::InvalidCredentials)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn post_tweet(&self, new_tweet: NewTweet) -> AppResult<Tweet> {
        self.tweets.create(new_tweet).await
    }

    async fn list_tweets_by_user(&self, username: &str) -> AppResult<Vec<Tweet>> {
        self.tweets.list_by_author(username).await
    }

    async fn list_followees(&self, username: &str) -> AppResult<Vec<Follow>> {
        self.follows.list_by_source(username).await
    }

    async fn follow(&self, new_follow: NewFollow) -> AppResult<Follow> {
        self.follows.create(new_follow).await
    }

    async fn unfollow(&self, source: &str, target: &str) -> AppResult<()> {
        self.follows.delete(source, target).await
    }

    async fn delete_tweet(&self, id: i32) -> AppResult<()> {
        self.tweets.delete(id).await
    }

    async fn is_following(&self, source: &str, target: &str) -> AppResult<FollowStatus> {
        self.follows.status(source, target).await
    }
}
