//! Tweet handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Router,
};

use common::AppResult;
use domain::{NewTweet, Tweet, TWEET_DELETED_MESSAGE};

use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// Create tweet routes
pub fn tweet_routes() -> Router<AppState> {
    Router::new()
        .route("/tweet", post(post_tweet))
        .route("/tweet/:tweetid", delete(delete_tweet))
        .route("/user/tweets/:username", get(list_tweets))
}

/// Post a tweet
#[utoipa::path(
    post,
    path = "/api/tweet",
    tag = "Tweets",
    request_body = NewTweet,
    responses(
        (status = 200, description = "Tweet created", body = Tweet),
        (status = 400, description = "Unknown author, empty content, or malformed body")
    )
)]
pub async fn post_tweet(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewTweet>,
) -> AppResult<Json<Tweet>> {
    let tweet = state.service.post_tweet(payload).await?;
    Ok(Json(tweet))
}

/// List the tweets of a user
#[utoipa::path(
    get,
    path = "/api/user/tweets/{username}",
    tag = "Tweets",
    params(
        ("username" = String, Path, description = "Author user name")
    ),
    responses(
        (status = 200, description = "Tweets by the user, oldest first", body = Vec<Tweet>),
        (status = 400, description = "Storage failure")
    )
)]
pub async fn list_tweets(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<Vec<Tweet>>> {
    let tweets = state.service.list_tweets_by_user(&username).await?;
    Ok(Json(tweets))
}

/// Delete a tweet
#[utoipa::path(
    delete,
    path = "/api/tweet/{tweetid}",
    tag = "Tweets",
    params(
        ("tweetid" = i32, Path, description = "Tweet ID")
    ),
    responses(
        (status = 200, description = "Tweet deleted (also when it did not exist)", body = String, example = json!("deleted tweet")),
        (status = 400, description = "Tweet ID is not an integer")
    )
)]
pub async fn delete_tweet(
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<i32>,
) -> AppResult<Json<&'static str>> {
    state.service.delete_tweet(tweet_id).await?;
    Ok(Json(TWEET_DELETED_MESSAGE))
}
