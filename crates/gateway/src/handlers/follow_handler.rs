//! Follow handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use common::AppResult;
use domain::{Follow, FollowStatus, NewFollow, FOLLOWEE_DELETED_MESSAGE};

use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// Create follow routes
pub fn follow_routes() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follow))
        .route("/user/followees/:username", get(list_followees))
        .route(
            "/user/followees/:username/:followeename",
            get(is_following).delete(unfollow),
        )
}

/// Follow a user
#[utoipa::path(
    post,
    path = "/api/follow",
    tag = "Follows",
    request_body = NewFollow,
    responses(
        (status = 200, description = "Edge created", body = Follow),
        (status = 400, description = "Unknown source user, edge already exists, or malformed body")
    )
)]
pub async fn follow(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewFollow>,
) -> AppResult<Json<Follow>> {
    let edge = state.service.follow(payload).await?;
    Ok(Json(edge))
}

/// List the edges leaving a user
#[utoipa::path(
    get,
    path = "/api/user/followees/{username}",
    tag = "Follows",
    params(
        ("username" = String, Path, description = "Follower user name")
    ),
    responses(
        (status = 200, description = "Edges from the user, oldest first", body = Vec<Follow>),
        (status = 400, description = "Storage failure")
    )
)]
pub async fn list_followees(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<Vec<Follow>>> {
    let followees = state.service.list_followees(&username).await?;
    Ok(Json(followees))
}

/// Stop following a user
#[utoipa::path(
    delete,
    path = "/api/user/followees/{username}/{followeename}",
    tag = "Follows",
    params(
        ("username" = String, Path, description = "Follower user name"),
        ("followeename" = String, Path, description = "Followee user name")
    ),
    responses(
        (status = 200, description = "Edge removed (also when it did not exist)", body = String, example = json!("deleted followee")),
        (status = 400, description = "Storage failure")
    )
)]
pub async fn unfollow(
    State(state): State<AppState>,
    ApiPath((username, followee)): ApiPath<(String, String)>,
) -> AppResult<Json<&'static str>> {
    state.service.unfollow(&username, &followee).await?;
    Ok(Json(FOLLOWEE_DELETED_MESSAGE))
}

/// Check whether one user follows another
#[utoipa::path(
    get,
    path = "/api/user/followees/{username}/{followeename}",
    tag = "Follows",
    params(
        ("username" = String, Path, description = "Follower user name"),
        ("followeename" = String, Path, description = "Followee user name")
    ),
    responses(
        (status = 302, description = "The user follows the followee"),
        (status = 404, description = "The user does not follow the followee, or is unknown")
    )
)]
pub async fn is_following(
    State(state): State<AppState>,
    ApiPath((username, followee)): ApiPath<(String, String)>,
) -> AppResult<StatusCode> {
    match state.service.is_following(&username, &followee).await? {
        FollowStatus::Following => Ok(StatusCode::FOUND),
        FollowStatus::NotFollowing | FollowStatus::SourceNotFound => Ok(StatusCode::NOT_FOUND),
    }
}
