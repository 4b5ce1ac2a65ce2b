//! User handlers.

use axum::{
    extract::State,
    response::Json,
    routing::post,
    Router,
};

use common::AppResult;
use domain::{Credentials, NewUser, UserResponse};

use crate::extractors::ApiJson;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(register).get(list_users))
        .route("/signin", post(sign_in))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Name or password too short, name taken, or malformed body")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.service.register_user(payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Check a name and password pair
#[utoipa::path(
    post,
    path = "/api/signin",
    tag = "Users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> AppResult<Json<UserResponse>> {
    let user = state.service.sign_in(payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 400, description = "Storage failure")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
