//! HTTP tests for the API routes.
//!
//! The router is driven directly with `oneshot` against an in-memory
//! social service, so no database is needed except for the health check.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, AppResult, DatabaseConfig};
use domain::{Credentials, Follow, FollowStatus, NewFollow, NewTweet, NewUser, Tweet, User};
use gateway_lib::config::GatewayConfig;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use social_service_lib::infra::Database;
use social_service_lib::service::SocialService;

// =============================================================================
// In-memory service
// =============================================================================

#[derive(Default)]
struct Store {
    next_id: i32,
    users: Vec<User>,
    tweets: Vec<Tweet>,
    follows: Vec<Follow>,
}

impl Store {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn has_user(&self, name: &str) -> bool {
        self.users.iter().any(|u| u.name == name)
    }
}

/// Social service keeping everything in vectors, with the same rules as the real one
#[derive(Default)]
struct InMemorySocialService {
    store: Mutex<Store>,
    fail_storage: bool,
}

impl InMemorySocialService {
    fn failing() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }

    fn check_storage(&self) -> AppResult<()> {
        if self.fail_storage {
            return Err(AppError::Database(sea_orm::DbErr::Custom(
                "storage offline".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SocialService for InMemorySocialService {
    async fn register_user(&self, new_user: NewUser) -> AppResult<User> {
        new_user.ensure_valid()?;
        self.check_storage()?;
        let mut store = self.store.lock().unwrap();
        if store.has_user(&new_user.name) {
            return Err(AppError::conflict("User"));
        }
        let user = User {
            id: store.next_id(),
            name: new_user.name,
            password: new_user.password,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        store.users.push(user.clone());
        Ok(user)
    }

    async fn sign_in(&self, credentials: Credentials) -> AppResult<User> {
        self.check_storage()?;
        let store = self.store.lock().unwrap();
        store
            .users
            .iter()
            .find(|u| u.name == credentials.name && u.password == credentials.password)
            .cloned()
            .ok_or(AppError::InvalidCredentials)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.check_storage()?;
        Ok(self.store.lock().unwrap().users.clone())
    }

    async fn post_tweet(&self, new_tweet: NewTweet) -> AppResult<Tweet> {
        self.check_storage()?;
        let mut store = self.store.lock().unwrap();
        if !store.has_user(&new_tweet.author) {
            return Err(AppError::not_found("User"));
        }
        new_tweet.ensure_content()?;
        let tweet = Tweet {
            id: store.next_id(),
            author: new_tweet.author,
            content: new_tweet.content,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        store.tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn list_tweets_by_user(&self, username: &str) -> AppResult<Vec<Tweet>> {
        self.check_storage()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .tweets
            .iter()
            .filter(|t| t.author == username)
            .cloned()
            .collect())
    }

    async fn list_followees(&self, username: &str) -> AppResult<Vec<Follow>> {
        self.check_storage()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .follows
            .iter()
            .filter(|f| f.source_user == username)
            .cloned()
            .collect())
    }

    async fn follow(&self, new_follow: NewFollow) -> AppResult<Follow> {
        self.check_storage()?;
        let mut store = self.store.lock().unwrap();
        if !store.has_user(&new_follow.source_user) {
            return Err(AppError::not_found("User"));
        }
        let exists = store.follows.iter().any(|f| {
            f.source_user == new_follow.source_user && f.target_user == new_follow.target_user
        });
        if exists {
            return Err(AppError::conflict("Follow"));
        }
        let follow = Follow {
            id: store.next_id(),
            source_user: new_follow.source_user,
            target_user: new_follow.target_user,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        store.follows.push(follow.clone());
        Ok(follow)
    }

    async fn unfollow(&self, source: &str, target: &str) -> AppResult<()> {
        self.check_storage()?;
        let mut store = self.store.lock().unwrap();
        store
            .follows
            .retain(|f| !(f.source_user == source && f.target_user == target));
        Ok(())
    }

    async fn delete_tweet(&self, id: i32) -> AppResult<()> {
        self.check_storage()?;
        self.store.lock().unwrap().tweets.retain(|t| t.id != id);
        Ok(())
    }

    async fn is_following(&self, source: &str, target: &str) -> AppResult<FollowStatus> {
        self.check_storage()?;
        let store = self.store.lock().unwrap();
        if !store.has_user(source) {
            return Ok(FollowStatus::SourceNotFound);
        }
        let following = store
            .follows
            .iter()
            .any(|f| f.source_user == source && f.target_user == target);
        Ok(if following {
            FollowStatus::Following
        } else {
            FollowStatus::NotFollowing
        })
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn app_with(service: InMemorySocialService) -> Router {
    let state = AppState::new(Arc::new(service), None, GatewayConfig::default());
    create_router(state)
}

fn app() -> Router {
    app_with(InMemorySocialService::default())
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and return the status with the decoded JSON body (Null when empty).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, name: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/user",
            json!({"name": name, "password": password}),
        ),
    )
    .await
}

// =============================================================================
// User Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let app = app();

    let (status, body) = register(&app, "alice", "secret1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "alice");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_short_name_is_bad_request() {
    let app = app();

    let (status, body) = register(&app, "al", "secret1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_duplicate_is_bad_request() {
    let app = app();
    register(&app, "alice", "secret1").await;

    let (status, _) = register(&app, "alice", "secret2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_sign_in() {
    let app = app();
    register(&app, "alice", "secret1").await;

    let (ok, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/signin",
            json!({"name": "alice", "password": "secret1"}),
        ),
    )
    .await;
    let (wrong_case, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/signin",
            json!({"name": "Alice", "password": "secret1"}),
        ),
    )
    .await;

    assert_eq!(ok, StatusCode::OK);
    assert_eq!(wrong_case, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_list_users() {
    let app = app();
    register(&app, "alice", "secret1").await;
    register(&app, "bob", "secret2").await;

    let (status, body) = send(&app, empty_request(Method::GET, "/api/user")).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn test_storage_failure_is_bad_request() {
    let app = app_with(InMemorySocialService::failing());

    let (status, body) = send(&app, empty_request(Method::GET, "/api/user")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
    assert_eq!(body["error"]["message"], "A database error occurred");
}

// =============================================================================
// Tweet Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_post_and_list_tweets() {
    let app = app();
    register(&app, "alice", "secret1").await;

    let (status, tweet) = send(
        &app,
        json_request(Method::POST, "/api/tweet", json!({"name": "alice", "content": "hi"})),
    )
    .await;
    let (_, tweets) = send(&app, empty_request(Method::GET, "/api/user/tweets/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tweet["name"], "alice");
    assert_eq!(tweet["content"], "hi");
    assert_eq!(tweets.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_tweet_for_unknown_author_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/tweet", json!({"name": "ghost", "content": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_post_empty_tweet_is_bad_request() {
    let app = app();
    register(&app, "alice", "secret1").await;

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/tweet", json!({"name": "alice", "content": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_tweet() {
    let app = app();
    register(&app, "alice", "secret1").await;
    let (_, tweet) = send(
        &app,
        json_request(Method::POST, "/api/tweet", json!({"name": "alice", "content": "bye"})),
    )
    .await;
    let uri = format!("/api/tweet/{}", tweet["id"]);

    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    let (again, _) = send(&app, empty_request(Method::DELETE, &uri)).await;
    let (_, tweets) = send(&app, empty_request(Method::GET, "/api/user/tweets/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("deleted tweet"));
    assert_eq!(again, StatusCode::OK);
    assert!(tweets.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_tweet_with_non_integer_id_is_bad_request() {
    let app = app();

    let (status, _) = send(&app, empty_request(Method::DELETE, "/api/tweet/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Follow Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_follow_flow() {
    let app = app();
    register(&app, "alice", "secret1").await;
    register(&app, "bob", "secret2").await;
    let follow = json!({"sourceuser": "alice", "targetuser": "bob"});

    let (first, edge) = send(&app, json_request(Method::POST, "/api/follow", follow.clone())).await;
    let (second, _) = send(&app, json_request(Method::POST, "/api/follow", follow)).await;
    let (_, followees) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice"),
    )
    .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(edge["sourceuser"], "alice");
    assert_eq!(edge["targetuser"], "bob");
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(followees.as_array().unwrap().len(), 1);
    assert_eq!(followees[0]["targetuser"], "bob");
}

#[tokio::test]
async fn test_follow_from_unknown_user_is_bad_request() {
    let app = app();

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/follow",
            json!({"sourceuser": "ghost", "targetuser": "bob"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_is_following_status_codes() {
    let app = app();
    register(&app, "alice", "secret1").await;
    send(
        &app,
        json_request(
            Method::POST,
            "/api/follow",
            json!({"sourceuser": "alice", "targetuser": "bob"}),
        ),
    )
    .await;

    let (following, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice/bob"),
    )
    .await;
    let (not_following, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice/carol"),
    )
    .await;
    let (unknown_source, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/ghost/bob"),
    )
    .await;

    assert_eq!(following, StatusCode::FOUND);
    assert_eq!(not_following, StatusCode::NOT_FOUND);
    assert_eq!(unknown_source, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unfollow_is_idempotent() {
    let app = app();
    register(&app, "alice", "secret1").await;
    send(
        &app,
        json_request(
            Method::POST,
            "/api/follow",
            json!({"sourceuser": "alice", "targetuser": "bob"}),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        empty_request(Method::DELETE, "/api/user/followees/alice/bob"),
    )
    .await;
    let (again, _) = send(
        &app,
        empty_request(Method::DELETE, "/api/user/followees/alice/bob"),
    )
    .await;
    let (_, followees) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("deleted followee"));
    assert_eq!(again, StatusCode::OK);
    assert!(followees.as_array().unwrap().is_empty());
}

// =============================================================================
// End-to-End Tests (SQLite)
// =============================================================================

async fn sqlite_app() -> Router {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = Database::connect(&config).await.unwrap();
    let service = social_service_lib::build_service(db.get_connection());
    create_router(AppState::new(service, Some(db), GatewayConfig::default()))
}

#[tokio::test]
async fn test_follow_scenario_over_sqlite() {
    let app = sqlite_app().await;
    let follow = json!({"sourceuser": "alice", "targetuser": "bob"});

    let (alice, _) = register(&app, "alice", "secret1").await;
    let (bob, _) = register(&app, "bob", "secret2").await;
    assert_eq!(alice, StatusCode::OK);
    assert_eq!(bob, StatusCode::OK);

    let (first, edge) = send(&app, json_request(Method::POST, "/api/follow", follow.clone())).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(edge["sourceuser"], "alice");
    assert_eq!(edge["targetuser"], "bob");

    let (second, body) = send(&app, json_request(Method::POST, "/api/follow", follow.clone())).await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, followees) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followees.as_array().unwrap().len(), 1);
    assert_eq!(followees[0]["targetuser"], "bob");

    let (following, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice/bob"),
    )
    .await;
    let (unknown_source, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/ghost/bob"),
    )
    .await;
    assert_eq!(following, StatusCode::FOUND);
    assert_eq!(unknown_source, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        empty_request(Method::DELETE, "/api/user/followees/alice/bob"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("deleted followee"));

    let (status, followees) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice"),
    )
    .await;
    let (not_following, _) = send(
        &app,
        empty_request(Method::GET, "/api/user/followees/alice/bob"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(followees.as_array().unwrap().is_empty());
    assert_eq!(not_following, StatusCode::NOT_FOUND);

    // A removed edge can be created again
    let (refollow, _) = send(&app, json_request(Method::POST, "/api/follow", follow)).await;
    assert_eq!(refollow, StatusCode::OK);
}

// =============================================================================
// Ambient Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_without_database_is_degraded() {
    let app = app();

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_health_with_database_is_healthy() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = Database::connect(&config).await.unwrap();
    let state = AppState::new(
        Arc::new(InMemorySocialService::default()),
        Some(db),
        GatewayConfig::default(),
    );
    let app = create_router(state);

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();

    let (status, body) = send(&app, empty_request(Method::GET, "/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/signin").is_some());
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/user")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
