//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use domain::{Credentials, Follow, NewFollow, NewTweet, NewUser, Tweet, UserResponse};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::register,
        crate::handlers::user_handler::sign_in,
        crate::handlers::user_handler::list_users,
        crate::handlers::tweet_handler::post_tweet,
        crate::handlers::tweet_handler::list_tweets,
        crate::handlers::tweet_handler::delete_tweet,
        crate::handlers::follow_handler::follow,
        crate::handlers::follow_handler::list_followees,
        crate::handlers::follow_handler::unfollow,
        crate::handlers::follow_handler::is_following,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            NewUser,
            Credentials,
            UserResponse,
            NewTweet,
            Tweet,
            NewFollow,
            Follow,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "Registration, sign-in and user listing"),
        (name = "Tweets", description = "Posting, listing and deleting tweets"),
        (name = "Follows", description = "Directed follow relationships"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;
