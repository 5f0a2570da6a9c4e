//! User service: discovery, swipes and like lists.
//!
//! Every endpoint except `list_users` requires a bearer token; the service
//! itself does not check, it lets the backend answer 401.

use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::{SwipeOutcome, UserRead};

pub const DISCOVER_PATH: &str = "/users/discover";
pub const LIKES_PATH: &str = "/users/likes";
pub const MY_LIKES_PATH: &str = "/users/my-likes";
pub const ALL_USERS_PATH: &str = "/users/all";

pub const DEFAULT_LIST_LIMIT: u32 = 100;

pub(crate) fn swipe_path(user_id: i64, is_like: bool) -> String {
    format!("/users/swipe/{user_id}/{is_like}")
}

pub(crate) fn like_path(user_id: i64) -> String {
    format!("/users/like/{user_id}")
}

#[derive(Clone, Debug)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /users/discover`: one candidate compatible with the current user.
    pub async fn discover_compatible_user(&self) -> Result<UserRead, ApiError> {
        self.api
            .send_json(self.api.get(DISCOVER_PATH))
            .await
            .inspect_err(|error| tracing::error!(%error, "error during discover"))
    }

    /// `POST /users/swipe/{user_id}/{is_like}`: record a like or dislike.
    /// The backend's outcome is returned as-is, `match_id` included.
    pub async fn swipe_user(&self, user_id: i64, is_like: bool) -> Result<SwipeOutcome, ApiError> {
        self.api
            .send_json(self.api.post(&swipe_path(user_id, is_like)))
            .await
            .inspect_err(|error| tracing::error!(%error, user_id, is_like, "error during swipe"))
    }

    /// `POST /users/like/{user_id}`: like without reading an outcome.
    pub async fn like_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.post(&like_path(user_id)))
            .await
            .inspect_err(|error| tracing::error!(%error, user_id, "error during like"))
    }

    /// `GET /users/likes`: users who liked the current user.
    pub async fn get_users_who_liked_me(&self) -> Result<Vec<UserRead>, ApiError> {
        self.api
            .send_json(self.api.get(LIKES_PATH))
            .await
            .inspect_err(|error| tracing::error!(%error, "error fetching users who liked me"))
    }

    /// `GET /users/my-likes`: users the current user has liked.
    pub async fn get_my_likes(&self) -> Result<Vec<UserRead>, ApiError> {
        self.api
            .send_json(self.api.get(MY_LIKES_PATH))
            .await
            .inspect_err(|error| tracing::error!(%error, "error fetching my likes"))
    }

    /// `GET /users/all?skip=&limit=`: page through every user.
    pub async fn list_users(&self, skip: u32, limit: u32) -> Result<Vec<UserRead>, ApiError> {
        let request = self.api.get(ALL_USERS_PATH).query(&[("skip", skip), ("limit", limit)]);
        self.api
            .send_json(request)
            .await
            .inspect_err(|error| tracing::error!(%error, skip, limit, "error listing users"))
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
