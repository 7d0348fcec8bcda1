use crate::models::users::entities::{User, UserProfile};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user: User,
    pub profile: Option<UserProfile>,
}
