use super::entities::UserRole;
use serde::Deserialize;

// 账号创建请求（存储层，password 为已哈希的值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// 用户资料创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserProfileRequest {
    pub user_id: i64,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

// 用户资料更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserProfileRequest {
    pub role: Option<UserRole>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}
