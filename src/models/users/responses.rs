use serde::Serialize;

use super::entities::UserRole;

// 候选账号（引用字段下拉选项）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
}
