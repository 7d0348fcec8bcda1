use serde::Serialize;

use super::entities::{AdminAction, AdminEntity, ReferenceField};
use crate::models::users::entities::UserRole;
use crate::models::users::responses::CandidateUser;

/// 写操作结果
///
/// 演示账号的写操作同样返回成功结果，但 `persisted` 为 false。
#[derive(Debug, Clone, Serialize)]
pub struct AdminActionResult {
    pub entity: AdminEntity,
    pub action: AdminAction,
    pub message: String,
    pub redirect_to: String,
    pub persisted: bool,
    pub affected: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
}

/// 引用字段候选列表
#[derive(Debug, Clone, Serialize)]
pub struct CandidateListResponse {
    pub field: ReferenceField,
    pub required_role: UserRole,
    pub candidates: Vec<CandidateUser>,
}

/// 仪表盘统计
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_profiles: u64,
    pub total_students: u64,
    pub total_instructors: u64,
    pub total_admins: u64,
    pub total_courses: u64,
    pub total_modules: u64,
    pub total_assignments: u64,
    pub total_enrollments: u64,
    pub active_enrollments: u64,
    pub total_submissions: u64,
    pub graded_submissions: u64,
    pub pending_submissions: u64,
    pub recent_enrollments: u64,
}
