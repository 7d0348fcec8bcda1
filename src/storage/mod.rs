use std::sync::Arc;

use crate::models::{
    PaginatedResponse, PaginationQuery,
    admin::entities::AdminEntity,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest},
    },
    modules::{
        entities::Module,
        requests::{CreateModuleRequest, UpdateModuleRequest},
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    },
    users::{
        entities::{User, UserProfile, UserRole},
        requests::{CreateUserProfileRequest, CreateUserRequest, UpdateUserProfileRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取账号
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取账号
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 批量获取账号（按 ID 升序）
    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 获取第一个超级管理员
    async fn get_first_superuser(&self) -> Result<Option<User>>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计账号数量
    async fn count_users(&self) -> Result<u64>;

    /// 用户资料（角色）方法
    async fn create_profile(&self, profile: CreateUserProfileRequest) -> Result<UserProfile>;
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<UserProfile>>;
    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>>;
    async fn list_profiles(&self, query: PaginationQuery)
    -> Result<PaginatedResponse<UserProfile>>;
    async fn update_profile(
        &self,
        id: i64,
        update: UpdateUserProfileRequest,
    ) -> Result<Option<UserProfile>>;
    // 列出某角色的全部账号 ID（按 ID 升序）
    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>>;
    // 获取某角色的第一个账号
    async fn get_first_user_with_role(&self, role: UserRole) -> Result<Option<User>>;
    // 统计资料数量，role 为 None 时统计全部
    async fn count_profiles(&self, role: Option<UserRole>) -> Result<u64>;

    /// 课程方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, course_code: &str) -> Result<Option<Course>>;
    async fn list_courses(&self, query: PaginationQuery) -> Result<PaginatedResponse<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;

    /// 课程模块方法
    async fn create_module(&self, module: CreateModuleRequest) -> Result<Module>;
    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>>;
    async fn get_module_by_course_and_name(
        &self,
        course_id: i64,
        module_name: &str,
    ) -> Result<Option<Module>>;
    async fn list_modules(&self, query: PaginationQuery) -> Result<PaginatedResponse<Module>>;
    async fn update_module(&self, id: i64, update: UpdateModuleRequest) -> Result<Option<Module>>;

    /// 作业方法
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn get_assignment_by_module_and_name(
        &self,
        module_id: i64,
        assignment_name: &str,
    ) -> Result<Option<Assignment>>;
    async fn list_assignments(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;

    /// 选课方法
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment_by_student_and_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>>;
    async fn list_enrollments(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Enrollment>>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>>;
    // 统计选课数量，status 为 None 时统计全部
    async fn count_enrollments(&self, status: Option<EnrollmentStatus>) -> Result<u64>;
    // 统计 since（含）之后创建的选课数量
    async fn count_enrollments_since(&self, since: chrono::DateTime<chrono::Utc>) -> Result<u64>;

    /// 提交方法
    async fn create_submission(&self, submission: CreateSubmissionRequest) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Submission>>;
    async fn update_submission(
        &self,
        id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 统计提交数量，status 为 None 时统计全部
    async fn count_submissions(&self, status: Option<SubmissionStatus>) -> Result<u64>;

    /// 管理后台通用方法
    // 统计实体总数
    async fn count_objects(&self, entity: AdminEntity) -> Result<u64>;
    // 统计给定 ID 中实际存在的记录数
    async fn count_objects_by_ids(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64>;
    // 按 ID 删除记录，返回实际删除条数
    async fn delete_objects(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
