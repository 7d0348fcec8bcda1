//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admin;
mod assignments;
mod courses;
mod enrollments;
mod modules;
mod profiles;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LMSError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LMSError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LMSError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LMSError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LMSError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 内存 SQLite 存储（单连接，连接关闭即丢弃数据），用于测试与一次性任务
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| LMSError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库绑定在连接上，必须固定为一个永不回收的连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| LMSError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| LMSError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LMSError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.list_users_by_ids_impl(ids).await
    }

    async fn get_first_superuser(&self) -> Result<Option<User>> {
        self.get_first_superuser_impl().await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 用户资料模块
    async fn create_profile(&self, profile: CreateUserProfileRequest) -> Result<UserProfile> {
        self.create_profile_impl(profile).await
    }

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<UserProfile>> {
        self.get_profile_by_id_impl(id).await
    }

    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>> {
        self.get_profile_by_user_id_impl(user_id).await
    }

    async fn list_profiles(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<UserProfile>> {
        self.list_profiles_impl(query).await
    }

    async fn update_profile(
        &self,
        id: i64,
        update: UpdateUserProfileRequest,
    ) -> Result<Option<UserProfile>> {
        self.update_profile_impl(id, update).await
    }

    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>> {
        self.list_user_ids_by_role_impl(role).await
    }

    async fn get_first_user_with_role(&self, role: UserRole) -> Result<Option<User>> {
        self.get_first_user_with_role_impl(role).await
    }

    async fn count_profiles(&self, role: Option<UserRole>) -> Result<u64> {
        self.count_profiles_impl(role).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, course_code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(course_code).await
    }

    async fn list_courses(&self, query: PaginationQuery) -> Result<PaginatedResponse<Course>> {
        self.list_courses_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    // 课程模块（章节）
    async fn create_module(&self, module: CreateModuleRequest) -> Result<Module> {
        self.create_module_impl(module).await
    }

    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>> {
        self.get_module_by_id_impl(id).await
    }

    async fn get_module_by_course_and_name(
        &self,
        course_id: i64,
        module_name: &str,
    ) -> Result<Option<Module>> {
        self.get_module_by_course_and_name_impl(course_id, module_name)
            .await
    }

    async fn list_modules(&self, query: PaginationQuery) -> Result<PaginatedResponse<Module>> {
        self.list_modules_impl(query).await
    }

    async fn update_module(&self, id: i64, update: UpdateModuleRequest) -> Result<Option<Module>> {
        self.update_module_impl(id, update).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn get_assignment_by_module_and_name(
        &self,
        module_id: i64,
        assignment_name: &str,
    ) -> Result<Option<Assignment>> {
        self.get_assignment_by_module_and_name_impl(module_id, assignment_name)
            .await
    }

    async fn list_assignments(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    // 选课模块
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn get_enrollment_by_student_and_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_student_and_course_impl(student_id, course_id)
            .await
    }

    async fn list_enrollments(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        self.list_enrollments_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn count_enrollments(&self, status: Option<EnrollmentStatus>) -> Result<u64> {
        self.count_enrollments_impl(status).await
    }

    async fn count_enrollments_since(&self, since: chrono::DateTime<chrono::Utc>) -> Result<u64> {
        self.count_enrollments_since_impl(since).await
    }

    // 提交模块
    async fn create_submission(&self, submission: CreateSubmissionRequest) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_student_and_assignment_impl(student_id, assignment_id)
            .await
    }

    async fn list_submissions(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_submissions_impl(query).await
    }

    async fn update_submission(
        &self,
        id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(id, update).await
    }

    async fn count_submissions(&self, status: Option<SubmissionStatus>) -> Result<u64> {
        self.count_submissions_impl(status).await
    }

    // 管理后台通用
    async fn count_objects(&self, entity: AdminEntity) -> Result<u64> {
        self.count_objects_impl(entity).await
    }

    async fn count_objects_by_ids(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64> {
        self.count_objects_by_ids_impl(entity, ids).await
    }

    async fn delete_objects(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64> {
        self.delete_objects_impl(entity, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory storage should initialize")
    }

    async fn create_account(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        let user = storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@lms.com"),
                password: "hashed".to_string(),
                first_name: username.to_string(),
                last_name: "Test".to_string(),
                is_staff: role == UserRole::Admin,
                is_superuser: false,
            })
            .await
            .unwrap();
        storage
            .create_profile(CreateUserProfileRequest {
                user_id: user.id,
                role,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                phone_number: None,
            })
            .await
            .unwrap();
        user
    }

    async fn create_course(storage: &SeaOrmStorage, code: &str, instructor_id: i64) -> Course {
        storage
            .create_course(CreateCourseRequest {
                course_code: code.to_string(),
                course_name: format!("{code} course"),
                description: None,
                credits: 3,
                term: "Spring 2025".to_string(),
                instructor_id,
                max_enrollment: 30,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_and_profile_lookup() {
        let storage = storage().await;
        let alice = create_account(&storage, "student1", UserRole::Student).await;
        let bob = create_account(&storage, "instructor1", UserRole::Instructor).await;

        let found = storage.get_user_by_username("student1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(alice.id));
        assert!(storage.get_user_by_username("nobody").await.unwrap().is_none());

        let profile = storage.get_profile_by_user_id(bob.id).await.unwrap().unwrap();
        assert_eq!(profile.role, UserRole::Instructor);

        assert_eq!(
            storage.list_user_ids_by_role(UserRole::Student).await.unwrap(),
            vec![alice.id]
        );
        assert_eq!(
            storage
                .get_first_user_with_role(UserRole::Instructor)
                .await
                .unwrap()
                .map(|u| u.id),
            Some(bob.id)
        );
        assert_eq!(storage.count_profiles(None).await.unwrap(), 2);
        assert_eq!(storage.count_profiles(Some(UserRole::Admin)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_profile_changes_role() {
        let storage = storage().await;
        let user = create_account(&storage, "carol", UserRole::Student).await;
        let profile = storage.get_profile_by_user_id(user.id).await.unwrap().unwrap();

        let updated = storage
            .update_profile(
                profile.id,
                UpdateUserProfileRequest {
                    role: Some(UserRole::Instructor),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Instructor);
        assert_eq!(updated.first_name, "carol");

        let missing = storage
            .update_profile(9999, UpdateUserProfileRequest::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_enrollment_pair_is_unique() {
        let storage = storage().await;
        let instructor = create_account(&storage, "instructor1", UserRole::Instructor).await;
        let student = create_account(&storage, "student1", UserRole::Student).await;
        let course = create_course(&storage, "MATH102", instructor.id).await;

        let request = CreateEnrollmentRequest {
            student_id: student.id,
            course_id: course.id,
            status: EnrollmentStatus::Active,
            current_grade: None,
        };
        storage.create_enrollment(request.clone()).await.unwrap();
        assert!(storage.create_enrollment(request).await.is_err());
        assert_eq!(storage.count_enrollments(None).await.unwrap(), 1);
        assert_eq!(
            storage
                .count_enrollments(Some(EnrollmentStatus::Dropped))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let storage = storage().await;
        let instructor = create_account(&storage, "instructor1", UserRole::Instructor).await;
        let student = create_account(&storage, "student1", UserRole::Student).await;
        let course = create_course(&storage, "MATH102", instructor.id).await;
        let module = storage
            .create_module(CreateModuleRequest {
                course_id: course.id,
                module_name: "Module 1: Addition".to_string(),
                description: None,
                order_number: 1,
                content: None,
            })
            .await
            .unwrap();
        let assignment = storage
            .create_assignment(CreateAssignmentRequest {
                module_id: module.id,
                assignment_name: "Addition Practice Problems".to_string(),
                description: None,
                due_date: chrono::Utc::now(),
                max_points: 100,
                assignment_type: crate::models::assignments::entities::AssignmentType::Homework,
                instructions: None,
            })
            .await
            .unwrap();
        storage
            .create_submission(CreateSubmissionRequest {
                student_id: student.id,
                assignment_id: assignment.id,
                submission_content: "1 + 1 = 2".to_string(),
                grade: None,
                feedback: None,
                graded_by: None,
                graded_at: None,
                status: SubmissionStatus::Submitted,
            })
            .await
            .unwrap();

        let deleted = storage
            .delete_objects(AdminEntity::Course, &[course.id])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(storage.count_objects(AdminEntity::Module).await.unwrap(), 0);
        assert_eq!(storage.count_objects(AdminEntity::Assignment).await.unwrap(), 0);
        assert_eq!(storage.count_objects(AdminEntity::Submission).await.unwrap(), 0);
        // 账号本身不受影响
        assert_eq!(storage.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_count_and_delete_by_ids_ignore_missing() {
        let storage = storage().await;
        let instructor = create_account(&storage, "instructor1", UserRole::Instructor).await;
        let first = create_course(&storage, "MATH101", instructor.id).await;
        let second = create_course(&storage, "MATH102", instructor.id).await;

        let ids = [first.id, second.id, 4242];
        assert_eq!(
            storage
                .count_objects_by_ids(AdminEntity::Course, &ids)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            storage.delete_objects(AdminEntity::Course, &ids).await.unwrap(),
            2
        );
        assert_eq!(storage.count_objects(AdminEntity::Course).await.unwrap(), 0);
        assert_eq!(
            storage.delete_objects(AdminEntity::Course, &[]).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_grading_submission_sets_graded_at() {
        let storage = storage().await;
        let instructor = create_account(&storage, "instructor1", UserRole::Instructor).await;
        let student = create_account(&storage, "student1", UserRole::Student).await;
        let course = create_course(&storage, "MATH102", instructor.id).await;
        let module = storage
            .create_module(CreateModuleRequest {
                course_id: course.id,
                module_name: "Module 1".to_string(),
                description: None,
                order_number: 1,
                content: None,
            })
            .await
            .unwrap();
        let assignment = storage
            .create_assignment(CreateAssignmentRequest {
                module_id: module.id,
                assignment_name: "Homework".to_string(),
                description: None,
                due_date: chrono::Utc::now(),
                max_points: 100,
                assignment_type: crate::models::assignments::entities::AssignmentType::Homework,
                instructions: None,
            })
            .await
            .unwrap();
        let submission = storage
            .create_submission(CreateSubmissionRequest {
                student_id: student.id,
                assignment_id: assignment.id,
                submission_content: "answers".to_string(),
                grade: None,
                feedback: None,
                graded_by: None,
                graded_at: None,
                status: SubmissionStatus::Submitted,
            })
            .await
            .unwrap();
        assert!(submission.graded_at.is_none());

        let graded = storage
            .update_submission(
                submission.id,
                UpdateSubmissionRequest {
                    grade: Some(95.0),
                    graded_by: Some(instructor.id),
                    status: Some(SubmissionStatus::Graded),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.grade, Some(95.0));
        assert!(graded.graded_at.is_some());
        assert_eq!(storage.count_submissions(Some(SubmissionStatus::Graded)).await.unwrap(), 1);
        assert_eq!(storage.count_submissions(Some(SubmissionStatus::Submitted)).await.unwrap(), 0);
    }
}
