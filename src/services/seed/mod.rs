//! 生产环境示例数据初始化
//!
//! 按自然键判断是否已存在：存在则跳过并复用，不存在则创建，从不修改已有数据。
//! 可以重复执行。

pub mod data;

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{LMSError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentType},
        requests::CreateAssignmentRequest,
    },
    courses::{entities::Course, requests::CreateCourseRequest},
    enrollments::{entities::EnrollmentStatus, requests::CreateEnrollmentRequest},
    modules::{entities::Module, requests::CreateModuleRequest},
    submissions::{entities::SubmissionStatus, requests::CreateSubmissionRequest},
    users::{
        entities::{User, UserRole},
        requests::{CreateUserProfileRequest, CreateUserRequest},
    },
};
use crate::storage::Storage;
use crate::utils::password::hash_password;

use data::SeedAccount;

/// 初始化结果
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub lines: Vec<String>,
    pub created: u32,
    pub skipped: u32,
    echo: bool,
}

impl SeedReport {
    /// 每记录一行就立即打印到标准输出
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{}", line);
        if self.echo {
            println!("{line}");
        }
        self.lines.push(line);
    }

    fn created(&mut self, line: impl Into<String>) {
        self.created += 1;
        self.line(line);
    }

    fn skipped(&mut self, line: impl Into<String>) {
        self.skipped += 1;
        self.line(line);
    }
}

pub struct SeedProcedure {
    storage: Arc<dyn Storage>,
}

impl SeedProcedure {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn run(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        self.run_into(&mut report).await?;
        Ok(report)
    }

    /// 执行初始化并把进度写入调用方的报告，失败时已完成步骤的记录仍保留在报告中
    pub async fn run_into(&self, report: &mut SeedReport) -> Result<()> {
        report.line("Starting production data setup...");

        self.create_superuser(report).await?;
        let student = self.create_sample_users(report).await?;
        let course = self.create_sample_course(report).await?;
        let module = self.create_sample_module(report, &course).await?;
        let assignment = self.create_sample_assignment(report, &module).await?;
        self.create_sample_enrollment(report, &student, &course)
            .await?;
        self.create_sample_submission(report, &student, &course, &assignment)
            .await?;

        report.line("Production data setup completed successfully!");
        Ok(())
    }

    async fn create_superuser(&self, report: &mut SeedReport) -> Result<()> {
        let account = &data::SUPERUSER;
        if self
            .storage
            .get_user_by_username(account.username)
            .await?
            .is_some()
        {
            report.skipped(format!("Superuser \"{}\" already exists.", account.username));
            return Ok(());
        }

        self.create_account(account, true).await?;
        report.created(format!("Created superuser: {}", account.username));
        Ok(())
    }

    /// 创建每个角色的示例账号，返回用于选课的学生账号
    async fn create_sample_users(&self, report: &mut SeedReport) -> Result<User> {
        let mut student = None;

        for account in &data::SAMPLE_ACCOUNTS {
            if let Some(existing) = self.storage.get_user_by_username(account.username).await? {
                report.skipped(format!("User \"{}\" already exists.", account.username));
                if account.role == UserRole::Student {
                    student = Some(existing);
                }
                continue;
            }

            let user = self.create_account(account, false).await?;
            if account.role == UserRole::Student {
                student = Some(user);
            }
            report.created(format!("Created {}: {}", account.role, account.username));
        }

        match student {
            Some(user) => Ok(user),
            None => self
                .storage
                .get_first_user_with_role(UserRole::Student)
                .await?
                .ok_or_else(|| LMSError::seed("No student account available for enrollment")),
        }
    }

    async fn create_account(&self, account: &SeedAccount, superuser: bool) -> Result<User> {
        let user = self
            .storage
            .create_user(CreateUserRequest {
                username: account.username.to_string(),
                email: account.email.to_string(),
                password: hash_password(account.password)?,
                first_name: account.first_name.to_string(),
                last_name: account.last_name.to_string(),
                is_staff: superuser,
                is_superuser: superuser,
            })
            .await?;

        self.storage
            .create_profile(CreateUserProfileRequest {
                user_id: user.id,
                role: account.role,
                first_name: account.first_name.to_string(),
                last_name: account.last_name.to_string(),
                phone_number: Some(account.phone.to_string()),
            })
            .await?;

        Ok(user)
    }

    async fn create_sample_course(&self, report: &mut SeedReport) -> Result<Course> {
        if let Some(course) = self.storage.get_course_by_code(data::COURSE_CODE).await? {
            report.skipped(format!("Course \"{}\" already exists.", data::COURSE_CODE));
            return Ok(course);
        }

        let instructor = match self
            .storage
            .get_first_user_with_role(UserRole::Instructor)
            .await?
        {
            Some(user) => user,
            None => {
                let superuser = self.storage.get_first_superuser().await?.ok_or_else(|| {
                    LMSError::seed(format!(
                        "No instructor or superuser available for course {}",
                        data::COURSE_CODE
                    ))
                })?;
                warn!(
                    "No instructor account found, assigning superuser {} to {}",
                    superuser.username,
                    data::COURSE_CODE
                );
                superuser
            }
        };

        let course = self
            .storage
            .create_course(CreateCourseRequest {
                course_code: data::COURSE_CODE.to_string(),
                course_name: data::COURSE_NAME.to_string(),
                description: Some(data::COURSE_DESCRIPTION.to_string()),
                credits: data::COURSE_CREDITS,
                term: data::COURSE_TERM.to_string(),
                instructor_id: instructor.id,
                max_enrollment: data::COURSE_MAX_ENROLLMENT,
            })
            .await?;

        report.created(format!("Created course: {course}"));
        Ok(course)
    }

    async fn create_sample_module(&self, report: &mut SeedReport, course: &Course) -> Result<Module> {
        if let Some(module) = self
            .storage
            .get_module_by_course_and_name(course.id, data::MODULE_NAME)
            .await?
        {
            report.skipped(format!("Module \"{}\" already exists.", data::MODULE_NAME));
            return Ok(module);
        }

        let module = self
            .storage
            .create_module(CreateModuleRequest {
                course_id: course.id,
                module_name: data::MODULE_NAME.to_string(),
                description: Some(data::MODULE_DESCRIPTION.to_string()),
                order_number: data::MODULE_ORDER,
                content: Some(data::MODULE_CONTENT.to_string()),
            })
            .await?;

        report.created(format!(
            "Created module: {} - {}",
            course.course_code, module.module_name
        ));
        Ok(module)
    }

    async fn create_sample_assignment(
        &self,
        report: &mut SeedReport,
        module: &Module,
    ) -> Result<Assignment> {
        if let Some(assignment) = self
            .storage
            .get_assignment_by_module_and_name(module.id, data::ASSIGNMENT_NAME)
            .await?
        {
            report.skipped(format!(
                "Assignment \"{}\" already exists.",
                data::ASSIGNMENT_NAME
            ));
            return Ok(assignment);
        }

        let due_date = chrono::Utc::now() + chrono::Duration::days(data::ASSIGNMENT_DUE_IN_DAYS);
        let assignment = self
            .storage
            .create_assignment(CreateAssignmentRequest {
                module_id: module.id,
                assignment_name: data::ASSIGNMENT_NAME.to_string(),
                description: Some(data::ASSIGNMENT_DESCRIPTION.to_string()),
                due_date,
                max_points: data::ASSIGNMENT_MAX_POINTS,
                assignment_type: AssignmentType::Homework,
                instructions: Some(data::ASSIGNMENT_INSTRUCTIONS.to_string()),
            })
            .await?;

        report.created(format!(
            "Created assignment: {} - {}",
            module.module_name, assignment.assignment_name
        ));
        Ok(assignment)
    }

    async fn create_sample_enrollment(
        &self,
        report: &mut SeedReport,
        student: &User,
        course: &Course,
    ) -> Result<()> {
        if self
            .storage
            .get_enrollment_by_student_and_course(student.id, course.id)
            .await?
            .is_some()
        {
            report.skipped(format!(
                "Enrollment for {} in {} already exists.",
                student.username, course.course_code
            ));
            return Ok(());
        }

        self.storage
            .create_enrollment(CreateEnrollmentRequest {
                student_id: student.id,
                course_id: course.id,
                status: EnrollmentStatus::Active,
                current_grade: None,
            })
            .await?;

        report.created(format!(
            "Created enrollment: {} in {}",
            student.username, course.course_code
        ));
        Ok(())
    }

    async fn create_sample_submission(
        &self,
        report: &mut SeedReport,
        student: &User,
        course: &Course,
        assignment: &Assignment,
    ) -> Result<()> {
        if self
            .storage
            .get_submission_by_student_and_assignment(student.id, assignment.id)
            .await?
            .is_some()
        {
            report.skipped(format!(
                "Submission for {} on {} already exists.",
                student.username, assignment.assignment_name
            ));
            return Ok(());
        }

        self.storage
            .create_submission(CreateSubmissionRequest {
                student_id: student.id,
                assignment_id: assignment.id,
                submission_content: data::SUBMISSION_CONTENT.to_string(),
                grade: Some(data::SUBMISSION_GRADE),
                feedback: Some(data::SUBMISSION_FEEDBACK.to_string()),
                graded_by: Some(course.instructor_id),
                graded_at: Some(chrono::Utc::now()),
                status: SubmissionStatus::Graded,
            })
            .await?;

        report.created(format!(
            "Created submission: {} - {}",
            student.username, assignment.assignment_name
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::admin::entities::AdminEntity;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::password::verify_password;

    async fn storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::new_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_seed_empty_store() {
        let storage = storage().await;
        let report = SeedProcedure::new(storage.clone()).run().await.unwrap();

        assert_eq!(report.created, 9);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.lines.first().map(String::as_str), Some("Starting production data setup..."));
        assert_eq!(
            report.lines.last().map(String::as_str),
            Some("Production data setup completed successfully!")
        );
        assert!(report.lines.contains(&"Created superuser: SuperKatie".to_string()));
        assert!(report.lines.contains(&"Created instructor: instructor1".to_string()));
        assert!(
            report
                .lines
                .contains(&"Created course: MATH102 - Intermediate Mathematics".to_string())
        );

        assert_eq!(storage.count_users().await.unwrap(), 4);
        assert_eq!(storage.count_objects(AdminEntity::Course).await.unwrap(), 1);
        assert_eq!(storage.count_objects(AdminEntity::Module).await.unwrap(), 1);
        assert_eq!(storage.count_objects(AdminEntity::Assignment).await.unwrap(), 1);

        let superuser = storage.get_user_by_username("SuperKatie").await.unwrap().unwrap();
        assert!(superuser.is_superuser && superuser.is_staff);
        assert!(verify_password("lms-password123", &superuser.password_hash));

        let instructor = storage.get_user_by_username("instructor1").await.unwrap().unwrap();
        let student = storage.get_user_by_username("student1").await.unwrap().unwrap();
        assert!(!student.is_staff);
        assert!(verify_password("password123", &student.password_hash));

        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();
        assert_eq!(course.instructor_id, instructor.id);
        assert_eq!(course.credits, 3);
        assert_eq!(course.max_enrollment, 30);
        assert_eq!(course.term, "Spring 2025");

        let enrollment = storage
            .get_enrollment_by_student_and_course(student.id, course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert!(enrollment.current_grade.is_none());

        let submissions = storage
            .list_submissions(PaginationQuery::default())
            .await
            .unwrap()
            .items;
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].student_id, student.id);
        assert_eq!(submissions[0].grade, Some(95.0));
        assert_eq!(submissions[0].status, SubmissionStatus::Graded);
        assert_eq!(submissions[0].graded_by, Some(instructor.id));
        assert!(submissions[0].graded_at.is_some());
    }

    #[tokio::test]
    async fn test_seed_twice_is_idempotent() {
        let storage = storage().await;
        let procedure = SeedProcedure::new(storage.clone());
        procedure.run().await.unwrap();

        let mut before = vec![storage.count_users().await.unwrap()];
        for entity in AdminEntity::all() {
            before.push(storage.count_objects(*entity).await.unwrap());
        }

        let report = procedure.run().await.unwrap();
        assert_eq!(report.created, 0);
        assert_eq!(report.skipped, 9);
        assert!(report.lines.contains(&"Superuser \"SuperKatie\" already exists.".to_string()));
        assert!(report.lines.contains(&"Course \"MATH102\" already exists.".to_string()));

        let mut after = vec![storage.count_users().await.unwrap()];
        for entity in AdminEntity::all() {
            after.push(storage.count_objects(*entity).await.unwrap());
        }
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_course_falls_back_to_superuser() {
        let storage = storage().await;
        let procedure = SeedProcedure::new(storage.clone());
        let mut report = SeedReport::default();

        procedure.create_superuser(&mut report).await.unwrap();
        let course = procedure.create_sample_course(&mut report).await.unwrap();
        let superuser = storage.get_user_by_username("SuperKatie").await.unwrap().unwrap();
        assert_eq!(course.instructor_id, superuser.id);
    }

    #[tokio::test]
    async fn test_course_without_instructor_or_superuser_fails() {
        let storage = storage().await;
        let procedure = SeedProcedure::new(storage);
        let mut report = SeedReport::default();

        let err = procedure.create_sample_course(&mut report).await.unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[tokio::test]
    async fn test_failed_run_keeps_progress_lines() {
        let storage = storage().await;
        // SuperKatie 和 instructor1 已存在但都不是超级管理员或教师，课程无法分配授课人
        for username in ["SuperKatie", "instructor1"] {
            let user = storage
                .create_user(CreateUserRequest {
                    username: username.to_string(),
                    email: format!("{username}@lms.com"),
                    password: "hash".to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                    is_staff: false,
                    is_superuser: false,
                })
                .await
                .unwrap();
            storage
                .create_profile(CreateUserProfileRequest {
                    user_id: user.id,
                    role: UserRole::Student,
                    first_name: String::new(),
                    last_name: String::new(),
                    phone_number: None,
                })
                .await
                .unwrap();
        }

        let mut report = SeedReport::default();
        let err = SeedProcedure::new(storage)
            .run_into(&mut report)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");

        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(
            report.lines,
            vec![
                "Starting production data setup...".to_string(),
                "Superuser \"SuperKatie\" already exists.".to_string(),
                "Created student: student1".to_string(),
                "User \"instructor1\" already exists.".to_string(),
                "Created admin: admin1".to_string(),
            ]
        );
    }
}
