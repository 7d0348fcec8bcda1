//! 管理后台写操作流水线
//!
//! 每个写操作依次经过：解析请求体、字段校验、引用字段候选校验、演示门控、提交。
//! 演示账号同样完整执行校验，只在提交前短路。

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::demo_gate::DemoGate;
use super::resolver::ReferenceResolver;
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginationQuery,
    admin::{
        entities::{AdminAction, AdminEntity, AdminPermissions, ReferenceField},
        responses::AdminActionResult,
    },
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest},
    modules::{
        entities::Module,
        requests::{CreateModuleRequest, UpdateModuleRequest},
    },
    submissions::requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    users::{
        entities::User,
        requests::{CreateUserProfileRequest, UpdateUserProfileRequest},
    },
};
use crate::storage::Storage;
use crate::utils::validate::{
    validate_grade, validate_optional_required, validate_positive, validate_required,
};

/// 通过校验、等待提交的创建请求
enum ValidatedCreate {
    UserProfile(CreateUserProfileRequest),
    Course(CreateCourseRequest),
    Module(CreateModuleRequest),
    Assignment(CreateAssignmentRequest),
    Enrollment(CreateEnrollmentRequest),
    Submission(CreateSubmissionRequest),
}

/// 通过校验、等待提交的更新请求
enum ValidatedUpdate {
    UserProfile(UpdateUserProfileRequest),
    Course(UpdateCourseRequest),
    Module(UpdateModuleRequest),
    Assignment(UpdateAssignmentRequest),
    Enrollment(UpdateEnrollmentRequest),
    Submission(UpdateSubmissionRequest),
}

pub struct AdminSite {
    storage: Arc<dyn Storage>,
    resolver: ReferenceResolver,
    gate: DemoGate,
}

impl AdminSite {
    pub fn new(storage: Arc<dyn Storage>, gate: DemoGate) -> Self {
        Self {
            resolver: ReferenceResolver::new(storage.clone()),
            storage,
            gate,
        }
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    pub fn permissions(&self, actor: &User, entity: AdminEntity) -> AdminPermissions {
        self.gate.permissions(actor, entity)
    }

    /// 列表页数据
    pub async fn list(
        &self,
        entity: AdminEntity,
        query: PaginationQuery,
    ) -> Result<serde_json::Value> {
        let storage = &self.storage;
        let value = match entity {
            AdminEntity::UserProfile => serde_json::to_value(storage.list_profiles(query).await?)?,
            AdminEntity::Course => serde_json::to_value(storage.list_courses(query).await?)?,
            AdminEntity::Module => serde_json::to_value(storage.list_modules(query).await?)?,
            AdminEntity::Assignment => {
                serde_json::to_value(storage.list_assignments(query).await?)?
            }
            AdminEntity::Enrollment => {
                serde_json::to_value(storage.list_enrollments(query).await?)?
            }
            AdminEntity::Submission => {
                serde_json::to_value(storage.list_submissions(query).await?)?
            }
        };
        Ok(value)
    }

    /// 创建
    pub async fn create(
        &self,
        actor: &User,
        entity: AdminEntity,
        payload: serde_json::Value,
    ) -> Result<AdminActionResult> {
        let action = AdminAction::Create;
        let validated = self.validate_create(entity, payload).await?;

        if !self.gate.should_persist(actor, action) {
            return Ok(simulated(entity, action, None));
        }

        let object_id = self.commit_create(validated).await?;
        tracing::info!(
            "{} created {} #{}",
            actor.username,
            entity.slug(),
            object_id
        );
        Ok(persisted(entity, action, 1, Some(object_id)))
    }

    /// 更新
    pub async fn update(
        &self,
        actor: &User,
        entity: AdminEntity,
        id: i64,
        payload: serde_json::Value,
    ) -> Result<AdminActionResult> {
        let action = AdminAction::Update;
        let validated = self.validate_update(entity, id, payload).await?;

        if !self.gate.should_persist(actor, action) {
            return Ok(simulated(entity, action, Some(id)));
        }

        let updated = self.commit_update(id, validated).await?;
        if !updated {
            return Err(not_found(entity, id));
        }
        tracing::info!("{} updated {} #{}", actor.username, entity.slug(), id);
        Ok(persisted(entity, action, 1, Some(id)))
    }

    /// 删除单条记录
    pub async fn delete(
        &self,
        actor: &User,
        entity: AdminEntity,
        id: i64,
    ) -> Result<AdminActionResult> {
        let action = AdminAction::Delete;
        if self.storage.count_objects_by_ids(entity, &[id]).await? == 0 {
            return Err(not_found(entity, id));
        }

        if !self.gate.should_persist(actor, action) {
            return Ok(simulated(entity, action, Some(id)));
        }

        let affected = self.storage.delete_objects(entity, &[id]).await?;
        if affected == 0 {
            return Err(not_found(entity, id));
        }
        tracing::info!("{} deleted {} #{}", actor.username, entity.slug(), id);
        Ok(persisted(entity, action, affected, Some(id)))
    }

    /// 批量删除，不存在的 ID 被忽略
    pub async fn bulk_delete(
        &self,
        actor: &User,
        entity: AdminEntity,
        ids: &[i64],
    ) -> Result<AdminActionResult> {
        let action = AdminAction::BulkDelete;
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(LMSError::validation(
                "Items must be selected in order to perform actions on them",
            ));
        }

        let selected = self.storage.count_objects_by_ids(entity, &ids).await?;
        let persist = self.gate.should_persist(actor, action);

        let affected = if persist {
            self.storage.delete_objects(entity, &ids).await?
        } else {
            0
        };
        let count = if persist { affected } else { selected };

        if persist {
            tracing::info!(
                "{} bulk deleted {} {}",
                actor.username,
                affected,
                entity.verbose_name_plural()
            );
        }

        Ok(AdminActionResult {
            entity,
            action,
            message: DemoGate::bulk_delete_message(entity, count, persist),
            redirect_to: entity.changelist_url(),
            persisted: persist,
            affected,
            object_id: None,
        })
    }

    async fn validate_create(
        &self,
        entity: AdminEntity,
        payload: serde_json::Value,
    ) -> Result<ValidatedCreate> {
        match entity {
            AdminEntity::UserProfile => {
                let req: CreateUserProfileRequest = parse_payload(entity, payload)?;
                validate_required("first_name", &req.first_name)?;
                validate_required("last_name", &req.last_name)?;
                self.require_user(req.user_id).await?;
                if self.storage.get_profile_by_user_id(req.user_id).await?.is_some() {
                    return Err(LMSError::validation(format!(
                        "User profile for account {} already exists",
                        req.user_id
                    )));
                }
                Ok(ValidatedCreate::UserProfile(req))
            }
            AdminEntity::Course => {
                let req: CreateCourseRequest = parse_payload(entity, payload)?;
                validate_required("course_code", &req.course_code)?;
                validate_required("course_name", &req.course_name)?;
                validate_required("term", &req.term)?;
                validate_positive("credits", req.credits)?;
                validate_positive("max_enrollment", req.max_enrollment)?;
                self.ensure_course_code_free(&req.course_code, None).await?;
                self.resolver
                    .ensure_candidate(ReferenceField::CourseInstructor, req.instructor_id)
                    .await?;
                Ok(ValidatedCreate::Course(req))
            }
            AdminEntity::Module => {
                let req: CreateModuleRequest = parse_payload(entity, payload)?;
                validate_required("module_name", &req.module_name)?;
                validate_positive("order_number", req.order_number)?;
                self.require_course(req.course_id).await?;
                Ok(ValidatedCreate::Module(req))
            }
            AdminEntity::Assignment => {
                let req: CreateAssignmentRequest = parse_payload(entity, payload)?;
                validate_required("assignment_name", &req.assignment_name)?;
                validate_positive("max_points", req.max_points)?;
                self.require_module(req.module_id).await?;
                Ok(ValidatedCreate::Assignment(req))
            }
            AdminEntity::Enrollment => {
                let req: CreateEnrollmentRequest = parse_payload(entity, payload)?;
                self.resolver
                    .ensure_candidate(ReferenceField::EnrollmentStudent, req.student_id)
                    .await?;
                self.require_course(req.course_id).await?;
                if let Some(grade) = req.current_grade {
                    validate_grade(grade, 100)?;
                }
                self.ensure_enrollment_free(req.student_id, req.course_id, None)
                    .await?;
                Ok(ValidatedCreate::Enrollment(req))
            }
            AdminEntity::Submission => {
                let req: CreateSubmissionRequest = parse_payload(entity, payload)?;
                validate_required("submission_content", &req.submission_content)?;
                self.resolver
                    .ensure_candidate(ReferenceField::SubmissionStudent, req.student_id)
                    .await?;
                let assignment = self.require_assignment(req.assignment_id).await?;
                if let Some(grade) = req.grade {
                    validate_grade(grade, assignment.max_points)?;
                }
                if let Some(grader) = req.graded_by {
                    self.require_user(grader).await?;
                }
                self.ensure_submission_free(req.student_id, req.assignment_id, None)
                    .await?;
                Ok(ValidatedCreate::Submission(req))
            }
        }
    }

    async fn validate_update(
        &self,
        entity: AdminEntity,
        id: i64,
        payload: serde_json::Value,
    ) -> Result<ValidatedUpdate> {
        match entity {
            AdminEntity::UserProfile => {
                self.storage
                    .get_profile_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateUserProfileRequest = parse_payload(entity, payload)?;
                validate_optional_required("first_name", req.first_name.as_deref())?;
                validate_optional_required("last_name", req.last_name.as_deref())?;
                Ok(ValidatedUpdate::UserProfile(req))
            }
            AdminEntity::Course => {
                self.storage
                    .get_course_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateCourseRequest = parse_payload(entity, payload)?;
                validate_optional_required("course_code", req.course_code.as_deref())?;
                validate_optional_required("course_name", req.course_name.as_deref())?;
                validate_optional_required("term", req.term.as_deref())?;
                if let Some(credits) = req.credits {
                    validate_positive("credits", credits)?;
                }
                if let Some(max_enrollment) = req.max_enrollment {
                    validate_positive("max_enrollment", max_enrollment)?;
                }
                if let Some(code) = &req.course_code {
                    self.ensure_course_code_free(code, Some(id)).await?;
                }
                if let Some(instructor_id) = req.instructor_id {
                    self.resolver
                        .ensure_candidate(ReferenceField::CourseInstructor, instructor_id)
                        .await?;
                }
                Ok(ValidatedUpdate::Course(req))
            }
            AdminEntity::Module => {
                self.storage
                    .get_module_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateModuleRequest = parse_payload(entity, payload)?;
                validate_optional_required("module_name", req.module_name.as_deref())?;
                if let Some(order_number) = req.order_number {
                    validate_positive("order_number", order_number)?;
                }
                if let Some(course_id) = req.course_id {
                    self.require_course(course_id).await?;
                }
                Ok(ValidatedUpdate::Module(req))
            }
            AdminEntity::Assignment => {
                self.storage
                    .get_assignment_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateAssignmentRequest = parse_payload(entity, payload)?;
                validate_optional_required("assignment_name", req.assignment_name.as_deref())?;
                if let Some(max_points) = req.max_points {
                    validate_positive("max_points", max_points)?;
                }
                if let Some(module_id) = req.module_id {
                    self.require_module(module_id).await?;
                }
                Ok(ValidatedUpdate::Assignment(req))
            }
            AdminEntity::Enrollment => {
                let existing = self
                    .storage
                    .get_enrollment_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateEnrollmentRequest = parse_payload(entity, payload)?;
                if let Some(student_id) = req.student_id {
                    self.resolver
                        .ensure_candidate(ReferenceField::EnrollmentStudent, student_id)
                        .await?;
                }
                if let Some(course_id) = req.course_id {
                    self.require_course(course_id).await?;
                }
                if let Some(grade) = req.current_grade {
                    validate_grade(grade, 100)?;
                }
                let student_id = req.student_id.unwrap_or(existing.student_id);
                let course_id = req.course_id.unwrap_or(existing.course_id);
                self.ensure_enrollment_free(student_id, course_id, Some(id))
                    .await?;
                Ok(ValidatedUpdate::Enrollment(req))
            }
            AdminEntity::Submission => {
                let existing = self
                    .storage
                    .get_submission_by_id(id)
                    .await?
                    .ok_or_else(|| not_found(entity, id))?;
                let req: UpdateSubmissionRequest = parse_payload(entity, payload)?;
                validate_optional_required(
                    "submission_content",
                    req.submission_content.as_deref(),
                )?;
                if let Some(student_id) = req.student_id {
                    self.resolver
                        .ensure_candidate(ReferenceField::SubmissionStudent, student_id)
                        .await?;
                }
                let assignment_id = req.assignment_id.unwrap_or(existing.assignment_id);
                let assignment = self.require_assignment(assignment_id).await?;
                if let Some(grade) = req.grade.or(existing.grade) {
                    validate_grade(grade, assignment.max_points)?;
                }
                if let Some(grader) = req.graded_by {
                    self.require_user(grader).await?;
                }
                let student_id = req.student_id.unwrap_or(existing.student_id);
                self.ensure_submission_free(student_id, assignment_id, Some(id))
                    .await?;
                Ok(ValidatedUpdate::Submission(req))
            }
        }
    }

    async fn commit_create(&self, validated: ValidatedCreate) -> Result<i64> {
        let storage = &self.storage;
        let id = match validated {
            ValidatedCreate::UserProfile(req) => storage.create_profile(req).await?.id,
            ValidatedCreate::Course(req) => storage.create_course(req).await?.id,
            ValidatedCreate::Module(req) => storage.create_module(req).await?.id,
            ValidatedCreate::Assignment(req) => storage.create_assignment(req).await?.id,
            ValidatedCreate::Enrollment(req) => storage.create_enrollment(req).await?.id,
            ValidatedCreate::Submission(req) => storage.create_submission(req).await?.id,
        };
        Ok(id)
    }

    async fn commit_update(&self, id: i64, validated: ValidatedUpdate) -> Result<bool> {
        let storage = &self.storage;
        let updated = match validated {
            ValidatedUpdate::UserProfile(req) => storage.update_profile(id, req).await?.is_some(),
            ValidatedUpdate::Course(req) => storage.update_course(id, req).await?.is_some(),
            ValidatedUpdate::Module(req) => storage.update_module(id, req).await?.is_some(),
            ValidatedUpdate::Assignment(req) => {
                storage.update_assignment(id, req).await?.is_some()
            }
            ValidatedUpdate::Enrollment(req) => {
                storage.update_enrollment(id, req).await?.is_some()
            }
            ValidatedUpdate::Submission(req) => {
                storage.update_submission(id, req).await?.is_some()
            }
        };
        Ok(updated)
    }

    async fn require_user(&self, id: i64) -> Result<User> {
        self.storage
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| LMSError::validation(format!("Account {id} does not exist")))
    }

    async fn require_course(&self, id: i64) -> Result<Course> {
        self.storage
            .get_course_by_id(id)
            .await?
            .ok_or_else(|| LMSError::validation(format!("Course {id} does not exist")))
    }

    async fn require_module(&self, id: i64) -> Result<Module> {
        self.storage
            .get_module_by_id(id)
            .await?
            .ok_or_else(|| LMSError::validation(format!("Module {id} does not exist")))
    }

    async fn require_assignment(&self, id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(id)
            .await?
            .ok_or_else(|| LMSError::validation(format!("Assignment {id} does not exist")))
    }

    async fn ensure_course_code_free(&self, code: &str, current: Option<i64>) -> Result<()> {
        match self.storage.get_course_by_code(code).await? {
            Some(course) if Some(course.id) != current => Err(LMSError::validation(format!(
                "Course with this course code \"{code}\" already exists"
            ))),
            _ => Ok(()),
        }
    }

    async fn ensure_enrollment_free(
        &self,
        student_id: i64,
        course_id: i64,
        current: Option<i64>,
    ) -> Result<()> {
        match self
            .storage
            .get_enrollment_by_student_and_course(student_id, course_id)
            .await?
        {
            Some(enrollment) if Some(enrollment.id) != current => Err(LMSError::validation(
                format!("Account {student_id} is already enrolled in course {course_id}"),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_submission_free(
        &self,
        student_id: i64,
        assignment_id: i64,
        current: Option<i64>,
    ) -> Result<()> {
        match self
            .storage
            .get_submission_by_student_and_assignment(student_id, assignment_id)
            .await?
        {
            Some(submission) if Some(submission.id) != current => Err(LMSError::validation(
                format!(
                    "Account {student_id} already has a submission for assignment {assignment_id}"
                ),
            )),
            _ => Ok(()),
        }
    }
}

fn parse_payload<T: DeserializeOwned>(entity: AdminEntity, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| {
        LMSError::validation(format!(
            "Invalid {} data: {e}",
            entity.verbose_name().to_lowercase()
        ))
    })
}

fn not_found(entity: AdminEntity, id: i64) -> LMSError {
    LMSError::not_found(format!(
        "{} with ID \"{id}\" doesn't exist",
        entity.verbose_name()
    ))
}

fn simulated(entity: AdminEntity, action: AdminAction, object_id: Option<i64>) -> AdminActionResult {
    AdminActionResult {
        entity,
        action,
        message: DemoGate::success_message(entity, action, false),
        redirect_to: entity.changelist_url(),
        persisted: false,
        affected: 0,
        object_id,
    }
}

fn persisted(
    entity: AdminEntity,
    action: AdminAction,
    affected: u64,
    object_id: Option<i64>,
) -> AdminActionResult {
    AdminActionResult {
        entity,
        action,
        message: DemoGate::success_message(entity, action, true),
        redirect_to: entity.changelist_url(),
        persisted: true,
        affected,
        object_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use crate::services::seed::SeedProcedure;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use serde_json::json;

    async fn seeded() -> (Arc<dyn Storage>, AdminSite) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        SeedProcedure::new(storage.clone()).run().await.unwrap();
        let site = AdminSite::new(storage.clone(), DemoGate::new("demo"));
        (storage, site)
    }

    async fn staff(storage: &Arc<dyn Storage>, username: &str) -> User {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@lms.com"),
                password: "hashed".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                is_staff: true,
                is_superuser: false,
            })
            .await
            .unwrap()
    }

    async fn id_of(storage: &Arc<dyn Storage>, username: &str) -> i64 {
        storage
            .get_user_by_username(username)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    async fn counts(storage: &Arc<dyn Storage>) -> Vec<u64> {
        let mut result = Vec::new();
        for entity in AdminEntity::all() {
            result.push(storage.count_objects(*entity).await.unwrap());
        }
        result
    }

    #[tokio::test]
    async fn test_demo_mutations_leave_counts_unchanged() {
        let (storage, site) = seeded().await;
        let demo = staff(&storage, "demo").await;
        let instructor = id_of(&storage, "instructor1").await;
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();
        let before = counts(&storage).await;

        let created = site
            .create(
                &demo,
                AdminEntity::Course,
                json!({
                    "course_code": "MATH201",
                    "course_name": "Advanced Mathematics",
                    "term": "Fall 2025",
                    "instructor_id": instructor,
                }),
            )
            .await
            .unwrap();
        assert!(!created.persisted);
        assert_eq!(created.redirect_to, "/admin/core/course/");
        assert!(created.message.starts_with("Course created successfully"));
        assert!(storage.get_course_by_code("MATH201").await.unwrap().is_none());

        let updated = site
            .update(
                &demo,
                AdminEntity::Course,
                course.id,
                json!({ "course_name": "Renamed" }),
            )
            .await
            .unwrap();
        assert!(!updated.persisted);
        assert!(updated.message.starts_with("Course updated successfully"));
        let unchanged = storage.get_course_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(unchanged.course_name, "Intermediate Mathematics");

        let deleted = site
            .delete(&demo, AdminEntity::Course, course.id)
            .await
            .unwrap();
        assert!(!deleted.persisted);
        assert_eq!(deleted.affected, 0);

        for entity in AdminEntity::all() {
            let ids: Vec<i64> = (1..=10).collect();
            let bulk = site.bulk_delete(&demo, *entity, &ids).await.unwrap();
            assert!(!bulk.persisted);
            assert_eq!(bulk.redirect_to, entity.changelist_url());
        }

        assert_eq!(counts(&storage).await, before);
    }

    #[tokio::test]
    async fn test_demo_still_runs_validation() {
        let (storage, site) = seeded().await;
        let demo = staff(&storage, "demo").await;
        let student = id_of(&storage, "student1").await;

        let err = site
            .create(
                &demo,
                AdminEntity::Course,
                json!({
                    "course_code": "MATH201",
                    "course_name": "Advanced Mathematics",
                    "term": "Fall 2025",
                    "instructor_id": student,
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let err = site
            .delete(&demo, AdminEntity::Module, 4242)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_non_demo_delete_reduces_count_by_one() {
        let (storage, site) = seeded().await;
        let admin = id_of(&storage, "admin1").await;
        let admin = storage.get_user_by_id(admin).await.unwrap().unwrap();
        let enrollment = storage
            .list_enrollments(PaginationQuery::default())
            .await
            .unwrap()
            .items
            .remove(0);

        let before = storage.count_objects(AdminEntity::Enrollment).await.unwrap();
        let result = site
            .delete(&admin, AdminEntity::Enrollment, enrollment.id)
            .await
            .unwrap();
        assert!(result.persisted);
        assert_eq!(result.affected, 1);
        assert_eq!(result.redirect_to, "/admin/core/enrollment/");
        assert_eq!(
            storage.count_objects(AdminEntity::Enrollment).await.unwrap(),
            before - 1
        );
    }

    #[tokio::test]
    async fn test_non_demo_bulk_delete_reduces_by_selected() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();
        for order in 2..=3 {
            site.create(
                &actor,
                AdminEntity::Module,
                json!({
                    "course_id": course.id,
                    "module_name": format!("Module {order}"),
                    "order_number": order,
                }),
            )
            .await
            .unwrap();
        }
        let modules = storage
            .list_modules(PaginationQuery::default())
            .await
            .unwrap()
            .items;
        assert_eq!(modules.len(), 3);

        let ids = [modules[1].id, modules[2].id, 9999];
        let result = site
            .bulk_delete(&actor, AdminEntity::Module, &ids)
            .await
            .unwrap();
        assert!(result.persisted);
        assert_eq!(result.affected, 2);
        assert_eq!(result.message, "Successfully deleted 2 modules");
        assert_eq!(storage.count_objects(AdminEntity::Module).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_selection() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let err = site
            .bulk_delete(&actor, AdminEntity::Course, &[])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_create_rejects_non_candidate_student() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let instructor = id_of(&storage, "instructor1").await;
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();

        let err = site
            .create(
                &actor,
                AdminEntity::Enrollment,
                json!({ "student_id": instructor, "course_id": course.id }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(storage.count_objects(AdminEntity::Enrollment).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_enrollment() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let student = id_of(&storage, "student1").await;
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();

        let err = site
            .create(
                &actor,
                AdminEntity::Enrollment,
                json!({ "student_id": student, "course_id": course.id }),
            )
            .await
            .unwrap_err();
        assert!(err.message().contains("already enrolled"));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_reference_when_not_touched() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();

        // 讲师角色被改掉之后，不涉及讲师字段的更新仍然允许
        let profile = storage
            .get_profile_by_user_id(course.instructor_id)
            .await
            .unwrap()
            .unwrap();
        storage
            .update_profile(
                profile.id,
                UpdateUserProfileRequest {
                    role: Some(crate::models::users::entities::UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = site
            .update(
                &actor,
                AdminEntity::Course,
                course.id,
                json!({ "max_enrollment": 40 }),
            )
            .await
            .unwrap();
        assert!(result.persisted);
        let course = storage.get_course_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(course.max_enrollment, 40);
        assert_eq!(course.instructor_id, profile.user_id);

        let err = site
            .update(
                &actor,
                AdminEntity::Course,
                course.id,
                json!({ "instructor_id": profile.user_id }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_update_missing_object_is_not_found() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let err = site
            .update(&actor, AdminEntity::Assignment, 4242, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_submission_grade_bounded_by_max_points() {
        let (storage, site) = seeded().await;
        let actor = staff(&storage, "staffer").await;
        let submission = storage
            .list_submissions(PaginationQuery::default())
            .await
            .unwrap()
            .items
            .remove(0);

        let err = site
            .update(
                &actor,
                AdminEntity::Submission,
                submission.id,
                json!({ "grade": 120.0 }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        site.update(
            &actor,
            AdminEntity::Submission,
            submission.id,
            json!({ "grade": 88.5 }),
        )
        .await
        .unwrap();
        let updated = storage
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.grade, Some(88.5));
    }

    #[tokio::test]
    async fn test_list_uses_pagination() {
        let (_, site) = seeded().await;
        let value = site
            .list(AdminEntity::UserProfile, PaginationQuery { page: 1, size: 2 })
            .await
            .unwrap();
        assert_eq!(value["items"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["pagination"]["total"], 4);
        assert_eq!(value["pagination"]["total_pages"], 2);
    }
}
