use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

/// 管理后台注册的实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminEntity {
    UserProfile,
    Course,
    Module,
    Assignment,
    Enrollment,
    Submission,
}

impl AdminEntity {
    pub fn all() -> &'static [AdminEntity] {
        &[
            AdminEntity::UserProfile,
            AdminEntity::Course,
            AdminEntity::Module,
            AdminEntity::Assignment,
            AdminEntity::Enrollment,
            AdminEntity::Submission,
        ]
    }

    /// URL 中使用的名称
    pub fn slug(&self) -> &'static str {
        match self {
            AdminEntity::UserProfile => "userprofile",
            AdminEntity::Course => "course",
            AdminEntity::Module => "module",
            AdminEntity::Assignment => "assignment",
            AdminEntity::Enrollment => "enrollment",
            AdminEntity::Submission => "submission",
        }
    }

    /// 提示消息中使用的名称
    pub fn verbose_name(&self) -> &'static str {
        match self {
            AdminEntity::UserProfile => "User profile",
            AdminEntity::Course => "Course",
            AdminEntity::Module => "Module",
            AdminEntity::Assignment => "Assignment",
            AdminEntity::Enrollment => "Enrollment",
            AdminEntity::Submission => "Submission",
        }
    }

    pub fn verbose_name_plural(&self) -> &'static str {
        match self {
            AdminEntity::UserProfile => "user profiles",
            AdminEntity::Course => "courses",
            AdminEntity::Module => "modules",
            AdminEntity::Assignment => "assignments",
            AdminEntity::Enrollment => "enrollments",
            AdminEntity::Submission => "submissions",
        }
    }

    /// 该实体的列表页（写操作完成后的跳转目标）
    pub fn changelist_url(&self) -> String {
        format!("/admin/core/{}/", self.slug())
    }
}

impl std::fmt::Display for AdminEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for AdminEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminEntity::all()
            .iter()
            .find(|entity| entity.slug() == s)
            .copied()
            .ok_or_else(|| format!("Unknown admin entity: {s}"))
    }
}

/// 写操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Create,
    Update,
    Delete,
    BulkDelete,
}

impl AdminAction {
    /// 成功提示中的动作描述
    pub fn past_tense(&self) -> &'static str {
        match self {
            AdminAction::Create => "created",
            AdminAction::Update => "updated",
            AdminAction::Delete | AdminAction::BulkDelete => "deleted",
        }
    }
}

/// 需要按角色限定候选账号的引用字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceField {
    #[serde(rename = "course.instructor")]
    CourseInstructor,
    #[serde(rename = "enrollment.student")]
    EnrollmentStudent,
    #[serde(rename = "submission.student")]
    SubmissionStudent,
}

impl ReferenceField {
    pub fn all() -> &'static [ReferenceField] {
        &[
            ReferenceField::CourseInstructor,
            ReferenceField::EnrollmentStudent,
            ReferenceField::SubmissionStudent,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ReferenceField::CourseInstructor => "course.instructor",
            ReferenceField::EnrollmentStudent => "enrollment.student",
            ReferenceField::SubmissionStudent => "submission.student",
        }
    }

    /// 字段要求的账号角色
    pub fn required_role(&self) -> UserRole {
        match self {
            ReferenceField::CourseInstructor => UserRole::Instructor,
            ReferenceField::EnrollmentStudent | ReferenceField::SubmissionStudent => {
                UserRole::Student
            }
        }
    }

    pub fn entity(&self) -> AdminEntity {
        match self {
            ReferenceField::CourseInstructor => AdminEntity::Course,
            ReferenceField::EnrollmentStudent => AdminEntity::Enrollment,
            ReferenceField::SubmissionStudent => AdminEntity::Submission,
        }
    }
}

impl std::str::FromStr for ReferenceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceField::all()
            .iter()
            .find(|field| field.key() == s)
            .copied()
            .ok_or_else(|| format!("Unknown reference field: {s}"))
    }
}

/// 管理后台权限（添加/修改/删除）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminPermissions {
    pub add: bool,
    pub change: bool,
    pub delete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_slug_parse() {
        for entity in AdminEntity::all() {
            assert_eq!(entity.slug().parse::<AdminEntity>().unwrap(), *entity);
        }
        assert!("user".parse::<AdminEntity>().is_err());
    }

    #[test]
    fn test_changelist_url() {
        assert_eq!(AdminEntity::Course.changelist_url(), "/admin/core/course/");
        assert_eq!(
            AdminEntity::UserProfile.changelist_url(),
            "/admin/core/userprofile/"
        );
    }

    #[test]
    fn test_reference_field_roles() {
        assert_eq!(
            ReferenceField::CourseInstructor.required_role(),
            UserRole::Instructor
        );
        assert_eq!(
            ReferenceField::EnrollmentStudent.required_role(),
            UserRole::Student
        );
        assert_eq!(
            ReferenceField::SubmissionStudent.required_role(),
            UserRole::Student
        );
        assert_eq!(
            "submission.student".parse::<ReferenceField>().unwrap(),
            ReferenceField::SubmissionStudent
        );
        assert!("course.student".parse::<ReferenceField>().is_err());
    }
}
