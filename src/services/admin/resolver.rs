//! 引用字段候选账号解析
//!
//! 每次调用都重新查询，账号角色变化后立即生效；已保存的引用不受影响。

use std::sync::Arc;

use crate::errors::{LMSError, Result};
use crate::models::admin::entities::ReferenceField;
use crate::models::users::responses::CandidateUser;
use crate::storage::Storage;

pub struct ReferenceResolver {
    storage: Arc<dyn Storage>,
}

impl ReferenceResolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 返回资料角色与字段要求一致的全部账号，按 ID 升序
    pub async fn candidates(&self, field: ReferenceField) -> Result<Vec<CandidateUser>> {
        let role = field.required_role();
        let ids = self.storage.list_user_ids_by_role(role).await?;
        let users = self.storage.list_users_by_ids(&ids).await?;

        Ok(users
            .into_iter()
            .map(|user| CandidateUser {
                id: user.id,
                display_name: user.display_name(),
                username: user.username,
                role,
            })
            .collect())
    }

    /// 校验新选择的账号在候选集合中
    pub async fn ensure_candidate(&self, field: ReferenceField, user_id: i64) -> Result<()> {
        let role = field.required_role();
        let profile = self.storage.get_profile_by_user_id(user_id).await?;

        match profile {
            Some(profile) if profile.role == role => Ok(()),
            Some(_) | None => Err(LMSError::validation(format!(
                "Select a valid choice for {}: account {user_id} does not have the {role} role",
                field.key()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::{
        CreateUserProfileRequest, CreateUserRequest, UpdateUserProfileRequest,
    };
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn account(storage: &Arc<dyn Storage>, username: &str, role: Option<UserRole>) -> i64 {
        let user = storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@lms.com"),
                password: "hashed".to_string(),
                first_name: username.to_string(),
                last_name: "Test".to_string(),
                is_staff: false,
                is_superuser: false,
            })
            .await
            .unwrap();
        if let Some(role) = role {
            storage
                .create_profile(CreateUserProfileRequest {
                    user_id: user.id,
                    role,
                    first_name: username.to_string(),
                    last_name: "Test".to_string(),
                    phone_number: None,
                })
                .await
                .unwrap();
        }
        user.id
    }

    async fn setup() -> (Arc<dyn Storage>, i64, i64, i64, i64) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let student = account(&storage, "student1", Some(UserRole::Student)).await;
        let instructor = account(&storage, "instructor1", Some(UserRole::Instructor)).await;
        let admin = account(&storage, "admin1", Some(UserRole::Admin)).await;
        let no_profile = account(&storage, "orphan", None).await;
        (storage, student, instructor, admin, no_profile)
    }

    #[tokio::test]
    async fn test_instructor_candidates_exclude_other_roles() {
        let (storage, _, instructor, _, _) = setup().await;
        let resolver = ReferenceResolver::new(storage);

        let candidates = resolver
            .candidates(ReferenceField::CourseInstructor)
            .await
            .unwrap();
        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![instructor]);
        assert!(candidates.iter().all(|c| c.role == UserRole::Instructor));
    }

    #[tokio::test]
    async fn test_student_candidates_exclude_other_roles() {
        let (storage, student, _, _, _) = setup().await;
        let resolver = ReferenceResolver::new(storage);

        for field in [
            ReferenceField::EnrollmentStudent,
            ReferenceField::SubmissionStudent,
        ] {
            let ids: Vec<i64> = resolver
                .candidates(field)
                .await
                .unwrap()
                .iter()
                .map(|c| c.id)
                .collect();
            assert_eq!(ids, vec![student]);
        }
    }

    #[tokio::test]
    async fn test_candidates_follow_role_changes() {
        let (storage, student, instructor, _, _) = setup().await;
        let profile = storage.get_profile_by_user_id(student).await.unwrap().unwrap();
        storage
            .update_profile(
                profile.id,
                UpdateUserProfileRequest {
                    role: Some(UserRole::Instructor),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let resolver = ReferenceResolver::new(storage);
        let ids: Vec<i64> = resolver
            .candidates(ReferenceField::CourseInstructor)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![student, instructor]);
        assert!(
            resolver
                .candidates(ReferenceField::EnrollmentStudent)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_ensure_candidate() {
        let (storage, student, instructor, admin, no_profile) = setup().await;
        let resolver = ReferenceResolver::new(storage);

        assert!(
            resolver
                .ensure_candidate(ReferenceField::CourseInstructor, instructor)
                .await
                .is_ok()
        );
        for id in [student, admin, no_profile, 9999] {
            let err = resolver
                .ensure_candidate(ReferenceField::CourseInstructor, id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), "E005");
        }
        assert!(
            resolver
                .ensure_candidate(ReferenceField::SubmissionStudent, student)
                .await
                .is_ok()
        );
    }
}
