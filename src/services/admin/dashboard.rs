//! 仪表盘统计

use std::sync::Arc;

use crate::errors::Result;
use crate::models::admin::entities::AdminEntity;
use crate::models::admin::responses::DashboardStats;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

pub struct DashboardAggregator {
    storage: Arc<dyn Storage>,
    recent_window_days: i64,
}

impl DashboardAggregator {
    pub fn new(storage: Arc<dyn Storage>, recent_window_days: i64) -> Self {
        Self {
            storage,
            recent_window_days,
        }
    }

    /// 以调用时刻为基准计算各项统计
    pub async fn stats(&self) -> Result<DashboardStats> {
        self.stats_at(chrono::Utc::now()).await
    }

    pub async fn stats_at(&self, now: chrono::DateTime<chrono::Utc>) -> Result<DashboardStats> {
        let storage = &self.storage;
        let since = now - chrono::Duration::days(self.recent_window_days);

        Ok(DashboardStats {
            total_users: storage.count_users().await?,
            total_profiles: storage.count_profiles(None).await?,
            total_students: storage.count_profiles(Some(UserRole::Student)).await?,
            total_instructors: storage.count_profiles(Some(UserRole::Instructor)).await?,
            total_admins: storage.count_profiles(Some(UserRole::Admin)).await?,
            total_courses: storage.count_objects(AdminEntity::Course).await?,
            total_modules: storage.count_objects(AdminEntity::Module).await?,
            total_assignments: storage.count_objects(AdminEntity::Assignment).await?,
            total_enrollments: storage.count_enrollments(None).await?,
            active_enrollments: storage
                .count_enrollments(Some(EnrollmentStatus::Active))
                .await?,
            total_submissions: storage.count_submissions(None).await?,
            graded_submissions: storage
                .count_submissions(Some(SubmissionStatus::Graded))
                .await?,
            pending_submissions: storage
                .count_submissions(Some(SubmissionStatus::Submitted))
                .await?,
            recent_enrollments: storage.count_enrollments_since(since).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::SeedProcedure;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_empty_store_is_all_zero() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let stats = DashboardAggregator::new(storage, 7).stats().await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_seeded_store_counts() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        SeedProcedure::new(storage.clone()).run().await.unwrap();

        let stats = DashboardAggregator::new(storage, 7).stats().await.unwrap();
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.total_profiles, 4);
        assert_eq!(stats.total_students, 1);
        assert_eq!(stats.total_instructors, 1);
        assert_eq!(stats.total_admins, 2);
        assert_eq!(stats.total_courses, 1);
        assert_eq!(stats.total_modules, 1);
        assert_eq!(stats.total_assignments, 1);
        assert_eq!(stats.total_enrollments, 1);
        assert_eq!(stats.active_enrollments, 1);
        assert_eq!(stats.graded_submissions, 1);
        assert_eq!(stats.pending_submissions, 0);
        assert_eq!(stats.recent_enrollments, 1);

        assert!(stats.active_enrollments <= stats.total_enrollments);
        assert!(stats.graded_submissions + stats.pending_submissions <= stats.total_submissions);
        assert!(stats.recent_enrollments <= stats.total_enrollments);
    }

    #[tokio::test]
    async fn test_recent_window_is_anchored_to_now() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        SeedProcedure::new(storage.clone()).run().await.unwrap();

        let aggregator = DashboardAggregator::new(storage, 7);
        let later = chrono::Utc::now() + chrono::Duration::days(8);
        let stats = aggregator.stats_at(later).await.unwrap();
        assert_eq!(stats.total_enrollments, 1);
        assert_eq!(stats.recent_enrollments, 0);
    }

    #[tokio::test]
    async fn test_mixed_statuses() {
        use crate::models::enrollments::requests::CreateEnrollmentRequest;
        use crate::models::submissions::requests::CreateSubmissionRequest;
        use crate::models::users::requests::{CreateUserProfileRequest, CreateUserRequest};

        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        SeedProcedure::new(storage.clone()).run().await.unwrap();
        let course = storage.get_course_by_code("MATH102").await.unwrap().unwrap();
        let assignment = storage
            .get_assignment_by_module_and_name(
                storage
                    .get_module_by_course_and_name(course.id, "Module 1: Addition")
                    .await
                    .unwrap()
                    .unwrap()
                    .id,
                "Addition Practice Problems",
            )
            .await
            .unwrap()
            .unwrap();

        // 两名新学生：一个退课且提交待评分，一个在读且提交待评分
        for (username, status) in [
            ("student2", EnrollmentStatus::Dropped),
            ("student3", EnrollmentStatus::Active),
        ] {
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
            storage
                .create_enrollment(CreateEnrollmentRequest {
                    student_id: user.id,
                    course_id: course.id,
                    status,
                    current_grade: None,
                })
                .await
                .unwrap();
            storage
                .create_submission(CreateSubmissionRequest {
                    student_id: user.id,
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
        }

        let stats = DashboardAggregator::new(storage, 7).stats().await.unwrap();
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.total_enrollments, 3);
        assert_eq!(stats.active_enrollments, 2);
        assert_eq!(stats.recent_enrollments, 3);
        assert_eq!(stats.total_submissions, 3);
        assert_eq!(stats.graded_submissions, 1);
        assert_eq!(stats.pending_submissions, 2);

        assert!(stats.active_enrollments < stats.total_enrollments);
        assert_eq!(
            stats.graded_submissions + stats.pending_submissions,
            stats.total_submissions
        );
        assert!(stats.recent_enrollments <= stats.total_enrollments);
    }
}
