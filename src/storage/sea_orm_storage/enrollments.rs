use super::SeaOrmStorage;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建选课记录
    pub async fn create_enrollment_impl(&self, req: CreateEnrollmentRequest) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            status: Set(req.status.to_string()),
            current_grade: Set(req.current_grade),
            enrollment_date: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建选课记录失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_by_student_and_course_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出选课记录，最新的在前
    pub async fn list_enrollments_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        let (page, size) = query.normalized(100);

        let paginator = Enrollments::find()
            .order_by_desc(Column::EnrollmentDate)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询选课记录总数失败: {e}")))?;

        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询选课记录列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: enrollments.into_iter().map(|m| m.into_enrollment()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(student_id) = update.student_id {
            model.student_id = Set(student_id);
        }
        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(current_grade) = update.current_grade {
            model.current_grade = Set(Some(current_grade));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新选课记录失败: {e}")))?;

        self.get_enrollment_by_id_impl(id).await
    }

    /// 统计选课数量
    pub async fn count_enrollments_impl(&self, status: Option<EnrollmentStatus>) -> Result<u64> {
        let mut select = Enrollments::find();
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("统计选课数量失败: {e}")))
    }

    /// 统计 since 之后（含）的选课数量
    pub async fn count_enrollments_since_impl(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64> {
        Enrollments::find()
            .filter(Column::EnrollmentDate.gte(since.timestamp()))
            .count(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("统计近期选课数量失败: {e}")))
    }
}
