use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交记录
    pub async fn create_submission_impl(&self, req: CreateSubmissionRequest) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            assignment_id: Set(req.assignment_id),
            submission_content: Set(req.submission_content),
            grade: Set(req.grade),
            feedback: Set(req.feedback),
            graded_by: Set(req.graded_by),
            graded_at: Set(req.graded_at.map(|t| t.timestamp())),
            status: Set(req.status.to_string()),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建提交记录失败: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询提交记录失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_student_and_assignment_impl(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询提交记录失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出提交记录，最新的在前
    pub async fn list_submissions_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        let (page, size) = query.normalized(100);

        let paginator = Submissions::find()
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询提交记录总数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询提交记录列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: submissions.into_iter().map(|m| m.into_submission()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新提交记录
    ///
    /// 写入分数时同时记录评分时间。
    pub async fn update_submission_impl(
        &self,
        id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(student_id) = update.student_id {
            model.student_id = Set(student_id);
        }
        if let Some(assignment_id) = update.assignment_id {
            model.assignment_id = Set(assignment_id);
        }
        if let Some(content) = update.submission_content {
            model.submission_content = Set(content);
        }
        if let Some(grade) = update.grade {
            model.grade = Set(Some(grade));
            model.graded_at = Set(Some(chrono::Utc::now().timestamp()));
        }
        if let Some(feedback) = update.feedback {
            model.feedback = Set(Some(feedback));
        }
        if let Some(graded_by) = update.graded_by {
            model.graded_by = Set(Some(graded_by));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新提交记录失败: {e}")))?;

        self.get_submission_by_id_impl(id).await
    }

    /// 统计提交数量
    pub async fn count_submissions_impl(&self, status: Option<SubmissionStatus>) -> Result<u64> {
        let mut select = Submissions::find();
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("统计提交数量失败: {e}")))
    }
}
