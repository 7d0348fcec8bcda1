use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            module_id: Set(req.module_id),
            assignment_name: Set(req.assignment_name),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            max_points: Set(req.max_points),
            assignment_type: Set(req.assignment_type.to_string()),
            instructions: Set(req.instructions),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn get_assignment_by_module_and_name_impl(
        &self,
        module_id: i64,
        assignment_name: &str,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ModuleId.eq(module_id))
            .filter(Column::AssignmentName.eq(assignment_name))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出作业，按截止时间排序
    pub async fn list_assignments_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        let (page, size) = query.normalized(100);

        let paginator = Assignments::find()
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询作业总数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: assignments.into_iter().map(|m| m.into_assignment()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(module_id) = update.module_id {
            model.module_id = Set(module_id);
        }
        if let Some(assignment_name) = update.assignment_name {
            model.assignment_name = Set(assignment_name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }
        if let Some(max_points) = update.max_points {
            model.max_points = Set(max_points);
        }
        if let Some(assignment_type) = update.assignment_type {
            model.assignment_type = Set(assignment_type.to_string());
        }
        if let Some(instructions) = update.instructions {
            model.instructions = Set(Some(instructions));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }
}
