use super::SeaOrmStorage;
use crate::entity::modules::{ActiveModel, Column, Entity as Modules};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    modules::{
        entities::Module,
        requests::{CreateModuleRequest, UpdateModuleRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_module_impl(&self, req: CreateModuleRequest) -> Result<Module> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            module_name: Set(req.module_name),
            description: Set(req.description),
            order_number: Set(req.order_number),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建课程模块失败: {e}")))?;

        Ok(result.into_module())
    }

    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<Module>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程模块失败: {e}")))?;

        Ok(result.map(|m| m.into_module()))
    }

    pub async fn get_module_by_course_and_name_impl(
        &self,
        course_id: i64,
        module_name: &str,
    ) -> Result<Option<Module>> {
        let result = Modules::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::ModuleName.eq(module_name))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程模块失败: {e}")))?;

        Ok(result.map(|m| m.into_module()))
    }

    /// 分页列出课程模块，按课程及序号排序
    pub async fn list_modules_impl(&self, query: PaginationQuery) -> Result<PaginatedResponse<Module>> {
        let (page, size) = query.normalized(100);

        let paginator = Modules::find()
            .order_by_asc(Column::CourseId)
            .order_by_asc(Column::OrderNumber)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程模块总数失败: {e}")))?;

        let modules = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程模块列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: modules.into_iter().map(|m| m.into_module()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_module_impl(
        &self,
        id: i64,
        update: UpdateModuleRequest,
    ) -> Result<Option<Module>> {
        if self.get_module_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(module_name) = update.module_name {
            model.module_name = Set(module_name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(order_number) = update.order_number {
            model.order_number = Set(order_number);
        }
        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新课程模块失败: {e}")))?;

        self.get_module_by_id_impl(id).await
    }
}
