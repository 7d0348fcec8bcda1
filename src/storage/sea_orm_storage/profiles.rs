use super::SeaOrmStorage;
use crate::entity::user_profiles::{ActiveModel, Column, Entity as UserProfiles};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    users::{
        entities::{UserProfile, UserRole},
        requests::{CreateUserProfileRequest, UpdateUserProfileRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建用户资料
    pub async fn create_profile_impl(&self, req: CreateUserProfileRequest) -> Result<UserProfile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            role: Set(req.role.to_string()),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone_number: Set(req.phone_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建用户资料失败: {e}")))?;

        Ok(result.into_profile())
    }

    pub async fn get_profile_by_id_impl(&self, id: i64) -> Result<Option<UserProfile>> {
        let result = UserProfiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_profile_by_user_id_impl(&self, user_id: i64) -> Result<Option<UserProfile>> {
        let result = UserProfiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 分页列出用户资料
    pub async fn list_profiles_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<UserProfile>> {
        let (page, size) = query.normalized(100);

        let paginator = UserProfiles::find()
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询用户资料总数失败: {e}")))?;

        let profiles = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询用户资料列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: profiles.into_iter().map(|m| m.into_profile()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户资料
    pub async fn update_profile_impl(
        &self,
        id: i64,
        update: UpdateUserProfileRequest,
    ) -> Result<Option<UserProfile>> {
        if self.get_profile_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(phone_number) = update.phone_number {
            model.phone_number = Set(Some(phone_number));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新用户资料失败: {e}")))?;

        self.get_profile_by_id_impl(id).await
    }

    /// 列出某角色的全部账号 ID
    pub async fn list_user_ids_by_role_impl(&self, role: UserRole) -> Result<Vec<i64>> {
        UserProfiles::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::UserId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询角色账号失败: {e}")))
    }

    /// 统计用户资料数量
    pub async fn count_profiles_impl(&self, role: Option<UserRole>) -> Result<u64> {
        let mut select = UserProfiles::find();
        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("统计用户资料数量失败: {e}")))
    }
}
