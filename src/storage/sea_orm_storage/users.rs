use super::SeaOrmStorage;
use crate::entity::user_profiles::{Column as ProfileColumn, Entity as UserProfiles};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LMSError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建账号
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            is_staff: Set(req.is_staff),
            is_superuser: Set(req.is_superuser),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建账号失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取账号
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取账号
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取账号
    pub async fn list_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("批量查询账号失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 获取 ID 最小的超级管理员
    pub async fn get_first_superuser_impl(&self) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::IsSuperuser.eq(true))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询超级管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取 ID 最小的某角色账号
    pub async fn get_first_user_with_role_impl(
        &self,
        role: crate::models::users::entities::UserRole,
    ) -> Result<Option<User>> {
        let profile = UserProfiles::find()
            .filter(ProfileColumn::Role.eq(role.to_string()))
            .order_by_asc(ProfileColumn::UserId)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询角色账号失败: {e}")))?;

        match profile {
            Some(p) => self.get_user_by_id_impl(p.user_id).await,
            None => Ok(None),
        }
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计账号数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("统计账号数量失败: {e}")))
    }
}
