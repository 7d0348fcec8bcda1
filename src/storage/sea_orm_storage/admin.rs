//! 管理后台通用存储操作：按实体统计与批量删除

use super::SeaOrmStorage;
use crate::entity::prelude::{Assignments, Courses, Enrollments, Modules, Submissions, UserProfiles};
use crate::errors::{LMSError, Result};
use crate::models::admin::entities::AdminEntity;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

/// 按实体类型分派到对应的 SeaORM 实体
macro_rules! dispatch_entity {
    ($entity:expr, |$e:ident, $col:ident| $body:expr) => {
        match $entity {
            AdminEntity::UserProfile => {
                type $e = UserProfiles;
                use crate::entity::user_profiles::Column as $col;
                $body
            }
            AdminEntity::Course => {
                type $e = Courses;
                use crate::entity::courses::Column as $col;
                $body
            }
            AdminEntity::Module => {
                type $e = Modules;
                use crate::entity::modules::Column as $col;
                $body
            }
            AdminEntity::Assignment => {
                type $e = Assignments;
                use crate::entity::assignments::Column as $col;
                $body
            }
            AdminEntity::Enrollment => {
                type $e = Enrollments;
                use crate::entity::enrollments::Column as $col;
                $body
            }
            AdminEntity::Submission => {
                type $e = Submissions;
                use crate::entity::submissions::Column as $col;
                $body
            }
        }
    };
}

impl SeaOrmStorage {
    /// 统计实体总数
    pub async fn count_objects_impl(&self, entity: AdminEntity) -> Result<u64> {
        dispatch_entity!(entity, |E, C| {
            E::find()
                .count(&self.db)
                .await
                .map_err(|e| LMSError::database_operation(format!("统计{entity}数量失败: {e}")))
        })
    }

    /// 统计给定 ID 中实际存在的记录数
    pub async fn count_objects_by_ids_impl(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        dispatch_entity!(entity, |E, C| {
            E::find()
                .filter(C::Id.is_in(ids.iter().copied()))
                .count(&self.db)
                .await
                .map_err(|e| LMSError::database_operation(format!("统计{entity}数量失败: {e}")))
        })
    }

    /// 按 ID 删除记录，关联数据由外键级联删除
    pub async fn delete_objects_impl(&self, entity: AdminEntity, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = dispatch_entity!(entity, |E, C| {
            E::delete_many()
                .filter(C::Id.is_in(ids.iter().copied()))
                .exec(&self.db)
                .await
                .map_err(|e| LMSError::database_operation(format!("删除{entity}失败: {e}")))?
        });

        Ok(result.rows_affected)
    }
}
