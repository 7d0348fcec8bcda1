//! 用户资料实体（角色登记）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::UserProfile {
        use crate::models::users::entities::{UserProfile, UserRole};
        use chrono::{DateTime, Utc};

        UserProfile {
            id: self.id,
            user_id: self.user_id,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
