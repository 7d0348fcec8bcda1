//! 演示账号门控
//!
//! 演示账号可以打开所有编辑入口，但任何写操作都只返回模拟的成功结果，
//! 不会写入数据库。是否演示账号只按用户名精确比较。

use std::sync::Arc;

use crate::errors::Result;
use crate::models::admin::entities::{AdminAction, AdminEntity, AdminPermissions};
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::{CreateUserProfileRequest, CreateUserRequest};
use crate::storage::Storage;
use crate::utils::password::hash_password;

const DEMO_SUFFIX: &str = "(demo mode: no changes were saved)";

#[derive(Debug, Clone)]
pub struct DemoGate {
    demo_username: String,
}

impl DemoGate {
    pub fn new(demo_username: impl Into<String>) -> Self {
        Self {
            demo_username: demo_username.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(crate::config::AppConfig::get().admin.demo_username.clone())
    }

    pub fn demo_username(&self) -> &str {
        &self.demo_username
    }

    pub fn is_demo(&self, actor: &User) -> bool {
        !self.demo_username.is_empty() && actor.username == self.demo_username
    }

    /// 确保演示账号存在：不存在则创建一个 staff 账号及 admin 资料，已存在则不做任何修改。
    ///
    /// 返回是否新建。未配置演示账号时直接返回 `false`。
    pub async fn provision(&self, storage: &Arc<dyn Storage>, password: &str) -> Result<bool> {
        if self.demo_username.is_empty() {
            return Ok(false);
        }

        if let Some(existing) = storage.get_user_by_username(&self.demo_username).await? {
            if !existing.is_staff && !existing.is_superuser {
                tracing::warn!(
                    "Demo account '{}' exists but is not staff, it cannot open the admin",
                    existing.username
                );
            }
            return Ok(false);
        }

        let user = storage
            .create_user(CreateUserRequest {
                username: self.demo_username.clone(),
                email: format!("{}@lms.com", self.demo_username),
                password: hash_password(password)?,
                first_name: "Demo".to_string(),
                last_name: "User".to_string(),
                is_staff: true,
                is_superuser: false,
            })
            .await?;

        storage
            .create_profile(CreateUserProfileRequest {
                user_id: user.id,
                role: UserRole::Admin,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                phone_number: None,
            })
            .await?;

        tracing::info!("Created demo account '{}'", user.username);
        Ok(true)
    }

    /// 写操作是否真正落库
    pub fn should_persist(&self, actor: &User, action: AdminAction) -> bool {
        let persist = !self.is_demo(actor);
        if !persist {
            tracing::info!(
                "Demo account '{}' attempted {:?}, skipping commit",
                actor.username,
                action
            );
        }
        persist
    }

    /// 管理后台权限，演示账号与普通 staff 一样全部允许
    pub fn permissions(&self, _actor: &User, _entity: AdminEntity) -> AdminPermissions {
        AdminPermissions {
            add: true,
            change: true,
            delete: true,
        }
    }

    /// 单条写操作的成功提示
    pub fn success_message(entity: AdminEntity, action: AdminAction, persisted: bool) -> String {
        let message = format!("{} {} successfully", entity.verbose_name(), action.past_tense());
        if persisted {
            message
        } else {
            format!("{message} {DEMO_SUFFIX}")
        }
    }

    /// 批量删除的成功提示
    pub fn bulk_delete_message(entity: AdminEntity, count: u64, persisted: bool) -> String {
        let name = if count == 1 {
            entity.verbose_name().to_lowercase()
        } else {
            entity.verbose_name_plural().to_string()
        };
        let message = format!("Successfully deleted {count} {name}");
        if persisted {
            message
        } else {
            format!("{message} {DEMO_SUFFIX}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: username.into(),
            email: format!("{username}@lms.com"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: true,
            is_superuser: false,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_exact_username_is_demo() {
        let gate = DemoGate::new("demo");
        assert!(gate.is_demo(&account("demo")));
        assert!(!gate.is_demo(&account("Demo")));
        assert!(!gate.is_demo(&account("demo1")));
        assert!(!gate.is_demo(&account("")));

        let disabled = DemoGate::new("");
        assert!(!disabled.is_demo(&account("")));
    }

    #[tokio::test]
    async fn test_provision_creates_staff_account_once() {
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use crate::utils::password::verify_password;

        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let gate = DemoGate::new("demo");

        assert!(gate.provision(&storage, "demo-secret").await.unwrap());
        let demo = storage.get_user_by_username("demo").await.unwrap().unwrap();
        assert!(demo.is_staff && demo.is_active);
        assert!(!demo.is_superuser);
        assert!(verify_password("demo-secret", &demo.password_hash));
        let profile = storage.get_profile_by_user_id(demo.id).await.unwrap().unwrap();
        assert_eq!(profile.role, UserRole::Admin);

        // 再次执行不创建、不改密码
        assert!(!gate.provision(&storage, "other-secret").await.unwrap());
        assert_eq!(storage.count_users().await.unwrap(), 1);
        let demo = storage.get_user_by_username("demo").await.unwrap().unwrap();
        assert!(verify_password("demo-secret", &demo.password_hash));
    }

    #[tokio::test]
    async fn test_provision_skipped_when_disabled() {
        use crate::storage::sea_orm_storage::SeaOrmStorage;

        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        assert!(!DemoGate::new("").provision(&storage, "x").await.unwrap());
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }

    #[test]
    fn test_should_persist_for_every_action() {
        let gate = DemoGate::new("demo");
        let actions = [
            AdminAction::Create,
            AdminAction::Update,
            AdminAction::Delete,
            AdminAction::BulkDelete,
        ];
        for action in actions {
            assert!(!gate.should_persist(&account("demo"), action));
            assert!(gate.should_persist(&account("admin1"), action));
        }
    }

    #[test]
    fn test_demo_permissions_all_allowed() {
        let gate = DemoGate::new("demo");
        for entity in AdminEntity::all() {
            let perms = gate.permissions(&account("demo"), *entity);
            assert!(perms.add && perms.change && perms.delete);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            DemoGate::success_message(AdminEntity::Course, AdminAction::Create, true),
            "Course created successfully"
        );
        let simulated =
            DemoGate::success_message(AdminEntity::Enrollment, AdminAction::Update, false);
        assert!(simulated.starts_with("Enrollment updated successfully"));
        assert!(simulated.contains("demo mode"));
        assert_eq!(
            DemoGate::bulk_delete_message(AdminEntity::Module, 3, true),
            "Successfully deleted 3 modules"
        );
        assert_eq!(
            DemoGate::bulk_delete_message(AdminEntity::UserProfile, 1, true),
            "Successfully deleted 1 user profile"
        );
    }
}
