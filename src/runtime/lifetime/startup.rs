use crate::config::{AdminConfig, AppConfig, JwtConfig};
use crate::errors::{LMSError, Result};
use crate::services::admin::DemoGate;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 检查启动时的数据状态，没有账号时提示运行初始化程序
async fn check_seeded(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => {
            warn!("==========================================================");
            warn!("  NO ACCOUNTS FOUND IN DATABASE");
            warn!("  Run `setup_production` to create the initial accounts");
            warn!("==========================================================");
        }
        Ok(count) => debug!("Database has {} account(s)", count),
        Err(e) => warn!("Failed to count accounts: {}", e),
    }
}

/// 检查密钥配置
fn check_config() {
    let config = AppConfig::get();
    if config.is_production() && config.jwt.secret == JwtConfig::default().secret {
        warn!("JWT secret is using the default value in production, set JWT_SECRET");
    }
    if config.is_production() && config.admin.demo_password == AdminConfig::default().demo_password
    {
        warn!("Demo account password is using the default value in production, set DEMO_PASSWORD");
    }
}

/// 创建缺失的演示账号
async fn provision_demo_account(storage: &Arc<dyn Storage>) {
    let admin = &AppConfig::get().admin;
    let gate = DemoGate::from_config();
    if gate.demo_username().is_empty() {
        info!("Demo account disabled");
        return;
    }

    match gate.provision(storage, &admin.demo_password).await {
        Ok(true) => warn!("Demo account '{}' created", gate.demo_username()),
        Ok(false) => debug!("Demo account '{}' already exists", gate.demo_username()),
        Err(e) => warn!("Failed to create demo account: {}", e),
    }
    info!(
        "Admin writes by '{}' will be simulated only",
        gate.demo_username()
    );
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| LMSError::database_config("Failed to install rustls crypto provider"))?;

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    check_seeded(&storage).await;
    check_config();
    provision_demo_account(&storage).await;

    Ok(StartupContext { storage })
}
