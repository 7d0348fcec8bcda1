//! 初始化生产环境的示例数据
//!
//! 创建超级管理员、示例账号与一套示例课程数据。可重复执行，已存在的记录会被跳过。

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::error;

use rust_lms_platform::config::AppConfig;
use rust_lms_platform::services::seed::{SeedProcedure, SeedReport};

#[tokio::main]
async fn main() {
    dotenv().ok();
    setup_panic!();

    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(1);
    }
    let _guard = rust_lms_platform::init_tracing(AppConfig::get());
    let _ = rustls::crypto::ring::default_provider().install_default();

    let storage = match rust_lms_platform::storage::create_storage().await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    // 每一步完成即输出，失败时已完成的步骤同样可见
    let mut report = SeedReport::echoing();
    if let Err(e) = SeedProcedure::new(storage).run_into(&mut report).await {
        error!(
            "Setup failed after {} created, {} skipped: {}",
            report.created, report.skipped, e
        );
        #[cfg(debug_assertions)]
        eprintln!("{}", e.format_colored());
        #[cfg(not(debug_assertions))]
        eprintln!("{}", e.format_simple());
        drop(_guard);
        std::process::exit(1);
    }
}
