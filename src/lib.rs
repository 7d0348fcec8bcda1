//! LMS Platform - 学习管理系统管理后台服务
//!
//! 基于 Actix Web 与 SeaORM 构建的课程管理后台。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（管理后台、认证、示例数据初始化）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

/// 初始化全局日志
///
/// 开发环境输出带文件与行号的文本日志，其余环境输出 JSON。
/// 返回的 guard 需要在进程结束前保持存活。
pub fn init_tracing(config: &config::AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    guard
}
