use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub mod admin;

pub mod auth;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;

// 未匹配任何路由
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        format!("Route not found: {}", req.path()),
    ))
}
