pub mod browse;
pub mod changes;
pub mod dashboard;
pub mod demo_gate;
pub mod resolver;
pub mod site;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::LMSError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    admin::{
        entities::{AdminEntity, ReferenceField},
        requests::{AdminListQuery, BulkDeleteRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub use dashboard::DashboardAggregator;
pub use demo_gate::DemoGate;
pub use resolver::ReferenceResolver;
pub use site::AdminSite;

/// 默认的演示账号用户名
pub const DEMO_USERNAME: &str = "demo";

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) fn site(&self, request: &HttpRequest) -> AdminSite {
        AdminSite::new(self.get_storage(request), DemoGate::from_config())
    }

    // 仪表盘统计
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        browse::dashboard(self, request).await
    }

    // 引用字段候选账号
    pub async fn candidates(&self, request: &HttpRequest, field: &str) -> ActixResult<HttpResponse> {
        browse::candidates(self, request, field).await
    }

    // 列表页
    pub async fn list(
        &self,
        request: &HttpRequest,
        entity: &str,
        query: AdminListQuery,
    ) -> ActixResult<HttpResponse> {
        browse::list(self, request, entity, query).await
    }

    // 当前账号对实体的权限
    pub async fn permissions(&self, request: &HttpRequest, entity: &str) -> ActixResult<HttpResponse> {
        browse::permissions(self, request, entity).await
    }

    pub async fn create(
        &self,
        request: &HttpRequest,
        entity: &str,
        payload: serde_json::Value,
    ) -> ActixResult<HttpResponse> {
        changes::create(self, request, entity, payload).await
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        entity: &str,
        id: i64,
        payload: serde_json::Value,
    ) -> ActixResult<HttpResponse> {
        changes::update(self, request, entity, id, payload).await
    }

    pub async fn delete(&self, request: &HttpRequest, entity: &str, id: i64) -> ActixResult<HttpResponse> {
        changes::delete(self, request, entity, id).await
    }

    pub async fn bulk_delete(
        &self,
        request: &HttpRequest,
        entity: &str,
        body: BulkDeleteRequest,
    ) -> ActixResult<HttpResponse> {
        changes::bulk_delete(self, request, entity, body).await
    }
}

// 解析 URL 中的实体名
pub(crate) fn parse_entity(entity: &str) -> Result<AdminEntity, HttpResponse> {
    entity.parse::<AdminEntity>().map_err(|e| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::AdminEntityUnknown, e))
    })
}

pub(crate) fn parse_field(field: &str) -> Result<ReferenceField, HttpResponse> {
    field.parse::<ReferenceField>().map_err(|e| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AdminReferenceFieldUnknown,
            e,
        ))
    })
}

// 从请求中取出当前账号
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 将业务错误映射为 HTTP 响应
pub(crate) fn error_response(err: &LMSError) -> HttpResponse {
    match err {
        LMSError::Validation(msg) => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdminValidationFailed,
            msg.as_str(),
        )),
        LMSError::NotFound(msg) => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AdminObjectNotFound,
            msg.as_str(),
        )),
        LMSError::Authentication(msg) => HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg.as_str())),
        LMSError::Authorization(msg) => HttpResponse::Forbidden()
            .json(ApiResponse::error_empty(ErrorCode::Forbidden, msg.as_str())),
        _ => {
            tracing::error!("Admin operation failed: {}", err);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AdminMutationFailed,
                format!("Admin operation failed: {}", err.message()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        assert_eq!(
            error_response(&LMSError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&LMSError::not_found("missing")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&LMSError::database_operation("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_path_segments() {
        assert_eq!(parse_entity("course").ok(), Some(AdminEntity::Course));
        assert_eq!(
            parse_entity("users").unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            parse_field("enrollment.student").ok(),
            Some(ReferenceField::EnrollmentStudent)
        );
        assert!(parse_field("course.student").is_err());
    }
}
