use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::admin::requests::{AdminListQuery, BulkDeleteRequest};
use crate::services::AdminService;

// 懒加载的全局 ADMIN_SERVICE 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

// HTTP处理程序
pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.dashboard(&req).await
}

pub async fn candidates(req: HttpRequest, field: web::Path<String>) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.candidates(&req, &field.into_inner()).await
}

pub async fn list_objects(
    req: HttpRequest,
    entity: web::Path<String>,
    query: web::Query<AdminListQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .list(&req, &entity.into_inner(), query.into_inner())
        .await
}

pub async fn permissions(req: HttpRequest, entity: web::Path<String>) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.permissions(&req, &entity.into_inner()).await
}

pub async fn create_object(
    req: HttpRequest,
    entity: web::Path<String>,
    payload: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create(&req, &entity.into_inner(), payload.into_inner())
        .await
}

pub async fn update_object(
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    payload: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let (entity, id) = path.into_inner();
    ADMIN_SERVICE
        .update(&req, &entity, id, payload.into_inner())
        .await
}

pub async fn delete_object(
    req: HttpRequest,
    path: web::Path<(String, i64)>,
) -> ActixResult<HttpResponse> {
    let (entity, id) = path.into_inner();
    ADMIN_SERVICE.delete(&req, &entity, id).await
}

pub async fn bulk_delete(
    req: HttpRequest,
    entity: web::Path<String>,
    body: web::Json<BulkDeleteRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .bulk_delete(&req, &entity.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/api")
            .wrap(middlewares::RateLimit::admin_api())
            .wrap(middlewares::RequireStaff)
            // 最后注册的中间件最先执行，JWT 先于权限检查
            .wrap(middlewares::RequireJWT)
            .route("/dashboard", web::get().to(dashboard))
            .route(
                "/references/{field}/candidates",
                web::get().to(candidates),
            )
            .service(
                web::resource("/{entity}")
                    .route(web::get().to(list_objects))
                    .route(web::post().to(create_object)),
            )
            .route("/{entity}/permissions", web::get().to(permissions))
            .route("/{entity}/bulk-delete", web::post().to(bulk_delete))
            .service(
                web::resource("/{entity}/{id}")
                    .route(web::put().to(update_object))
                    .route(web::delete().to(delete_object)),
            ),
    );
}
