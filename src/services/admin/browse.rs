use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdminService, DashboardAggregator, current_user, error_response, parse_entity, parse_field};
use crate::models::{
    ApiResponse,
    admin::{requests::AdminListQuery, responses::CandidateListResponse},
};

pub async fn dashboard(service: &AdminService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let window = service.get_config().admin.recent_window_days;

    match DashboardAggregator::new(storage, window).stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard statistics retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn candidates(
    service: &AdminService,
    request: &HttpRequest,
    field: &str,
) -> ActixResult<HttpResponse> {
    let field = match parse_field(field) {
        Ok(field) => field,
        Err(resp) => return Ok(resp),
    };

    let site = service.site(request);
    match site.resolver().candidates(field).await {
        Ok(candidates) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CandidateListResponse {
                field,
                required_role: field.required_role(),
                candidates,
            },
            "Candidates retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
    query: AdminListQuery,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };

    let pagination = query.into_pagination(service.get_config().admin.page_size);
    match service.site(request).list(entity, pagination).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            format!("{} list retrieved successfully", entity.verbose_name()),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn permissions(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let permissions = service.site(request).permissions(&actor, entity);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        permissions,
        "Permissions retrieved successfully",
    )))
}
