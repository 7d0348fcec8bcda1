use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdminService, current_user, error_response, parse_entity};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    admin::{requests::BulkDeleteRequest, responses::AdminActionResult},
};

// 写操作结果统一包装：成功返回 200，消息取结果中的提示
fn respond(result: Result<AdminActionResult>) -> HttpResponse {
    match result {
        Ok(outcome) => {
            let message = outcome.message.clone();
            HttpResponse::Ok().json(ApiResponse::success(outcome, message))
        }
        Err(e) => error_response(&e),
    }
}

pub async fn create(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
    payload: serde_json::Value,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(respond(
        service.site(request).create(&actor, entity, payload).await,
    ))
}

pub async fn update(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
    id: i64,
    payload: serde_json::Value,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(respond(
        service
            .site(request)
            .update(&actor, entity, id, payload)
            .await,
    ))
}

pub async fn delete(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
    id: i64,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(respond(service.site(request).delete(&actor, entity, id).await))
}

pub async fn bulk_delete(
    service: &AdminService,
    request: &HttpRequest,
    entity: &str,
    body: BulkDeleteRequest,
) -> ActixResult<HttpResponse> {
    let entity = match parse_entity(entity) {
        Ok(entity) => entity,
        Err(resp) => return Ok(resp),
    };
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(respond(
        service
            .site(request)
            .bulk_delete(&actor, entity, &body.ids)
            .await,
    ))
}
