//! 请求参数解析失败时的统一错误响应

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message))
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid JSON payload for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid JSON payload: {err}"));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid query parameters: {err}"));
    InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid path parameter for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid path parameter: {err}"));
    InternalError::from_response(err, response).into()
}
