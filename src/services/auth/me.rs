use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, auth::UserInfoResponse};

use super::AuthService;

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user",
            )));
        }
    };

    let storage = service.get_storage(request);
    match storage.get_profile_by_user_id(user.id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user, profile },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve user information: {e}"),
            )),
        ),
    }
}
