use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 根据用户名获取账号
    match storage.get_user_by_username(&login_request.username).await {
        Ok(Some(user)) => {
            // 2. 验证密码
            if !verify_password(&login_request.password, &user.password_hash) {
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::AuthFailed,
                    "Username or password is incorrect",
                )));
            }

            // 3. 停用账号不允许登录
            if !user.is_active {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::UserInactive,
                    "This account is inactive",
                )));
            }

            // 4. 更新最后登录时间
            if let Err(e) = storage.update_last_login(user.id).await {
                tracing::warn!("Failed to update last login for {}: {}", user.username, e);
            }

            // 5. 生成访问令牌
            match user.generate_access_token() {
                Ok(access_token) => {
                    tracing::info!("User {} logged in successfully", user.username);

                    let response = LoginResponse {
                        access_token,
                        expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                        user,
                        created_at: chrono::Utc::now(),
                    };

                    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
                }
                Err(e) => {
                    tracing::error!("Failed to generate JWT token: {}", e);
                    Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Login failed, unable to generate token",
                        )),
                    )
                }
            }
        }
        Ok(None) => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Login failed: {e}"),
            )),
        ),
    }
}
