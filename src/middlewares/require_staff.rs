/*!
 * 管理后台访问控制中间件
 *
 * 必须在 RequireJWT 之后执行，只放行 `is_staff` 或 `is_superuser` 的账号。
 * 演示账号同样需要是 staff，写操作是否落库由演示门控决定。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, users::entities::User};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireStaff;

impl RequireStaff {
    pub fn allows(user: &User) -> bool {
        user.is_active && (user.is_staff || user.is_superuser)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireStaff
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireStaffMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireStaffMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireStaffMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireStaffMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            match user {
                Some(user) if RequireStaff::allows(&user) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Admin access denied for user {} ({}): not a staff account",
                        user.id, user.username
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Staff account required.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Staff check failed: no user found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(is_staff: bool, is_superuser: bool, is_active: bool) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "admin1".into(),
            email: "admin1@lms.com".into(),
            password_hash: String::new(),
            first_name: "Carol".into(),
            last_name: "Administrator".into(),
            is_staff,
            is_superuser,
            is_active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_staff_and_superuser_allowed() {
        assert!(RequireStaff::allows(&account(true, false, true)));
        assert!(RequireStaff::allows(&account(false, true, true)));
    }

    #[test]
    fn test_regular_or_inactive_denied() {
        assert!(!RequireStaff::allows(&account(false, false, true)));
        assert!(!RequireStaff::allows(&account(true, true, false)));
    }
}
