/*!
 * 固定窗口限流
 *
 * 每个限流策略有自己的名称、窗口长度和窗口内允许的请求数。
 * 计数按 `策略名 + 调用方` 归档：已通过 JWT 的请求按账号计数，
 * 登录等匿名请求按客户端地址计数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 放行的响应带 `X-RateLimit-Limit` / `X-RateLimit-Remaining`，
 * 超限返回 429 并在 `Retry-After` 中给出当前窗口剩余秒数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// 最长支持的窗口，超过后计数条目必然已失效
const MAX_WINDOW: Duration = Duration::from_secs(3600);

// 所有 worker 共享的窗口计数
static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(MAX_WINDOW)
        .max_capacity(100_000)
        .build()
});

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// 单次计数的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

/// 计数对象
#[derive(Debug, Clone, PartialEq, Eq)]
enum Caller {
    Account(i64),
    Client(String),
}

impl Caller {
    fn of(req: &ServiceRequest) -> Self {
        if let Some(id) = req.extensions().get::<User>().map(|user| user.id) {
            return Caller::Account(id);
        }
        // realip_remote_addr 已处理 Forwarded / X-Forwarded-For
        let addr = req
            .connection_info()
            .realip_remote_addr()
            .map(strip_port)
            .unwrap_or("unknown")
            .to_string();
        Caller::Client(addr)
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Caller::Account(id) => write!(f, "account:{id}"),
            Caller::Client(addr) => write!(f, "client:{addr}"),
        }
    }
}

// 去掉 "ip:port" 中的端口，IPv6 地址原样保留
fn strip_port(addr: &str) -> &str {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return addr;
    }
    addr.parse::<std::net::SocketAddr>()
        .ok()
        .and_then(|_| addr.rsplit_once(':').map(|(host, _)| host))
        .unwrap_or(addr)
}

/// 限流策略
#[derive(Debug, Clone)]
pub struct RateLimit {
    name: &'static str,
    max_requests: u32,
    window: Duration,
}

impl RateLimit {
    pub fn new(name: &'static str, max_requests: u32, window: Duration) -> Self {
        Self {
            name,
            max_requests,
            window: window.min(MAX_WINDOW),
        }
    }

    /// 登录：每个客户端地址每分钟 5 次
    pub fn login() -> Self {
        Self::new("login", 5, Duration::from_secs(60))
    }

    /// 管理后台：每个账号每分钟 120 次
    pub fn admin_api() -> Self {
        Self::new("admin", 120, Duration::from_secs(60))
    }

    /// 记录一次请求并判断是否放行
    async fn hit(&self, caller: &Caller) -> Verdict {
        let window = self.window;
        let key = format!("{}:{}", self.name, caller);

        let current = WINDOWS
            .entry(key)
            .and_upsert_with(|existing| {
                let next = match existing.map(|entry| entry.into_value()) {
                    Some(open) if open.started.elapsed() < window => Window {
                        started: open.started,
                        count: open.count.saturating_add(1),
                    },
                    _ => Window {
                        started: Instant::now(),
                        count: 1,
                    },
                };
                ready(next)
            })
            .await
            .into_value();

        if current.count > self.max_requests {
            let left = window.saturating_sub(current.started.elapsed());
            Verdict::Limited {
                retry_after: left.as_secs().max(1),
            }
        } else {
            Verdict::Allowed {
                remaining: self.max_requests - current.count,
            }
        }
    }
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header((LIMIT_HEADER, limit.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let caller = Caller::of(&req);

            match policy.hit(&caller).await {
                Verdict::Limited { retry_after } => {
                    warn!(
                        "Rate limit '{}' exceeded by {} (limit {} per {}s)",
                        policy.name,
                        caller,
                        policy.max_requests,
                        policy.window.as_secs()
                    );
                    let resp = too_many_requests(policy.max_requests, retry_after);
                    Ok(req.into_response(resp).map_into_right_body())
                }
                Verdict::Allowed { remaining } => {
                    let mut res = srv.call(req).await?.map_into_left_body();
                    let headers = res.headers_mut();
                    headers.insert(
                        HeaderName::from_static(LIMIT_HEADER),
                        HeaderValue::from(policy.max_requests),
                    );
                    headers.insert(
                        HeaderName::from_static(REMAINING_HEADER),
                        HeaderValue::from(remaining),
                    );
                    Ok(res)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    fn request_from(addr: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/")
            .peer_addr(addr.parse().unwrap())
    }

    #[core::prelude::v1::test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.name, "login");
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));

        let admin = RateLimit::admin_api();
        assert_eq!(admin.name, "admin");
        assert_eq!(admin.max_requests, 120);
    }

    #[core::prelude::v1::test]
    fn test_strip_port() {
        assert_eq!(strip_port("10.0.0.1:8080"), "10.0.0.1");
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }

    #[tokio::test]
    async fn test_callers_are_counted_separately() {
        let policy = RateLimit::new("separate_callers", 1, Duration::from_secs(60));
        let alice = Caller::Account(1);
        let bob = Caller::Account(2);

        assert_eq!(policy.hit(&alice).await, Verdict::Allowed { remaining: 0 });
        assert!(matches!(policy.hit(&alice).await, Verdict::Limited { .. }));
        assert_eq!(policy.hit(&bob).await, Verdict::Allowed { remaining: 0 });
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let policy = RateLimit::new("window_reset", 1, Duration::from_millis(50));
        let caller = Caller::Client("10.9.9.9".to_string());

        assert!(matches!(policy.hit(&caller).await, Verdict::Allowed { .. }));
        assert!(matches!(policy.hit(&caller).await, Verdict::Limited { .. }));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(matches!(policy.hit(&caller).await, Verdict::Allowed { .. }));
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new("over_limit", 2, Duration::from_secs(60)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, request_from("10.1.2.3:4000").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(LIMIT_HEADER).unwrap(), "2");
        assert_eq!(resp.headers().get(REMAINING_HEADER).unwrap(), "1");

        let resp = test::call_service(&app, request_from("10.1.2.3:4000").to_request()).await;
        assert_eq!(resp.headers().get(REMAINING_HEADER).unwrap(), "0");

        let resp = test::call_service(&app, request_from("10.1.2.3:4000").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));

        // 其他地址不受影响
        let resp = test::call_service(&app, request_from("10.1.2.4:4000").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
