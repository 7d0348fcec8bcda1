/// API 业务错误码
///
/// 与 HTTP 状态码分离，前端根据 `code` 字段做细粒度提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证相关 2xxx
    AuthFailed = 2000,
    UserInactive = 2002,

    // 管理后台 3xxx
    AdminEntityUnknown = 3000,
    AdminReferenceFieldUnknown = 3001,
    AdminValidationFailed = 3002,
    AdminObjectNotFound = 3003,
    AdminMutationFailed = 3004,
}
