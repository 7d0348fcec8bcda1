//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LMSError {
            $($variant(String),)*
        }

        impl LMSError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LMSError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LMSError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LMSError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LMSError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LMSError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    Authentication("E008", "Authentication Error"),
    Authorization("E009", "Authorization Error"),
    Seed("E010", "Seed Procedure Error"),
}

impl LMSError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LMSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LMSError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LMSError {
    fn from(err: sea_orm::DbErr) -> Self {
        LMSError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LMSError {
    fn from(err: std::io::Error) -> Self {
        LMSError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LMSError {
    fn from(err: serde_json::Error) -> Self {
        LMSError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LMSError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LMSError::database_config("test").code(), "E001");
        assert_eq!(LMSError::validation("test").code(), "E005");
        assert_eq!(LMSError::authentication("test").code(), "E008");
        assert_eq!(LMSError::seed("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LMSError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(LMSError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_error_message() {
        let err = LMSError::validation("Instructor must have the instructor role");
        assert_eq!(err.message(), "Instructor must have the instructor role");
    }

    #[test]
    fn test_format_simple() {
        let err = LMSError::seed("no student account available");
        let formatted = err.format_simple();
        assert!(formatted.contains("Seed Procedure Error"));
        assert!(formatted.contains("no student account available"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: LMSError = serde_json::from_str::<i64>("not a number")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E007");
    }
}
