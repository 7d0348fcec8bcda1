//! 管理后台字段校验

use crate::errors::{LMSError, Result};

/// 必填文本字段不能为空白
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LMSError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// 可选文本字段：提供时不能为空白
pub fn validate_optional_required(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) => validate_required(field, v),
        None => Ok(()),
    }
}

/// 数值必须为正
pub fn validate_positive(field: &str, value: i32) -> Result<()> {
    if value <= 0 {
        return Err(LMSError::validation(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// 分数必须在 0..=max_points 之间
pub fn validate_grade(grade: f64, max_points: i32) -> Result<()> {
    if !grade.is_finite() || grade < 0.0 || grade > f64::from(max_points) {
        return Err(LMSError::validation(format!(
            "Grade must be between 0 and {max_points}, got {grade}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("course_code", "MATH102").is_ok());
        let err = validate_required("course_code", "   ").unwrap_err();
        assert_eq!(err.message(), "course_code is required");
        assert!(validate_optional_required("term", None).is_ok());
        assert!(validate_optional_required("term", Some("")).is_err());
    }

    #[test]
    fn test_positive() {
        assert!(validate_positive("credits", 3).is_ok());
        assert!(validate_positive("credits", 0).is_err());
        assert!(validate_positive("max_enrollment", -5).is_err());
    }

    #[test]
    fn test_grade_range() {
        assert!(validate_grade(95.0, 100).is_ok());
        assert!(validate_grade(0.0, 100).is_ok());
        assert!(validate_grade(100.0, 100).is_ok());
        assert!(validate_grade(100.5, 100).is_err());
        assert!(validate_grade(-1.0, 100).is_err());
        assert!(validate_grade(f64::NAN, 100).is_err());
    }
}
