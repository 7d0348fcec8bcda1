use serde::{Deserialize, Serialize};

// 选课状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Dropped,
    Completed,
}

impl EnrollmentStatus {
    pub const ACTIVE: &'static str = "active";
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "{}", EnrollmentStatus::ACTIVE),
            EnrollmentStatus::Dropped => write!(f, "dropped"),
            EnrollmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课记录，(student_id, course_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub current_grade: Option<f64>,
    pub enrollment_date: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
