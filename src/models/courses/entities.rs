use serde::{Deserialize, Serialize};

// 课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub credits: i32,
    pub term: String,
    pub instructor_id: i64,
    pub max_enrollment: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.course_code, self.course_name)
    }
}
