use serde::Deserialize;

// 课程创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: i32,
    pub term: String,
    pub instructor_id: i64,
    #[serde(default = "default_max_enrollment")]
    pub max_enrollment: i32,
}

// 课程更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub term: Option<String>,
    pub instructor_id: Option<i64>,
    pub max_enrollment: Option<i32>,
}

fn default_credits() -> i32 {
    3
}

fn default_max_enrollment() -> i32 {
    30
}
