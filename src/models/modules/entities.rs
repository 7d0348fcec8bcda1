use serde::{Deserialize, Serialize};

// 课程模块，按 order_number 在课程内排序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub module_name: String,
    pub description: Option<String>,
    pub order_number: i32,
    pub content: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
