use super::entities::AssignmentType;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub module_id: i64,
    pub assignment_name: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    #[serde(default = "default_max_points")]
    pub max_points: i32,
    #[serde(default = "default_assignment_type")]
    pub assignment_type: AssignmentType,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub module_id: Option<i64>,
    pub assignment_name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_points: Option<i32>,
    pub assignment_type: Option<AssignmentType>,
    pub instructions: Option<String>,
}

fn default_max_points() -> i32 {
    100
}

fn default_assignment_type() -> AssignmentType {
    AssignmentType::Homework
}
