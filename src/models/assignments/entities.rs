use serde::{Deserialize, Serialize};

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Homework,
    Quiz,
    Exam,
    Project,
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentType::Homework => write!(f, "homework"),
            AssignmentType::Quiz => write!(f, "quiz"),
            AssignmentType::Exam => write!(f, "exam"),
            AssignmentType::Project => write!(f, "project"),
        }
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homework" => Ok(AssignmentType::Homework),
            "quiz" => Ok(AssignmentType::Quiz),
            "exam" => Ok(AssignmentType::Exam),
            "project" => Ok(AssignmentType::Project),
            _ => Err(format!("Invalid assignment type: {s}")),
        }
    }
}

// 作业
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub module_id: i64,
    pub assignment_name: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: i32,
    pub assignment_type: AssignmentType,
    pub instructions: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
