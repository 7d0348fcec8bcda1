use serde::{Deserialize, Serialize};

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted, // 待评分
    Graded,    // 已评分
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", SubmissionStatus::SUBMITTED),
            SubmissionStatus::Graded => write!(f, "{}", SubmissionStatus::GRADED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交记录，(student_id, assignment_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub submission_content: String,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
