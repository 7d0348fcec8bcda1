use super::entities::SubmissionStatus;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub student_id: i64,
    pub assignment_id: i64,
    pub submission_content: String,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default = "default_status")]
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub student_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub submission_content: Option<String>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

fn default_status() -> SubmissionStatus {
    SubmissionStatus::Submitted
}
