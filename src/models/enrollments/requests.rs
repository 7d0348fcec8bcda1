use super::entities::EnrollmentStatus;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
    #[serde(default = "default_status")]
    pub status: EnrollmentStatus,
    pub current_grade: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub current_grade: Option<f64>,
}

fn default_status() -> EnrollmentStatus {
    EnrollmentStatus::Active
}
