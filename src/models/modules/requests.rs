use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateModuleRequest {
    pub course_id: i64,
    pub module_name: String,
    pub description: Option<String>,
    #[serde(default = "default_order_number")]
    pub order_number: i32,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateModuleRequest {
    pub course_id: Option<i64>,
    pub module_name: Option<String>,
    pub description: Option<String>,
    pub order_number: Option<i32>,
    pub content: Option<String>,
}

fn default_order_number() -> i32 {
    1
}
