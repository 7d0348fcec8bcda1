use serde::Deserialize;

// 批量删除请求
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

// 列表页查询参数，未指定每页条数时使用配置的默认值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl AdminListQuery {
    pub fn into_pagination(self, default_size: i64) -> crate::models::PaginationQuery {
        crate::models::PaginationQuery {
            page: self.page.unwrap_or(1),
            size: self.size.unwrap_or(default_size),
        }
    }
}
