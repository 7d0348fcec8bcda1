use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{LMSError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_code: Set(req.course_code),
            course_name: Set(req.course_name),
            description: Set(req.description),
            credits: Set(req.credits),
            term: Set(req.term),
            instructor_id: Set(req.instructor_id),
            max_enrollment: Set(req.max_enrollment),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过课程代码获取课程
    pub async fn get_course_by_code_impl(&self, course_code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::CourseCode.eq(course_code))
            .one(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_impl(&self, query: PaginationQuery) -> Result<PaginatedResponse<Course>> {
        let (page, size) = query.normalized(100);

        let paginator = Courses::find()
            .order_by_asc(Column::CourseCode)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LMSError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        // 先检查课程是否存在
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(course_code) = update.course_code {
            model.course_code = Set(course_code);
        }
        if let Some(course_name) = update.course_name {
            model.course_name = Set(course_name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(term) = update.term {
            model.term = Set(term);
        }
        if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(instructor_id);
        }
        if let Some(max_enrollment) = update.max_enrollment {
            model.max_enrollment = Set(max_enrollment);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LMSError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }
}
