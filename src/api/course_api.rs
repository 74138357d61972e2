// ==========================================
// 教培机构管理系统 - 课程管理 API
// ==========================================
// 职责: 课程 CRUD
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::course::{Course, NewCourse};
use crate::repository::course_repo::{CourseDetail, CourseRepository};

// ==========================================
// CourseApi - 课程管理 API
// ==========================================
pub struct CourseApi {
    course_repo: Arc<CourseRepository>,
}

impl CourseApi {
    /// 创建新的CourseApi实例
    pub fn new(course_repo: Arc<CourseRepository>) -> Self {
        Self { course_repo }
    }

    /// 查询全部课程（带教师姓名）
    pub fn list_courses(&self) -> ApiResult<Vec<CourseDetail>> {
        Ok(self.course_repo.list()?)
    }

    /// 按ID查询课程
    pub fn get_course(&self, id: i64) -> ApiResult<CourseDetail> {
        self.course_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("课程不存在: id={}", id)))
    }

    /// 新建课程
    pub fn create_course(&self, course: NewCourse) -> ApiResult<i64> {
        if course.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("课程名称不能为空".to_string()));
        }
        if let Some(max_students) = course.max_students {
            if max_students <= 0 {
                return Err(ApiError::InvalidInput("课程容量必须为正数".to_string()));
            }
        }
        Ok(self.course_repo.create(&course)?)
    }

    /// 更新课程
    pub fn update_course(&self, id: i64, course: Course) -> ApiResult<()> {
        if course.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("课程名称不能为空".to_string()));
        }
        if course.max_students <= 0 {
            return Err(ApiError::InvalidInput("课程容量必须为正数".to_string()));
        }
        if !self.course_repo.update(id, &course)? {
            return Err(ApiError::NotFound(format!("课程不存在: id={}", id)));
        }
        Ok(())
    }

    /// 删除课程
    pub fn delete_course(&self, id: i64) -> ApiResult<()> {
        if !self.course_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("课程不存在: id={}", id)));
        }
        Ok(())
    }
}
