// ==========================================
// 教培机构管理系统 - 学员管理 API
// ==========================================
// 职责: 学员 CRUD、出勤统计查询
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::student::{NewStudent, Student};
use crate::repository::student_repo::{AttendanceStat, StudentRepository};

// ==========================================
// StudentApi - 学员管理 API
// ==========================================
pub struct StudentApi {
    student_repo: Arc<StudentRepository>,
}

impl StudentApi {
    /// 创建新的StudentApi实例
    pub fn new(student_repo: Arc<StudentRepository>) -> Self {
        Self { student_repo }
    }

    /// 查询全部学员（新建在前）
    pub fn list_students(&self) -> ApiResult<Vec<Student>> {
        Ok(self.student_repo.list()?)
    }

    /// 按ID查询学员
    pub fn get_student(&self, id: i64) -> ApiResult<Student> {
        self.student_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("学员不存在: id={}", id)))
    }

    /// 学员各在读报名的出勤统计
    pub fn get_attendance_stats(&self, student_id: i64) -> ApiResult<Vec<AttendanceStat>> {
        Ok(self.student_repo.attendance_stats(student_id)?)
    }

    /// 新建学员
    pub fn create_student(&self, student: NewStudent) -> ApiResult<i64> {
        if student.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("学员姓名不能为空".to_string()));
        }
        Ok(self.student_repo.create(&student)?)
    }

    /// 更新学员
    pub fn update_student(&self, id: i64, student: NewStudent) -> ApiResult<()> {
        if student.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("学员姓名不能为空".to_string()));
        }
        if !self.student_repo.update(id, &student)? {
            return Err(ApiError::NotFound(format!("学员不存在: id={}", id)));
        }
        Ok(())
    }

    /// 删除学员
    pub fn delete_student(&self, id: i64) -> ApiResult<()> {
        if !self.student_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("学员不存在: id={}", id)));
        }
        Ok(())
    }
}
