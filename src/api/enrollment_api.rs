// ==========================================
// 教培机构管理系统 - 报名管理 API
// ==========================================
// 职责: 报名 CRUD、退课
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::enrollment::{EnrollmentUpdate, NewEnrollment};
use crate::repository::enrollment_repo::{EnrollmentDetail, EnrollmentRepository};

// ==========================================
// EnrollmentApi - 报名管理 API
// ==========================================
pub struct EnrollmentApi {
    enrollment_repo: Arc<EnrollmentRepository>,
}

impl EnrollmentApi {
    /// 创建新的EnrollmentApi实例
    pub fn new(enrollment_repo: Arc<EnrollmentRepository>) -> Self {
        Self { enrollment_repo }
    }

    /// 查询全部报名（新建在前）
    pub fn list_enrollments(&self) -> ApiResult<Vec<EnrollmentDetail>> {
        Ok(self.enrollment_repo.list()?)
    }

    /// 按ID查询报名
    pub fn get_enrollment(&self, id: i64) -> ApiResult<EnrollmentDetail> {
        self.enrollment_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("报名不存在: id={}", id)))
    }

    /// 新建报名（剩余课次 = 总课次）
    pub fn create_enrollment(&self, enrollment: NewEnrollment) -> ApiResult<i64> {
        if enrollment.total_sessions <= 0 {
            return Err(ApiError::InvalidInput("总课次必须为正数".to_string()));
        }
        Ok(self.enrollment_repo.create(&enrollment)?)
    }

    /// 更新报名
    pub fn update_enrollment(&self, id: i64, update: EnrollmentUpdate) -> ApiResult<()> {
        if update.total_sessions <= 0 {
            return Err(ApiError::InvalidInput("总课次必须为正数".to_string()));
        }
        if update.remaining_sessions < 0 {
            return Err(ApiError::InvalidInput("剩余课次不能为负".to_string()));
        }
        if !self.enrollment_repo.update(id, &update)? {
            return Err(ApiError::NotFound(format!("报名不存在: id={}", id)));
        }
        Ok(())
    }

    /// 退课（status → cancelled）
    pub fn cancel_enrollment(&self, id: i64) -> ApiResult<()> {
        if !self.enrollment_repo.cancel(id)? {
            return Err(ApiError::NotFound(format!("报名不存在: id={}", id)));
        }
        Ok(())
    }
}
