// ==========================================
// 教培机构管理系统 - 考勤管理 API
// ==========================================
// 职责: 入离场登记、考勤查询
// ==========================================
// 规则: 同一天未离场前不允许再次入场；
//       离场时扣减对应报名的剩余课次
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::repository::attendance_repo::{
    AttendanceDetail, AttendanceFilter, AttendanceRepository,
};
use crate::repository::enrollment_repo::EnrollmentRepository;

/// 入场结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResult {
    pub id: i64,
    pub check_in_time: String,
}

/// 离场结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutResult {
    pub check_out_time: String,
}

// ==========================================
// AttendanceApi - 考勤管理 API
// ==========================================
pub struct AttendanceApi {
    attendance_repo: Arc<AttendanceRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
}

impl AttendanceApi {
    /// 创建新的AttendanceApi实例
    pub fn new(
        attendance_repo: Arc<AttendanceRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
    ) -> Self {
        Self {
            attendance_repo,
            enrollment_repo,
        }
    }

    /// 按条件查询考勤记录
    pub fn list_attendance(&self, filter: AttendanceFilter) -> ApiResult<Vec<AttendanceDetail>> {
        Ok(self.attendance_repo.list(&filter)?)
    }

    /// 入场登记
    ///
    /// 同一天存在未离场记录时拒绝（防止重复刷卡）
    pub fn check_in(&self, student_id: i64, enrollment_id: i64) -> ApiResult<CheckInResult> {
        let now = Utc::now();
        let date = now.date_naive();
        let check_in_time = now.to_rfc3339();

        if self
            .attendance_repo
            .find_open_check_in(student_id, date)?
            .is_some()
        {
            return Err(ApiError::BusinessRuleViolation(
                "该学员今天已入场且未离场".to_string(),
            ));
        }

        let id =
            self.attendance_repo
                .check_in(student_id, enrollment_id, &check_in_time, date)?;
        tracing::info!(student_id, enrollment_id, %check_in_time, "入场登记");

        Ok(CheckInResult { id, check_in_time })
    }

    /// 离场登记
    ///
    /// 关闭当天未离场记录，并扣减对应报名的剩余课次
    pub fn check_out(&self, student_id: i64) -> ApiResult<CheckOutResult> {
        let now = Utc::now();
        let date = now.date_naive();
        let check_out_time = now.to_rfc3339();

        let open = self
            .attendance_repo
            .find_open_check_in(student_id, date)?
            .ok_or_else(|| {
                ApiError::BusinessRuleViolation("该学员今天没有未离场的入场记录".to_string())
            })?;

        self.attendance_repo.check_out(open.id, &check_out_time)?;

        // 剩余课次扣减失败不回滚离场记录，只记日志待对账
        if let Err(e) = self
            .enrollment_repo
            .decrement_remaining_sessions(open.enrollment_id)
        {
            tracing::error!(
                enrollment_id = open.enrollment_id,
                "剩余课次扣减失败: {}",
                e
            );
        }
        tracing::info!(student_id, %check_out_time, "离场登记");

        Ok(CheckOutResult { check_out_time })
    }
}
