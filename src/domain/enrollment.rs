// ==========================================
// 教培机构管理系统 - 报名实体
// ==========================================
// 只有 status = active 的报名代表在读，计入时段容量
// ==========================================

use crate::domain::types::EnrollmentStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 报名（学员与某个周期时段的绑定）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub status: EnrollmentStatus,
    pub created_at: Option<NaiveDateTime>,
}

/// 新建报名的输入
///
/// remaining_sessions 初始等于 total_sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_sessions: i32,
}

/// 报名更新输入（全量覆盖）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentUpdate {
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub status: EnrollmentStatus,
}
