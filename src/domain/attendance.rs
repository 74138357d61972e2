// ==========================================
// 教培机构管理系统 - 考勤实体
// ==========================================
// 入场/离场各记一次时间戳；同一天同一学员
// 未离场前不允许再次入场
// ==========================================

use crate::domain::types::AttendanceStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 考勤记录
///
/// check_in_time / check_out_time 为 RFC 3339 文本，按原样存取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub check_in_time: String,
    pub check_out_time: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: Option<NaiveDateTime>,
}
