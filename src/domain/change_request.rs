// ==========================================
// 教培机构管理系统 - 调课申请实体
// ==========================================
// 申请创建时即做可行性判定；审批通过后由 API 层
// 以单条原子 UPDATE 迁移在读报名
// ==========================================

use crate::domain::types::ChangeRequestStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 调课申请
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChangeRequest {
    pub id: i64,
    pub student_id: i64,
    pub current_schedule_id: i64,
    pub requested_schedule_id: i64,
    pub reason: Option<String>,
    pub status: ChangeRequestStatus,
    pub admin_notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub processed_at: Option<NaiveDateTime>,
}

/// 新建调课申请的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChangeRequest {
    pub student_id: i64,
    pub current_schedule_id: i64,
    pub requested_schedule_id: i64,
    pub reason: Option<String>,
}
