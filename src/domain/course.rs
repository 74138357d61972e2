// ==========================================
// 教培机构管理系统 - 课程实体
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 默认课程容量
pub const DEFAULT_MAX_STUDENTS: i32 = 10;

/// 默认课时时长（分钟）
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// 课程
///
/// 一门课程可以有多个周期时段（WeeklySlot），容量按时段分别计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub description: Option<String>,
    pub max_students: i32,
    pub duration_minutes: i32,
    pub created_at: Option<NaiveDateTime>,
}

/// 新建课程的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub teacher_id: Option<i64>,
    pub description: Option<String>,
    /// 缺省为 10
    pub max_students: Option<i32>,
    /// 缺省为 60
    pub duration_minutes: Option<i32>,
}
