// ==========================================
// 教培机构管理系统 - 学员实体
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 学员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub parent_phone: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// 新建学员的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub parent_phone: Option<String>,
}
