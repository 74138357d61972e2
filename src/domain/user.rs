// ==========================================
// 教培机构管理系统 - 用户实体
// ==========================================
// 仅作教师/管理员名录使用；认证与会话签发由外部服务负责，
// 本系统不校验口令
// ==========================================

use crate::domain::types::UserRole;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 用户（管理员、教师）
///
/// password 字段不在本结构中暴露
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: Option<NaiveDateTime>,
}
