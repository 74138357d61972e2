// ==========================================
// 教培机构管理系统 - 缴费实体
// ==========================================

use crate::domain::types::{PaymentMethod, PaymentStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 缴费记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDateTime>,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// 新建缴费的输入（入账即 completed）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
}

/// 营收汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_payments: i64,
    /// status = completed 的金额合计
    pub total_revenue: f64,
    /// status = pending 的金额合计
    pub pending_amount: f64,
    /// status = refunded 的金额合计
    pub refunded_amount: f64,
}
