// ==========================================
// 教培机构管理系统 - 缴费管理 API
// ==========================================
// 职责: 缴费登记、查询、营收汇总
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::payment::{NewPayment, PaymentSummary};
use crate::domain::types::PaymentStatus;
use crate::repository::payment_repo::{PaymentDetail, PaymentFilter, PaymentRepository};

// ==========================================
// PaymentApi - 缴费管理 API
// ==========================================
pub struct PaymentApi {
    payment_repo: Arc<PaymentRepository>,
}

impl PaymentApi {
    /// 创建新的PaymentApi实例
    pub fn new(payment_repo: Arc<PaymentRepository>) -> Self {
        Self { payment_repo }
    }

    /// 按条件查询缴费记录
    pub fn list_payments(&self, filter: PaymentFilter) -> ApiResult<Vec<PaymentDetail>> {
        Ok(self.payment_repo.list(&filter)?)
    }

    /// 按ID查询缴费记录
    pub fn get_payment(&self, id: i64) -> ApiResult<PaymentDetail> {
        self.payment_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("缴费记录不存在: id={}", id)))
    }

    /// 缴费登记（入账即 completed）
    pub fn create_payment(&self, payment: NewPayment) -> ApiResult<i64> {
        if payment.amount <= 0.0 {
            return Err(ApiError::InvalidInput("缴费金额必须为正数".to_string()));
        }
        Ok(self.payment_repo.create(&payment)?)
    }

    /// 更新缴费状态与备注
    pub fn update_payment_status(
        &self,
        id: i64,
        status: PaymentStatus,
        description: Option<String>,
    ) -> ApiResult<()> {
        if !self
            .payment_repo
            .update_status(id, status, description.as_deref())?
        {
            return Err(ApiError::NotFound(format!("缴费记录不存在: id={}", id)));
        }
        Ok(())
    }

    /// 营收汇总（可选日期区间）
    pub fn get_summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<PaymentSummary> {
        Ok(self.payment_repo.summary(start_date, end_date)?)
    }
}
