// ==========================================
// 教培机构管理系统 - 调课管理 API
// ==========================================
// 职责: 调课申请创建/审批、可用性检查、选课推荐
// ==========================================
// 引擎只做判定；审批通过后的报名迁移由本层以
// 单条原子 UPDATE 执行（按 学员+旧时段+在读 定位）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::change_request::NewChangeRequest;
use crate::domain::schedule::{FeasibilityResult, Recommendation, SlotWithLoad};
use crate::domain::types::ChangeRequestStatus;
use crate::engine::feasibility::FeasibilityEngine;
use crate::engine::recommendation::RecommendationEngine;
use crate::engine::repositories::ScheduleReader;
use crate::repository::change_request_repo::{
    ChangeRequestDetail, ChangeRequestFilter, ChangeRequestRepository,
};
use crate::repository::enrollment_repo::EnrollmentRepository;
use crate::repository::schedule_repo::ScheduleRepository;

// ==========================================
// 响应 DTO
// ==========================================

/// 调课申请创建结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedChangeRequest {
    pub id: i64,
    pub feasibility: FeasibilityResult,
}

/// 时段可用性报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub available: bool,
    pub enrolled_count: i32,
    pub max_students: i32,
    pub schedule: SlotWithLoad,
    pub feasibility: FeasibilityResult,
}

/// 审批结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub status: ChangeRequestStatus,
    /// 审批通过时实际迁移的报名行数（0 表示报名已被并发移动或退课）
    pub moved_enrollments: usize,
}

// ==========================================
// ScheduleChangeApi - 调课管理 API
// ==========================================
pub struct ScheduleChangeApi {
    change_request_repo: Arc<ChangeRequestRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    feasibility_engine: FeasibilityEngine<ScheduleRepository>,
    recommendation_engine: RecommendationEngine<ScheduleRepository>,
    schedule_store: Arc<ScheduleRepository>,
}

impl ScheduleChangeApi {
    /// 创建新的ScheduleChangeApi实例
    pub fn new(
        change_request_repo: Arc<ChangeRequestRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        schedule_store: Arc<ScheduleRepository>,
    ) -> Self {
        Self {
            change_request_repo,
            enrollment_repo,
            feasibility_engine: FeasibilityEngine::new(schedule_store.clone()),
            recommendation_engine: RecommendationEngine::new(schedule_store.clone()),
            schedule_store,
        }
    }

    /// 按条件查询调课申请
    pub fn list_requests(
        &self,
        filter: ChangeRequestFilter,
    ) -> ApiResult<Vec<ChangeRequestDetail>> {
        Ok(self.change_request_repo.list(&filter)?)
    }

    /// 创建调课申请
    ///
    /// 先跑可行性判定，再落一条 pending 申请；
    /// 判定结论随创建结果一起返回，供前台即时展示
    pub async fn create_request(
        &self,
        request: NewChangeRequest,
    ) -> ApiResult<CreatedChangeRequest> {
        if request.current_schedule_id == request.requested_schedule_id {
            return Err(ApiError::InvalidInput(
                "目标时段与当前时段相同".to_string(),
            ));
        }

        let feasibility = self
            .feasibility_engine
            .check(
                request.student_id,
                Some(request.current_schedule_id),
                request.requested_schedule_id,
            )
            .await?;

        let id = self.change_request_repo.create(&request)?;
        tracing::info!(
            request_id = id,
            student_id = request.student_id,
            feasible = feasibility.feasible,
            reason = %feasibility.reason,
            "调课申请已创建"
        );

        Ok(CreatedChangeRequest { id, feasibility })
    }

    /// 审批调课申请（approved / rejected）
    ///
    /// 通过时以单条 UPDATE 迁移在读报名，
    /// 按 (student_id, 旧 schedule_id, status='active') 定位，避免二次迁移
    pub fn process_request(
        &self,
        id: i64,
        status: ChangeRequestStatus,
        admin_notes: Option<String>,
    ) -> ApiResult<ProcessOutcome> {
        if status == ChangeRequestStatus::Pending {
            return Err(ApiError::InvalidInput(
                "审批状态必须为 approved 或 rejected".to_string(),
            ));
        }

        let request = self
            .change_request_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("调课申请不存在: id={}", id)))?;

        if request.status != ChangeRequestStatus::Pending {
            return Err(ApiError::BusinessRuleViolation(format!(
                "调课申请已审批过: id={}, status={}",
                id, request.status
            )));
        }

        self.change_request_repo
            .process(id, status, admin_notes.as_deref())?;

        let mut moved_enrollments = 0;
        if status == ChangeRequestStatus::Approved {
            moved_enrollments = self.enrollment_repo.move_schedule(
                request.student_id,
                request.current_schedule_id,
                request.requested_schedule_id,
            )?;
            if moved_enrollments == 0 {
                // 报名已被并发移动或退课，审批记录保留，数据待人工核对
                tracing::warn!(
                    request_id = id,
                    student_id = request.student_id,
                    "审批通过但未命中在读报名"
                );
            }
        }
        tracing::info!(request_id = id, %status, moved_enrollments, "调课申请已审批");

        Ok(ProcessOutcome {
            status,
            moved_enrollments,
        })
    }

    /// 检查目标时段可用性（不绑定当前时段）
    pub async fn check_availability(
        &self,
        student_id: i64,
        requested_schedule_id: i64,
    ) -> ApiResult<AvailabilityReport> {
        let schedule = self
            .schedule_store
            .get_slot(requested_schedule_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("时段不存在: id={}", requested_schedule_id))
            })?;

        let feasibility = self
            .feasibility_engine
            .check(student_id, None, requested_schedule_id)
            .await?;

        Ok(AvailabilityReport {
            available: schedule.has_capacity(),
            enrolled_count: schedule.enrolled_count,
            max_students: schedule.max_students,
            schedule,
            feasibility,
        })
    }

    /// 为学员推荐课程时段
    pub async fn recommend(&self, student_id: i64, course_id: i64) -> ApiResult<Recommendation> {
        Ok(self
            .recommendation_engine
            .recommend(student_id, course_id)
            .await?)
    }
}
