// ==========================================
// 教培机构管理系统 - 课表管理 API
// ==========================================
// 职责: 周期时段 CRUD、时段学员名单
// ==========================================

use std::sync::Arc;

use chrono::NaiveTime;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::schedule::{NewSchedule, ScheduleUpdate};
use crate::repository::schedule_repo::{EnrolledStudent, ScheduleDetail, ScheduleRepository};

// ==========================================
// ScheduleApi - 课表管理 API
// ==========================================
pub struct ScheduleApi {
    schedule_repo: Arc<ScheduleRepository>,
}

impl ScheduleApi {
    /// 创建新的ScheduleApi实例
    pub fn new(schedule_repo: Arc<ScheduleRepository>) -> Self {
        Self { schedule_repo }
    }

    /// 校验时段输入：周几范围、"HH:MM" 格式、起止顺序
    fn validate_slot_times(day_of_week: u8, start_time: &str, end_time: &str) -> ApiResult<()> {
        if day_of_week > 6 {
            return Err(ApiError::InvalidInput(format!(
                "day_of_week 必须在 0-6 之间: {}",
                day_of_week
            )));
        }
        for time in [start_time, end_time] {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                return Err(ApiError::InvalidInput(format!(
                    "时间必须为 HH:MM 格式: {}",
                    time
                )));
            }
        }
        if start_time >= end_time {
            return Err(ApiError::InvalidInput(format!(
                "开始时间必须早于结束时间: {} >= {}",
                start_time, end_time
            )));
        }
        Ok(())
    }

    /// 查询全部有效时段（按周几、开始时间排序）
    pub fn list_schedules(&self) -> ApiResult<Vec<ScheduleDetail>> {
        Ok(self.schedule_repo.list_active()?)
    }

    /// 按ID查询时段
    pub fn get_schedule(&self, id: i64) -> ApiResult<ScheduleDetail> {
        self.schedule_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("时段不存在: id={}", id)))
    }

    /// 查询时段内在读学员
    pub fn list_enrolled_students(&self, schedule_id: i64) -> ApiResult<Vec<EnrolledStudent>> {
        Ok(self.schedule_repo.students_for_slot(schedule_id)?)
    }

    /// 新建时段
    pub fn create_schedule(&self, schedule: NewSchedule) -> ApiResult<i64> {
        Self::validate_slot_times(
            schedule.day_of_week,
            &schedule.start_time,
            &schedule.end_time,
        )?;
        Ok(self.schedule_repo.create(&schedule)?)
    }

    /// 更新时段
    pub fn update_schedule(&self, id: i64, schedule: ScheduleUpdate) -> ApiResult<()> {
        Self::validate_slot_times(
            schedule.day_of_week,
            &schedule.start_time,
            &schedule.end_time,
        )?;
        if !self.schedule_repo.update(id, &schedule)? {
            return Err(ApiError::NotFound(format!("时段不存在: id={}", id)));
        }
        Ok(())
    }

    /// 停用时段（软删除，保留历史报名关联）
    pub fn deactivate_schedule(&self, id: i64) -> ApiResult<()> {
        if !self.schedule_repo.deactivate(id)? {
            return Err(ApiError::NotFound(format!("时段不存在: id={}", id)));
        }
        Ok(())
    }
}
