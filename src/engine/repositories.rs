// ==========================================
// 教培机构管理系统 - 引擎层数据读取接口
// ==========================================
// 职责: 定义调课引擎所需的只读数据访问抽象
// 目标: 引擎只依赖本接口，可用内存假仓储直接测试
// ==========================================

use crate::domain::schedule::{SlotWithLoad, WeeklySlot};
use crate::repository::schedule_repo::ScheduleRepository;
use crate::repository::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ScheduleReader - 调课引擎只读数据源
// ==========================================
/// 调课引擎消费的三个只读查询
///
/// 引擎自身不写库；同一次调用内的多个查询顺序执行，
/// 读取口径以数据源当时的快照为准
#[async_trait]
pub trait ScheduleReader: Send + Sync {
    /// 按主键查询时段负载视图（不存在返回 None）
    async fn get_slot(&self, schedule_id: i64) -> RepositoryResult<Option<SlotWithLoad>>;

    /// 查询课程的全部有效时段负载视图，可排除指定时段
    async fn list_active_slots_by_course(
        &self,
        course_id: i64,
        excluding: Option<i64>,
    ) -> RepositoryResult<Vec<SlotWithLoad>>;

    /// 查询学员当前全部在读时段（每周课表模式）
    async fn list_active_enrolled_slots(
        &self,
        student_id: i64,
    ) -> RepositoryResult<Vec<WeeklySlot>>;
}

// ==========================================
// ScheduleRepository 的生产实现
// ==========================================
#[async_trait]
impl ScheduleReader for ScheduleRepository {
    async fn get_slot(&self, schedule_id: i64) -> RepositoryResult<Option<SlotWithLoad>> {
        self.get_slot_with_load(schedule_id)
    }

    async fn list_active_slots_by_course(
        &self,
        course_id: i64,
        excluding: Option<i64>,
    ) -> RepositoryResult<Vec<SlotWithLoad>> {
        self.list_active_slots_with_load(course_id, excluding)
    }

    async fn list_active_enrolled_slots(
        &self,
        student_id: i64,
    ) -> RepositoryResult<Vec<WeeklySlot>> {
        self.list_enrolled_slots(student_id)
    }
}
