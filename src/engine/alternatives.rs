// ==========================================
// 教培机构管理系统 - 替代时段查找引擎
// ==========================================
// 职责: 调课不可行时，给出同课程其它可用时段
// 红线: 不写库，只计算和返回候选
// ==========================================
// 输入: 学员 + 参照时段（负载视图）
// 输出: 候选时段序列，无冲突者在前，组内按周几/开始时间升序，
//       最多 5 条，满员时段一律不给
// ==========================================

use crate::domain::schedule::{CandidateSlot, SlotWithLoad};
use crate::engine::repositories::ScheduleReader;
use crate::engine::scheduler_core::SchedulerCore;
use crate::repository::RepositoryResult;
use std::sync::Arc;
use tracing::instrument;

/// 替代时段最多返回条数
pub const MAX_ALTERNATIVES: usize = 5;

// ==========================================
// AlternativeFinder - 替代时段查找引擎
// ==========================================
pub struct AlternativeFinder<R>
where
    R: ScheduleReader,
{
    store: Arc<R>,
}

impl<R> AlternativeFinder<R>
where
    R: ScheduleReader,
{
    /// 创建新的 AlternativeFinder 实例
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// 查找同课程的替代时段
    ///
    /// # 规则
    /// 1. 枚举参照时段所属课程的其它有效时段（排除参照时段本身）
    /// 2. 过滤掉无空位的时段
    /// 3. 逐个与学员当前全部在读时段做冲突标记
    ///    （这里不排除任何时段：候选都不是学员正要腾出的时段）
    /// 4. 排序：无冲突在前；组内按 (day_of_week, start_time) 升序
    /// 5. 截断到 5 条
    ///
    /// 每次调用重新计算，不缓存；同一数据快照下结果确定
    #[instrument(skip(self, reference), fields(reference_id = reference.id))]
    pub async fn find(
        &self,
        student_id: i64,
        reference: &SlotWithLoad,
    ) -> RepositoryResult<Vec<CandidateSlot>> {
        let siblings = self
            .store
            .list_active_slots_by_course(reference.course_id, Some(reference.id))
            .await?;
        let current = self.store.list_active_enrolled_slots(student_id).await?;

        let mut candidates: Vec<CandidateSlot> = siblings
            .into_iter()
            .filter(|slot| slot.has_capacity())
            .map(|slot| {
                let has_conflict = SchedulerCore::conflicts_with_any(&slot, &current);
                CandidateSlot::from_load(slot, has_conflict)
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.has_conflict
                .cmp(&b.has_conflict)
                .then(a.day_of_week.cmp(&b.day_of_week))
                .then(a.start_time.cmp(&b.start_time))
        });
        candidates.truncate(MAX_ALTERNATIVES);

        Ok(candidates)
    }
}
