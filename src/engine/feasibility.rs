// ==========================================
// 教培机构管理系统 - 调课可行性引擎
// ==========================================
// 职责: 判定学员换到目标时段是否可行
// 红线: 不写库，结论永远是结构化结果；
//       只有存储故障才向上传播，且不在引擎内重试
// ==========================================
// 判定顺序: 时段存在性 → 容量 → 时间冲突
// 容量不足时不再看冲突（结论固定为 full）
// ==========================================

use crate::domain::schedule::{FeasibilityResult, WeeklySlot};
use crate::engine::alternatives::AlternativeFinder;
use crate::engine::repositories::ScheduleReader;
use crate::engine::scheduler_core::SchedulerCore;
use crate::repository::RepositoryResult;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// FeasibilityEngine - 调课可行性引擎
// ==========================================
pub struct FeasibilityEngine<R>
where
    R: ScheduleReader,
{
    store: Arc<R>,
    alternatives: AlternativeFinder<R>,
}

impl<R> FeasibilityEngine<R>
where
    R: ScheduleReader,
{
    /// 创建新的 FeasibilityEngine 实例
    pub fn new(store: Arc<R>) -> Self {
        Self {
            alternatives: AlternativeFinder::new(store.clone()),
            store,
        }
    }

    /// 判定调课可行性
    ///
    /// # 参数
    /// - student_id: 学员ID
    /// - current_schedule_id: 学员准备腾出的时段（可为空）
    /// - requested_schedule_id: 目标时段
    ///
    /// # 规则
    /// 1. 目标时段不存在 → not_found
    /// 2. 目标时段已满 → full，附报名数/容量与同课程替代时段
    /// 3. 与学员其它在读时段冲突（排除 current_schedule_id，
    ///    学员不会与自己正要腾出的时段“冲突”）→ conflict，
    ///    附冲突时段与替代时段
    /// 4. 否则可行，附报名数/容量
    ///
    /// 学员不存在或没有任何报名不是错误：冲突集为空，照常走容量判定。
    /// 容量与冲突两次读取之间未包事务，存在极窄的并发写入窗口（已知弱一致）。
    #[instrument(skip(self))]
    pub async fn check(
        &self,
        student_id: i64,
        current_schedule_id: Option<i64>,
        requested_schedule_id: i64,
    ) -> RepositoryResult<FeasibilityResult> {
        // 步骤 1: 解析目标时段
        let requested = match self.store.get_slot(requested_schedule_id).await? {
            Some(slot) => slot,
            None => {
                tracing::debug!(requested_schedule_id, "目标时段不存在");
                return Ok(FeasibilityResult::not_found());
            }
        };

        // 数据质量异常只记录，不修正；按原样计算会得到保守结论
        for anomaly in requested.data_anomalies() {
            tracing::warn!("{}", anomaly);
        }

        // 步骤 2: 容量判定
        if !requested.has_capacity() {
            let alternatives = self.alternatives.find(student_id, &requested).await?;
            return Ok(FeasibilityResult::full(
                requested.enrolled_count,
                requested.max_students,
                alternatives,
            ));
        }

        // 步骤 3: 冲突判定（排除正要腾出的时段）
        let enrolled = self.store.list_active_enrolled_slots(student_id).await?;
        let conflicts: Vec<WeeklySlot> = enrolled
            .into_iter()
            .filter(|slot| current_schedule_id != Some(slot.id))
            .filter(|slot| SchedulerCore::slots_conflict(&requested, slot))
            .collect();

        if !conflicts.is_empty() {
            let alternatives = self.alternatives.find(student_id, &requested).await?;
            return Ok(FeasibilityResult::conflict(conflicts, alternatives));
        }

        // 步骤 4: 可行
        Ok(FeasibilityResult::feasible(
            requested.enrolled_count,
            requested.max_students,
        ))
    }
}
