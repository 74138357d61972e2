// ==========================================
// 教培机构管理系统 - 选课推荐引擎
// ==========================================
// 职责: 对指定课程的全部可用时段按契合度评分排序
// 红线: 不写库；评分是透明的加法启发式，不做全局寻优
// ==========================================
// 分数口径: 100 - 50×冲突 - 20×(报名/容量) + 10×同日
// 该口径对外展示，保持数值可复现
// ==========================================

use crate::domain::schedule::{CandidateSlot, Recommendation};
use crate::engine::repositories::ScheduleReader;
use crate::engine::scheduler_core::SchedulerCore;
use crate::repository::RepositoryResult;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::instrument;

/// 推荐列表最多返回条数
pub const RECOMMENDED_LIMIT: usize = 3;

// ==========================================
// RecommendationEngine - 选课推荐引擎
// ==========================================
pub struct RecommendationEngine<R>
where
    R: ScheduleReader,
{
    store: Arc<R>,
}

impl<R> RecommendationEngine<R>
where
    R: ScheduleReader,
{
    /// 创建新的 RecommendationEngine 实例
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// 推荐课程时段
    ///
    /// # 规则
    /// 1. 取学员当前课表模式与课程全部有效时段（两个独立读取先行汇合）
    /// 2. 过滤掉无空位的时段
    /// 3. 逐个评分（冲突/满员压力/同日并课）
    /// 4. 按 (-score, day_of_week, start_time) 排序，等分时次序确定
    /// 5. recommended = 排序后无冲突的前 3 条；all_available = 全量
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> RepositoryResult<Recommendation> {
        let (current, slots) = futures::try_join!(
            self.store.list_active_enrolled_slots(student_id),
            self.store.list_active_slots_by_course(course_id, None),
        )?;

        let mut scored: Vec<CandidateSlot> = slots
            .into_iter()
            .filter(|slot| slot.has_capacity())
            .map(|slot| {
                for anomaly in slot.data_anomalies() {
                    tracing::warn!("{}", anomaly);
                }
                let has_conflict = SchedulerCore::conflicts_with_any(&slot, &current);
                let same_day = SchedulerCore::shares_day_with_any(&slot, &current);
                let score = SchedulerCore::score_candidate(
                    slot.enrolled_count,
                    slot.max_students,
                    has_conflict,
                    same_day,
                );
                CandidateSlot::scored(slot, has_conflict, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.day_of_week.cmp(&b.day_of_week))
                .then(a.start_time.cmp(&b.start_time))
        });

        let recommended: Vec<CandidateSlot> = scored
            .iter()
            .filter(|slot| !slot.has_conflict)
            .take(RECOMMENDED_LIMIT)
            .cloned()
            .collect();

        Ok(Recommendation {
            recommended,
            all_available: scored,
        })
    }
}
