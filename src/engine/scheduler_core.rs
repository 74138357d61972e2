// ==========================================
// 教培机构管理系统 - Scheduler Core 纯函数库
// ==========================================
// 职责: 提供时段冲突判定、候选评分的纯逻辑
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::schedule::{SlotTime, WeeklySlot};

// ==========================================
// 评分常量
// ==========================================
// 权重为既有口径，调整会改变对外展示的分数含义

/// 基础分
pub const BASE_SCORE: f64 = 100.0;

/// 时间冲突扣分
pub const CONFLICT_PENALTY: f64 = 50.0;

/// 满员压力扣分系数（按 enrolled/max 线性放大）
pub const CAPACITY_PRESSURE_WEIGHT: f64 = 20.0;

/// 同日并课加分
pub const SAME_DAY_BONUS: f64 = 10.0;

// ==========================================
// SchedulerCore - 纯函数工具类
// ==========================================
pub struct SchedulerCore;

impl SchedulerCore {
    /// 判定两个 "HH:MM" 半开区间 [start, end) 是否重叠
    ///
    /// # 规则
    /// - 零填充的 "HH:MM" 文本字典序即时间序
    /// - 半开区间：首尾相接（a.end == b.start）不算重叠
    pub fn time_overlap(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> bool {
        a_start < b_end && b_start < a_end
    }

    /// 判定两个时段是否冲突
    ///
    /// # 规则
    /// - 仅当同一个 day_of_week 且时间区间半开重叠
    pub fn slots_conflict<A, B>(a: &A, b: &B) -> bool
    where
        A: SlotTime,
        B: SlotTime,
    {
        a.day_of_week() == b.day_of_week()
            && Self::time_overlap(a.start_time(), a.end_time(), b.start_time(), b.end_time())
    }

    /// 判定候选时段与学员现有课表是否冲突
    pub fn conflicts_with_any<A>(candidate: &A, current: &[WeeklySlot]) -> bool
    where
        A: SlotTime,
    {
        current.iter().any(|slot| Self::slots_conflict(candidate, slot))
    }

    /// 判定候选时段与学员现有课表是否同日
    pub fn shares_day_with_any<A>(candidate: &A, current: &[WeeklySlot]) -> bool
    where
        A: SlotTime,
    {
        current
            .iter()
            .any(|slot| slot.day_of_week == candidate.day_of_week())
    }

    /// 候选时段评分
    ///
    /// # 规则（加法顺序固定，保证数值可复现）
    /// 1. 基础分 100
    /// 2. 与现有课表冲突 → -50
    /// 3. 满员压力 → -20 × (enrolled / max)，实数运算
    /// 4. 与现有课表同日 → +10
    pub fn score_candidate(
        enrolled_count: i32,
        max_students: i32,
        has_conflict: bool,
        same_day: bool,
    ) -> f64 {
        let mut score = BASE_SCORE;

        if has_conflict {
            score -= CONFLICT_PENALTY;
        }

        let capacity_ratio = enrolled_count as f64 / max_students as f64;
        score -= capacity_ratio * CAPACITY_PRESSURE_WEIGHT;

        if same_day {
            score += SAME_DAY_BONUS;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, day: u8, start: &str, end: &str) -> WeeklySlot {
        WeeklySlot {
            id,
            course_id: 1,
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: None,
            active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_time_overlap_basic() {
        assert!(SchedulerCore::time_overlap("09:00", "10:00", "09:30", "10:30"));
        assert!(SchedulerCore::time_overlap("09:30", "10:30", "09:00", "10:00"));
        // 包含
        assert!(SchedulerCore::time_overlap("09:00", "12:00", "10:00", "11:00"));
        // 完全分离
        assert!(!SchedulerCore::time_overlap("09:00", "10:00", "14:00", "15:00"));
    }

    #[test]
    fn test_back_to_back_is_not_overlap() {
        // 半开区间：10:00 结束与 10:00 开始不冲突
        assert!(!SchedulerCore::time_overlap("09:00", "10:00", "10:00", "11:00"));
        assert!(!SchedulerCore::time_overlap("10:00", "11:00", "09:00", "10:00"));
    }

    #[test]
    fn test_slots_conflict_requires_same_day() {
        let a = slot(1, 1, "09:00", "10:00");
        let b = slot(2, 2, "09:00", "10:00");
        assert!(!SchedulerCore::slots_conflict(&a, &b));

        let c = slot(3, 1, "09:30", "10:30");
        assert!(SchedulerCore::slots_conflict(&a, &c));
    }

    #[test]
    fn test_conflict_symmetry() {
        let cases = [
            (slot(1, 1, "09:00", "10:00"), slot(2, 1, "09:30", "10:30")),
            (slot(3, 1, "09:00", "10:00"), slot(4, 1, "10:00", "11:00")),
            (slot(5, 3, "08:00", "12:00"), slot(6, 3, "09:00", "10:00")),
            (slot(7, 5, "09:00", "10:00"), slot(8, 6, "09:00", "10:00")),
        ];
        for (a, b) in &cases {
            assert_eq!(
                SchedulerCore::slots_conflict(a, b),
                SchedulerCore::slots_conflict(b, a),
            );
        }
    }

    #[test]
    fn test_score_without_penalties() {
        // 空时段、无冲突、不同日: 100 - 0 - 0 + 0
        assert_eq!(SchedulerCore::score_candidate(0, 10, false, false), 100.0);
    }

    #[test]
    fn test_score_capacity_pressure() {
        // 3/8 → 100 - 7.5 = 92.5；7/8 → 100 - 17.5 = 82.5
        assert_eq!(SchedulerCore::score_candidate(3, 8, false, false), 92.5);
        assert_eq!(SchedulerCore::score_candidate(7, 8, false, false), 82.5);
    }

    #[test]
    fn test_score_conflict_and_same_day() {
        // 冲突 + 同日: 100 - 50 - 20*(5/10) + 10 = 50
        assert_eq!(SchedulerCore::score_candidate(5, 10, true, true), 50.0);
        // 仅同日: 100 - 10 + 10 = 100
        assert_eq!(SchedulerCore::score_candidate(5, 10, false, true), 100.0);
    }
}
