// ==========================================
// 教培机构管理系统 - 课表时段实体
// ==========================================
// WeeklySlot: 课程在一周内的一个固定时段
// 时间格式: "HH:MM" 零填充文本，字典序即时间序
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// SlotTime - 时段读取接口
// ==========================================
// 冲突判定只依赖 (day_of_week, start_time, end_time)，
// 各带负载/评分的时段视图都实现本 trait，避免来回转换
pub trait SlotTime {
    fn day_of_week(&self) -> u8;
    fn start_time(&self) -> &str;
    fn end_time(&self) -> &str;
}

// ==========================================
// WeeklySlot - 周期课表时段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySlot {
    pub id: i64,
    pub course_id: i64,
    /// 星期几，0-6
    pub day_of_week: u8,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"，同日内，start < end
    pub end_time: String,
    pub room: Option<String>,
    pub active: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl SlotTime for WeeklySlot {
    fn day_of_week(&self) -> u8 {
        self.day_of_week
    }
    fn start_time(&self) -> &str {
        &self.start_time
    }
    fn end_time(&self) -> &str {
        &self.end_time
    }
}

/// 新建时段的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSchedule {
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

/// 时段更新输入（全量覆盖）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub active: bool,
}

// ==========================================
// SlotWithLoad - 带负载的时段视图
// ==========================================
/// 时段 + 所属课程容量 + 当前有效报名数
///
/// enrolled_count 只统计 status = 'active' 的报名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotWithLoad {
    pub id: i64,
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub active: bool,
    pub course_name: String,
    pub max_students: i32,
    pub enrolled_count: i32,
}

impl SlotTime for SlotWithLoad {
    fn day_of_week(&self) -> u8 {
        self.day_of_week
    }
    fn start_time(&self) -> &str {
        &self.start_time
    }
    fn end_time(&self) -> &str {
        &self.end_time
    }
}

impl SlotWithLoad {
    /// 是否还有空位
    pub fn has_capacity(&self) -> bool {
        self.enrolled_count < self.max_students
    }

    /// 数据质量异常描述（不修正，只上报）
    ///
    /// 引擎按原样计算，异常由调用方记录日志、线下治理
    pub fn data_anomalies(&self) -> Vec<String> {
        let mut anomalies = Vec::new();
        if self.start_time >= self.end_time {
            anomalies.push(format!(
                "schedule_id={} 时段起止倒挂: start={} end={}",
                self.id, self.start_time, self.end_time
            ));
        }
        if self.enrolled_count > self.max_students {
            anomalies.push(format!(
                "schedule_id={} 报名数超容量: enrolled={} max={}",
                self.id, self.enrolled_count, self.max_students
            ));
        }
        anomalies
    }
}

// ==========================================
// CandidateSlot - 候选时段
// ==========================================
/// 对某个学员评估后的候选时段：
/// 带冲突标记，推荐场景下另带评分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub id: i64,
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub course_name: String,
    pub max_students: i32,
    pub enrolled_count: i32,
    pub has_conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SlotTime for CandidateSlot {
    fn day_of_week(&self) -> u8 {
        self.day_of_week
    }
    fn start_time(&self) -> &str {
        &self.start_time
    }
    fn end_time(&self) -> &str {
        &self.end_time
    }
}

impl CandidateSlot {
    /// 由负载视图构造候选（无评分）
    pub fn from_load(slot: SlotWithLoad, has_conflict: bool) -> Self {
        Self {
            id: slot.id,
            course_id: slot.course_id,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
            room: slot.room,
            course_name: slot.course_name,
            max_students: slot.max_students,
            enrolled_count: slot.enrolled_count,
            has_conflict,
            score: None,
        }
    }

    /// 由负载视图构造带评分候选
    pub fn scored(slot: SlotWithLoad, has_conflict: bool, score: f64) -> Self {
        let mut candidate = Self::from_load(slot, has_conflict);
        candidate.score = Some(score);
        candidate
    }
}

// ==========================================
// FeasibilityResult - 调课可行性结论
// ==========================================
/// 调课判定原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityReason {
    /// 可行
    Ok,
    /// 目标时段不存在
    NotFound,
    /// 目标时段已满
    Full,
    /// 与现有课程时间冲突
    Conflict,
}

impl std::fmt::Display for FeasibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeasibilityReason::Ok => write!(f, "ok"),
            FeasibilityReason::NotFound => write!(f, "not_found"),
            FeasibilityReason::Full => write!(f, "full"),
            FeasibilityReason::Conflict => write!(f, "conflict"),
        }
    }
}

/// 调课可行性结论
///
/// 永远是结构化结果，不以错误形式返回业务性不可行；
/// 只有存储层故障才会以 Err 向上传播
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub feasible: bool,
    pub reason: FeasibilityReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<i32>,
    /// 与目标时段冲突的现有时段（reason = conflict 时非空）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<WeeklySlot>,
    /// 同课程的替代时段（不可行时给出）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<CandidateSlot>,
}

impl FeasibilityResult {
    pub fn feasible(enrolled_count: i32, max_students: i32) -> Self {
        Self {
            feasible: true,
            reason: FeasibilityReason::Ok,
            enrolled_count: Some(enrolled_count),
            max_students: Some(max_students),
            conflicts: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            feasible: false,
            reason: FeasibilityReason::NotFound,
            enrolled_count: None,
            max_students: None,
            conflicts: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    pub fn full(enrolled_count: i32, max_students: i32, alternatives: Vec<CandidateSlot>) -> Self {
        Self {
            feasible: false,
            reason: FeasibilityReason::Full,
            enrolled_count: Some(enrolled_count),
            max_students: Some(max_students),
            conflicts: Vec::new(),
            alternatives,
        }
    }

    pub fn conflict(conflicts: Vec<WeeklySlot>, alternatives: Vec<CandidateSlot>) -> Self {
        Self {
            feasible: false,
            reason: FeasibilityReason::Conflict,
            enrolled_count: None,
            max_students: None,
            conflicts,
            alternatives,
        }
    }
}

// ==========================================
// Recommendation - 选课推荐结论
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// 无冲突候选中得分最高的前 3 个
    pub recommended: Vec<CandidateSlot>,
    /// 全部有空位候选，按得分降序
    pub all_available: Vec<CandidateSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_result_serialization_shape() {
        let result = FeasibilityResult::not_found();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["feasible"], false);
        assert_eq!(json["reason"], "not_found");
        // 空集合与缺省计数不输出
        assert!(json.get("conflicts").is_none());
        assert!(json.get("enrolled_count").is_none());

        let result = FeasibilityResult::full(8, 8, Vec::new());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["reason"], "full");
        assert_eq!(json["enrolled_count"], 8);
    }

    #[test]
    fn test_candidate_slot_score_omitted_when_absent() {
        let slot = SlotWithLoad {
            id: 1,
            course_id: 2,
            day_of_week: 3,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            room: None,
            active: true,
            course_name: "数学基础班".to_string(),
            max_students: 10,
            enrolled_count: 4,
        };
        let without_score = serde_json::to_value(CandidateSlot::from_load(slot.clone(), false)).unwrap();
        assert!(without_score.get("score").is_none());

        let with_score = serde_json::to_value(CandidateSlot::scored(slot, false, 92.5)).unwrap();
        assert_eq!(with_score["score"], 92.5);
    }

    #[test]
    fn test_data_anomalies_reported_not_corrected() {
        let slot = SlotWithLoad {
            id: 9,
            course_id: 2,
            day_of_week: 1,
            start_time: "11:00".to_string(),
            end_time: "10:00".to_string(),
            room: None,
            active: true,
            course_name: "英语口语班".to_string(),
            max_students: 5,
            enrolled_count: 7,
        };
        let anomalies = slot.data_anomalies();
        assert_eq!(anomalies.len(), 2);
        // 异常数据不拦截容量口径的计算
        assert!(!slot.has_capacity());
    }
}
