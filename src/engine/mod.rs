// ==========================================
// 教培机构管理系统 - 引擎层
// ==========================================
// 职责: 实现调课决策规则,不拼 SQL
// 红线: Engine 只读不写,业务性不可行不是错误
// ==========================================

pub mod alternatives;
pub mod feasibility;
pub mod recommendation;
pub mod repositories;
pub mod scheduler_core;

// 重导出核心引擎
pub use alternatives::{AlternativeFinder, MAX_ALTERNATIVES};
pub use feasibility::FeasibilityEngine;
pub use recommendation::{RecommendationEngine, RECOMMENDED_LIMIT};
pub use repositories::ScheduleReader;
pub use scheduler_core::SchedulerCore;
