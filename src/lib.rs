// ==========================================
// 教培机构管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 学员/课程/考勤/缴费管理 + 调课决策支持
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 调课决策规则
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA/建表统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装与启动
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AttendanceStatus, ChangeRequestStatus, EnrollmentStatus, PaymentMethod, PaymentStatus,
    UserRole,
};

// 领域实体
pub use domain::{
    AttendanceRecord, CandidateSlot, Course, Enrollment, FeasibilityReason, FeasibilityResult,
    Payment, Recommendation, ScheduleChangeRequest, SlotWithLoad, Student, WeeklySlot,
};

// 引擎
pub use engine::{
    AlternativeFinder, FeasibilityEngine, RecommendationEngine, ScheduleReader, SchedulerCore,
};

// API
pub use api::{
    AttendanceApi, CourseApi, EnrollmentApi, PaymentApi, ScheduleApi, ScheduleChangeApi,
    StudentApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教培机构管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
