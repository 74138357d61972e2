// ==========================================
// 教培机构管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、纯领域规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod attendance;
pub mod change_request;
pub mod course;
pub mod enrollment;
pub mod payment;
pub mod schedule;
pub mod student;
pub mod types;
pub mod user;

// 重导出核心类型
pub use attendance::AttendanceRecord;
pub use change_request::{NewChangeRequest, ScheduleChangeRequest};
pub use course::{Course, NewCourse, DEFAULT_DURATION_MINUTES, DEFAULT_MAX_STUDENTS};
pub use enrollment::{Enrollment, EnrollmentUpdate, NewEnrollment};
pub use payment::{NewPayment, Payment, PaymentSummary};
pub use schedule::{
    CandidateSlot, FeasibilityReason, FeasibilityResult, NewSchedule, Recommendation,
    ScheduleUpdate, SlotTime, SlotWithLoad, WeeklySlot,
};
pub use student::{NewStudent, Student};
pub use types::{
    AttendanceStatus, ChangeRequestStatus, EnrollmentStatus, PaymentMethod, PaymentStatus,
    UserRole,
};
pub use user::User;
