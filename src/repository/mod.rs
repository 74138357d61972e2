// ==========================================
// 教培机构管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod attendance_repo;
pub mod change_request_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod error;
pub mod payment_repo;
pub mod schedule_repo;
pub mod student_repo;
pub mod user_repo;

// 重导出核心仓储
pub use attendance_repo::{AttendanceDetail, AttendanceFilter, AttendanceRepository};
pub use change_request_repo::{
    ChangeRequestDetail, ChangeRequestFilter, ChangeRequestRepository,
};
pub use course_repo::{CourseDetail, CourseRepository};
pub use enrollment_repo::{EnrollmentDetail, EnrollmentRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use payment_repo::{PaymentDetail, PaymentFilter, PaymentRepository};
pub use schedule_repo::{EnrolledStudent, ScheduleDetail, ScheduleRepository};
pub use student_repo::{AttendanceStat, StudentRepository};
pub use user_repo::UserRepository;
