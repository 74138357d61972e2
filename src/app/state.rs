// ==========================================
// 教培机构管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{
    AttendanceApi, CourseApi, EnrollmentApi, PaymentApi, ScheduleApi, ScheduleChangeApi,
    StudentApi,
};
use crate::repository::{
    attendance_repo::AttendanceRepository, change_request_repo::ChangeRequestRepository,
    course_repo::CourseRepository, enrollment_repo::EnrollmentRepository,
    payment_repo::PaymentRepository, schedule_repo::ScheduleRepository,
    student_repo::StudentRepository, user_repo::UserRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 学员API
    pub student_api: Arc<StudentApi>,

    /// 课程API
    pub course_api: Arc<CourseApi>,

    /// 课表API
    pub schedule_api: Arc<ScheduleApi>,

    /// 报名API
    pub enrollment_api: Arc<EnrollmentApi>,

    /// 考勤API
    pub attendance_api: Arc<AttendanceApi>,

    /// 缴费API
    pub payment_api: Arc<PaymentApi>,

    /// 调课API
    pub schedule_change_api: Arc<ScheduleChangeApi>,

    /// 用户仓储（教师名录，供课程联查与种子数据使用）
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并初始化 schema
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例（调课API内部组装决策引擎）
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("无法初始化数据库schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo = Arc::new(StudentRepository::from_connection(conn.clone()));
        let course_repo = Arc::new(CourseRepository::from_connection(conn.clone()));
        let schedule_repo = Arc::new(ScheduleRepository::from_connection(conn.clone()));
        let enrollment_repo = Arc::new(EnrollmentRepository::from_connection(conn.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::from_connection(conn.clone()));
        let payment_repo = Arc::new(PaymentRepository::from_connection(conn.clone()));
        let change_request_repo = Arc::new(ChangeRequestRepository::from_connection(conn.clone()));
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let student_api = Arc::new(StudentApi::new(student_repo.clone()));
        let course_api = Arc::new(CourseApi::new(course_repo.clone()));
        let schedule_api = Arc::new(ScheduleApi::new(schedule_repo.clone()));
        let enrollment_api = Arc::new(EnrollmentApi::new(enrollment_repo.clone()));
        let attendance_api = Arc::new(AttendanceApi::new(
            attendance_repo.clone(),
            enrollment_repo.clone(),
        ));
        let payment_api = Arc::new(PaymentApi::new(payment_repo.clone()));
        let schedule_change_api = Arc::new(ScheduleChangeApi::new(
            change_request_repo.clone(),
            enrollment_repo.clone(),
            schedule_repo.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            student_api,
            course_api,
            schedule_api,
            enrollment_api,
            attendance_api,
            payment_api,
            schedule_change_api,
            user_repo,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("ACADEMY_ADMIN_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./academy_admin.db");

    // 尝试获取用户数据目录
    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("academy-admin-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("academy-admin");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("academy_admin.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // 注意：AppState::new() 的测试需要真实的数据库文件
    // 这些测试在集成测试中进行
}
