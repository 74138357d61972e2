// ==========================================
// 教培机构管理系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 说明: 初始化数据库与应用状态，输出基础运行信息；
//       HTTP/UI 适配层由外部服务承载
// ==========================================

use academy_admin::app::{get_default_db_path, AppState};
use academy_admin::{i18n, logging};

fn main() {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - {}", academy_admin::APP_NAME, i18n::t("app.starting"));
    tracing::info!("系统版本: {}", academy_admin::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径（优先命令行参数）
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState（内部完成 schema 初始化）
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    // 输出基础数据概况，确认库可用
    match app_state.student_api.list_students() {
        Ok(students) => tracing::info!("学员数: {}", students.len()),
        Err(e) => tracing::warn!("学员统计失败: {}", e),
    }
    match app_state.course_api.list_courses() {
        Ok(courses) => tracing::info!("课程数: {}", courses.len()),
        Err(e) => tracing::warn!("课程统计失败: {}", e),
    }
    match app_state.schedule_api.list_schedules() {
        Ok(schedules) => tracing::info!("有效时段数: {}", schedules.len()),
        Err(e) => tracing::warn!("时段统计失败: {}", e),
    }
    match app_state.payment_api.get_summary(None, None) {
        Ok(summary) => tracing::info!(
            "营收汇总: {}",
            serde_json::to_string(&summary).unwrap_or_default()
        ),
        Err(e) => tracing::warn!("营收统计失败: {}", e),
    }

    tracing::info!("{}", i18n::t("app.ready"));
}
