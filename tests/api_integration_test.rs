// ==========================================
// API 层集成测试
// ==========================================
// 目标: 通过 AppState 验证学员/课程/课表/报名/
//       考勤/缴费各接口的业务规则
// ==========================================

mod helpers;
mod test_helpers;

use academy_admin::api::ApiError;
use academy_admin::app::AppState;
use academy_admin::domain::types::PaymentStatus;
use academy_admin::domain::{NewPayment, NewSchedule};
use academy_admin::logging;
use academy_admin::repository::{AttendanceFilter, PaymentFilter};
use academy_admin::PaymentMethod;

use helpers::test_data_builder::{enrollment, student, CourseBuilder, SlotBuilder};

struct ApiEnv {
    _temp_file: tempfile::NamedTempFile,
    app: AppState,
}

fn create_env() -> ApiEnv {
    logging::init_test();
    let (temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let app = AppState::new(db_path).expect("Failed to create AppState");
    ApiEnv {
        _temp_file: temp_file,
        app,
    }
}

/// 建一门课 + 一个时段 + 一名在读学员，返回 (student_id, enrollment_id, schedule_id)
fn seed_enrolled_student(env: &ApiEnv) -> (i64, i64, i64) {
    let course_id = env
        .app
        .course_api
        .create_course(CourseBuilder::new("数学基础班").build())
        .unwrap();
    let schedule_id = env
        .app
        .schedule_api
        .create_schedule(SlotBuilder::new(course_id, 1, "09:00", "10:00").build())
        .unwrap();
    let student_id = env.app.student_api.create_student(student("王小明")).unwrap();
    let enrollment_id = env
        .app
        .enrollment_api
        .create_enrollment(enrollment(student_id, schedule_id, 20))
        .unwrap();
    (student_id, enrollment_id, schedule_id)
}

// ==========================================
// 课表校验
// ==========================================

#[test]
fn test_schedule_input_validation() {
    let env = create_env();
    let course_id = env
        .app
        .course_api
        .create_course(CourseBuilder::new("英语口语班").build())
        .unwrap();

    // 周几越界
    let bad_day = env.app.schedule_api.create_schedule(NewSchedule {
        course_id,
        day_of_week: 7,
        start_time: "09:00".to_string(),
        end_time: "10:00".to_string(),
        room: None,
    });
    assert!(matches!(bad_day, Err(ApiError::InvalidInput(_))));

    // 非 HH:MM 格式
    let bad_format = env.app.schedule_api.create_schedule(NewSchedule {
        course_id,
        day_of_week: 1,
        start_time: "9点".to_string(),
        end_time: "10:00".to_string(),
        room: None,
    });
    assert!(matches!(bad_format, Err(ApiError::InvalidInput(_))));

    // 起止倒挂
    let inverted = env.app.schedule_api.create_schedule(NewSchedule {
        course_id,
        day_of_week: 1,
        start_time: "10:00".to_string(),
        end_time: "09:00".to_string(),
        room: None,
    });
    assert!(matches!(inverted, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_deactivated_schedule_hidden_from_list() {
    let env = create_env();
    let (_, _, schedule_id) = seed_enrolled_student(&env);

    assert_eq!(env.app.schedule_api.list_schedules().unwrap().len(), 1);
    env.app.schedule_api.deactivate_schedule(schedule_id).unwrap();
    assert!(env.app.schedule_api.list_schedules().unwrap().is_empty());
    // 按ID仍可查（历史数据），标记为停用
    let detail = env.app.schedule_api.get_schedule(schedule_id).unwrap();
    assert!(!detail.active);
}

#[test]
fn test_enrolled_students_listing() {
    let env = create_env();
    let (student_id, _, schedule_id) = seed_enrolled_student(&env);

    let students = env
        .app
        .schedule_api
        .list_enrolled_students(schedule_id)
        .unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, student_id);
    assert_eq!(students[0].remaining_sessions, 20);
}

// ==========================================
// 考勤
// ==========================================

#[test]
fn test_check_in_and_out_consumes_session() {
    let env = create_env();
    let (student_id, enrollment_id, _) = seed_enrolled_student(&env);

    let check_in = env
        .app
        .attendance_api
        .check_in(student_id, enrollment_id)
        .unwrap();
    assert!(!check_in.check_in_time.is_empty());

    // 未离场前不允许再次入场
    let again = env.app.attendance_api.check_in(student_id, enrollment_id);
    assert!(matches!(again, Err(ApiError::BusinessRuleViolation(_))));

    env.app.attendance_api.check_out(student_id).unwrap();

    // 剩余课次扣减
    let detail = env.app.enrollment_api.get_enrollment(enrollment_id).unwrap();
    assert_eq!(detail.remaining_sessions, 19);

    // 离场后记录闭合
    let records = env
        .app
        .attendance_api
        .list_attendance(AttendanceFilter {
            student_id: Some(student_id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].check_out_time.is_some());
}

#[test]
fn test_check_out_without_open_record_rejected() {
    let env = create_env();
    let (student_id, _, _) = seed_enrolled_student(&env);

    let result = env.app.attendance_api.check_out(student_id);
    assert!(matches!(result, Err(ApiError::BusinessRuleViolation(_))));
}

// ==========================================
// 缴费
// ==========================================

#[test]
fn test_payment_flow_and_summary() {
    let env = create_env();
    let (student_id, enrollment_id, _) = seed_enrolled_student(&env);

    let rejected = env.app.payment_api.create_payment(NewPayment {
        student_id,
        enrollment_id: Some(enrollment_id),
        amount: 0.0,
        payment_method: Some(PaymentMethod::Cash),
        description: None,
    });
    assert!(matches!(rejected, Err(ApiError::InvalidInput(_))));

    let payment_id = env
        .app
        .payment_api
        .create_payment(NewPayment {
            student_id,
            enrollment_id: Some(enrollment_id),
            amount: 4000.0,
            payment_method: Some(PaymentMethod::Card),
            description: Some("数学基础班 1个月".to_string()),
        })
        .unwrap();

    // 入账即 completed，联查带课程名
    let detail = env.app.payment_api.get_payment(payment_id).unwrap();
    assert_eq!(detail.status, PaymentStatus::Completed);
    assert_eq!(detail.course_name.as_deref(), Some("数学基础班"));

    env.app
        .payment_api
        .update_payment_status(payment_id, PaymentStatus::Refunded, Some("退款".to_string()))
        .unwrap();

    let summary = env.app.payment_api.get_summary(None, None).unwrap();
    assert_eq!(summary.total_payments, 1);
    assert_eq!(summary.total_revenue, 0.0);
    assert_eq!(summary.refunded_amount, 4000.0);

    let listed = env
        .app
        .payment_api
        .list_payments(PaymentFilter {
            student_id: Some(student_id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(listed.len(), 1);
}

// ==========================================
// 学员 / 报名
// ==========================================

#[test]
fn test_student_not_found_maps_to_api_error() {
    let env = create_env();
    let missing = env.app.student_api.get_student(424242);
    assert!(matches!(missing, Err(ApiError::NotFound(_))));

    let blank = env.app.student_api.create_student(student("  "));
    assert!(matches!(blank, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_cancel_enrollment_releases_capacity() {
    let env = create_env();
    let (student_id, enrollment_id, schedule_id) = seed_enrolled_student(&env);

    env.app.enrollment_api.cancel_enrollment(enrollment_id).unwrap();

    // 时段内在读学员清零
    assert!(env
        .app
        .schedule_api
        .list_enrolled_students(schedule_id)
        .unwrap()
        .is_empty());

    // 出勤统计只看在读报名
    assert!(env
        .app
        .student_api
        .get_attendance_stats(student_id)
        .unwrap()
        .is_empty());
}
