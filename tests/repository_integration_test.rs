// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 真实 SQLite 上验证各仓储的 CRUD 与
//           调课引擎只读视图的统计口径
// ==========================================

mod helpers;
mod test_helpers;

use std::sync::{Arc, Mutex};

use academy_admin::domain::types::{ChangeRequestStatus, PaymentStatus};
use academy_admin::domain::{NewChangeRequest, NewPayment, NewStudent};
use academy_admin::logging;
use academy_admin::repository::{
    ChangeRequestFilter, ChangeRequestRepository, CourseRepository, EnrollmentRepository,
    PaymentFilter, PaymentRepository, ScheduleRepository, StudentRepository, UserRepository,
};

use helpers::test_data_builder::{enrollment, student, CourseBuilder, SlotBuilder};

/// 在临时库上构建一组公用仓储
struct RepoEnv {
    _temp_file: tempfile::NamedTempFile,
    db_path: String,
    student_repo: StudentRepository,
    course_repo: CourseRepository,
    schedule_repo: ScheduleRepository,
    enrollment_repo: EnrollmentRepository,
    payment_repo: PaymentRepository,
    change_request_repo: ChangeRequestRepository,
    user_repo: UserRepository,
}

fn create_env() -> RepoEnv {
    logging::init_test();
    let (temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = academy_admin::db::open_sqlite_connection(&db_path).expect("Failed to open db");
    let conn = Arc::new(Mutex::new(conn));

    RepoEnv {
        _temp_file: temp_file,
        db_path,
        student_repo: StudentRepository::from_connection(conn.clone()),
        course_repo: CourseRepository::from_connection(conn.clone()),
        schedule_repo: ScheduleRepository::from_connection(conn.clone()),
        enrollment_repo: EnrollmentRepository::from_connection(conn.clone()),
        payment_repo: PaymentRepository::from_connection(conn.clone()),
        change_request_repo: ChangeRequestRepository::from_connection(conn.clone()),
        user_repo: UserRepository::from_connection(conn),
    }
}

#[test]
fn test_student_crud_round_trip() {
    let env = create_env();

    let id = env.student_repo.create(&student("王小明")).unwrap();
    let loaded = env.student_repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "王小明");

    let updated = NewStudent {
        name: "王小明".to_string(),
        phone: Some("138-9999-0000".to_string()),
        email: Some("wang@example.com".to_string()),
        parent_phone: None,
    };
    assert!(env.student_repo.update(id, &updated).unwrap());
    let loaded = env.student_repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.phone.as_deref(), Some("138-9999-0000"));

    assert!(env.student_repo.delete(id).unwrap());
    assert!(env.student_repo.find_by_id(id).unwrap().is_none());
    // 未命中返回 false 而不是错误
    assert!(!env.student_repo.delete(id).unwrap());
}

#[test]
fn test_course_defaults_and_teacher_join() {
    let env = create_env();

    let teacher_id = env
        .user_repo
        .create(
            "teacher_zhang",
            "$external-auth$demo",
            "张老师",
            academy_admin::UserRole::Teacher,
        )
        .unwrap();

    // 不指定容量/时长时使用默认值
    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("数学基础班").teacher(teacher_id).build())
        .unwrap();
    let course = env.course_repo.find_by_id(course_id).unwrap().unwrap();
    assert_eq!(course.max_students, 10);
    assert_eq!(course.duration_minutes, 60);
    assert_eq!(course.teacher_name.as_deref(), Some("张老师"));
}

#[test]
fn test_slot_load_counts_only_active_enrollments() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("英语口语班").max_students(8).build())
        .unwrap();
    let slot_id = env
        .schedule_repo
        .create(
            &SlotBuilder::new(course_id, 2, "14:00", "15:30")
                .room("B201")
                .build(),
        )
        .unwrap();

    let s1 = env.student_repo.create(&student("陈雨桐")).unwrap();
    let s2 = env.student_repo.create(&student("刘子轩")).unwrap();
    let s3 = env.student_repo.create(&student("赵一诺")).unwrap();
    let e1 = env
        .enrollment_repo
        .create(&enrollment(s1, slot_id, 20))
        .unwrap();
    env.enrollment_repo
        .create(&enrollment(s2, slot_id, 20))
        .unwrap();
    env.enrollment_repo
        .create(&enrollment(s3, slot_id, 20))
        .unwrap();

    // 退课后不再计入负载
    env.enrollment_repo.cancel(e1).unwrap();

    let load = env
        .schedule_repo
        .get_slot_with_load(slot_id)
        .unwrap()
        .unwrap();
    assert_eq!(load.enrolled_count, 2);
    assert_eq!(load.max_students, 8);
    assert!(load.has_capacity());

    // 不存在的时段返回 None
    assert!(env.schedule_repo.get_slot_with_load(9999).unwrap().is_none());
}

#[test]
fn test_course_slots_view_excludes_reference_and_inactive() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("科学实验班").build())
        .unwrap();
    let slot_a = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 1, "09:00", "10:00").build())
        .unwrap();
    let slot_b = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 3, "09:00", "10:00").build())
        .unwrap();
    let slot_c = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 5, "09:00", "10:00").build())
        .unwrap();
    env.schedule_repo.deactivate(slot_c).unwrap();

    let slots = env
        .schedule_repo
        .list_active_slots_with_load(course_id, Some(slot_a))
        .unwrap();
    let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![slot_b]);

    // 不排除时按 (day, start_time) 排序
    let slots = env
        .schedule_repo
        .list_active_slots_with_load(course_id, None)
        .unwrap();
    let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![slot_a, slot_b]);
}

#[test]
fn test_enrolled_slots_reflect_weekly_pattern() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("编程入门").build())
        .unwrap();
    let slot_a = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 6, "13:00", "14:30").build())
        .unwrap();
    let slot_b = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 2, "13:00", "14:30").build())
        .unwrap();

    let student_id = env.student_repo.create(&student("孙可心")).unwrap();
    env.enrollment_repo
        .create(&enrollment(student_id, slot_a, 25))
        .unwrap();
    let cancelled = env
        .enrollment_repo
        .create(&enrollment(student_id, slot_b, 25))
        .unwrap();
    env.enrollment_repo.cancel(cancelled).unwrap();

    let slots = env.schedule_repo.list_enrolled_slots(student_id).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].id, slot_a);

    // 无报名学员得到空集而不是错误
    assert!(env
        .schedule_repo
        .list_enrolled_slots(424242)
        .unwrap()
        .is_empty());
}

#[test]
fn test_move_schedule_targets_only_active_row() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("数学基础班").build())
        .unwrap();
    let slot_a = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 1, "09:00", "10:00").build())
        .unwrap();
    let slot_b = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 3, "09:00", "10:00").build())
        .unwrap();

    let student_id = env.student_repo.create(&student("王小明")).unwrap();
    let enrollment_id = env
        .enrollment_repo
        .create(&enrollment(student_id, slot_a, 40))
        .unwrap();

    let moved = env
        .enrollment_repo
        .move_schedule(student_id, slot_a, slot_b)
        .unwrap();
    assert_eq!(moved, 1);
    let detail = env
        .enrollment_repo
        .find_by_id(enrollment_id)
        .unwrap()
        .unwrap();
    assert_eq!(detail.schedule_id, slot_b);

    // 旧时段上已无在读报名，再移一次命中 0 行
    let moved_again = env
        .enrollment_repo
        .move_schedule(student_id, slot_a, slot_b)
        .unwrap();
    assert_eq!(moved_again, 0);
}

#[test]
fn test_payment_summary_groups_by_status() {
    let env = create_env();

    let student_id = env.student_repo.create(&student("陈雨桐")).unwrap();
    let p1 = NewPayment {
        student_id,
        enrollment_id: None,
        amount: 4000.0,
        payment_method: Some(academy_admin::PaymentMethod::Card),
        description: None,
    };
    let p2 = NewPayment {
        amount: 3500.0,
        ..p1.clone()
    };
    let p3 = NewPayment {
        amount: 1200.0,
        ..p1.clone()
    };
    let id1 = env.payment_repo.create(&p1).unwrap();
    env.payment_repo.create(&p2).unwrap();
    let id3 = env.payment_repo.create(&p3).unwrap();

    env.payment_repo
        .update_status(id1, PaymentStatus::Refunded, Some("家长申请退款"))
        .unwrap();
    env.payment_repo
        .update_status(id3, PaymentStatus::Pending, None)
        .unwrap();

    let summary = env.payment_repo.summary(None, None).unwrap();
    assert_eq!(summary.total_payments, 3);
    assert_eq!(summary.total_revenue, 3500.0);
    assert_eq!(summary.pending_amount, 1200.0);
    assert_eq!(summary.refunded_amount, 4000.0);

    let payments = env
        .payment_repo
        .list(&PaymentFilter {
            student_id: Some(student_id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(payments.len(), 3);
}

#[test]
fn test_change_request_process_stamps_time() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("英语口语班").build())
        .unwrap();
    let slot_a = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 2, "14:00", "15:30").build())
        .unwrap();
    let slot_b = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 4, "14:00", "15:30").build())
        .unwrap();
    let student_id = env.student_repo.create(&student("刘子轩")).unwrap();
    env.enrollment_repo
        .create(&enrollment(student_id, slot_a, 30))
        .unwrap();

    let request_id = env
        .change_request_repo
        .create(&NewChangeRequest {
            student_id,
            current_schedule_id: slot_a,
            requested_schedule_id: slot_b,
            reason: Some("时间调整".to_string()),
        })
        .unwrap();

    let pending = env
        .change_request_repo
        .find_by_id(request_id)
        .unwrap()
        .unwrap();
    assert_eq!(pending.status, ChangeRequestStatus::Pending);
    assert!(pending.processed_at.is_none());

    assert!(env
        .change_request_repo
        .process(request_id, ChangeRequestStatus::Approved, Some("同意"))
        .unwrap());
    let processed = env
        .change_request_repo
        .find_by_id(request_id)
        .unwrap()
        .unwrap();
    assert_eq!(processed.status, ChangeRequestStatus::Approved);
    assert!(processed.processed_at.is_some());

    // 列表联查带两侧时段信息
    let rows = env
        .change_request_repo
        .list(&ChangeRequestFilter {
            status: Some(ChangeRequestStatus::Approved),
            student_id: Some(student_id),
        })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].current_day, 2);
    assert_eq!(rows[0].requested_day, 4);
    assert_eq!(rows[0].requested_start_time, "14:00");
}

#[test]
fn test_attendance_stats_per_enrollment() {
    let env = create_env();

    let course_id = env
        .course_repo
        .create(&CourseBuilder::new("科学实验班").build())
        .unwrap();
    let slot_id = env
        .schedule_repo
        .create(&SlotBuilder::new(course_id, 5, "10:00", "12:00").build())
        .unwrap();
    let student_id = env.student_repo.create(&student("赵一诺")).unwrap();
    let enrollment_id = env
        .enrollment_repo
        .create(&enrollment(student_id, slot_id, 20))
        .unwrap();

    // 消耗 2 次课，其中 1 次留下实到记录
    env.enrollment_repo
        .decrement_remaining_sessions(enrollment_id)
        .unwrap();
    env.enrollment_repo
        .decrement_remaining_sessions(enrollment_id)
        .unwrap();
    let conn = academy_admin::db::open_sqlite_connection(&env.db_path).unwrap();
    conn.execute(
        "INSERT INTO attendance (student_id, enrollment_id, check_in_time, date)
         VALUES (?1, ?2, '2026-02-02T09:58:00+00:00', '2026-02-02')",
        rusqlite::params![student_id, enrollment_id],
    )
    .unwrap();

    let stats = env.student_repo.attendance_stats(student_id).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_sessions, 20);
    assert_eq!(stats[0].remaining_sessions, 18);
    assert_eq!(stats[0].attended_sessions, 1);
    assert_eq!(stats[0].expected_sessions, 2);
}
