// ==========================================
// 教培机构管理系统 - 演示数据库重置与种子数据
// ==========================================
// 用法: cargo run --bin reset_and_seed_demo_db [db_path]
// 说明: 备份并重建数据库，写入一套可演示的学员/课程/
//       课表/报名/缴费数据，保证调课与推荐流程可立即体验
// ==========================================

use chrono::Local;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use academy_admin::app::get_default_db_path;
use academy_admin::db::{init_schema, open_sqlite_connection};
use academy_admin::i18n;

// 口令散列由外部认证服务生成；演示库统一占位
const DEMO_PASSWORD_HASH: &str = "$external-auth$demo";

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    seed_demo_data(&conn)?;
    print_quick_counts(&conn)?;

    eprintln!("{}: {}", i18n::t("common.success"), db_path);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo_data(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tx = conn.unchecked_transaction()?;

    // 管理员与教师
    tx.execute(
        "INSERT INTO users (username, password, name, role) VALUES (?1, ?2, ?3, ?4)",
        params!["admin", DEMO_PASSWORD_HASH, "管理员", "admin"],
    )?;
    tx.execute(
        "INSERT INTO users (username, password, name, role) VALUES (?1, ?2, ?3, ?4)",
        params!["teacher_zhang", DEMO_PASSWORD_HASH, "张老师", "teacher"],
    )?;
    tx.execute(
        "INSERT INTO users (username, password, name, role) VALUES (?1, ?2, ?3, ?4)",
        params!["teacher_li", DEMO_PASSWORD_HASH, "李老师", "teacher"],
    )?;

    // 学员
    let students: [(&str, &str, &str, &str); 5] = [
        ("王小明", "138-0000-0001", "wang@example.com", "139-0000-0001"),
        ("陈雨桐", "138-0000-0002", "chen@example.com", "139-0000-0002"),
        ("刘子轩", "138-0000-0003", "liu@example.com", "139-0000-0003"),
        ("赵一诺", "138-0000-0004", "zhao@example.com", "139-0000-0004"),
        ("孙可心", "138-0000-0005", "sun@example.com", "139-0000-0005"),
    ];
    for (name, phone, email, parent_phone) in students {
        tx.execute(
            "INSERT INTO students (name, phone, email, parent_phone) VALUES (?1, ?2, ?3, ?4)",
            params![name, phone, email, parent_phone],
        )?;
    }

    // 课程
    let courses: [(&str, i64, &str, i32, i32); 4] = [
        ("数学基础班", 2, "小学数学基础课程", 10, 60),
        ("英语口语班", 3, "初级英语口语", 8, 90),
        ("科学实验班", 2, "趣味科学实验", 12, 120),
        ("编程入门", 3, "Python 编程基础", 15, 90),
    ];
    for (name, teacher_id, description, max_students, duration_minutes) in courses {
        tx.execute(
            "INSERT INTO courses (name, teacher_id, description, max_students, duration_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, teacher_id, description, max_students, duration_minutes],
        )?;
    }

    // 周期课表
    let schedules: [(i64, u8, &str, &str, &str); 6] = [
        (1, 1, "09:00", "10:00", "A101"),
        (1, 3, "09:00", "10:00", "A101"),
        (2, 2, "14:00", "15:30", "B201"),
        (2, 4, "14:00", "15:30", "B201"),
        (3, 5, "10:00", "12:00", "C301"),
        (4, 6, "13:00", "14:30", "D401"),
    ];
    for (course_id, day_of_week, start_time, end_time, room) in schedules {
        tx.execute(
            "INSERT INTO schedules (course_id, day_of_week, start_time, end_time, room)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![course_id, day_of_week, start_time, end_time, room],
        )?;
    }

    // 报名
    let enrollments: [(i64, i64, &str, i32, i32); 5] = [
        (1, 1, "2026-01-05", 40, 35),
        (2, 3, "2026-01-05", 30, 28),
        (3, 5, "2026-01-19", 20, 18),
        (4, 2, "2026-01-05", 40, 32),
        (5, 6, "2026-01-12", 25, 24),
    ];
    for (student_id, schedule_id, start_date, total, remaining) in enrollments {
        tx.execute(
            "INSERT INTO enrollments
             (student_id, schedule_id, start_date, total_sessions, remaining_sessions)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![student_id, schedule_id, start_date, total, remaining],
        )?;
    }

    // 缴费
    let payments: [(i64, i64, f64, &str, &str); 5] = [
        (1, 1, 4000.0, "card", "数学基础班 1个月"),
        (2, 2, 3500.0, "transfer", "英语口语班 1个月"),
        (3, 3, 3000.0, "cash", "科学实验班 1个月"),
        (4, 4, 4000.0, "card", "数学基础班 1个月"),
        (5, 5, 3800.0, "card", "编程入门 1个月"),
    ];
    for (student_id, enrollment_id, amount, method, description) in payments {
        tx.execute(
            "INSERT INTO payments (student_id, enrollment_id, amount, payment_method, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![student_id, enrollment_id, amount, method, description],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for table in [
        "users",
        "students",
        "courses",
        "schedules",
        "enrollments",
        "payments",
    ] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        eprintln!("{}: {}", table, count);
    }
    Ok(())
}
