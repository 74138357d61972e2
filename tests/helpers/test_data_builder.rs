// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

// 各测试 crate 分别编译本模块，未用到的构建器不告警
#![allow(dead_code)]

use chrono::NaiveDate;

use academy_admin::domain::course::NewCourse;
use academy_admin::domain::enrollment::NewEnrollment;
use academy_admin::domain::schedule::{NewSchedule, SlotWithLoad, WeeklySlot};
use academy_admin::domain::student::NewStudent;

// ==========================================
// NewStudent 构建
// ==========================================

pub fn student(name: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        phone: Some("138-0000-0000".to_string()),
        email: None,
        parent_phone: None,
    }
}

// ==========================================
// NewCourse 构建器
// ==========================================

pub struct CourseBuilder {
    name: String,
    teacher_id: Option<i64>,
    description: Option<String>,
    max_students: Option<i32>,
    duration_minutes: Option<i32>,
}

impl CourseBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            teacher_id: None,
            description: None,
            max_students: None,
            duration_minutes: None,
        }
    }

    pub fn teacher(mut self, teacher_id: i64) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    pub fn max_students(mut self, max: i32) -> Self {
        self.max_students = Some(max);
        self
    }

    pub fn build(self) -> NewCourse {
        NewCourse {
            name: self.name,
            teacher_id: self.teacher_id,
            description: self.description,
            max_students: self.max_students,
            duration_minutes: self.duration_minutes,
        }
    }
}

// ==========================================
// NewSchedule 构建器
// ==========================================

pub struct SlotBuilder {
    course_id: i64,
    day_of_week: u8,
    start_time: String,
    end_time: String,
    room: Option<String>,
}

impl SlotBuilder {
    pub fn new(course_id: i64, day_of_week: u8, start_time: &str, end_time: &str) -> Self {
        Self {
            course_id,
            day_of_week,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            room: None,
        }
    }

    pub fn room(mut self, room: &str) -> Self {
        self.room = Some(room.to_string());
        self
    }

    pub fn build(self) -> NewSchedule {
        NewSchedule {
            course_id: self.course_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            room: self.room,
        }
    }
}

// ==========================================
// NewEnrollment 构建
// ==========================================

pub fn enrollment(student_id: i64, schedule_id: i64, total_sessions: i32) -> NewEnrollment {
    NewEnrollment {
        student_id,
        schedule_id,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        end_date: None,
        total_sessions,
    }
}

// ==========================================
// 内存时段构建（引擎测试用）
// ==========================================

pub fn weekly_slot(id: i64, course_id: i64, day: u8, start: &str, end: &str) -> WeeklySlot {
    WeeklySlot {
        id,
        course_id,
        day_of_week: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        room: None,
        active: true,
        created_at: None,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn slot_with_load(
    id: i64,
    course_id: i64,
    day: u8,
    start: &str,
    end: &str,
    enrolled_count: i32,
    max_students: i32,
) -> SlotWithLoad {
    SlotWithLoad {
        id,
        course_id,
        day_of_week: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        room: None,
        active: true,
        course_name: format!("course-{}", course_id),
        max_students,
        enrolled_count,
    }
}
