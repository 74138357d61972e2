// ==========================================
// 教培机构管理系统 - 课表仓储
// ==========================================
// 职责: schedules 表 CRUD + 调课引擎所需的只读视图查询
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::schedule::{NewSchedule, ScheduleUpdate, SlotWithLoad, WeeklySlot};
use crate::domain::types::EnrollmentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleDetail - 课表行（带课程/教师信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetail {
    pub id: i64,
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub active: bool,
    pub course_name: String,
    pub teacher_name: Option<String>,
    pub max_students: i32,
    pub duration_minutes: i32,
}

// ==========================================
// EnrolledStudent - 时段内在读学员行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledStudent {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub enrollment_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub status: EnrollmentStatus,
}

// ==========================================
// ScheduleRepository - 课表仓储
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    /// 创建新的 ScheduleRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_slot_row(row: &Row<'_>) -> SqliteResult<WeeklySlot> {
        Ok(WeeklySlot {
            id: row.get(0)?,
            course_id: row.get(1)?,
            day_of_week: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            room: row.get(5)?,
            active: row.get::<_, i64>(6)? != 0,
            created_at: row
                .get::<_, Option<String>>(7)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
        })
    }

    fn map_load_row(row: &Row<'_>) -> SqliteResult<SlotWithLoad> {
        Ok(SlotWithLoad {
            id: row.get(0)?,
            course_id: row.get(1)?,
            day_of_week: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            room: row.get(5)?,
            active: row.get::<_, i64>(6)? != 0,
            course_name: row.get(7)?,
            max_students: row.get(8)?,
            enrolled_count: row.get(9)?,
        })
    }

    fn map_detail_row(row: &Row<'_>) -> SqliteResult<ScheduleDetail> {
        Ok(ScheduleDetail {
            id: row.get(0)?,
            course_id: row.get(1)?,
            day_of_week: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            room: row.get(5)?,
            active: row.get::<_, i64>(6)? != 0,
            course_name: row.get(7)?,
            teacher_name: row.get(8)?,
            max_students: row.get(9)?,
            duration_minutes: row.get(10)?,
        })
    }

    // ==========================================
    // CRUD
    // ==========================================

    /// 查询全部有效时段（按周几、开始时间排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<ScheduleDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time,
                   s.room, s.active, c.name AS course_name, u.name AS teacher_name,
                   c.max_students, c.duration_minutes
            FROM schedules s
            JOIN courses c ON s.course_id = c.id
            LEFT JOIN users u ON c.teacher_id = u.id
            WHERE s.active = 1
            ORDER BY s.day_of_week, s.start_time
            "#,
        )?;
        let schedules = stmt
            .query_map([], Self::map_detail_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(schedules)
    }

    /// 按主键查询（含停用时段）
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time,
                   s.room, s.active, c.name AS course_name, u.name AS teacher_name,
                   c.max_students, c.duration_minutes
            FROM schedules s
            JOIN courses c ON s.course_id = c.id
            LEFT JOIN users u ON c.teacher_id = u.id
            WHERE s.id = ?1
            "#,
        )?;
        let result = stmt.query_row(params![id], Self::map_detail_row);
        match result {
            Ok(schedule) => Ok(Some(schedule)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询时段内在读学员（按姓名排序）
    pub fn students_for_slot(&self, schedule_id: i64) -> RepositoryResult<Vec<EnrolledStudent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT st.id, st.name, st.phone, st.email,
                   e.id AS enrollment_id, e.start_date, e.end_date,
                   e.total_sessions, e.remaining_sessions, e.status
            FROM students st
            JOIN enrollments e ON st.id = e.student_id
            WHERE e.schedule_id = ?1 AND e.status = 'active'
            ORDER BY st.name
            "#,
        )?;
        let students = stmt
            .query_map(params![schedule_id], |row| {
                Ok(EnrolledStudent {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    phone: row.get(2)?,
                    email: row.get(3)?,
                    enrollment_id: row.get(4)?,
                    start_date: NaiveDate::parse_from_str(&row.get::<_, String>(5)?, "%Y-%m-%d")
                        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
                    end_date: row
                        .get::<_, Option<String>>(6)?
                        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                    total_sessions: row.get(7)?,
                    remaining_sessions: row.get(8)?,
                    status: EnrollmentStatus::from_str(&row.get::<_, String>(9)?),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }

    /// 新建时段，返回主键
    pub fn create(&self, schedule: &NewSchedule) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO schedules (course_id, day_of_week, start_time, end_time, room)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                schedule.course_id,
                schedule.day_of_week,
                schedule.start_time,
                schedule.end_time,
                schedule.room
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新时段，返回是否命中记录
    pub fn update(&self, id: i64, schedule: &ScheduleUpdate) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE schedules SET course_id = ?1, day_of_week = ?2, start_time = ?3,
             end_time = ?4, room = ?5, active = ?6 WHERE id = ?7",
            params![
                schedule.course_id,
                schedule.day_of_week,
                schedule.start_time,
                schedule.end_time,
                schedule.room,
                schedule.active as i64,
                id
            ],
        )?;
        Ok(changed > 0)
    }

    /// 停用时段（软删除），返回是否命中记录
    pub fn deactivate(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute("UPDATE schedules SET active = 0 WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ==========================================
    // 调课引擎只读视图
    // ==========================================
    // 同一次引擎调用内的多个查询共用本连接、顺序执行，
    // 但未包在显式事务里：容量与冲突两次读取之间存在
    // 极窄的并发写入窗口（已知弱一致，不在仓储层掩盖）

    /// 按主键查询时段负载视图（时段 + 课程容量 + 在读报名数）
    pub fn get_slot_with_load(&self, schedule_id: i64) -> RepositoryResult<Option<SlotWithLoad>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time,
                   s.room, s.active, c.name AS course_name, c.max_students,
                   COUNT(e.id) AS enrolled_count
            FROM schedules s
            JOIN courses c ON s.course_id = c.id
            LEFT JOIN enrollments e ON s.id = e.schedule_id AND e.status = 'active'
            WHERE s.id = ?1
            GROUP BY s.id
            "#,
        )?;
        let result = stmt.query_row(params![schedule_id], Self::map_load_row);
        match result {
            Ok(slot) => Ok(Some(slot)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询课程的全部有效时段负载视图，可排除指定时段
    pub fn list_active_slots_with_load(
        &self,
        course_id: i64,
        excluding: Option<i64>,
    ) -> RepositoryResult<Vec<SlotWithLoad>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time,
                   s.room, s.active, c.name AS course_name, c.max_students,
                   COUNT(e.id) AS enrolled_count
            FROM schedules s
            JOIN courses c ON s.course_id = c.id
            LEFT JOIN enrollments e ON s.id = e.schedule_id AND e.status = 'active'
            WHERE s.course_id = ?1 AND s.active = 1
              AND (?2 IS NULL OR s.id != ?2)
            GROUP BY s.id
            ORDER BY s.day_of_week, s.start_time
            "#,
        )?;
        let slots = stmt
            .query_map(params![course_id, excluding], Self::map_load_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(slots)
    }

    /// 查询学员当前全部在读时段（每周课表模式）
    pub fn list_enrolled_slots(&self, student_id: i64) -> RepositoryResult<Vec<WeeklySlot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time,
                   s.room, s.active, s.created_at
            FROM enrollments e
            JOIN schedules s ON e.schedule_id = s.id
            WHERE e.student_id = ?1 AND e.status = 'active'
            ORDER BY s.day_of_week, s.start_time
            "#,
        )?;
        let slots = stmt
            .query_map(params![student_id], Self::map_slot_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(slots)
    }
}
