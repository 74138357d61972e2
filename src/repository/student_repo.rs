// ==========================================
// 教培机构管理系统 - 学员仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::student::{NewStudent, Student};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// AttendanceStat - 学员出勤统计行
// ==========================================
/// 单个在读报名的出勤统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStat {
    pub enrollment_id: i64,
    pub course_name: String,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    /// 实到课次（status = present）
    pub attended_sessions: i32,
    /// 应到课次（total - remaining）
    pub expected_sessions: i32,
}

// ==========================================
// StudentRepository - 学员仓储
// ==========================================
pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    /// 创建新的 StudentRepository 实例
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

    fn map_row(row: &Row<'_>) -> SqliteResult<Student> {
        Ok(Student {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            parent_phone: row.get(4)?,
            created_at: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
        })
    }

    /// 查询全部学员（新建在前）
    pub fn list(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, email, parent_phone, created_at
             FROM students
             ORDER BY created_at DESC",
        )?;
        let students = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, email, parent_phone, created_at
             FROM students
             WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], Self::map_row);
        match result {
            Ok(student) => Ok(Some(student)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建学员，返回主键
    pub fn create(&self, student: &NewStudent) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO students (name, phone, email, parent_phone) VALUES (?1, ?2, ?3, ?4)",
            params![
                student.name,
                student.phone,
                student.email,
                student.parent_phone
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新学员，返回是否命中记录
    pub fn update(&self, id: i64, student: &NewStudent) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE students SET name = ?1, phone = ?2, email = ?3, parent_phone = ?4 WHERE id = ?5",
            params![
                student.name,
                student.phone,
                student.email,
                student.parent_phone,
                id
            ],
        )?;
        Ok(changed > 0)
    }

    /// 删除学员，返回是否命中记录
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// 学员各在读报名的出勤统计
    pub fn attendance_stats(&self, student_id: i64) -> RepositoryResult<Vec<AttendanceStat>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                e.id AS enrollment_id,
                c.name AS course_name,
                e.total_sessions,
                e.remaining_sessions,
                COUNT(CASE WHEN a.status = 'present' THEN 1 END) AS attended_sessions,
                e.total_sessions - e.remaining_sessions AS expected_sessions
            FROM enrollments e
            JOIN schedules s ON e.schedule_id = s.id
            JOIN courses c ON s.course_id = c.id
            LEFT JOIN attendance a ON a.enrollment_id = e.id
            WHERE e.student_id = ?1 AND e.status = 'active'
            GROUP BY e.id
            "#,
        )?;
        let stats = stmt
            .query_map(params![student_id], |row| {
                Ok(AttendanceStat {
                    enrollment_id: row.get(0)?,
                    course_name: row.get(1)?,
                    total_sessions: row.get(2)?,
                    remaining_sessions: row.get(3)?,
                    attended_sessions: row.get(4)?,
                    expected_sessions: row.get(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(stats)
    }
}
