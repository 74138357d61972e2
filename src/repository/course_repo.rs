// ==========================================
// 教培机构管理系统 - 课程仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::course::{Course, NewCourse, DEFAULT_DURATION_MINUTES, DEFAULT_MAX_STUDENTS};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// CourseDetail - 课程行（带教师姓名）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetail {
    pub id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub description: Option<String>,
    pub max_students: i32,
    pub duration_minutes: i32,
    pub created_at: Option<NaiveDateTime>,
    pub teacher_name: Option<String>,
}

// ==========================================
// CourseRepository - 课程仓储
// ==========================================
pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    /// 创建新的 CourseRepository 实例
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

    fn map_detail_row(row: &Row<'_>) -> SqliteResult<CourseDetail> {
        Ok(CourseDetail {
            id: row.get(0)?,
            name: row.get(1)?,
            teacher_id: row.get(2)?,
            description: row.get(3)?,
            max_students: row.get(4)?,
            duration_minutes: row.get(5)?,
            created_at: row
                .get::<_, Option<String>>(6)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
            teacher_name: row.get(7)?,
        })
    }

    /// 查询全部课程（新建在前，带教师姓名）
    pub fn list(&self) -> RepositoryResult<Vec<CourseDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.name, c.teacher_id, c.description, c.max_students,
                   c.duration_minutes, c.created_at, u.name AS teacher_name
            FROM courses c
            LEFT JOIN users u ON c.teacher_id = u.id
            ORDER BY c.created_at DESC
            "#,
        )?;
        let courses = stmt
            .query_map([], Self::map_detail_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(courses)
    }

    /// 按主键查询（带教师姓名）
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<CourseDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.name, c.teacher_id, c.description, c.max_students,
                   c.duration_minutes, c.created_at, u.name AS teacher_name
            FROM courses c
            LEFT JOIN users u ON c.teacher_id = u.id
            WHERE c.id = ?1
            "#,
        )?;
        let result = stmt.query_row(params![id], Self::map_detail_row);
        match result {
            Ok(course) => Ok(Some(course)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建课程，返回主键
    pub fn create(&self, course: &NewCourse) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO courses (name, teacher_id, description, max_students, duration_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                course.name,
                course.teacher_id,
                course.description,
                course.max_students.unwrap_or(DEFAULT_MAX_STUDENTS),
                course.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新课程，返回是否命中记录
    pub fn update(&self, id: i64, course: &Course) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE courses SET name = ?1, teacher_id = ?2, description = ?3,
             max_students = ?4, duration_minutes = ?5 WHERE id = ?6",
            params![
                course.name,
                course.teacher_id,
                course.description,
                course.max_students,
                course.duration_minutes,
                id
            ],
        )?;
        Ok(changed > 0)
    }

    /// 删除课程，返回是否命中记录
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM courses WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
