// ==========================================
// 教培机构管理系统 - 报名仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::enrollment::{Enrollment, EnrollmentUpdate, NewEnrollment};
use crate::domain::types::EnrollmentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// EnrollmentDetail - 报名行（带学员/课程/时段信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDetail {
    pub id: i64,
    pub student_id: i64,
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub status: EnrollmentStatus,
    pub created_at: Option<NaiveDateTime>,
    pub student_name: String,
    pub course_name: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

// ==========================================
// EnrollmentRepository - 报名仓储
// ==========================================
pub struct EnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EnrollmentRepository {
    /// 创建新的 EnrollmentRepository 实例
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

    fn map_detail_row(row: &Row<'_>) -> SqliteResult<EnrollmentDetail> {
        Ok(EnrollmentDetail {
            id: row.get(0)?,
            student_id: row.get(1)?,
            schedule_id: row.get(2)?,
            start_date: NaiveDate::parse_from_str(&row.get::<_, String>(3)?, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            end_date: row
                .get::<_, Option<String>>(4)?
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            total_sessions: row.get(5)?,
            remaining_sessions: row.get(6)?,
            status: EnrollmentStatus::from_str(&row.get::<_, String>(7)?),
            created_at: row
                .get::<_, Option<String>>(8)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
            student_name: row.get(9)?,
            course_name: row.get(10)?,
            day_of_week: row.get(11)?,
            start_time: row.get(12)?,
            end_time: row.get(13)?,
        })
    }

    const DETAIL_SELECT: &'static str = r#"
        SELECT e.id, e.student_id, e.schedule_id, e.start_date, e.end_date,
               e.total_sessions, e.remaining_sessions, e.status, e.created_at,
               st.name AS student_name, c.name AS course_name,
               sc.day_of_week, sc.start_time, sc.end_time
        FROM enrollments e
        JOIN students st ON e.student_id = st.id
        JOIN schedules sc ON e.schedule_id = sc.id
        JOIN courses c ON sc.course_id = c.id
    "#;

    /// 查询全部报名（新建在前）
    pub fn list(&self) -> RepositoryResult<Vec<EnrollmentDetail>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY e.created_at DESC", Self::DETAIL_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let enrollments = stmt
            .query_map([], Self::map_detail_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(enrollments)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<EnrollmentDetail>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE e.id = ?1", Self::DETAIL_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let result = stmt.query_row(params![id], Self::map_detail_row);
        match result {
            Ok(enrollment) => Ok(Some(enrollment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建报名（remaining_sessions 初始化为 total_sessions），返回主键
    pub fn create(&self, enrollment: &NewEnrollment) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO enrollments
             (student_id, schedule_id, start_date, end_date, total_sessions, remaining_sessions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                enrollment.student_id,
                enrollment.schedule_id,
                enrollment.start_date.to_string(),
                enrollment.end_date.map(|d| d.to_string()),
                enrollment.total_sessions,
                enrollment.total_sessions,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新报名，返回是否命中记录
    pub fn update(&self, id: i64, update: &EnrollmentUpdate) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE enrollments SET schedule_id = ?1, start_date = ?2, end_date = ?3,
             total_sessions = ?4, remaining_sessions = ?5, status = ?6 WHERE id = ?7",
            params![
                update.schedule_id,
                update.start_date.to_string(),
                update.end_date.map(|d| d.to_string()),
                update.total_sessions,
                update.remaining_sessions,
                update.status.to_db_str(),
                id
            ],
        )?;
        Ok(changed > 0)
    }

    /// 退课（status → cancelled），返回是否命中记录
    pub fn cancel(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE enrollments SET status = ?1 WHERE id = ?2",
            params![EnrollmentStatus::Cancelled.to_db_str(), id],
        )?;
        Ok(changed > 0)
    }

    /// 调课审批生效：把学员的在读报名迁到新时段
    ///
    /// 单条 UPDATE，按 (student_id, 旧 schedule_id, status='active') 定位，
    /// 并发下报名已被移动/退课时命中 0 行，不会二次迁移
    pub fn move_schedule(
        &self,
        student_id: i64,
        from_schedule_id: i64,
        to_schedule_id: i64,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE enrollments SET schedule_id = ?1
             WHERE student_id = ?2 AND schedule_id = ?3 AND status = 'active'",
            params![to_schedule_id, student_id, from_schedule_id],
        )?;
        Ok(changed)
    }

    /// 离场后扣减剩余课次
    pub fn decrement_remaining_sessions(&self, enrollment_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE enrollments SET remaining_sessions = remaining_sessions - 1 WHERE id = ?1",
            params![enrollment_id],
        )?;
        Ok(changed > 0)
    }
}
