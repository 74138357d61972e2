// ==========================================
// 教培机构管理系统 - 考勤仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::attendance::AttendanceRecord;
use crate::domain::types::AttendanceStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult, Row, ToSql};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// AttendanceDetail - 考勤行（带学员/课程信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceDetail {
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub check_in_time: String,
    pub check_out_time: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub student_name: String,
    pub course_name: String,
}

/// 考勤列表筛选条件
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub student_id: Option<i64>,
}

// ==========================================
// AttendanceRepository - 考勤仓储
// ==========================================
pub struct AttendanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AttendanceRepository {
    /// 创建新的 AttendanceRepository 实例
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

    fn map_record_row(row: &Row<'_>) -> SqliteResult<AttendanceRecord> {
        Ok(AttendanceRecord {
            id: row.get(0)?,
            student_id: row.get(1)?,
            enrollment_id: row.get(2)?,
            check_in_time: row.get(3)?,
            check_out_time: row.get(4)?,
            date: NaiveDate::parse_from_str(&row.get::<_, String>(5)?, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            status: AttendanceStatus::from_str(&row.get::<_, String>(6)?),
            created_at: row
                .get::<_, Option<String>>(7)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
        })
    }

    /// 按条件查询考勤记录（入场时间倒序）
    pub fn list(&self, filter: &AttendanceFilter) -> RepositoryResult<Vec<AttendanceDetail>> {
        let conn = self.get_conn()?;
        let mut sql = String::from(
            r#"
            SELECT a.id, a.student_id, a.enrollment_id, a.check_in_time, a.check_out_time,
                   a.date, a.status, st.name AS student_name, c.name AS course_name
            FROM attendance a
            JOIN students st ON a.student_id = st.id
            JOIN enrollments e ON a.enrollment_id = e.id
            JOIN schedules sc ON e.schedule_id = sc.id
            JOIN courses c ON sc.course_id = c.id
            WHERE 1=1
            "#,
        );
        let mut binds: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(date) = filter.date {
            sql.push_str(&format!(" AND a.date = ?{}", binds.len() + 1));
            binds.push(Box::new(date.to_string()));
        }
        if let Some(student_id) = filter.student_id {
            sql.push_str(&format!(" AND a.student_id = ?{}", binds.len() + 1));
            binds.push(Box::new(student_id));
        }
        sql.push_str(" ORDER BY a.check_in_time DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = binds.iter().map(|b| b.as_ref()).collect();
        let records = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok(AttendanceDetail {
                    id: row.get(0)?,
                    student_id: row.get(1)?,
                    enrollment_id: row.get(2)?,
                    check_in_time: row.get(3)?,
                    check_out_time: row.get(4)?,
                    date: NaiveDate::parse_from_str(&row.get::<_, String>(5)?, "%Y-%m-%d")
                        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
                    status: AttendanceStatus::from_str(&row.get::<_, String>(6)?),
                    student_name: row.get(7)?,
                    course_name: row.get(8)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 查询学员当天未离场的考勤记录
    pub fn find_open_check_in(
        &self,
        student_id: i64,
        date: NaiveDate,
    ) -> RepositoryResult<Option<AttendanceRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, student_id, enrollment_id, check_in_time, check_out_time,
                   date, status, created_at
            FROM attendance
            WHERE student_id = ?1 AND date = ?2 AND check_out_time IS NULL
            LIMIT 1
            "#,
        )?;
        let result = stmt.query_row(params![student_id, date.to_string()], Self::map_record_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 入场记录，返回主键
    pub fn check_in(
        &self,
        student_id: i64,
        enrollment_id: i64,
        check_in_time: &str,
        date: NaiveDate,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO attendance (student_id, enrollment_id, check_in_time, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![student_id, enrollment_id, check_in_time, date.to_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 离场：写入离场时间，返回是否命中记录
    pub fn check_out(&self, attendance_id: i64, check_out_time: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE attendance SET check_out_time = ?1 WHERE id = ?2 AND check_out_time IS NULL",
            params![check_out_time, attendance_id],
        )?;
        Ok(changed > 0)
    }
}
