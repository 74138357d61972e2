// ==========================================
// 教培机构管理系统 - 调课申请仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::change_request::{NewChangeRequest, ScheduleChangeRequest};
use crate::domain::types::ChangeRequestStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row, ToSql};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// ChangeRequestDetail - 调课申请行（带两侧时段信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequestDetail {
    pub id: i64,
    pub student_id: i64,
    pub current_schedule_id: i64,
    pub requested_schedule_id: i64,
    pub reason: Option<String>,
    pub status: ChangeRequestStatus,
    pub admin_notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub processed_at: Option<NaiveDateTime>,
    pub student_name: String,
    pub current_course_name: String,
    pub requested_course_name: String,
    pub current_day: u8,
    pub current_start_time: String,
    pub current_end_time: String,
    pub requested_day: u8,
    pub requested_start_time: String,
    pub requested_end_time: String,
}

/// 调课申请列表筛选条件
#[derive(Debug, Clone, Default)]
pub struct ChangeRequestFilter {
    pub status: Option<ChangeRequestStatus>,
    pub student_id: Option<i64>,
}

// ==========================================
// ChangeRequestRepository - 调课申请仓储
// ==========================================
pub struct ChangeRequestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ChangeRequestRepository {
    /// 创建新的 ChangeRequestRepository 实例
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

    fn parse_datetime(value: Option<String>) -> Option<NaiveDateTime> {
        value.and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok())
    }

    fn map_request_row(row: &Row<'_>) -> SqliteResult<ScheduleChangeRequest> {
        Ok(ScheduleChangeRequest {
            id: row.get(0)?,
            student_id: row.get(1)?,
            current_schedule_id: row.get(2)?,
            requested_schedule_id: row.get(3)?,
            reason: row.get(4)?,
            status: ChangeRequestStatus::from_str(&row.get::<_, String>(5)?),
            admin_notes: row.get(6)?,
            created_at: Self::parse_datetime(row.get(7)?),
            processed_at: Self::parse_datetime(row.get(8)?),
        })
    }

    /// 按条件查询调课申请（新建在前）
    pub fn list(&self, filter: &ChangeRequestFilter) -> RepositoryResult<Vec<ChangeRequestDetail>> {
        let conn = self.get_conn()?;
        let mut sql = String::from(
            r#"
            SELECT scr.id, scr.student_id, scr.current_schedule_id, scr.requested_schedule_id,
                   scr.reason, scr.status, scr.admin_notes, scr.created_at, scr.processed_at,
                   st.name AS student_name,
                   c1.name AS current_course_name,
                   c2.name AS requested_course_name,
                   cs1.day_of_week AS current_day,
                   cs1.start_time AS current_start_time,
                   cs1.end_time AS current_end_time,
                   cs2.day_of_week AS requested_day,
                   cs2.start_time AS requested_start_time,
                   cs2.end_time AS requested_end_time
            FROM schedule_change_requests scr
            JOIN students st ON scr.student_id = st.id
            JOIN schedules cs1 ON scr.current_schedule_id = cs1.id
            JOIN schedules cs2 ON scr.requested_schedule_id = cs2.id
            JOIN courses c1 ON cs1.course_id = c1.id
            JOIN courses c2 ON cs2.course_id = c2.id
            WHERE 1=1
            "#,
        );
        let mut binds: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND scr.status = ?{}", binds.len() + 1));
            binds.push(Box::new(status.to_db_str()));
        }
        if let Some(student_id) = filter.student_id {
            sql.push_str(&format!(" AND scr.student_id = ?{}", binds.len() + 1));
            binds.push(Box::new(student_id));
        }
        sql.push_str(" ORDER BY scr.created_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = binds.iter().map(|b| b.as_ref()).collect();
        let requests = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok(ChangeRequestDetail {
                    id: row.get(0)?,
                    student_id: row.get(1)?,
                    current_schedule_id: row.get(2)?,
                    requested_schedule_id: row.get(3)?,
                    reason: row.get(4)?,
                    status: ChangeRequestStatus::from_str(&row.get::<_, String>(5)?),
                    admin_notes: row.get(6)?,
                    created_at: Self::parse_datetime(row.get(7)?),
                    processed_at: Self::parse_datetime(row.get(8)?),
                    student_name: row.get(9)?,
                    current_course_name: row.get(10)?,
                    requested_course_name: row.get(11)?,
                    current_day: row.get(12)?,
                    current_start_time: row.get(13)?,
                    current_end_time: row.get(14)?,
                    requested_day: row.get(15)?,
                    requested_start_time: row.get(16)?,
                    requested_end_time: row.get(17)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(requests)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleChangeRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, student_id, current_schedule_id, requested_schedule_id,
                   reason, status, admin_notes, created_at, processed_at
            FROM schedule_change_requests
            WHERE id = ?1
            "#,
        )?;
        let result = stmt.query_row(params![id], Self::map_request_row);
        match result {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建调课申请（初始 pending），返回主键
    pub fn create(&self, request: &NewChangeRequest) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO schedule_change_requests
             (student_id, current_schedule_id, requested_schedule_id, reason, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.student_id,
                request.current_schedule_id,
                request.requested_schedule_id,
                request.reason,
                ChangeRequestStatus::Pending.to_db_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 审批落库：写状态、备注与处理时间，返回是否命中记录
    pub fn process(
        &self,
        id: i64,
        status: ChangeRequestStatus,
        admin_notes: Option<&str>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE schedule_change_requests
             SET status = ?1, admin_notes = ?2, processed_at = CURRENT_TIMESTAMP
             WHERE id = ?3",
            params![status.to_db_str(), admin_notes, id],
        )?;
        Ok(changed > 0)
    }
}
