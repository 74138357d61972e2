// ==========================================
// 教培机构管理系统 - 缴费仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::payment::{NewPayment, Payment, PaymentSummary};
use crate::domain::types::{PaymentMethod, PaymentStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult, Row, ToSql};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// PaymentDetail - 缴费行（带学员/课程信息）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDateTime>,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub student_name: String,
    pub course_name: Option<String>,
}

/// 缴费列表筛选条件
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub student_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ==========================================
// PaymentRepository - 缴费仓储
// ==========================================
pub struct PaymentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PaymentRepository {
    /// 创建新的 PaymentRepository 实例
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

    fn map_detail_row(row: &Row<'_>) -> SqliteResult<PaymentDetail> {
        Ok(PaymentDetail {
            id: row.get(0)?,
            student_id: row.get(1)?,
            enrollment_id: row.get(2)?,
            amount: row.get(3)?,
            payment_method: row
                .get::<_, Option<String>>(4)?
                .map(|s| PaymentMethod::from_str(&s)),
            payment_date: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
            status: PaymentStatus::from_str(&row.get::<_, String>(6)?),
            description: row.get(7)?,
            student_name: row.get(8)?,
            course_name: row.get(9)?,
        })
    }

    const DETAIL_SELECT: &'static str = r#"
        SELECT p.id, p.student_id, p.enrollment_id, p.amount, p.payment_method,
               p.payment_date, p.status, p.description,
               st.name AS student_name, c.name AS course_name
        FROM payments p
        JOIN students st ON p.student_id = st.id
        LEFT JOIN enrollments e ON p.enrollment_id = e.id
        LEFT JOIN schedules sc ON e.schedule_id = sc.id
        LEFT JOIN courses c ON sc.course_id = c.id
    "#;

    /// 按条件查询缴费记录（缴费时间倒序）
    pub fn list(&self, filter: &PaymentFilter) -> RepositoryResult<Vec<PaymentDetail>> {
        let conn = self.get_conn()?;
        let mut sql = format!("{} WHERE 1=1", Self::DETAIL_SELECT);
        let mut binds: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(student_id) = filter.student_id {
            sql.push_str(&format!(" AND p.student_id = ?{}", binds.len() + 1));
            binds.push(Box::new(student_id));
        }
        if let Some(start_date) = filter.start_date {
            sql.push_str(&format!(" AND DATE(p.payment_date) >= ?{}", binds.len() + 1));
            binds.push(Box::new(start_date.to_string()));
        }
        if let Some(end_date) = filter.end_date {
            sql.push_str(&format!(" AND DATE(p.payment_date) <= ?{}", binds.len() + 1));
            binds.push(Box::new(end_date.to_string()));
        }
        sql.push_str(" ORDER BY p.payment_date DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = binds.iter().map(|b| b.as_ref()).collect();
        let payments = stmt
            .query_map(params_ref.as_slice(), Self::map_detail_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(payments)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PaymentDetail>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE p.id = ?1", Self::DETAIL_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let result = stmt.query_row(params![id], Self::map_detail_row);
        match result {
            Ok(payment) => Ok(Some(payment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建缴费（入账即 completed），返回主键
    pub fn create(&self, payment: &NewPayment) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO payments (student_id, enrollment_id, amount, payment_method, description, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payment.student_id,
                payment.enrollment_id,
                payment.amount,
                payment.payment_method.map(|m| m.to_db_str()),
                payment.description,
                PaymentStatus::Completed.to_db_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新缴费状态与备注，返回是否命中记录
    pub fn update_status(
        &self,
        id: i64,
        status: PaymentStatus,
        description: Option<&str>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE payments SET status = ?1, description = ?2 WHERE id = ?3",
            params![status.to_db_str(), description, id],
        )?;
        Ok(changed > 0)
    }

    /// 营收汇总（可选日期区间）
    pub fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> RepositoryResult<PaymentSummary> {
        let conn = self.get_conn()?;
        let mut sql = String::from(
            r#"
            SELECT
                COUNT(*) AS total_payments,
                COALESCE(SUM(CASE WHEN status = 'completed' THEN amount ELSE 0 END), 0) AS total_revenue,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0) AS pending_amount,
                COALESCE(SUM(CASE WHEN status = 'refunded' THEN amount ELSE 0 END), 0) AS refunded_amount
            FROM payments
            WHERE 1=1
            "#,
        );
        let mut binds: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(start_date) = start_date {
            sql.push_str(&format!(" AND DATE(payment_date) >= ?{}", binds.len() + 1));
            binds.push(Box::new(start_date.to_string()));
        }
        if let Some(end_date) = end_date {
            sql.push_str(&format!(" AND DATE(payment_date) <= ?{}", binds.len() + 1));
            binds.push(Box::new(end_date.to_string()));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = binds.iter().map(|b| b.as_ref()).collect();
        let summary = stmt.query_row(params_ref.as_slice(), |row| {
            Ok(PaymentSummary {
                total_payments: row.get(0)?,
                total_revenue: row.get(1)?,
                pending_amount: row.get(2)?,
                refunded_amount: row.get(3)?,
            })
        })?;
        Ok(summary)
    }
}
