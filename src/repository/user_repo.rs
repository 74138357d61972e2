// ==========================================
// 教培机构管理系统 - 用户仓储
// ==========================================
// 仅作教师/管理员名录；口令散列由外部认证服务写入，
// 本仓储不做任何口令校验
// ==========================================

use crate::domain::types::UserRole;
use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// UserRepository - 用户仓储
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 创建新的 UserRepository 实例
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

    fn map_row(row: &Row<'_>) -> SqliteResult<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            name: row.get(2)?,
            role: UserRole::from_str(&row.get::<_, String>(3)?),
            created_at: row
                .get::<_, Option<String>>(4)?
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
        })
    }

    /// 查询全部用户
    pub fn list(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, name, role, created_at FROM users ORDER BY name",
        )?;
        let users = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(users)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare("SELECT id, username, name, role, created_at FROM users WHERE id = ?1")?;
        let result = stmt.query_row(params![id], Self::map_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 新建用户，返回主键
    ///
    /// # 参数
    /// - password_hash: 外部认证服务生成的口令散列，按原样落库
    pub fn create(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO users (username, password, name, role) VALUES (?1, ?2, ?3, ?4)",
            params![username, password_hash, name, role.to_db_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
