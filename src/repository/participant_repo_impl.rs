// ==========================================
// 营地报名管理后台 - 参与者 Repository 实现
// ==========================================
// 职责: 实现参与者数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::participant::Participant;
use crate::domain::types::ParticipantStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::participant_repo::ParticipantRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    participant_id, user_id, registration_id, first_name, last_name, email,
    phone, date_of_birth, emergency_contact_name, emergency_contact_phone,
    medical_conditions, dietary_restrictions, registration_date, status,
    created_at, updated_at
"#;

// ==========================================
// ParticipantRepositoryImpl
// ==========================================
pub struct ParticipantRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ParticipantRepositoryImpl {
    /// 创建新的 Repository 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共用连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = lock(&conn)?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 在事务中批量插入（普通 INSERT，主键冲突即整批失败）
    fn insert_batch_tx(tx: &Transaction, batch: &[Participant]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO participant (
                participant_id, user_id, registration_id, first_name, last_name, email,
                phone, date_of_birth, emergency_contact_name, emergency_contact_phone,
                medical_conditions, dietary_restrictions, registration_date, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )?;

        let mut count = 0;
        for p in batch {
            count += stmt.execute(params![
                p.id.to_string(),
                p.user_id,
                p.registration_id,
                p.first_name,
                p.last_name,
                p.email,
                p.phone,
                p.date_of_birth,
                p.emergency_contact_name,
                p.emergency_contact_phone,
                p.medical_conditions,
                p.dietary_restrictions,
                p.registration_date,
                p.status.as_str(),
                p.created_at,
                p.updated_at,
            ])?;
        }

        Ok(count)
    }

    /// 按报名批次查询参与者（按 last_name, first_name 排序）
    pub fn list_by_registration(&self, registration_id: &str) -> RepositoryResult<Vec<Participant>> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "SELECT {} FROM participant WHERE registration_id = ?1 ORDER BY last_name, first_name",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![registration_id], map_participant_row)?;
        let participants = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(participants)
    }

    /// 参与者总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM participant", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl ParticipantRepository for ParticipantRepositoryImpl {
    async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize> {
        let conn = lock(&self.conn)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::insert_batch_tx(&tx, batch)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

fn map_participant_row(row: &Row) -> rusqlite::Result<Participant> {
    let id_raw: String = row.get(0)?;
    let id = Uuid::parse_str(&id_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let status_raw: String = row.get(13)?;
    let status = ParticipantStatus::parse(&status_raw)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(13, "status".to_string(), Type::Text))?;

    Ok(Participant {
        id,
        user_id: row.get(1)?,
        registration_id: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        date_of_birth: row.get::<_, Option<NaiveDate>>(7)?,
        emergency_contact_name: row.get(8)?,
        emergency_contact_phone: row.get(9)?,
        medical_conditions: row.get(10)?,
        dietary_restrictions: row.get(11)?,
        registration_date: row.get::<_, DateTime<Utc>>(12)?,
        status,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}
