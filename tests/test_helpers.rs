// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、CSV 临时文件、参与者数据与故障仓储
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use camp_participant_import::db::{init_schema, open_sqlite_connection};
use camp_participant_import::domain::{Participant, ParticipantStatus};
use camp_participant_import::repository::{
    InMemoryParticipantRepository, ParticipantRepository, RepositoryError, RepositoryResult,
};
use chrono::Utc;
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{Builder, NamedTempFile};
use uuid::Uuid;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not valid UTF-8")?
        .to_string();

    let conn = open_test_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入临时 CSV 文件
pub fn write_csv(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// 生成 N 行合法 CSV（模板表头）
pub fn generate_csv(rows: usize) -> String {
    let mut lines = vec!["First Name,Last Name,Email,Phone,Date of Birth".to_string()];
    for i in 0..rows {
        lines.push(format!(
            "Camper{i},Test,camper{i}@camp.org,(555) 000-{:04},2012-0{}-1{}",
            i,
            (i % 9) + 1,
            i % 10
        ));
    }
    lines.join("\n")
}

/// 构造参与者
pub fn participant(index: usize, registration_id: &str) -> Participant {
    let now = Utc::now();
    Participant {
        id: Uuid::new_v4(),
        user_id: "current_user".to_string(),
        registration_id: registration_id.to_string(),
        first_name: format!("Camper{}", index),
        last_name: "Test".to_string(),
        email: format!("camper{}@camp.org", index),
        phone: None,
        date_of_birth: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
        medical_conditions: None,
        dietary_restrictions: None,
        registration_date: now,
        status: ParticipantStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

pub fn participants(n: usize, registration_id: &str) -> Vec<Participant> {
    (0..n).map(|i| participant(i, registration_id)).collect()
}

// ==========================================
// FailingRepository - 指定批次失败的仓储
// ==========================================
// 成功批次写入内部 InMemoryParticipantRepository
pub struct FailingRepository {
    fail_on_calls: Vec<usize>,
    calls: Mutex<usize>,
    pub inner: InMemoryParticipantRepository,
}

impl FailingRepository {
    /// fail_on_calls: 失败的调用序号（从 0 开始）
    pub fn new(fail_on_calls: Vec<usize>) -> Self {
        Self {
            fail_on_calls,
            calls: Mutex::new(0),
            inner: InMemoryParticipantRepository::new(),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ParticipantRepository for FailingRepository {
    async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let current = *calls;
            *calls += 1;
            current
        };

        if self.fail_on_calls.contains(&call) {
            return Err(RepositoryError::StorageRejected(format!(
                "simulated failure on batch {}",
                call
            )));
        }
        self.inner.create_many(batch).await
    }
}
