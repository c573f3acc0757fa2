// ==========================================
// 营地报名管理后台 - 非 SQLite 仓储适配器
// ==========================================
// InMemoryParticipantRepository: 进程内存储（嵌入方/测试）
// FnParticipantRepository: 将外部异步回调适配为仓储
// ==========================================

use crate::domain::participant::Participant;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::participant_repo::ParticipantRepository;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

// ==========================================
// InMemoryParticipantRepository
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemoryParticipantRepository {
    records: Arc<Mutex<Vec<Participant>>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入记录快照（按写入顺序）
    pub fn list(&self) -> RepositoryResult<Vec<Participant>> {
        let records = self
            .records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(records.clone())
    }

    pub fn list_by_registration(&self, registration_id: &str) -> RepositoryResult<Vec<Participant>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.registration_id == registration_id)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        // 与 SQLite 主键语义一致: 任一 id 已存在则整批拒绝
        if let Some(dup) = batch
            .iter()
            .find(|p| records.iter().any(|existing| existing.id == p.id))
        {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "participant {} already exists",
                dup.id
            )));
        }

        records.extend_from_slice(batch);
        Ok(batch.len())
    }
}

// ==========================================
// FnParticipantRepository - 回调适配
// ==========================================
pub struct FnParticipantRepository<F>
where
    F: Fn(Vec<Participant>) -> BoxFuture<'static, RepositoryResult<()>> + Send + Sync,
{
    create_many: F,
}

impl<F> FnParticipantRepository<F>
where
    F: Fn(Vec<Participant>) -> BoxFuture<'static, RepositoryResult<()>> + Send + Sync,
{
    pub fn new(create_many: F) -> Self {
        Self { create_many }
    }
}

#[async_trait]
impl<F> ParticipantRepository for FnParticipantRepository<F>
where
    F: Fn(Vec<Participant>) -> BoxFuture<'static, RepositoryResult<()>> + Send + Sync,
{
    async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize> {
        (self.create_many)(batch.to_vec()).await?;
        Ok(batch.len())
    }
}
