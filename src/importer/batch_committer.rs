// ==========================================
// 营地报名管理后台 - 批量提交器
// ==========================================
// 阶段 3: 将 valid 记录按固定大小分批写入仓储
// 规则:
//   - 批次严格串行，按 valid 原顺序
//   - 单批失败: 整批计入 failed，继续下一批（不重试、不拆分）
//   - 每批结束（无论成败）回调一次进度
//   - 批次之间等待 batch_delay（末批之后不等待）
// ==========================================

use crate::config::config_manager::config_keys;
use crate::config::import_config::ImportConfig;
use crate::domain::import::{BatchFailure, CommitProgress, CommitResult};
use crate::domain::participant::Participant;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::participant_repo::ParticipantRepository;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy)]
pub struct BatchCommitter {
    batch_size: usize,
    batch_delay: Duration,
}

impl BatchCommitter {
    /// 创建提交器
    ///
    /// # 参数
    /// - batch_size: 每批条数（必须 > 0）
    /// - batch_delay: 批次间隔
    pub fn new(batch_size: usize, batch_delay: Duration) -> ImportResult<Self> {
        if batch_size == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::IMPORT_BATCH_SIZE.to_string(),
                value: batch_size.to_string(),
                message: "batch size must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            batch_size,
            batch_delay,
        })
    }

    pub fn from_config(config: &ImportConfig) -> ImportResult<Self> {
        Self::new(config.batch_size, config.batch_delay())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 分批提交
    ///
    /// # 参数
    /// - records: 待写入记录（preview.valid）
    /// - repo: 持久化能力
    /// - on_progress: 每批结束后的进度回调
    ///
    /// # 返回
    /// - CommitResult: succeeded + failed == records.len()
    #[instrument(skip(self, records, repo, on_progress), fields(total = records.len()))]
    pub async fn commit<R, F>(
        &self,
        records: &[Participant],
        repo: &R,
        mut on_progress: F,
    ) -> CommitResult
    where
        R: ParticipantRepository + ?Sized,
        F: FnMut(CommitProgress),
    {
        let total = records.len();
        let mut result = CommitResult {
            progress: CommitProgress::new(0, total).percent,
            ..CommitResult::default()
        };

        if total == 0 {
            info!("无待提交记录");
            return result;
        }

        info!(batch_size = self.batch_size, "开始分批提交");

        let batch_count = total.div_ceil(self.batch_size);
        let mut processed = 0;

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            match repo.create_many(batch).await {
                Ok(_) => {
                    result.succeeded += batch.len();
                    debug!(batch_index, size = batch.len(), "批次写入成功");
                }
                Err(e) => {
                    result.failed += batch.len();
                    warn!(batch_index, size = batch.len(), error = %e, "批次写入失败，整批计入失败");
                    result.failed_batches.push(BatchFailure {
                        batch_index,
                        first_record_index: processed,
                        size: batch.len(),
                        message: e.to_string(),
                    });
                }
            }

            processed += batch.len();
            let progress = CommitProgress::new(processed, total);
            result.progress = progress.percent;
            on_progress(progress);

            if batch_index + 1 < batch_count && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            failed_batches = result.failed_batches.len(),
            "分批提交完成"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ParticipantStatus;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use crate::repository::memory_repo::InMemoryParticipantRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    // 按调用序号失败的仓储
    struct FailingBatchRepo {
        fail_on: Vec<usize>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ParticipantRepository for FailingBatchRepo {
        async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                let current = *calls;
                *calls += 1;
                current
            };
            if self.fail_on.contains(&call) {
                Err(RepositoryError::StorageRejected(format!("batch {} rejected", call)))
            } else {
                Ok(batch.len())
            }
        }
    }

    fn participants(n: usize) -> Vec<Participant> {
        let now = Utc::now();
        (0..n)
            .map(|i| Participant {
                id: Uuid::new_v4(),
                user_id: "current_user".to_string(),
                registration_id: "reg-1".to_string(),
                first_name: format!("Camper{}", i),
                last_name: "Test".to_string(),
                email: format!("camper{}@camp.org", i),
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
            })
            .collect()
    }

    #[tokio::test]
    async fn test_commit_partial_failure() {
        let committer = BatchCommitter::new(10, Duration::ZERO).unwrap();
        let repo = FailingBatchRepo {
            fail_on: vec![1],
            calls: Mutex::new(0),
        };
        let records = participants(25);
        let mut seen = Vec::new();

        let result = committer
            .commit(&records, &repo, |p| seen.push(p.percent))
            .await;

        assert_eq!(result.succeeded, 15);
        assert_eq!(result.failed, 10);
        assert_eq!(result.progress, 100.0);
        assert_eq!(seen, vec![40.0, 80.0, 100.0]);
        assert_eq!(result.failed_batches.len(), 1);
        assert_eq!(result.failed_batches[0].batch_index, 1);
        assert_eq!(result.failed_batches[0].first_record_index, 10);
        assert_eq!(result.failed_batches[0].size, 10);
    }

    #[tokio::test]
    async fn test_commit_all_succeed_in_order() {
        let committer = BatchCommitter::new(3, Duration::ZERO).unwrap();
        let repo = InMemoryParticipantRepository::new();
        let records = participants(7);
        let mut processed = Vec::new();

        let result = committer
            .commit(&records, &repo, |p| processed.push(p.processed))
            .await;

        assert!(result.is_full_success());
        assert_eq!(result.total(), 7);
        assert_eq!(processed, vec![3, 6, 7]);
        let stored: Vec<_> = repo.list().unwrap().into_iter().map(|p| p.email).collect();
        let expected: Vec<_> = records.iter().map(|p| p.email.clone()).collect();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_commit_empty_input() {
        let committer = BatchCommitter::new(10, Duration::ZERO).unwrap();
        let repo = FailingBatchRepo {
            fail_on: vec![0],
            calls: Mutex::new(0),
        };
        let mut callbacks = 0;

        let result = committer.commit(&[], &repo, |_| callbacks += 1).await;

        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(result.progress, 100.0);
        assert_eq!(callbacks, 0);
        assert_eq!(*repo.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_all_fail() {
        let committer = BatchCommitter::new(2, Duration::ZERO).unwrap();
        let repo = FailingBatchRepo {
            fail_on: vec![0, 1],
            calls: Mutex::new(0),
        };

        let result = committer.commit(&participants(4), &repo, |_| {}).await;
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed, 4);
        assert_eq!(result.failed_batches.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_delays_between_batches() {
        let committer = BatchCommitter::new(10, Duration::from_millis(30)).unwrap();
        let repo = InMemoryParticipantRepository::new();
        let started = std::time::Instant::now();

        committer.commit(&participants(25), &repo, |_| {}).await;

        // 3 批 → 2 次间隔
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(repo.len(), 25);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(matches!(
            BatchCommitter::new(0, Duration::ZERO),
            Err(ImportError::ConfigValueError { .. })
        ));
        let committer = BatchCommitter::from_config(&ImportConfig::default()).unwrap();
        assert_eq!(committer.batch_size(), 10);
    }
}
