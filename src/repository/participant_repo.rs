// ==========================================
// 营地报名管理后台 - 参与者 Repository Trait
// ==========================================
// 职责: 定义参与者持久化接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据写入/查询
// ==========================================

use crate::domain::participant::Participant;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ParticipantRepository Trait
// ==========================================
// 用途: 批量提交阶段的唯一持久化入口
// 实现者: ParticipantRepositoryImpl（rusqlite）
//         InMemoryParticipantRepository / FnParticipantRepository
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 批量创建参与者（单批次原子：全部成功或全部失败）
    ///
    /// # 参数
    /// - batch: 本批次记录（≤ batch_size）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    /// - Err: 本批次整体失败（由调用方计入 failed）
    async fn create_many(&self, batch: &[Participant]) -> RepositoryResult<usize>;
}
