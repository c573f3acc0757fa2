// ==========================================
// 营地报名管理后台 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供参与者持久化接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod memory_repo;
pub mod participant_repo;
pub mod participant_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use memory_repo::{FnParticipantRepository, InMemoryParticipantRepository};
pub use participant_repo::ParticipantRepository;
pub use participant_repo_impl::ParticipantRepositoryImpl;
