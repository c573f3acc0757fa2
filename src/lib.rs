// ==========================================
// 营地报名管理后台 - 参与者导入核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 报名批次的参与者批量导入（CSV → 校验预览 → 分批落库）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportStage, ParticipantStatus, TargetField, ValueKind};

// 领域实体
pub use domain::{
    CommitProgress, CommitResult, FieldMapping, ImportContext, ImportPreview, Participant,
    RowIssue,
};

// 导入
pub use importer::{BatchCommitter, ImportError, ImportResult, ImportSession};

// 仓储
pub use repository::{
    InMemoryParticipantRepository, ParticipantRepository, ParticipantRepositoryImpl,
    RepositoryError,
};

// 配置
pub use config::{ConfigManager, ImportConfig, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "营地报名管理后台 - 参与者导入";
