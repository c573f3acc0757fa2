// ==========================================
// 营地报名管理后台 - 领域模型层
// ==========================================
// 职责: 定义参与者实体、导入管道数据模型、枚举类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod import;
pub mod participant;
pub mod types;

// 重导出核心类型
pub use import::{
    BatchFailure, ClassifiedRow, CommitProgress, CommitResult, FieldMapping, HeaderSet,
    ImportContext, ImportPreview, InvalidRow, IssueLevel, ParsedTable, PreviewSummary, RawRow,
    RowIssue, TargetFieldSpec, WarningRow,
};
pub use participant::Participant;
pub use types::{ImportStage, ParticipantStatus, TargetField, ValueKind};
