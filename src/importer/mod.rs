// ==========================================
// 营地报名管理后台 - 导入层
// ==========================================
// 职责: 参与者批量导入（CSV → 映射 → 校验预览 → 分批提交）
// 支持: CSV
// ==========================================

// 模块声明
pub mod batch_committer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_pipeline_trait;
pub mod import_session;
pub mod row_validator;
pub mod target_schema;
pub mod template;

// 重导出核心类型
pub use batch_committer::BatchCommitter;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{missing_required, FieldMapper as FieldMapperImpl};
pub use file_parser::CsvParser;
pub use import_session::ImportSession;
pub use row_validator::{is_valid_email, parse_calendar_date, RowValidator as RowValidatorImpl};
pub use target_schema::{required_fields, spec_for, synonyms, TARGET_SCHEMA};
pub use template::{participant_template_csv, write_template, TEMPLATE_FILE_NAME};

// 重导出 Trait 接口
pub use import_pipeline_trait::{FieldMapper, FileParser, RowValidator};
