// ==========================================
// 营地报名管理后台 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级错误/警告不走此类型，统一汇总进 ImportPreview
// ==========================================

use crate::domain::types::ImportStage;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（解析致命）=====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .csv is supported)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to write file: {0}")]
    FileWriteError(String),

    #[error("Failed to parse CSV: {0}")]
    CsvParseError(String),

    #[error("CSV file is empty")]
    EmptyInput,

    // ===== 会话流转错误 =====
    #[error("Invalid import stage transition: from={from} to={to}")]
    InvalidStageTransition { from: ImportStage, to: ImportStage },

    #[error("Required fields are not mapped: {fields}")]
    RequiredFieldsUnmapped { fields: String },

    #[error("No valid records to import")]
    NothingToImport,

    // ===== 配置错误 =====
    #[error("Failed to read config (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("Invalid config value (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transition_message() {
        let err = ImportError::InvalidStageTransition {
            from: ImportStage::Upload,
            to: ImportStage::Preview,
        };
        assert_eq!(
            err.to_string(),
            "Invalid import stage transition: from=upload to=preview"
        );
    }

    #[test]
    fn test_io_error_maps_to_file_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        assert!(matches!(ImportError::from(io), ImportError::FileReadError(_)));
    }
}
