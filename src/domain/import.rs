// ==========================================
// 营地报名管理后台 - 导入领域模型
// ==========================================
// 依据: 参与者导入管道 - 数据模型
// 覆盖: RawRow / HeaderSet / TargetFieldSpec / FieldMapping /
//       ClassifiedRow / ImportPreview / CommitResult
// ==========================================

use crate::domain::participant::Participant;
use crate::domain::types::{TargetField, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// RawRow - 原始行记录
// ==========================================
// 用途: 解析器产出（表头 → 原始值），映射/校验阶段只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(HashMap<String, String>);

impl RawRow {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self(values)
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(String::as_str)
    }

    /// 取值，列不存在时视为空串
    pub fn value_or_empty(&self, header: &str) -> &str {
        self.get(header).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// 表头集合（有序、去重）
pub type HeaderSet = Vec<String>;

// ==========================================
// ParsedTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: HeaderSet,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }
}

// ==========================================
// TargetFieldSpec - 目标字段描述
// ==========================================
// 静态配置，不属于用户数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetFieldSpec {
    pub key: TargetField,
    pub label: &'static str,
    pub required: bool,
    pub kind: ValueKind,
}

// ==========================================
// FieldMapping - 字段映射
// ==========================================
// source_header = None 表示未映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub field: TargetField,
    pub source_header: Option<String>,
    pub required: bool,
}

impl FieldMapping {
    pub fn unmapped(field: TargetField, required: bool) -> Self {
        Self {
            field,
            source_header: None,
            required,
        }
    }

    /// 已映射且表头非空
    pub fn mapped_header(&self) -> Option<&str> {
        self.source_header
            .as_deref()
            .filter(|h| !h.trim().is_empty())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped_header().is_some()
    }
}

// ==========================================
// ImportContext - 导入上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportContext {
    pub registration_id: String,
    pub user_id: String,
}

impl ImportContext {
    pub const DEFAULT_USER_ID: &'static str = "current_user";

    pub fn new(registration_id: impl Into<String>) -> Self {
        Self {
            registration_id: registration_id.into(),
            user_id: Self::DEFAULT_USER_ID.to_string(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

// ==========================================
// RowIssue - 行级问题（阻断错误 / 提示警告）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,   // 阻断: 行不进入提交
    Warning, // 提示: 行仍进入提交
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    pub field: TargetField,
    pub level: IssueLevel,
    pub message: String,
}

impl RowIssue {
    pub fn required_missing(field: TargetField) -> Self {
        Self {
            field,
            level: IssueLevel::Error,
            message: format!("{} is required", field),
        }
    }

    pub fn required_unmapped(field: TargetField) -> Self {
        Self {
            field,
            level: IssueLevel::Error,
            message: format!("{} is required but no column is mapped", field),
        }
    }

    pub fn invalid_email(field: TargetField, value: &str) -> Self {
        Self {
            field,
            level: IssueLevel::Error,
            message: format!("Invalid email format: {}", value),
        }
    }

    pub fn invalid_date(field: TargetField, value: &str) -> Self {
        Self {
            field,
            level: IssueLevel::Warning,
            message: format!("Invalid date format for {}: {}", field, value),
        }
    }

    pub fn duplicate_email(field: TargetField, email: &str) -> Self {
        Self {
            field,
            level: IssueLevel::Warning,
            message: format!("Duplicate email found in import: {}", email),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ==========================================
// ClassifiedRow - 单行校验结果
// ==========================================
// row_number: 1-based 源文件行号（表头为第 1 行）
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRow {
    Valid {
        row_number: usize,
        data: RawRow,
        participant: Participant,
        warnings: Vec<RowIssue>,
    },
    Invalid {
        row_number: usize,
        data: RawRow,
        errors: Vec<RowIssue>,
    },
}

impl ClassifiedRow {
    pub fn row_number(&self) -> usize {
        match self {
            ClassifiedRow::Valid { row_number, .. } | ClassifiedRow::Invalid { row_number, .. } => {
                *row_number
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ClassifiedRow::Valid { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRow {
    pub row_number: usize,
    pub data: RawRow,
    pub errors: Vec<RowIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningRow {
    pub row_number: usize,
    pub data: RawRow,
    pub warnings: Vec<RowIssue>,
}

// ==========================================
// ImportPreview - 导入预览
// ==========================================
// 红线: 每行只落入 valid / invalid 之一
//       warnings 仅是 valid 上的附加标注
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub valid: Vec<Participant>,
    pub invalid: Vec<InvalidRow>,
    pub warnings: Vec<WarningRow>,
}

impl ImportPreview {
    /// 归入一行校验结果（fold 的单步）
    pub fn push(&mut self, row: ClassifiedRow) {
        match row {
            ClassifiedRow::Valid {
                row_number,
                data,
                participant,
                warnings,
            } => {
                if !warnings.is_empty() {
                    self.warnings.push(WarningRow {
                        row_number,
                        data,
                        warnings,
                    });
                }
                self.valid.push(participant);
            }
            ClassifiedRow::Invalid {
                row_number,
                data,
                errors,
            } => {
                self.invalid.push(InvalidRow {
                    row_number,
                    data,
                    errors,
                });
            }
        }
    }

    pub fn total_rows(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn has_valid(&self) -> bool {
        !self.valid.is_empty()
    }

    pub fn summary(&self) -> PreviewSummary {
        PreviewSummary {
            total_rows: self.total_rows(),
            valid: self.valid.len(),
            invalid: self.invalid.len(),
            warning: self.warnings.len(),
        }
    }
}

/// 预览汇总统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSummary {
    pub total_rows: usize,
    pub valid: usize,
    pub invalid: usize,
    pub warning: usize,
}

// ==========================================
// 提交阶段: 进度 / 批次失败 / 结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitProgress {
    pub processed: usize,
    pub total: usize,
    pub percent: f64,
}

impl CommitProgress {
    pub fn new(processed: usize, total: usize) -> Self {
        // 先乘后除，保证整除场景下无浮点误差（末批恰为 100）
        let percent = if total == 0 {
            100.0
        } else {
            (processed as f64 * 100.0) / total as f64
        };
        Self {
            processed,
            total,
            percent,
        }
    }
}

/// 被吞掉的批次失败（仅记录，不重试）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub batch_index: usize,
    pub first_record_index: usize,
    pub size: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub succeeded: usize,
    pub failed: usize,
    pub progress: f64,
    pub failed_batches: Vec<BatchFailure>,
}

impl CommitResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_full_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_issue_messages() {
        assert_eq!(
            RowIssue::required_missing(TargetField::FirstName).to_string(),
            "firstName is required"
        );
        assert_eq!(
            RowIssue::required_unmapped(TargetField::Email).to_string(),
            "email is required but no column is mapped"
        );
        assert_eq!(
            RowIssue::invalid_email(TargetField::Email, "not-an-email").to_string(),
            "Invalid email format: not-an-email"
        );
        let date = RowIssue::invalid_date(TargetField::DateOfBirth, "someday");
        assert_eq!(date.to_string(), "Invalid date format for dateOfBirth: someday");
        assert!(!date.is_blocking());
    }

    #[test]
    fn test_field_mapping_blank_header_is_unmapped() {
        let mapping = FieldMapping {
            field: TargetField::Phone,
            source_header: Some("   ".to_string()),
            required: false,
        };
        assert!(!mapping.is_mapped());
        assert_eq!(FieldMapping::unmapped(TargetField::Phone, false).mapped_header(), None);
    }

    #[test]
    fn test_commit_progress_percent() {
        assert_eq!(CommitProgress::new(10, 25).percent, 40.0);
        assert_eq!(CommitProgress::new(25, 25).percent, 100.0);
        assert_eq!(CommitProgress::new(1, 3).processed, 1);
        assert_eq!(CommitProgress::new(3, 3).percent, 100.0);
    }

    #[test]
    fn test_raw_row_missing_header_is_empty() {
        let row: RawRow = vec![("Email", "a@b.com")].into_iter().collect();
        assert_eq!(row.value_or_empty("Email"), "a@b.com");
        assert_eq!(row.value_or_empty("Phone"), "");
    }
}
