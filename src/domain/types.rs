// ==========================================
// 营地报名管理后台 - 领域类型定义
// ==========================================
// 依据: 参与者导入管道 - 目标字段 / 导入阶段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 目标字段 (Target Field)
// ==========================================
// 固定的目标 schema 字段枚举，替代按字段名动态赋值
// 序列化格式: camelCase (与前端记录字段名一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    EmergencyContactName,
    EmergencyContactPhone,
    MedicalConditions,
    DietaryRestrictions,
}

impl TargetField {
    /// 全部目标字段（按 schema 顺序）
    pub const ALL: [TargetField; 9] = [
        TargetField::FirstName,
        TargetField::LastName,
        TargetField::Email,
        TargetField::Phone,
        TargetField::DateOfBirth,
        TargetField::EmergencyContactName,
        TargetField::EmergencyContactPhone,
        TargetField::MedicalConditions,
        TargetField::DietaryRestrictions,
    ];

    /// 字段 key（错误信息与映射匹配都使用此值）
    pub fn key(&self) -> &'static str {
        match self {
            TargetField::FirstName => "firstName",
            TargetField::LastName => "lastName",
            TargetField::Email => "email",
            TargetField::Phone => "phone",
            TargetField::DateOfBirth => "dateOfBirth",
            TargetField::EmergencyContactName => "emergencyContactName",
            TargetField::EmergencyContactPhone => "emergencyContactPhone",
            TargetField::MedicalConditions => "medicalConditions",
            TargetField::DietaryRestrictions => "dietaryRestrictions",
        }
    }

    /// 按 key 反查字段（大小写敏感）
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// 值类型 (Value Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,  // 自由文本
    Email, // 邮箱
    Date,  // 日历日期
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::Email => write!(f, "email"),
            ValueKind::Date => write!(f, "date"),
        }
    }
}

// ==========================================
// 参与者状态 (Participant Status)
// ==========================================
// 序列化格式: 首字母大写 (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantStatus {
    Complete,
    Pending,
    Cancelled,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Complete => "Complete",
            ParticipantStatus::Pending => "Pending",
            ParticipantStatus::Cancelled => "Cancelled",
        }
    }

    /// 从数据库文本解析（兼容大小写）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "complete" => Some(ParticipantStatus::Complete),
            "pending" => Some(ParticipantStatus::Pending),
            "cancelled" => Some(ParticipantStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for ParticipantStatus {
    fn default() -> Self {
        ParticipantStatus::Pending
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 导入阶段 (Import Stage)
// ==========================================
// 流转: upload → mapping → preview → importing → complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    Upload,
    Mapping,
    Preview,
    Importing,
    Complete,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStage::Upload => write!(f, "upload"),
            ImportStage::Mapping => write!(f, "mapping"),
            ImportStage::Preview => write!(f, "preview"),
            ImportStage::Importing => write!(f, "importing"),
            ImportStage::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_field_key_roundtrip() {
        for field in TargetField::ALL {
            assert_eq!(TargetField::from_key(field.key()), Some(field));
        }
        assert_eq!(TargetField::from_key("FirstName"), None);
    }

    #[test]
    fn test_participant_status_parse() {
        assert_eq!(ParticipantStatus::parse("Pending"), Some(ParticipantStatus::Pending));
        assert_eq!(ParticipantStatus::parse(" cancelled "), Some(ParticipantStatus::Cancelled));
        assert_eq!(ParticipantStatus::parse("unknown"), None);
        assert_eq!(ParticipantStatus::default(), ParticipantStatus::Pending);
    }

    #[test]
    fn test_import_stage_serde() {
        let json = serde_json::to_string(&ImportStage::Importing).unwrap();
        assert_eq!(json, "\"importing\"");
    }
}
