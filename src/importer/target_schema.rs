// ==========================================
// 营地报名管理后台 - 目标字段 Schema
// ==========================================
// 职责: 固定的 9 个目标字段 + 每个字段的表头同义词
// 红线: 非用户可配置
// ==========================================

use crate::domain::import::TargetFieldSpec;
use crate::domain::types::{TargetField, ValueKind};

/// 参与者导入目标 schema（顺序即模板列顺序）
pub const TARGET_SCHEMA: [TargetFieldSpec; 9] = [
    TargetFieldSpec {
        key: TargetField::FirstName,
        label: "First Name",
        required: true,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::LastName,
        label: "Last Name",
        required: true,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::Email,
        label: "Email",
        required: true,
        kind: ValueKind::Email,
    },
    TargetFieldSpec {
        key: TargetField::Phone,
        label: "Phone",
        required: false,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::DateOfBirth,
        label: "Date of Birth",
        required: false,
        kind: ValueKind::Date,
    },
    TargetFieldSpec {
        key: TargetField::EmergencyContactName,
        label: "Emergency Contact Name",
        required: false,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::EmergencyContactPhone,
        label: "Emergency Contact Phone",
        required: false,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::MedicalConditions,
        label: "Medical Conditions",
        required: false,
        kind: ValueKind::Text,
    },
    TargetFieldSpec {
        key: TargetField::DietaryRestrictions,
        label: "Dietary Restrictions",
        required: false,
        kind: ValueKind::Text,
    },
];

/// 查找字段描述
pub fn spec_for(field: TargetField) -> &'static TargetFieldSpec {
    // TARGET_SCHEMA 与 TargetField::ALL 同序
    let index = TargetField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default();
    &TARGET_SCHEMA[index]
}

/// 表头同义词（原始写法，匹配前统一去下划线/空格）
pub fn synonyms(field: TargetField) -> &'static [&'static str] {
    match field {
        TargetField::FirstName => &["first_name", "firstname", "fname", "first"],
        TargetField::LastName => &["last_name", "lastname", "lname", "last", "surname"],
        TargetField::Email => &["email_address", "e_mail", "mail"],
        TargetField::Phone => &["phone_number", "telephone", "mobile", "cell"],
        TargetField::DateOfBirth => &["date_of_birth", "dob", "birth_date", "birthdate"],
        TargetField::EmergencyContactName => {
            &["emergency_contact", "emergency_name", "contact_name"]
        }
        TargetField::EmergencyContactPhone => {
            &["emergency_phone", "emergency_number", "contact_phone"]
        }
        TargetField::MedicalConditions => &["medical", "medical_info", "health_conditions"],
        TargetField::DietaryRestrictions => {
            &["dietary", "diet", "food_restrictions", "allergies"]
        }
    }
}

/// 必填字段列表
pub fn required_fields() -> impl Iterator<Item = TargetField> {
    TARGET_SCHEMA.iter().filter(|s| s.required).map(|s| s.key)
}
