// ==========================================
// 营地报名管理后台 - 字段映射器实现
// ==========================================
// 阶段 1: 源表头 → 目标字段映射（自动推测 + 人工覆盖）
// 匹配规则:
//   (a) 表头小写 == 字段 key 小写
//   (b) 表头去下划线/空格后包含任一同义词（同义词同样归一化）
// 两轮均取第一个命中的表头
// ==========================================

use crate::domain::import::{FieldMapping, TargetFieldSpec};
use crate::domain::types::TargetField;
use crate::importer::import_pipeline_trait::FieldMapper as FieldMapperTrait;
use crate::importer::target_schema::synonyms;
use tracing::debug;

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn propose_mapping(
        &self,
        headers: &[String],
        schema: &[TargetFieldSpec],
    ) -> Vec<FieldMapping> {
        let mappings: Vec<FieldMapping> = schema
            .iter()
            .map(|spec| FieldMapping {
                field: spec.key,
                source_header: self.find_header(headers, spec.key).map(str::to_string),
                required: spec.required,
            })
            .collect();

        debug!(
            headers = headers.len(),
            mapped = mappings.iter().filter(|m| m.is_mapped()).count(),
            "字段映射推测完成"
        );

        mappings
    }

    fn update_mapping(
        &self,
        current: &[FieldMapping],
        field: TargetField,
        header: &str,
    ) -> Vec<FieldMapping> {
        let header = header.trim();
        current
            .iter()
            .map(|mapping| {
                if mapping.field == field {
                    FieldMapping {
                        source_header: (!header.is_empty()).then(|| header.to_string()),
                        ..mapping.clone()
                    }
                } else {
                    mapping.clone()
                }
            })
            .collect()
    }
}

impl FieldMapper {
    /// 为单个目标字段查找表头
    fn find_header<'a>(&self, headers: &'a [String], field: TargetField) -> Option<&'a str> {
        let key = field.key().to_lowercase();

        // (a) 精确匹配（忽略大小写）
        if let Some(header) = headers.iter().find(|h| h.to_lowercase() == key) {
            return Some(header.as_str());
        }

        // (b) 同义词包含匹配
        let variations: Vec<String> = synonyms(field).iter().map(|s| normalize(s)).collect();
        headers
            .iter()
            .find(|h| {
                let normalized = normalize(h);
                variations.iter().any(|v| normalized.contains(v.as_str()))
            })
            .map(String::as_str)
    }
}

/// 小写 + 去下划线/空白
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .collect()
}

/// 尚未映射的必填字段（映射阶段退出守卫）
pub fn missing_required(mappings: &[FieldMapping]) -> Vec<TargetField> {
    mappings
        .iter()
        .filter(|m| m.required && !m.is_mapped())
        .map(|m| m.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::target_schema::TARGET_SCHEMA;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn header_for(mappings: &[FieldMapping], field: TargetField) -> Option<&str> {
        mappings
            .iter()
            .find(|m| m.field == field)
            .and_then(|m| m.source_header.as_deref())
    }

    #[test]
    fn test_propose_mapping_template_headers() {
        let hs = headers(&[
            "First Name",
            "Last Name",
            "Email",
            "Phone",
            "Date of Birth",
            "Emergency Contact Name",
            "Emergency Contact Phone",
            "Medical Conditions",
            "Dietary Restrictions",
        ]);
        let mappings = FieldMapper.propose_mapping(&hs, &TARGET_SCHEMA);

        assert_eq!(mappings.len(), 9);
        for (mapping, header) in mappings.iter().zip(hs.iter()) {
            assert_eq!(mapping.source_header.as_deref(), Some(header.as_str()));
        }
        assert!(missing_required(&mappings).is_empty());
    }

    #[test]
    fn test_propose_mapping_snake_case_synonyms() {
        let hs = headers(&[
            "fname",
            "lname",
            "e_mail",
            "mobile",
            "dob",
            "emergency_contact",
            "emergency_phone",
            "medical",
            "diet",
        ]);
        let mappings = FieldMapper.propose_mapping(&hs, &TARGET_SCHEMA);

        assert_eq!(header_for(&mappings, TargetField::FirstName), Some("fname"));
        assert_eq!(header_for(&mappings, TargetField::LastName), Some("lname"));
        assert_eq!(header_for(&mappings, TargetField::Email), Some("e_mail"));
        assert_eq!(header_for(&mappings, TargetField::Phone), Some("mobile"));
        assert_eq!(header_for(&mappings, TargetField::DateOfBirth), Some("dob"));
        assert_eq!(
            header_for(&mappings, TargetField::EmergencyContactPhone),
            Some("emergency_phone")
        );
        assert_eq!(header_for(&mappings, TargetField::DietaryRestrictions), Some("diet"));
    }

    #[test]
    fn test_exact_match_beats_earlier_synonym() {
        let hs = headers(&["Email Address", "EMAIL"]);
        let mappings = FieldMapper.propose_mapping(&hs, &TARGET_SCHEMA);
        assert_eq!(header_for(&mappings, TargetField::Email), Some("EMAIL"));
    }

    #[test]
    fn test_unmatched_fields_are_unmapped() {
        let hs = headers(&["Camper", "Cabin"]);
        let mappings = FieldMapper.propose_mapping(&hs, &TARGET_SCHEMA);

        assert!(mappings.iter().all(|m| m.source_header.is_none()));
        assert_eq!(
            missing_required(&mappings),
            vec![TargetField::FirstName, TargetField::LastName, TargetField::Email]
        );
    }

    #[test]
    fn test_update_mapping_replace_by_key() {
        let hs = headers(&["Camper", "Surname", "Contact"]);
        let mappings = FieldMapper.propose_mapping(&hs, &TARGET_SCHEMA);
        assert_eq!(header_for(&mappings, TargetField::FirstName), None);

        let updated = FieldMapper.update_mapping(&mappings, TargetField::FirstName, "Camper");
        assert_eq!(header_for(&updated, TargetField::FirstName), Some("Camper"));
        // 其他字段不受影响
        assert_eq!(header_for(&updated, TargetField::LastName), Some("Surname"));

        // 同一表头可同时映射多个字段
        let updated = FieldMapper.update_mapping(&updated, TargetField::Email, "Camper");
        assert_eq!(header_for(&updated, TargetField::Email), Some("Camper"));
        assert_eq!(header_for(&updated, TargetField::FirstName), Some("Camper"));

        // 空串 → 取消映射
        let cleared = FieldMapper.update_mapping(&updated, TargetField::Email, "  ");
        assert_eq!(header_for(&cleared, TargetField::Email), None);
        assert!(cleared.iter().find(|m| m.field == TargetField::Email).unwrap().required);
    }
}
