// ==========================================
// 营地报名管理后台 - 行校验/分类器实现
// ==========================================
// 阶段 2: 原始行 + 已确认映射 → 候选参与者 / 阻断错误 / 提示警告
// 规则:
//   - 必填为空 / 必填未映射 → 错误（不短路，收集完整错误列表）
//   - 邮箱格式不符 → 错误
//   - 日期无法解析 → 警告，字段留空
//   - 同批次内邮箱重复（仅与此前已接受的行比较）→ 警告
// 行号: index + 2（表头占第 1 行）
// ==========================================

use crate::domain::import::{
    ClassifiedRow, FieldMapping, ImportContext, ImportPreview, RawRow, RowIssue,
};
use crate::domain::participant::Participant;
use crate::domain::types::{ParticipantStatus, TargetField, ValueKind};
use crate::importer::import_pipeline_trait::RowValidator as RowValidatorTrait;
use crate::importer::target_schema::spec_for;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// 日期格式（按顺序尝试）
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct RowValidator;

impl RowValidatorTrait for RowValidator {
    fn classify(
        &self,
        rows: &[RawRow],
        mappings: &[FieldMapping],
        context: &ImportContext,
    ) -> ImportPreview {
        let now = Utc::now();

        // 单遍 fold: 已接受邮箱集合只向前看
        let (preview, _accepted_emails) = rows.iter().enumerate().fold(
            (ImportPreview::default(), HashSet::<String>::new()),
            |(mut preview, mut accepted_emails), (index, row)| {
                let classified =
                    classify_row(index + 2, row, mappings, context, now, &accepted_emails);
                if let ClassifiedRow::Valid { participant, .. } = &classified {
                    accepted_emails.insert(participant.email.clone());
                }
                preview.push(classified);
                (preview, accepted_emails)
            },
        );

        let summary = preview.summary();
        info!(
            registration_id = %context.registration_id,
            total = summary.total_rows,
            valid = summary.valid,
            invalid = summary.invalid,
            warning = summary.warning,
            "行校验完成"
        );

        preview
    }
}

/// 校验单行
fn classify_row(
    row_number: usize,
    row: &RawRow,
    mappings: &[FieldMapping],
    context: &ImportContext,
    now: DateTime<Utc>,
    accepted_emails: &HashSet<String>,
) -> ClassifiedRow {
    let mut draft = ParticipantDraft::default();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for mapping in mappings {
        let field = mapping.field;

        let header = match mapping.mapped_header() {
            Some(header) => header,
            None => {
                if mapping.required {
                    errors.push(RowIssue::required_unmapped(field));
                }
                continue;
            }
        };

        let value = row.value_or_empty(header).trim();
        if value.is_empty() {
            if mapping.required {
                errors.push(RowIssue::required_missing(field));
            }
            continue;
        }

        match spec_for(field).kind {
            ValueKind::Email => {
                if is_valid_email(value) {
                    draft.assign(field, FieldValue::Text(value.to_string()));
                } else {
                    errors.push(RowIssue::invalid_email(field, value));
                }
            }
            ValueKind::Date => match parse_calendar_date(value) {
                Some(date) => draft.assign(field, FieldValue::Date(date)),
                None => warnings.push(RowIssue::invalid_date(field, value)),
            },
            ValueKind::Text => draft.assign(field, FieldValue::Text(value.to_string())),
        }
    }

    // 同批次重复邮箱
    if let Some(email) = &draft.email {
        if accepted_emails.contains(email) {
            warnings.push(RowIssue::duplicate_email(TargetField::Email, email));
        }
    }

    if !errors.is_empty() {
        debug!(row_number, errors = errors.len(), "行被阻断");
        return ClassifiedRow::Invalid {
            row_number,
            data: row.clone(),
            errors,
        };
    }

    match draft.into_participant(context, now) {
        Ok(participant) => ClassifiedRow::Valid {
            row_number,
            data: row.clone(),
            participant,
            warnings,
        },
        Err(errors) => ClassifiedRow::Invalid {
            row_number,
            data: row.clone(),
            errors,
        },
    }
}

/// 邮箱格式: local@domain.tld
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// 日历日期解析（基础启发式，不做国际化）
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ==========================================
// ParticipantDraft - 候选记录（校验中间结构）
// ==========================================
enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

#[derive(Default)]
struct ParticipantDraft {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<NaiveDate>,
    emergency_contact_name: Option<String>,
    emergency_contact_phone: Option<String>,
    medical_conditions: Option<String>,
    dietary_restrictions: Option<String>,
}

impl ParticipantDraft {
    fn assign(&mut self, field: TargetField, value: FieldValue) {
        match (field, value) {
            (TargetField::FirstName, FieldValue::Text(v)) => self.first_name = Some(v),
            (TargetField::LastName, FieldValue::Text(v)) => self.last_name = Some(v),
            (TargetField::Email, FieldValue::Text(v)) => self.email = Some(v),
            (TargetField::Phone, FieldValue::Text(v)) => self.phone = Some(v),
            (TargetField::DateOfBirth, FieldValue::Date(d)) => self.date_of_birth = Some(d),
            (TargetField::EmergencyContactName, FieldValue::Text(v)) => {
                self.emergency_contact_name = Some(v)
            }
            (TargetField::EmergencyContactPhone, FieldValue::Text(v)) => {
                self.emergency_contact_phone = Some(v)
            }
            (TargetField::MedicalConditions, FieldValue::Text(v)) => {
                self.medical_conditions = Some(v)
            }
            (TargetField::DietaryRestrictions, FieldValue::Text(v)) => {
                self.dietary_restrictions = Some(v)
            }
            (field, _) => debug!(field = %field, "字段值类型与 schema 不符，忽略"),
        }
    }

    /// 生成参与者（系统字段: id / registration / 状态 / 时间戳）
    ///
    /// 映射集缺少必填字段条目时返回对应错误
    fn into_participant(
        self,
        context: &ImportContext,
        now: DateTime<Utc>,
    ) -> Result<Participant, Vec<RowIssue>> {
        let (first_name, last_name, email) = match (self.first_name, self.last_name, self.email)
        {
            (Some(first), Some(last), Some(email)) => (first, last, email),
            (first, last, email) => {
                let missing = [
                    (TargetField::FirstName, first.is_none()),
                    (TargetField::LastName, last.is_none()),
                    (TargetField::Email, email.is_none()),
                ];
                return Err(missing
                    .iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(field, _)| RowIssue::required_unmapped(*field))
                    .collect());
            }
        };

        Ok(Participant {
            id: Uuid::new_v4(),
            user_id: context.user_id.clone(),
            registration_id: context.registration_id.clone(),
            first_name,
            last_name,
            email,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_phone: self.emergency_contact_phone,
            medical_conditions: self.medical_conditions,
            dietary_restrictions: self.dietary_restrictions,
            registration_date: now,
            status: ParticipantStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}
