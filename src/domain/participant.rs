// ==========================================
// 营地报名管理后台 - 参与者领域模型
// ==========================================
// 用途: 导入管道产出的候选记录，经持久化能力落库
// 序列化: camelCase（与前端 Participant 结构一致）
// ==========================================

use crate::domain::types::ParticipantStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Participant - 参与者
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    // ===== 主键与归属 =====
    pub id: Uuid,
    pub user_id: String,
    pub registration_id: String,

    // ===== 必填信息 =====
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    // ===== 可选信息 =====
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_conditions: Option<String>,
    pub dietary_restrictions: Option<String>,

    // ===== 报名状态 =====
    pub registration_date: DateTime<Utc>,
    pub status: ParticipantStatus,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 是否填写了医疗信息（仪表盘统计口径）
    pub fn has_medical_conditions(&self) -> bool {
        self.medical_conditions
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}
