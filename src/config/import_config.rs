// ==========================================
// 营地报名管理后台 - 导入运行参数
// ==========================================
// 职责: 批量提交节奏 + 默认操作人
// 来源: config_kv 表（缺省时使用默认值）
// ==========================================

use crate::config::config_manager::config_keys;
use crate::domain::import::ImportContext;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 每批写入条数（默认）
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// 批次间隔毫秒（默认）
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub default_user_id: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            default_user_id: ImportContext::DEFAULT_USER_ID.to_string(),
        }
    }
}

impl ImportConfig {
    /// 校验参数（batch_size 必须 > 0）
    pub fn validate(&self) -> ImportResult<()> {
        if self.batch_size == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::IMPORT_BATCH_SIZE.to_string(),
                value: self.batch_size.to_string(),
                message: "batch size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// 无间隔版本（测试/命令行批处理）
    pub fn without_delay(mut self) -> Self {
        self.batch_delay_ms = 0;
        self
    }
}
