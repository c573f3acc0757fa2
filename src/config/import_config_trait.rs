// ==========================================
// 营地报名管理后台 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取每批写入条数
    ///
    /// # 默认值
    /// - 10
    async fn get_batch_size(&self) -> ImportResult<usize>;

    /// 获取批次间隔（毫秒）
    ///
    /// # 默认值
    /// - 100
    async fn get_batch_delay_ms(&self) -> ImportResult<u64>;

    /// 获取默认操作人 ID（写入 participant.user_id）
    ///
    /// # 默认值
    /// - "current_user"
    async fn get_default_user_id(&self) -> ImportResult<String>;

    /// 汇总为 ImportConfig 并校验
    async fn load_import_config(&self) -> ImportResult<ImportConfig> {
        let config = ImportConfig {
            batch_size: self.get_batch_size().await?,
            batch_delay_ms: self.get_batch_delay_ms().await?,
            default_user_id: self.get_default_user_id().await?,
        };
        config.validate()?;
        Ok(config)
    }
}
