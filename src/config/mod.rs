// ==========================================
// 营地报名管理后台 - 配置层
// ==========================================
// 职责: 导入运行参数的加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config::ImportConfig;
pub use import_config_trait::ImportConfigReader;
