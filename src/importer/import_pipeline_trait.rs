// ==========================================
// 营地报名管理后台 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段: 文件解析 → 字段映射 → 行校验/分类
// ==========================================

use crate::domain::import::{
    FieldMapping, ImportContext, ImportPreview, ParsedTable, RawRow, TargetFieldSpec,
};
use crate::domain::types::TargetField;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析分隔文本为 (表头, 原始行记录)
    ///
    /// # 参数
    /// - text: 文件全文（UTF-8）
    ///
    /// # 返回
    /// - Ok(ParsedTable): 表头与数据行
    /// - Err(EmptyInput): 去掉空行后无任何内容
    fn parse_text(&self, text: &str) -> ImportResult<ParsedTable>;

    /// 读取并解析上传文件
    ///
    /// # 参数
    /// - file_path: 文件路径（.csv）
    ///
    /// # 返回
    /// - Ok(ParsedTable): 表头与数据行
    /// - Err: 文件不存在 / 格式不支持 / 读取失败 / 内容为空
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 根据表头推测映射（每个目标字段一条）
    ///
    /// # 参数
    /// - headers: 解析得到的表头
    /// - schema: 目标字段 schema
    ///
    /// # 返回
    /// - Vec<FieldMapping>: 与 schema 同序
    fn propose_mapping(&self, headers: &[String], schema: &[TargetFieldSpec])
        -> Vec<FieldMapping>;

    /// 人工覆盖单个字段的映射（按 key 替换，不做唯一性校验）
    ///
    /// # 参数
    /// - current: 当前映射
    /// - field: 目标字段
    /// - header: 新表头，空串表示取消映射
    fn update_mapping(
        &self,
        current: &[FieldMapping],
        field: TargetField,
        header: &str,
    ) -> Vec<FieldMapping>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行校验/分类接口（阶段 2）
// 实现者: RowValidatorImpl
pub trait RowValidator: Send + Sync {
    /// 将原始行按映射转换为候选记录，并分类为 valid / invalid / warnings
    ///
    /// # 参数
    /// - rows: 原始行记录
    /// - mappings: 已确认的字段映射
    /// - context: 导入上下文（registration_id 等）
    ///
    /// # 返回
    /// - ImportPreview: valid.len() + invalid.len() == rows.len()
    fn classify(
        &self,
        rows: &[RawRow],
        mappings: &[FieldMapping],
        context: &ImportContext,
    ) -> ImportPreview;
}
