// ==========================================
// 营地报名管理后台 - 导入模板生成
// ==========================================
// 表头 = 目标 schema 的 9 个 label（顺序一致），附 3 行示例
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::target_schema::TARGET_SCHEMA;
use std::fs;
use std::path::Path;
use tracing::info;

/// 模板默认文件名
pub const TEMPLATE_FILE_NAME: &str = "participant_import_template.csv";

const SAMPLE_ROWS: [&str; 3] = [
    "John,Doe,john.doe@email.com,(555) 123-4567,1995-06-15,Jane Doe,(555) 987-6543,None,Vegetarian",
    "Sarah,Smith,sarah.smith@email.com,(555) 234-5678,1998-03-22,Bob Smith,(555) 876-5432,Asthma,Gluten-free",
    "Mike,Johnson,mike.johnson@email.com,(555) 345-6789,1997-11-08,Lisa Johnson,(555) 765-4321,Diabetes,No nuts",
];

/// 生成模板 CSV 文本
pub fn participant_template_csv() -> String {
    let header = TARGET_SCHEMA
        .iter()
        .map(|spec| spec.label)
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header.as_str())
        .chain(SAMPLE_ROWS.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 写出模板文件
pub fn write_template(path: &Path) -> ImportResult<()> {
    fs::write(path, participant_template_csv())
        .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "导入模板已生成");
    Ok(())
}
