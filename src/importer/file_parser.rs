// ==========================================
// 营地报名管理后台 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv)，逗号分隔，首行为表头
// 限制: 不支持引号内含逗号的转义（引号字符直接剔除）
// ==========================================

use crate::domain::import::{HeaderSet, ParsedTable, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_pipeline_trait::FileParser;
use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_text(&self, text: &str) -> ImportResult<ParsedTable> {
        // 去掉 UTF-8 BOM（Excel 导出的 CSV 常见）
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头自行识别（需先跳过空行）
            .flexible(true) // 允许行长度不一致
            .quoting(false) // 引号按普通字符处理，随后剔除
            .from_reader(text.as_bytes());

        let mut header_tokens: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;

            // 跳过空白行（不计入数据行）
            if is_blank_line(&record) {
                continue;
            }

            let cells: Vec<String> = record.iter().map(clean_cell).collect();
            match &header_tokens {
                None => header_tokens = Some(cells),
                Some(headers) => rows.push(bind_row(headers, cells)),
            }
        }

        let header_tokens = header_tokens.ok_or(ImportError::EmptyInput)?;
        let headers = dedupe_headers(&header_tokens);
        if headers.len() != header_tokens.len() {
            warn!(
                columns = header_tokens.len(),
                distinct = headers.len(),
                "表头存在重复列名，后出现的列值覆盖前者"
            );
        }

        debug!(columns = headers.len(), rows = rows.len(), "CSV 文本解析完成");

        Ok(ParsedTable { headers, rows })
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 读取文件（非 UTF-8 视为不可读）
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            ImportError::FileReadError(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;

        debug!(file_path = %path.display(), bytes = text.len(), "文件读取完成");
        self.parse_text(&text)
    }
}

/// 空白行: 无字段，或仅一个全空白字段（无逗号）
fn is_blank_line(record: &StringRecord) -> bool {
    match record.len() {
        0 => true,
        1 => record.get(0).map(|v| v.trim().is_empty()).unwrap_or(true),
        _ => false,
    }
}

/// TRIM + 剔除双引号
fn clean_cell(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

/// 按位置绑定表头；缺失列补空串，多余列丢弃
fn bind_row(headers: &[String], cells: Vec<String>) -> RawRow {
    let mut values = HashMap::with_capacity(headers.len());
    let mut cells = cells.into_iter();
    for header in headers {
        let value = cells.next().unwrap_or_default();
        values.insert(header.clone(), value);
    }
    RawRow::new(values)
}

/// 表头去重（保留首次出现的位置）
fn dedupe_headers(tokens: &[String]) -> HeaderSet {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter(|h| seen.insert(h.as_str()))
        .cloned()
        .collect()
}
