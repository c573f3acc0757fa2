// ==========================================
// 营地报名管理后台 - 导入会话（状态机）
// ==========================================
// 流程: Upload → Mapping → Preview → Importing → Complete
// 职责: 阶段守卫 + 串联 解析 / 映射 / 校验 / 分批提交
// 红线: 阶段不符的调用返回 InvalidStageTransition，且不改变任何状态
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::domain::import::{
    CommitProgress, CommitResult, FieldMapping, ImportContext, ImportPreview, ParsedTable, RawRow,
};
use crate::domain::types::{ImportStage, TargetField};
use crate::importer::batch_committer::BatchCommitter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{missing_required, FieldMapper as FieldMapperImpl};
use crate::importer::file_parser::CsvParser;
use crate::importer::import_pipeline_trait::{FieldMapper, FileParser, RowValidator};
use crate::importer::row_validator::RowValidator as RowValidatorImpl;
use crate::importer::target_schema::TARGET_SCHEMA;
use crate::repository::participant_repo::ParticipantRepository;
use std::path::Path;
use tracing::{error, info, instrument, warn};

// ==========================================
// ImportSession - 单次导入会话
// ==========================================
pub struct ImportSession {
    stage: ImportStage,
    context: ImportContext,
    config: ImportConfig,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    row_validator: Box<dyn RowValidator>,

    // 会话数据
    headers: Vec<String>,
    rows: Vec<RawRow>,
    mappings: Vec<FieldMapping>,
    preview: Option<ImportPreview>,
    progress: f64,
    commit_result: Option<CommitResult>,
}

impl ImportSession {
    /// 使用默认组件创建会话
    ///
    /// # 参数
    /// - context: 导入上下文（registration_id / user_id）
    /// - config: 导入运行参数（会先校验）
    pub fn new(context: ImportContext, config: ImportConfig) -> ImportResult<Self> {
        Self::with_components(
            context,
            config,
            Box::new(CsvParser),
            Box::new(FieldMapperImpl),
            Box::new(RowValidatorImpl),
        )
    }

    /// 注入自定义组件
    pub fn with_components(
        context: ImportContext,
        config: ImportConfig,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        row_validator: Box<dyn RowValidator>,
    ) -> ImportResult<Self> {
        config.validate()?;

        Ok(Self {
            stage: ImportStage::Upload,
            context,
            config,
            file_parser,
            field_mapper,
            row_validator,
            headers: Vec::new(),
            rows: Vec::new(),
            mappings: Vec::new(),
            preview: None,
            progress: 0.0,
            commit_result: None,
        })
    }

    // ===== Upload 阶段 =====

    /// 上传文本内容（Upload → Mapping）
    pub fn upload_text(&mut self, text: &str) -> ImportResult<()> {
        self.ensure_stage(ImportStage::Upload, ImportStage::Mapping)?;
        let table = self.file_parser.parse_text(text).map_err(|e| {
            warn!(error = %e, "文件解析失败，停留在上传阶段");
            e
        })?;
        self.accept_table(table);
        Ok(())
    }

    /// 上传文件（Upload → Mapping）
    pub fn upload_file(&mut self, file_path: &Path) -> ImportResult<()> {
        self.ensure_stage(ImportStage::Upload, ImportStage::Mapping)?;
        let table = self.file_parser.parse_file(file_path).map_err(|e| {
            warn!(file_path = %file_path.display(), error = %e, "文件解析失败，停留在上传阶段");
            e
        })?;
        self.accept_table(table);
        Ok(())
    }

    fn accept_table(&mut self, table: ParsedTable) {
        self.mappings = self.field_mapper.propose_mapping(&table.headers, &TARGET_SCHEMA);
        self.headers = table.headers;
        self.rows = table.rows;
        self.stage = ImportStage::Mapping;

        info!(
            columns = self.headers.len(),
            rows = self.rows.len(),
            unmapped_required = self.missing_required_fields().len(),
            "上传完成，进入字段映射"
        );
    }

    // ===== Mapping 阶段 =====

    /// 人工调整映射（空串表示取消映射）
    pub fn update_mapping(&mut self, field: TargetField, header: &str) -> ImportResult<()> {
        self.ensure_stage(ImportStage::Mapping, ImportStage::Mapping)?;
        self.mappings = self.field_mapper.update_mapping(&self.mappings, field, header);
        Ok(())
    }

    /// 返回上传（Mapping → Upload），丢弃已解析数据
    pub fn back_to_upload(&mut self) -> ImportResult<()> {
        self.ensure_stage(ImportStage::Mapping, ImportStage::Upload)?;
        self.headers.clear();
        self.rows.clear();
        self.mappings.clear();
        self.stage = ImportStage::Upload;
        Ok(())
    }

    /// 校验并生成预览（Mapping → Preview）
    #[instrument(skip(self), fields(registration_id = %self.context.registration_id))]
    pub fn validate(&mut self) -> ImportResult<&ImportPreview> {
        self.ensure_stage(ImportStage::Mapping, ImportStage::Preview)?;

        let missing = self.missing_required_fields();
        if !missing.is_empty() {
            let fields = missing
                .iter()
                .map(|f| f.key())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ImportError::RequiredFieldsUnmapped { fields });
        }

        let preview = self
            .row_validator
            .classify(&self.rows, &self.mappings, &self.context);
        self.stage = ImportStage::Preview;
        Ok(self.preview.insert(preview))
    }

    // ===== Preview 阶段 =====

    /// 返回映射（Preview → Mapping），丢弃预览
    pub fn back_to_mapping(&mut self) -> ImportResult<()> {
        self.ensure_stage(ImportStage::Preview, ImportStage::Mapping)?;
        self.preview = None;
        self.stage = ImportStage::Mapping;
        Ok(())
    }

    /// 执行导入（Preview → Importing → Complete）
    ///
    /// # 参数
    /// - repo: 持久化能力
    /// - on_progress: 每批结束后的进度回调
    ///
    /// # 返回
    /// - Ok(CommitResult): 批次失败不视为错误，计入 failed
    /// - Err(NothingToImport): 预览中无有效记录
    #[instrument(skip(self, repo, on_progress), fields(registration_id = %self.context.registration_id))]
    pub async fn execute_import<R, F>(
        &mut self,
        repo: &R,
        mut on_progress: F,
    ) -> ImportResult<CommitResult>
    where
        R: ParticipantRepository + ?Sized,
        F: FnMut(CommitProgress),
    {
        self.ensure_stage(ImportStage::Preview, ImportStage::Importing)?;

        let records = match self.preview.as_ref() {
            Some(preview) if preview.has_valid() => &preview.valid,
            _ => return Err(ImportError::NothingToImport),
        };
        let committer = BatchCommitter::from_config(&self.config)?;

        self.stage = ImportStage::Importing;
        self.progress = 0.0;
        info!(records = records.len(), "开始导入参与者");

        let progress_slot = &mut self.progress;
        let result = committer
            .commit(records, repo, |progress| {
                *progress_slot = progress.percent;
                on_progress(progress);
            })
            .await;

        if result.failed > 0 {
            error!(
                succeeded = result.succeeded,
                failed = result.failed,
                "导入部分失败"
            );
        } else {
            info!(succeeded = result.succeeded, "导入完成");
        }

        self.stage = ImportStage::Complete;
        self.commit_result = Some(result.clone());
        Ok(result)
    }

    /// 关闭会话（任意阶段 → 全新 Upload）
    pub fn close(&mut self) {
        self.headers.clear();
        self.rows.clear();
        self.mappings.clear();
        self.preview = None;
        self.progress = 0.0;
        self.commit_result = None;
        self.stage = ImportStage::Upload;
    }

    // ===== 只读访问 =====

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn context(&self) -> &ImportContext {
        &self.context
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn preview(&self) -> Option<&ImportPreview> {
        self.preview.as_ref()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn commit_result(&self) -> Option<&CommitResult> {
        self.commit_result.as_ref()
    }

    pub fn missing_required_fields(&self) -> Vec<TargetField> {
        missing_required(&self.mappings)
    }

    /// 映射阶段且必填字段均已映射
    pub fn can_preview(&self) -> bool {
        self.stage == ImportStage::Mapping && self.missing_required_fields().is_empty()
    }

    /// 预览阶段且存在有效记录
    pub fn can_import(&self) -> bool {
        self.stage == ImportStage::Preview
            && self.preview.as_ref().map(|p| p.has_valid()).unwrap_or(false)
    }

    fn ensure_stage(&self, expected: ImportStage, to: ImportStage) -> ImportResult<()> {
        if self.stage != expected {
            return Err(ImportError::InvalidStageTransition {
                from: self.stage,
                to,
            });
        }
        Ok(())
    }
}
