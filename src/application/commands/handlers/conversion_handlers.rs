//! Conversion Command Handlers - 提交与取消

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::conversion_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    resolve_format, ConversionJob, DocumentExtractorPort, JobStatus, JobTrackerPort,
};
use crate::domain::{apply_tier, segment_chapters, SegmenterConfig, TierCatalog};

/// SubmitConversion Handler 配置
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// 上传大小上限（字节）
    pub max_upload_bytes: usize,
    /// 未指定音色时的默认音色
    pub default_voice: String,
    /// 层级限额表
    pub tiers: TierCatalog,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            default_voice: "narrator-female-1".to_string(),
            tiers: TierCatalog::default(),
        }
    }
}

/// SubmitConversion Handler - 接收上传并创建作业
///
/// 提取与分割在提交路径同步执行（不阻塞其他作业），章节合成
/// 交给后台 worker 异步进行。提取/分割失败仍会创建作业并立即
/// 置为 Failed，保证提交方总能通过轮询观察到终态
pub struct SubmitConversionHandler {
    config: SubmitConfig,
    extractor: Arc<dyn DocumentExtractorPort>,
    job_tracker: Arc<dyn JobTrackerPort>,
}

impl SubmitConversionHandler {
    pub fn new(
        config: SubmitConfig,
        extractor: Arc<dyn DocumentExtractorPort>,
        job_tracker: Arc<dyn JobTrackerPort>,
    ) -> Self {
        Self {
            config,
            extractor,
            job_tracker,
        }
    }

    pub fn handle(
        &self,
        cmd: SubmitConversionCommand,
    ) -> Result<SubmitConversionResponse, ApplicationError> {
        // 边界校验：类型与大小在作业创建之前拒绝
        if cmd.data.is_empty() {
            return Err(ApplicationError::validation("No file content provided"));
        }
        if cmd.data.len() > self.config.max_upload_bytes {
            return Err(ApplicationError::validation(format!(
                "File too large. Maximum size is {} MB",
                self.config.max_upload_bytes / 1024 / 1024
            )));
        }
        let format = resolve_format(&cmd.mime_type, &cmd.filename)
            .map_err(|e| ApplicationError::validation(e.to_string()))?;
        let limits = self.config.tiers.lookup(&cmd.tier).ok_or_else(|| {
            ApplicationError::validation(format!("Unknown tier: {}", cmd.tier))
        })?;

        let voice_id = cmd
            .voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.config.default_voice.clone());
        let title = Path::new(&cmd.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| cmd.filename.clone());

        // 提取 → 分割 → 层级截断
        let job = match self.extractor.extract(&cmd.data, format) {
            Ok(text) => {
                let chapters = segment_chapters(&text, &SegmenterConfig::default());
                if chapters.is_empty() {
                    ConversionJob::failed_at_intake(
                        title,
                        cmd.tier,
                        voice_id,
                        "CorruptDocument: no chapters could be produced",
                    )
                } else {
                    let total_found = chapters.len();
                    let chapters = apply_tier(chapters, &limits);
                    tracing::info!(
                        format = format.as_str(),
                        tier = %cmd.tier,
                        chapters_found = total_found,
                        chapters_kept = chapters.len(),
                        "Document segmented"
                    );
                    ConversionJob::new(title, cmd.tier, voice_id, chapters)
                }
            }
            Err(e) => {
                tracing::warn!(
                    format = format.as_str(),
                    error = %e,
                    "Extraction failed, creating failed job"
                );
                ConversionJob::failed_at_intake(title, cmd.tier, voice_id, e.to_string())
            }
        };

        let mut status = job.status;
        let title = job.title.clone();
        let chapter_count = job.chapters.len();
        let job_id = self.job_tracker.insert(job)?;

        // 入队失败时作业立即置为 Failed，避免注册表里残留
        // 永远不会被 worker 消费的 Pending 作业
        if status == JobStatus::Pending {
            if let Err(e) = self.job_tracker.enqueue(job_id) {
                tracing::warn!(job_id = %job_id, error = %e, "Enqueue failed, failing job");
                self.job_tracker
                    .fail(job_id, format!("Failed to enqueue job: {}", e))?;
                status = JobStatus::Failed;
            }
        }

        tracing::info!(
            job_id = %job_id,
            status = status.as_str(),
            chapter_count = chapter_count,
            "Conversion job submitted"
        );

        Ok(SubmitConversionResponse {
            job_id,
            title,
            status,
            chapter_count,
        })
    }
}

/// CancelConversion Handler - 标记作业取消
///
/// 只置位取消标志；编排器在章节之间检查标志并将作业迁移到
/// Failed（原因 Cancelled），从不打断合成中的章节
pub struct CancelConversionHandler {
    job_tracker: Arc<dyn JobTrackerPort>,
}

impl CancelConversionHandler {
    pub fn new(job_tracker: Arc<dyn JobTrackerPort>) -> Self {
        Self { job_tracker }
    }

    pub fn handle(&self, cmd: CancelConversionCommand) -> Result<(), ApplicationError> {
        self.job_tracker.request_cancel(cmd.job_id)?;
        tracing::info!(job_id = %cmd.job_id, "Cancellation requested");
        Ok(())
    }
}
