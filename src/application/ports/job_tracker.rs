//! Job Tracker Port - 转换作业状态机
//!
//! 状态机: Pending → Processing → {Completed, Failed}，终态不可变。
//! 作业注册表是显式的键值存储，通过端口注入，不做环境全局状态。
//! 轮询客户端只读取状态，不持有锁

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AudiobookResult, Chapter, ConversionStats};

/// Job Tracker 错误
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// 作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 等待合成槽位
    Pending,
    /// 逐章合成中
    Processing,
    /// 流水线跑完（允许个别章节失败）
    Completed,
    /// 流水线级致命错误或取消
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// 终态不允许任何后续迁移
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// 转换作业
///
/// 由 Job Tracker 独占持有和变更；到达终态后不可变，可无限期缓存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub id: Uuid,
    /// 上传文件名去掉扩展名
    pub title: String,
    pub tier: String,
    pub voice_id: String,
    /// 层级截断后待合成的章节，入队后不再变更
    #[serde(skip)]
    pub chapters: Vec<Chapter>,
    pub status: JobStatus,
    /// 0..=100，单个作业内单调不减
    pub progress_percent: u8,
    pub current_phase: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<AudiobookResult>,
    pub stats: Option<ConversionStats>,
    pub error: Option<String>,
    /// 取消标志，编排器在章节之间检查
    pub cancel_requested: bool,
}

impl ConversionJob {
    /// 创建待处理作业
    pub fn new(
        title: impl Into<String>,
        tier: impl Into<String>,
        voice_id: impl Into<String>,
        chapters: Vec<Chapter>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            tier: tier.into(),
            voice_id: voice_id.into(),
            chapters,
            status: JobStatus::Pending,
            progress_percent: 0,
            current_phase: "Queued for processing".to_string(),
            created_at: Utc::now(),
            completed_at: None,
            result: None,
            stats: None,
            error: None,
            cancel_requested: false,
        }
    }

    /// 创建在接收阶段即失败的作业（提取/分割错误）
    ///
    /// 提交方仍拿到 job_id，轮询时观察到 Failed 终态
    pub fn failed_at_intake(
        title: impl Into<String>,
        tier: impl Into<String>,
        voice_id: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let mut job = Self::new(title, tier, voice_id, Vec::new());
        job.status = JobStatus::Failed;
        job.current_phase = "Failed".to_string();
        job.error = Some(error.into());
        job.completed_at = Some(Utc::now());
        job
    }
}

/// Job Tracker Port
///
/// 管理作业生命周期；所有变更方法对终态作业返回
/// InvalidStateTransition
pub trait JobTrackerPort: Send + Sync {
    /// 登记作业（任意初始状态）
    fn insert(&self, job: ConversionJob) -> Result<Uuid, JobError>;

    /// 将 Pending 作业送入合成队列
    fn enqueue(&self, job_id: Uuid) -> Result<(), JobError>;

    /// 读取作业快照
    fn get(&self, job_id: Uuid) -> Option<ConversionJob>;

    /// 列出所有作业，创建时间倒序
    fn list(&self) -> Vec<ConversionJob>;

    /// Pending → Processing
    fn start_processing(&self, job_id: Uuid) -> Result<(), JobError>;

    /// 更新阶段文本与进度（进度单调不减，钳制到 0..=100）
    fn update_progress(&self, job_id: Uuid, phase: &str, percent: u8) -> Result<(), JobError>;

    /// Processing → Completed，附加结果与统计
    fn complete(
        &self,
        job_id: Uuid,
        result: AudiobookResult,
        stats: ConversionStats,
    ) -> Result<(), JobError>;

    /// → Failed，记录人类可读错误
    fn fail(&self, job_id: Uuid, error: String) -> Result<(), JobError>;

    /// 请求取消（仅 Pending / Processing）
    fn request_cancel(&self, job_id: Uuid) -> Result<(), JobError>;

    /// 取消标志是否已置位
    fn is_cancel_requested(&self, job_id: Uuid) -> bool;
}
