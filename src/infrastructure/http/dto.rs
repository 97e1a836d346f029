//! Data Transfer Objects

use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::ConversionJob;
use crate::domain::{AudiobookResult, ConversionStats};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Conversion DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: Uuid,
    pub title: String,
    pub status: String,
    pub chapter_count: usize,
}

/// 作业状态快照，轮询端点的响应体
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub title: String,
    pub tier: String,
    pub voice_id: String,
    pub status: String,
    pub progress_percent: u8,
    pub current_phase: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ConversionJob> for JobStatusResponse {
    fn from(job: ConversionJob) -> Self {
        Self {
            job_id: job.id,
            title: job.title,
            tier: job.tier,
            voice_id: job.voice_id,
            status: job.status.as_str().to_string(),
            progress_percent: job.progress_percent,
            current_phase: job.current_phase,
            created_at: job.created_at.to_rfc3339(),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
            error: job.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResultResponse {
    pub job_id: Uuid,
    pub title: String,
    pub result: AudiobookResult,
    pub stats: ConversionStats,
}
