//! Conversion HTTP Handlers
//!
//! 上传入队、轮询状态、取结果、取消与章节音频下载

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::{
    CancelConversionCommand, GetChapterAudioQuery, GetJobResultQuery, GetJobStatusQuery,
    SubmitConversionCommand,
};
use crate::infrastructure::http::dto::{
    ApiResponse, Empty, JobResultResponse, JobStatusResponse, SubmitResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// 提交转换作业
///
/// multipart 字段: file（必填）、tier（必填）、voice_id（可选）。
/// 文档解析是 CPU 密集操作，移到阻塞线程池执行
pub async fn submit_conversion(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<SubmitResponse>>, ApiError> {
    let mut filename: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;
    let mut tier: Option<String> = None;
    let mut voice_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                mime_type = field.content_type().map(|s| s.to_string());
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                        .to_vec(),
                );
            }
            "tier" => {
                tier = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read tier: {}", e)))?,
                );
            }
            "voice_id" => {
                voice_id = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read voice_id: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let filename =
        filename.ok_or_else(|| ApiError::BadRequest("File name is required".to_string()))?;
    let tier = tier.ok_or_else(|| ApiError::BadRequest("Tier is required".to_string()))?;
    let mime_type = mime_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let command = SubmitConversionCommand {
        filename,
        mime_type,
        data,
        tier,
        voice_id,
    };

    let state_for_blocking = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        state_for_blocking.submit_handler.handle(command)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Submit task panicked: {}", e)))??;

    Ok(Json(ApiResponse::success(SubmitResponse {
        job_id: result.job_id,
        title: result.title,
        status: result.status.as_str().to_string(),
        chapter_count: result.chapter_count,
    })))
}

/// 查询作业状态（轮询端点）
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JobRequest>,
) -> Result<Json<ApiResponse<JobStatusResponse>>, ApiError> {
    let job = state
        .status_handler
        .handle(GetJobStatusQuery { job_id: req.job_id })?;

    Ok(Json(ApiResponse::success(job.into())))
}

/// 获取有声书结果（仅 Completed 作业）
pub async fn get_job_result(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JobRequest>,
) -> Result<Json<ApiResponse<JobResultResponse>>, ApiError> {
    let job = state
        .status_handler
        .handle(GetJobStatusQuery { job_id: req.job_id })?;
    let (result, stats) = state
        .result_handler
        .handle(GetJobResultQuery { job_id: req.job_id })?;

    Ok(Json(ApiResponse::success(JobResultResponse {
        job_id: req.job_id,
        title: job.title,
        result,
        stats,
    })))
}

/// 请求取消作业
pub async fn cancel_conversion(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JobRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .cancel_handler
        .handle(CancelConversionCommand { job_id: req.job_id })?;

    Ok(Json(ApiResponse::ok()))
}

/// 列出所有作业，创建时间倒序
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<JobStatusResponse>>>, ApiError> {
    let jobs: Vec<JobStatusResponse> = state
        .list_handler
        .handle()
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::success(jobs)))
}

/// 下载章节音频
pub async fn download_chapter_audio(
    State(state): State<Arc<AppState>>,
    Path((job_id, chapter_index)): Path<(Uuid, u32)>,
) -> Result<Response, ApiError> {
    let audio_path = state
        .chapter_audio_handler
        .handle(GetChapterAudioQuery {
            job_id,
            chapter_index,
        })
        .await?;

    let file = tokio::fs::File::open(&audio_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;
    let file_size = metadata.len();

    // 流式返回文件内容
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, file_size)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}_chapter_{}.wav\"",
                job_id, chapter_index
            ),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
