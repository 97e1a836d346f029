//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/conversion/submit  POST  上传文档并创建转换作业
//! - /api/conversion/status  POST  查询作业状态（轮询）
//! - /api/conversion/result  POST  获取有声书结果（仅 Completed）
//! - /api/conversion/cancel  POST  请求取消作业
//! - /api/conversion/list    GET   列出所有作业
//! - /api/conversion/audio/{job_id}/{chapter_index}  GET  下载章节音频
//! - /api/ping               GET   健康检查（含 TTS 引擎可达性）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/conversion", conversion_routes())
}

/// Conversion 路由
fn conversion_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(handlers::submit_conversion))
        .route("/status", post(handlers::get_job_status))
        .route("/result", post(handlers::get_job_result))
        .route("/cancel", post(handlers::cancel_conversion))
        .route("/list", get(handlers::list_jobs))
        .route(
            "/audio/:job_id/:chapter_index",
            get(handlers::download_chapter_audio),
        )
}
