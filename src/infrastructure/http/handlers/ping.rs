//! Ping Handler - 健康检查

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// 合成引擎可达性
    pub tts_engine: &'static str,
}

/// Ping endpoint - 健康检查，顺带汇报 TTS 引擎可达性
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let tts_up = state.tts_engine.health_check().await;

    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tts_engine: if tts_up { "up" } else { "down" },
    })
}
