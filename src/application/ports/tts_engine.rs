//! TTS Engine Port - 神经 TTS 合成引擎抽象
//!
//! 引擎契约：文本 + 音色 ID → 音频字节 + 实测时长。
//! 声学建模在引擎内部，不属于本系统范围

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的章节正文
    pub text: String,
    /// 音色 ID
    pub voice_id: String,
}

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// 原始音频数据（WAV）
    pub audio_data: Vec<u8>,
    /// 引擎实测的音频时长（秒）
    pub duration_seconds: f64,
    /// 采样率
    pub sample_rate: Option<u32>,
}

/// TTS Engine Port
///
/// 外部合成服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成单章音频
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;

    /// 检查引擎是否可达
    ///
    /// 作业开始前不可达时整个作业以 EngineUnavailable 失败
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
