//! Fake TTS Client - 用于测试与离线运行的 TTS 客户端
//!
//! 不调用外部服务。按词数生成确定性的假音频与时长，
//! 可按章节文本注入失败用于编排器测试

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
use crate::domain::count_words;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 每词折算的音频时长（秒），对应约 150 词/分的朗读速度
    pub seconds_per_word: f64,
    /// 每秒音频折算的字节数
    pub bytes_per_second: usize,
    /// 采样率
    pub sample_rate: u32,
    /// 是否汇报健康
    pub healthy: bool,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            seconds_per_word: 0.4,
            bytes_per_second: 2048,
            sample_rate: 24000,
            healthy: true,
        }
    }
}

/// Fake TTS Client
///
/// 文本中出现注册的失败标记时返回 ServiceError，其余请求
/// 返回与词数成正比的假音频
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    fail_markers: Mutex<HashSet<String>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            fail_markers: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 注册失败标记：文本包含该子串的请求将合成失败
    pub fn fail_on(&self, marker: impl Into<String>) {
        if let Ok(mut markers) = self.fail_markers.lock() {
            markers.insert(marker.into());
        }
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let should_fail = self
            .fail_markers
            .lock()
            .map(|markers| markers.iter().any(|m| request.text.contains(m)))
            .unwrap_or(false);
        if should_fail {
            return Err(TtsError::ServiceError(
                "synthetic failure injected".to_string(),
            ));
        }

        let words = count_words(&request.text).max(1);
        let duration_seconds = words as f64 * self.config.seconds_per_word;
        let size = (duration_seconds * self.config.bytes_per_second as f64) as usize;

        tracing::debug!(
            words = words,
            voice_id = %request.voice_id,
            duration_seconds = duration_seconds,
            "FakeTtsClient: returning synthetic audio"
        );

        Ok(SynthesisResponse {
            audio_data: vec![0u8; size.max(1)],
            duration_seconds,
            sample_rate: Some(self.config.sample_rate),
        })
    }

    async fn health_check(&self) -> bool {
        self.config.healthy
    }
}
