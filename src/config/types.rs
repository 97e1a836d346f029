//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{TierCatalog, TierLimits};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 转换流程配置
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// 后台 Worker 配置
    #[serde(default)]
    pub worker: WorkerConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 单次 HTTP 请求超时（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 未指定音色时使用的默认音色 ID
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// 引擎未汇报采样率时的回退值（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 是否使用离线假引擎（测试与演示用）
    #[serde(default)]
    pub fake: bool,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_voice() -> String {
    "narrator-female-1".to_string()
}

fn default_sample_rate() -> u32 {
    24000
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            default_voice: default_voice(),
            sample_rate: default_sample_rate(),
            fake: false,
        }
    }
}

/// 转换流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    /// 层级限额表：层级名 → 限额
    ///
    /// 空表时使用内置默认（sample 5×50、free 10×250、premium 不限）
    #[serde(default)]
    pub tiers: HashMap<String, TierLimits>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            tiers: HashMap::new(),
        }
    }
}

impl ConversionConfig {
    /// 构建层级限额表
    pub fn tier_catalog(&self) -> TierCatalog {
        if self.tiers.is_empty() {
            TierCatalog::default()
        } else {
            TierCatalog::new(self.tiers.clone())
        }
    }
}

/// 后台 Worker 配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// 最大并发作业数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_jobs: usize,

    /// 作业队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 单章合成超时（秒）
    #[serde(default = "default_chapter_timeout")]
    pub chapter_timeout_secs: u64,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    64
}

fn default_chapter_timeout() -> u64 {
    300
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
            chapter_timeout_secs: default_chapter_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频存储目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// 上传文件最大大小（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

fn default_max_upload_size() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.tts.url, "http://localhost:8000");
        assert_eq!(config.tts.default_voice, "narrator-female-1");
        assert_eq!(config.worker.max_concurrent_jobs, 2);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5070");
    }

    #[test]
    fn test_empty_tiers_fall_back_to_builtin() {
        let config = ConversionConfig::default();
        let catalog = config.tier_catalog();
        assert_eq!(catalog.lookup("sample"), Some(TierLimits::new(5, 50)));
        assert_eq!(catalog.lookup("premium"), Some(TierLimits::UNBOUNDED));
    }

    #[test]
    fn test_configured_tiers_replace_builtin() {
        let mut tiers = HashMap::new();
        tiers.insert("trial".to_string(), TierLimits::new(2, 20));
        let config = ConversionConfig { tiers };
        let catalog = config.tier_catalog();
        assert_eq!(catalog.lookup("trial"), Some(TierLimits::new(2, 20)));
        assert_eq!(catalog.lookup("sample"), None);
    }
}
