//! Voxbook - 文档转有声书服务
//!
//! - Domain: document, chapter, tier, audiobook
//! - Application: commands, queries, ports
//! - Infrastructure: http, extractor, memory, worker, adapters

use std::sync::Arc;

use tokio::sync::mpsc;
use voxbook::application::{SubmitConfig, TtsEnginePort};
use voxbook::config::{load_config, print_config};
use voxbook::infrastructure::adapters::{
    FakeTtsClient, FileAudioStorage, HttpTtsClient, HttpTtsClientConfig,
};
use voxbook::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxbook::infrastructure::memory::InMemoryJobTracker;
use voxbook::infrastructure::worker::{ConversionWorker, ConversionWorkerConfig};
use voxbook::infrastructure::FormatDocumentExtractor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},voxbook={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Voxbook - 文档转有声书服务");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.audio_dir).await?;

    // 创建文档提取器
    let extractor = Arc::new(FormatDocumentExtractor::new());

    // 创建 TTS 引擎
    let tts_engine: Arc<dyn TtsEnginePort> = if config.tts.fake {
        tracing::warn!("Using fake TTS engine, no external service will be called");
        Arc::new(FakeTtsClient::with_defaults())
    } else {
        let tts_config = HttpTtsClientConfig {
            base_url: config.tts.url.clone(),
            timeout_secs: config.tts.timeout_secs,
        };
        Arc::new(HttpTtsClient::new(tts_config)?)
    };

    // 创建音频文件存储
    let audio_storage = Arc::new(FileAudioStorage::new(&config.storage.audio_dir).await?);

    // 创建作业队列与 Job Tracker
    let (job_tx, job_rx) = mpsc::channel(config.worker.queue_capacity);
    let job_tracker = Arc::new(InMemoryJobTracker::new(job_tx));

    // 创建 ConversionWorker
    let worker_config = ConversionWorkerConfig {
        max_concurrent: config.worker.max_concurrent_jobs,
        chapter_timeout_secs: config.worker.chapter_timeout_secs,
        default_sample_rate: config.tts.sample_rate,
    };
    let worker = ConversionWorker::new(
        worker_config,
        job_rx,
        job_tracker.clone(),
        tts_engine.clone(),
        audio_storage.clone(),
    );

    // 启动 Worker
    tokio::spawn(worker.run());

    // 创建 HTTP 服务器
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_bytes: config.storage.max_upload_size,
    };
    let submit_config = SubmitConfig {
        max_upload_bytes: config.storage.max_upload_size,
        default_voice: config.tts.default_voice.clone(),
        tiers: config.conversion.tier_catalog(),
    };
    let state = AppState::new(
        submit_config,
        job_tracker,
        extractor,
        tts_engine,
        audio_storage,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
