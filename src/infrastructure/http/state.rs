//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CancelConversionHandler, SubmitConfig, SubmitConversionHandler,
    // Query handlers
    GetChapterAudioHandler, GetJobResultHandler, GetJobStatusHandler, ListJobsHandler,
    // Ports
    AudioStoragePort, DocumentExtractorPort, JobTrackerPort, TtsEnginePort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    // 各端口经 Handler 持有；只有 ping 需要直接访问 TTS 引擎
    pub tts_engine: Arc<dyn TtsEnginePort>,

    // ========== Command Handlers ==========
    pub submit_handler: SubmitConversionHandler,
    pub cancel_handler: CancelConversionHandler,

    // ========== Query Handlers ==========
    pub status_handler: GetJobStatusHandler,
    pub list_handler: ListJobsHandler,
    pub result_handler: GetJobResultHandler,
    pub chapter_audio_handler: GetChapterAudioHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        submit_config: SubmitConfig,
        job_tracker: Arc<dyn JobTrackerPort>,
        extractor: Arc<dyn DocumentExtractorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        audio_storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            tts_engine,

            submit_handler: SubmitConversionHandler::new(
                submit_config,
                extractor,
                job_tracker.clone(),
            ),
            cancel_handler: CancelConversionHandler::new(job_tracker.clone()),

            status_handler: GetJobStatusHandler::new(job_tracker.clone()),
            list_handler: ListJobsHandler::new(job_tracker.clone()),
            result_handler: GetJobResultHandler::new(job_tracker.clone()),
            chapter_audio_handler: GetChapterAudioHandler::new(job_tracker, audio_storage),
        }
    }
}
