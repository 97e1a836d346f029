//! Conversion Worker - 后台有声书合成编排器
//!
//! 从队列消费作业，逐章顺序合成。单章失败记录后继续，
//! 引擎不可达与取消是流水线级失败

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::{
    AudioStoragePort, JobTrackerPort, SynthesisRequest, TtsEnginePort,
};
use crate::domain::{assemble_audiobook, compute_stats, ChapterAudioResult};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct ConversionWorkerConfig {
    /// 最大并发作业数
    pub max_concurrent: usize,
    /// 单章合成超时（秒）
    pub chapter_timeout_secs: u64,
    /// 引擎未汇报采样率时的回退值
    pub default_sample_rate: u32,
}

impl Default for ConversionWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            chapter_timeout_secs: 300,
            default_sample_rate: 24000,
        }
    }
}

/// 转换 Worker
///
/// 后台作业处理器，从队列消费作业并驱动章节合成循环
pub struct ConversionWorker {
    config: ConversionWorkerConfig,
    queue_receiver: mpsc::Receiver<Uuid>,
    job_tracker: Arc<dyn JobTrackerPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl ConversionWorker {
    pub fn new(
        config: ConversionWorkerConfig,
        queue_receiver: mpsc::Receiver<Uuid>,
        job_tracker: Arc<dyn JobTrackerPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            job_tracker,
            tts_engine,
            storage,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "ConversionWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrent));

        while let Some(job_id) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    tracing::error!("Failed to acquire semaphore permit");
                    continue;
                }
            };

            let config = self.config.clone();
            let job_tracker = self.job_tracker.clone();
            let tts_engine = self.tts_engine.clone();
            let storage = self.storage.clone();

            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到作业完成

                Self::process_job(job_id, config, job_tracker, tts_engine, storage).await;
            });
        }

        tracing::info!("ConversionWorker stopped");
    }

    /// 处理单个作业
    async fn process_job(
        job_id: Uuid,
        config: ConversionWorkerConfig,
        job_tracker: Arc<dyn JobTrackerPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
    ) {
        let job = match job_tracker.get(job_id) {
            Some(j) => j,
            None => {
                tracing::warn!(job_id = %job_id, "Job not found, skipping");
                return;
            }
        };

        // Check 1: 开始前已请求取消
        if job_tracker.is_cancel_requested(job_id) {
            tracing::debug!(job_id = %job_id, "Job cancelled before start");
            let _ = job_tracker.fail(job_id, "Cancelled: conversion cancelled by user".to_string());
            return;
        }

        if let Err(e) = job_tracker.start_processing(job_id) {
            tracing::error!(job_id = %job_id, error = %e, "Failed to start job");
            return;
        }

        // Check 2: 引擎可达性。合成开始前不可达则整个作业失败
        if !tts_engine.health_check().await {
            tracing::error!(job_id = %job_id, "TTS engine unavailable");
            let _ = job_tracker.fail(
                job_id,
                "EngineUnavailable: TTS engine is not reachable".to_string(),
            );
            return;
        }

        let total = job.chapters.len();
        let total_words: usize = job.chapters.iter().map(|c| c.word_count).sum();
        let chapter_timeout = Duration::from_secs(config.chapter_timeout_secs);
        let started = std::time::Instant::now();

        let mut results = Vec::with_capacity(total);
        let mut sample_rate: Option<u32> = None;

        for (processed, chapter) in job.chapters.iter().enumerate() {
            // Check 3: 章节之间响应取消。不打断合成中的章节
            if job_tracker.is_cancel_requested(job_id) {
                tracing::info!(
                    job_id = %job_id,
                    chapters_done = processed,
                    "Job cancelled between chapters"
                );
                let _ = job_tracker
                    .fail(job_id, "Cancelled: conversion cancelled by user".to_string());
                if let Err(e) = storage.delete_job_audio(job_id).await {
                    tracing::warn!(job_id = %job_id, error = %e, "Failed to clean up audio");
                }
                return;
            }

            let phase = format!("Synthesizing chapter {} of {}", chapter.index, total);
            let percent = (processed * 100 / total) as u8;
            let _ = job_tracker.update_progress(job_id, &phase, percent);

            let request = SynthesisRequest {
                text: chapter.body.clone(),
                voice_id: job.voice_id.clone(),
            };

            let result = match tokio::time::timeout(chapter_timeout, tts_engine.synthesize(request))
                .await
            {
                Err(_) => {
                    tracing::warn!(
                        job_id = %job_id,
                        chapter = chapter.index,
                        timeout_secs = config.chapter_timeout_secs,
                        "Chapter synthesis timed out"
                    );
                    ChapterAudioResult::failed(
                        chapter.index,
                        &chapter.title,
                        &job.voice_id,
                        format!(
                            "Synthesis timed out after {} seconds",
                            config.chapter_timeout_secs
                        ),
                    )
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        job_id = %job_id,
                        chapter = chapter.index,
                        error = %e,
                        "Chapter synthesis failed"
                    );
                    ChapterAudioResult::failed(
                        chapter.index,
                        &chapter.title,
                        &job.voice_id,
                        e.to_string(),
                    )
                }
                Ok(Ok(response)) => {
                    match storage
                        .save_audio(job_id, chapter.index, &response.audio_data)
                        .await
                    {
                        Ok(path) => {
                            if sample_rate.is_none() {
                                sample_rate = response.sample_rate;
                            }
                            ChapterAudioResult::succeeded(
                                chapter.index,
                                &chapter.title,
                                &job.voice_id,
                                path.to_string_lossy(),
                                response.duration_seconds,
                                response.audio_data.len() as u64,
                            )
                        }
                        Err(e) => {
                            tracing::error!(
                                job_id = %job_id,
                                chapter = chapter.index,
                                error = %e,
                                "Failed to persist chapter audio"
                            );
                            ChapterAudioResult::failed(
                                chapter.index,
                                &chapter.title,
                                &job.voice_id,
                                format!("Storage error: {}", e),
                            )
                        }
                    }
                }
            };

            results.push(result);
            let percent = ((processed + 1) * 100 / total) as u8;
            let _ = job_tracker.update_progress(
                job_id,
                &format!("Synthesized chapter {} of {}", chapter.index, total),
                percent,
            );
        }

        let elapsed = started.elapsed().as_secs_f64();
        let stats = compute_stats(&results, total_words, elapsed);
        let result = assemble_audiobook(
            results,
            sample_rate.unwrap_or(config.default_sample_rate),
            "wav",
        );

        tracing::info!(
            job_id = %job_id,
            chapters = total,
            succeeded = stats.chapters_successfully_converted,
            elapsed_seconds = elapsed,
            "Conversion completed"
        );

        if let Err(e) = job_tracker.complete(job_id, result, stats) {
            tracing::error!(job_id = %job_id, error = %e, "Failed to mark job completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ConversionJob, JobStatus};
    use crate::domain::Chapter;
    use crate::infrastructure::adapters::storage::FileAudioStorage;
    use crate::infrastructure::adapters::tts::{FakeTtsClient, FakeTtsClientConfig};
    use crate::infrastructure::memory::InMemoryJobTracker;
    use tempfile::tempdir;

    struct Harness {
        tracker: Arc<InMemoryJobTracker>,
        _dir: tempfile::TempDir,
    }

    async fn spawn_worker(config: ConversionWorkerConfig, tts: Arc<FakeTtsClient>) -> Harness {
        let dir = tempdir().unwrap();
        let (tx, rx) = mpsc::channel(16);
        let tracker = Arc::new(InMemoryJobTracker::new(tx));
        let storage = Arc::new(FileAudioStorage::new(dir.path()).await.unwrap());

        let worker = ConversionWorker::new(config, rx, tracker.clone(), tts, storage);
        tokio::spawn(worker.run());

        Harness {
            tracker,
            _dir: dir,
        }
    }

    fn book_job(bodies: &[&str]) -> ConversionJob {
        let chapters = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| Chapter::new(i as u32 + 1, format!("Chapter {}", i + 1), *body))
            .collect();
        ConversionJob::new("sample-book", "free", "narrator-female-1", chapters)
    }

    async fn wait_terminal(tracker: &InMemoryJobTracker, job_id: Uuid) -> ConversionJob {
        for _ in 0..200 {
            if let Some(job) = tracker.get(job_id) {
                if job.status.is_terminal() {
                    return job;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job did not reach a terminal state");
    }

    #[tokio::test]
    async fn test_full_pipeline_completes() {
        let harness = spawn_worker(
            ConversionWorkerConfig::default(),
            Arc::new(FakeTtsClient::with_defaults()),
        )
        .await;

        let job = book_job(&["first chapter text here", "second chapter text here"]);
        let job_id = harness.tracker.insert(job).unwrap();
        harness.tracker.enqueue(job_id).unwrap();

        let job = wait_terminal(&harness.tracker, job_id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress_percent, 100);

        let result = job.result.unwrap();
        assert_eq!(result.chapter_count, 2);
        assert!(result.chapters.iter().all(|c| c.success));
        assert!(result.total_duration_seconds > 0.0);
        assert!(result.total_size_bytes > 0);

        let stats = job.stats.unwrap();
        assert_eq!(stats.chapters_successfully_converted, 2);
        assert!((stats.conversion_success_rate - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_chapter_failure_is_isolated() {
        let tts = Arc::new(FakeTtsClient::with_defaults());
        tts.fail_on("MARKER");
        let harness = spawn_worker(ConversionWorkerConfig::default(), tts).await;

        let job = book_job(&["fine one", "bad MARKER chapter", "fine two", "fine three"]);
        let job_id = harness.tracker.insert(job).unwrap();
        harness.tracker.enqueue(job_id).unwrap();

        let job = wait_terminal(&harness.tracker, job_id).await;
        assert_eq!(job.status, JobStatus::Completed);

        let result = job.result.unwrap();
        assert_eq!(result.chapter_count, 4);
        let failed: Vec<_> = result.chapters.iter().filter(|c| !c.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].chapter_index, 2);
        assert!(failed[0].error.is_some());
        assert_eq!(failed[0].duration_seconds, 0.0);

        let stats = job.stats.unwrap();
        assert_eq!(stats.chapters_successfully_converted, 3);
        assert!((stats.conversion_success_rate - 75.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_engine_unavailable_fails_job() {
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            healthy: false,
            ..Default::default()
        }));
        let harness = spawn_worker(ConversionWorkerConfig::default(), tts).await;

        let job = book_job(&["some text"]);
        let job_id = harness.tracker.insert(job).unwrap();
        harness.tracker.enqueue(job_id).unwrap();

        let job = wait_terminal(&harness.tracker, job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("EngineUnavailable"));
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_cancel_before_start_fails_with_cancelled() {
        let harness = spawn_worker(
            ConversionWorkerConfig::default(),
            Arc::new(FakeTtsClient::with_defaults()),
        )
        .await;

        let job = book_job(&["a", "b"]);
        let job_id = harness.tracker.insert(job).unwrap();
        harness.tracker.request_cancel(job_id).unwrap();
        harness.tracker.enqueue(job_id).unwrap();

        let job = wait_terminal(&harness.tracker, job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("Cancelled"));
    }
}
