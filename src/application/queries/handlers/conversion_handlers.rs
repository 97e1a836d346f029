//! Conversion Query Handlers - 轮询读取
//!
//! 所有查询都是 Job Tracker 状态的非阻塞读取

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, ConversionJob, JobStatus, JobTrackerPort,
};
use crate::application::queries::conversion_queries::*;
use crate::domain::{AudiobookResult, ConversionStats};

/// GetJobStatus Handler
pub struct GetJobStatusHandler {
    job_tracker: Arc<dyn JobTrackerPort>,
}

impl GetJobStatusHandler {
    pub fn new(job_tracker: Arc<dyn JobTrackerPort>) -> Self {
        Self { job_tracker }
    }

    pub fn handle(&self, query: GetJobStatusQuery) -> Result<ConversionJob, ApplicationError> {
        self.job_tracker
            .get(query.job_id)
            .ok_or_else(|| ApplicationError::not_found("Job", query.job_id))
    }
}

/// ListJobs Handler - 创建时间倒序
pub struct ListJobsHandler {
    job_tracker: Arc<dyn JobTrackerPort>,
}

impl ListJobsHandler {
    pub fn new(job_tracker: Arc<dyn JobTrackerPort>) -> Self {
        Self { job_tracker }
    }

    pub fn handle(&self) -> Vec<ConversionJob> {
        self.job_tracker.list()
    }
}

/// GetJobResult Handler
///
/// 仅对 Completed 作业返回结果；部分章节失败的作业仍返回完整的
/// AudiobookResult，缺口通过 conversion_success_rate 体现
pub struct GetJobResultHandler {
    job_tracker: Arc<dyn JobTrackerPort>,
}

impl GetJobResultHandler {
    pub fn new(job_tracker: Arc<dyn JobTrackerPort>) -> Self {
        Self { job_tracker }
    }

    pub fn handle(
        &self,
        query: GetJobResultQuery,
    ) -> Result<(AudiobookResult, ConversionStats), ApplicationError> {
        let job = self
            .job_tracker
            .get(query.job_id)
            .ok_or_else(|| ApplicationError::not_found("Job", query.job_id))?;

        if job.status != JobStatus::Completed {
            return Err(ApplicationError::invalid_state(format!(
                "Job is {}, result is only available once completed",
                job.status.as_str()
            )));
        }

        match (job.result, job.stats) {
            (Some(result), Some(stats)) => Ok((result, stats)),
            _ => Err(ApplicationError::internal(
                "Completed job has no result attached",
            )),
        }
    }
}

/// GetChapterAudio Handler
///
/// 解析 audio_ref 为可服务的文件路径
pub struct GetChapterAudioHandler {
    job_tracker: Arc<dyn JobTrackerPort>,
    audio_storage: Arc<dyn AudioStoragePort>,
}

impl GetChapterAudioHandler {
    pub fn new(
        job_tracker: Arc<dyn JobTrackerPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            job_tracker,
            audio_storage,
        }
    }

    pub async fn handle(
        &self,
        query: GetChapterAudioQuery,
    ) -> Result<PathBuf, ApplicationError> {
        let job = self
            .job_tracker
            .get(query.job_id)
            .ok_or_else(|| ApplicationError::not_found("Job", query.job_id))?;

        if job.status != JobStatus::Completed {
            return Err(ApplicationError::invalid_state(format!(
                "Job is {}, audio is only available once completed",
                job.status.as_str()
            )));
        }

        if !self
            .audio_storage
            .audio_exists(query.job_id, query.chapter_index)
            .await
        {
            return Err(ApplicationError::validation(format!(
                "No audio for chapter {} of job {}",
                query.chapter_index, query.job_id
            )));
        }

        Ok(self
            .audio_storage
            .get_audio_path(query.job_id, query.chapter_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{assemble_audiobook, compute_stats, Chapter, ChapterAudioResult};
    use crate::infrastructure::adapters::storage::FileAudioStorage;
    use crate::infrastructure::memory::InMemoryJobTracker;
    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn tracker() -> Arc<InMemoryJobTracker> {
        let (tx, _rx) = mpsc::channel(16);
        Arc::new(InMemoryJobTracker::new(tx))
    }

    fn pending_job() -> ConversionJob {
        ConversionJob::new(
            "sample-book",
            "free",
            "narrator-female-1",
            vec![Chapter::new(1, "Chapter 1", "some body text")],
        )
    }

    /// 走完整状态机把作业推进到 Completed，附带单章结果
    fn complete_job(tracker: &InMemoryJobTracker) -> Uuid {
        let job_id = tracker.insert(pending_job()).unwrap();
        tracker.start_processing(job_id).unwrap();
        let chapters = vec![ChapterAudioResult::succeeded(
            1,
            "Chapter 1",
            "narrator-female-1",
            "audio/chapter_1.wav",
            2.5,
            4096,
        )];
        let stats = compute_stats(&chapters, 3, 1.0);
        let result = assemble_audiobook(chapters, 24000, "wav");
        tracker.complete(job_id, result, stats).unwrap();
        job_id
    }

    #[test]
    fn test_status_unknown_job_is_not_found() {
        let handler = GetJobStatusHandler::new(tracker());
        let err = handler
            .handle(GetJobStatusQuery {
                job_id: Uuid::new_v4(),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[test]
    fn test_result_unavailable_before_completion() {
        let tracker = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();
        let handler = GetJobResultHandler::new(tracker.clone());

        // Pending 与 Processing 都不允许读取结果
        let err = handler.handle(GetJobResultQuery { job_id }).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));

        tracker.start_processing(job_id).unwrap();
        let err = handler.handle(GetJobResultQuery { job_id }).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[test]
    fn test_result_unavailable_for_failed_job() {
        let tracker = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();
        tracker.fail(job_id, "boom".to_string()).unwrap();

        let handler = GetJobResultHandler::new(tracker);
        let err = handler.handle(GetJobResultQuery { job_id }).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[test]
    fn test_result_returned_once_completed() {
        let tracker = tracker();
        let job_id = complete_job(&tracker);

        let handler = GetJobResultHandler::new(tracker);
        let (result, stats) = handler.handle(GetJobResultQuery { job_id }).unwrap();
        assert_eq!(result.chapter_count, 1);
        assert_eq!(stats.chapters_successfully_converted, 1);
    }

    #[test]
    fn test_completed_job_without_result_is_internal_error() {
        let tracker = tracker();
        let mut job = pending_job();
        job.status = JobStatus::Completed;
        let job_id = tracker.insert(job).unwrap();

        let handler = GetJobResultHandler::new(tracker);
        let err = handler.handle(GetJobResultQuery { job_id }).unwrap_err();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_chapter_audio_unavailable_before_completion() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(FileAudioStorage::new(dir.path()).await.unwrap());
        let tracker = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();

        let handler = GetChapterAudioHandler::new(tracker, storage);
        let err = handler
            .handle(GetChapterAudioQuery {
                job_id,
                chapter_index: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_chapter_audio_missing_file_is_rejected() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(FileAudioStorage::new(dir.path()).await.unwrap());
        let tracker = tracker();
        let job_id = complete_job(&tracker);

        // 作业已完成但该章节从未落盘
        let handler = GetChapterAudioHandler::new(tracker, storage);
        let err = handler
            .handle(GetChapterAudioQuery {
                job_id,
                chapter_index: 7,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_chapter_audio_resolves_saved_path() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(FileAudioStorage::new(dir.path()).await.unwrap());
        let tracker = tracker();
        let job_id = complete_job(&tracker);
        storage.save_audio(job_id, 1, b"wav bytes").await.unwrap();

        let handler = GetChapterAudioHandler::new(tracker, storage.clone());
        let path = handler
            .handle(GetChapterAudioQuery {
                job_id,
                chapter_index: 1,
            })
            .await
            .unwrap();
        assert_eq!(path, storage.get_audio_path(job_id, 1));
        assert!(path.exists());
    }
}
