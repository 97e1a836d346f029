//! In-Memory Job Tracker Implementation
//!
//! DashMap 作业注册表 + mpsc 合成队列。作业仅存在于进程内存，
//! 保留窗口之外的清理由外部负责

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::{
    ConversionJob, JobError, JobStatus, JobTrackerPort,
};
use crate::domain::{AudiobookResult, ConversionStats};

/// 内存作业跟踪器
pub struct InMemoryJobTracker {
    /// job_id -> ConversionJob
    jobs: DashMap<Uuid, ConversionJob>,
    /// 合成队列发送端，worker 持有接收端
    queue_sender: mpsc::Sender<Uuid>,
}

impl InMemoryJobTracker {
    pub fn new(queue_sender: mpsc::Sender<Uuid>) -> Self {
        Self {
            jobs: DashMap::new(),
            queue_sender,
        }
    }

    /// 对非终态作业执行变更；终态作业返回 InvalidStateTransition
    fn mutate<F>(&self, job_id: Uuid, f: F) -> Result<(), JobError>
    where
        F: FnOnce(&mut ConversionJob),
    {
        let mut job = self
            .jobs
            .get_mut(&job_id)
            .ok_or(JobError::NotFound(job_id))?;

        if job.status.is_terminal() {
            return Err(JobError::InvalidStateTransition(format!(
                "Job {} is already {}",
                job_id,
                job.status.as_str()
            )));
        }

        f(&mut job);
        Ok(())
    }
}

impl JobTrackerPort for InMemoryJobTracker {
    fn insert(&self, job: ConversionJob) -> Result<Uuid, JobError> {
        let job_id = job.id;
        self.jobs.insert(job_id, job);
        tracing::debug!(job_id = %job_id, "Job registered");
        Ok(job_id)
    }

    fn enqueue(&self, job_id: Uuid) -> Result<(), JobError> {
        let job = self.jobs.get(&job_id).ok_or(JobError::NotFound(job_id))?;
        if job.status != JobStatus::Pending {
            return Err(JobError::InvalidStateTransition(format!(
                "Only pending jobs can be enqueued, job {} is {}",
                job_id,
                job.status.as_str()
            )));
        }
        drop(job);

        if let Err(e) = self.queue_sender.try_send(job_id) {
            tracing::warn!(job_id = %job_id, error = %e, "Failed to enqueue job");
            return Err(JobError::InvalidStateTransition(format!(
                "Synthesis queue unavailable: {}",
                e
            )));
        }
        tracing::debug!(job_id = %job_id, "Job enqueued");
        Ok(())
    }

    fn get(&self, job_id: Uuid) -> Option<ConversionJob> {
        self.jobs.get(&job_id).map(|j| j.clone())
    }

    fn list(&self) -> Vec<ConversionJob> {
        let mut jobs: Vec<ConversionJob> = self.jobs.iter().map(|j| j.clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    fn start_processing(&self, job_id: Uuid) -> Result<(), JobError> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Processing;
            job.current_phase = "Starting synthesis".to_string();
            tracing::debug!(job_id = %job_id, "Job processing started");
        })
    }

    fn update_progress(&self, job_id: Uuid, phase: &str, percent: u8) -> Result<(), JobError> {
        self.mutate(job_id, |job| {
            job.current_phase = phase.to_string();
            // 进度钳制且单调不减
            job.progress_percent = job.progress_percent.max(percent.min(100));
        })
    }

    fn complete(
        &self,
        job_id: Uuid,
        result: AudiobookResult,
        stats: ConversionStats,
    ) -> Result<(), JobError> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Completed;
            job.progress_percent = 100;
            job.current_phase = "Completed".to_string();
            job.result = Some(result);
            job.stats = Some(stats);
            job.completed_at = Some(Utc::now());
            tracing::info!(job_id = %job_id, "Job completed");
        })
    }

    fn fail(&self, job_id: Uuid, error: String) -> Result<(), JobError> {
        self.mutate(job_id, |job| {
            job.status = JobStatus::Failed;
            job.current_phase = "Failed".to_string();
            job.error = Some(error);
            job.completed_at = Some(Utc::now());
            tracing::info!(job_id = %job_id, "Job failed");
        })
    }

    fn request_cancel(&self, job_id: Uuid) -> Result<(), JobError> {
        self.mutate(job_id, |job| {
            job.cancel_requested = true;
        })
    }

    fn is_cancel_requested(&self, job_id: Uuid) -> bool {
        self.jobs
            .get(&job_id)
            .map(|j| j.cancel_requested)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{assemble_audiobook, compute_stats, Chapter};

    fn tracker() -> (InMemoryJobTracker, mpsc::Receiver<Uuid>) {
        let (tx, rx) = mpsc::channel(16);
        (InMemoryJobTracker::new(tx), rx)
    }

    fn pending_job() -> ConversionJob {
        ConversionJob::new(
            "book",
            "free",
            "narrator-1",
            vec![Chapter::new(1, "Chapter 1", "some body text")],
        )
    }

    #[test]
    fn test_job_lifecycle() {
        let (tracker, mut rx) = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();

        tracker.enqueue(job_id).unwrap();
        assert_eq!(rx.try_recv().unwrap(), job_id);

        tracker.start_processing(job_id).unwrap();
        assert_eq!(tracker.get(job_id).unwrap().status, JobStatus::Processing);

        tracker
            .update_progress(job_id, "Synthesizing chapter 1 of 1", 50)
            .unwrap();
        let job = tracker.get(job_id).unwrap();
        assert_eq!(job.progress_percent, 50);
        assert_eq!(job.current_phase, "Synthesizing chapter 1 of 1");

        let result = assemble_audiobook(vec![], 24000, "wav");
        let stats = compute_stats(&[], 0, 1.0);
        tracker.complete(job_id, result, stats).unwrap();

        let job = tracker.get(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress_percent, 100);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_terminal_state_immutable() {
        let (tracker, _rx) = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();
        tracker.fail(job_id, "CorruptDocument: boom".to_string()).unwrap();

        assert!(tracker.start_processing(job_id).is_err());
        assert!(tracker.update_progress(job_id, "phase", 10).is_err());
        assert!(tracker.fail(job_id, "again".to_string()).is_err());
        assert!(tracker.request_cancel(job_id).is_err());

        // 终态快照保持不变
        let job = tracker.get(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("CorruptDocument: boom"));
    }

    #[test]
    fn test_progress_monotonic_and_clamped() {
        let (tracker, _rx) = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();
        tracker.start_processing(job_id).unwrap();

        tracker.update_progress(job_id, "a", 60).unwrap();
        tracker.update_progress(job_id, "b", 40).unwrap();
        assert_eq!(tracker.get(job_id).unwrap().progress_percent, 60);

        tracker.update_progress(job_id, "c", 255).unwrap();
        assert_eq!(tracker.get(job_id).unwrap().progress_percent, 100);
    }

    #[test]
    fn test_enqueue_requires_pending() {
        let (tracker, _rx) = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();
        tracker.start_processing(job_id).unwrap();
        assert!(tracker.enqueue(job_id).is_err());
    }

    #[test]
    fn test_cancel_flag() {
        let (tracker, _rx) = tracker();
        let job_id = tracker.insert(pending_job()).unwrap();

        assert!(!tracker.is_cancel_requested(job_id));
        tracker.request_cancel(job_id).unwrap();
        assert!(tracker.is_cancel_requested(job_id));

        // 未知作业视为未请求取消
        assert!(!tracker.is_cancel_requested(Uuid::new_v4()));
    }

    #[test]
    fn test_list_newest_first() {
        let (tracker, _rx) = tracker();
        let first = tracker.insert(pending_job()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = tracker.insert(pending_job()).unwrap();

        let jobs = tracker.list();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, second);
        assert_eq!(jobs[1].id, first);
    }
}
