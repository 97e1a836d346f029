//! Conversion Queries - 作业状态/结果查询定义

use uuid::Uuid;

/// 查询作业状态
#[derive(Debug)]
pub struct GetJobStatusQuery {
    pub job_id: Uuid,
}

/// 查询作业结果（仅 Completed 作业可用）
#[derive(Debug)]
pub struct GetJobResultQuery {
    pub job_id: Uuid,
}

/// 查询章节音频
#[derive(Debug)]
pub struct GetChapterAudioQuery {
    pub job_id: Uuid,
    pub chapter_index: u32,
}
