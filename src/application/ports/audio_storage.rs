//! Audio Storage Port - 音频制品存储抽象
//!
//! 章节音频按 {job_id}/chapter_{index}.wav 落盘，作业之间的键
//! 永不冲突，存储层无需加锁

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 获取作业的音频存储目录
    fn get_job_dir(&self, job_id: Uuid) -> PathBuf;

    /// 获取章节音频文件路径
    fn get_audio_path(&self, job_id: Uuid, chapter_index: u32) -> PathBuf;

    /// 保存章节音频，返回写入路径
    async fn save_audio(
        &self,
        job_id: Uuid,
        chapter_index: u32,
        data: &[u8],
    ) -> Result<PathBuf, AudioStorageError>;

    /// 读取章节音频
    async fn read_audio(
        &self,
        job_id: Uuid,
        chapter_index: u32,
    ) -> Result<Vec<u8>, AudioStorageError>;

    /// 检查章节音频是否存在
    async fn audio_exists(&self, job_id: Uuid, chapter_index: u32) -> bool;

    /// 删除作业的所有音频，返回删除的文件数
    async fn delete_job_audio(&self, job_id: Uuid) -> Result<u64, AudioStorageError>;
}
