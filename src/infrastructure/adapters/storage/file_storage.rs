//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait，章节音频按作业目录落盘

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{AudioStorageError, AudioStoragePort};

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn get_job_dir(&self, job_id: Uuid) -> PathBuf {
        self.base_dir.join(job_id.to_string())
    }

    fn get_audio_path(&self, job_id: Uuid, chapter_index: u32) -> PathBuf {
        self.get_job_dir(job_id)
            .join(format!("chapter_{}.wav", chapter_index))
    }

    async fn save_audio(
        &self,
        job_id: Uuid,
        chapter_index: u32,
        data: &[u8],
    ) -> Result<PathBuf, AudioStorageError> {
        let job_dir = self.get_job_dir(job_id);

        // 确保作业目录存在
        fs::create_dir_all(&job_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        let audio_path = self.get_audio_path(job_id, chapter_index);

        fs::write(&audio_path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved audio: job={}, chapter={}, size={} bytes",
            job_id,
            chapter_index,
            data.len()
        );

        Ok(audio_path)
    }

    async fn read_audio(
        &self,
        job_id: Uuid,
        chapter_index: u32,
    ) -> Result<Vec<u8>, AudioStorageError> {
        let audio_path = self.get_audio_path(job_id, chapter_index);

        if !audio_path.exists() {
            return Err(AudioStorageError::FileNotFound(
                audio_path.to_string_lossy().to_string(),
            ));
        }

        fs::read(&audio_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }

    async fn audio_exists(&self, job_id: Uuid, chapter_index: u32) -> bool {
        self.get_audio_path(job_id, chapter_index).exists()
    }

    async fn delete_job_audio(&self, job_id: Uuid) -> Result<u64, AudioStorageError> {
        let job_dir = self.get_job_dir(job_id);

        if !job_dir.exists() {
            return Ok(0);
        }

        let mut deleted_count = 0u64;
        let mut entries = fs::read_dir(&job_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
        {
            if entry.path().extension().map_or(false, |ext| ext == "wav") {
                fs::remove_file(entry.path())
                    .await
                    .map_err(|e| AudioStorageError::IoError(e.to_string()))?;
                deleted_count += 1;
            }
        }

        // 尝试删除空目录
        let _ = fs::remove_dir(&job_dir).await;

        tracing::info!("Deleted job audio: job={}, files={}", job_id, deleted_count);

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_and_read_audio() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        let job_id = Uuid::new_v4();
        let data = b"fake wav data";

        let path = storage.save_audio(job_id, 1, data).await.unwrap();
        assert!(path.exists());
        assert!(path.ends_with("chapter_1.wav"));

        let read_data = storage.read_audio(job_id, 1).await.unwrap();
        assert_eq!(read_data, data);

        assert!(storage.audio_exists(job_id, 1).await);
        assert!(!storage.audio_exists(job_id, 2).await);
    }

    #[tokio::test]
    async fn test_read_missing_audio_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        let err = storage.read_audio(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, AudioStorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_job_audio() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        let job_id = Uuid::new_v4();
        for i in 1..=3 {
            storage.save_audio(job_id, i, b"data").await.unwrap();
        }

        let deleted = storage.delete_job_audio(job_id).await.unwrap();
        assert_eq!(deleted, 3);

        for i in 1..=3 {
            assert!(!storage.audio_exists(job_id, i).await);
        }

        // 不存在的作业删除为无操作
        assert_eq!(storage.delete_job_audio(Uuid::new_v4()).await.unwrap(), 0);
    }
}
