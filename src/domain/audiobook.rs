//! Audiobook Context - 合成结果与统计
//!
//! 每章合成尝试产出一条 ChapterAudioResult；全部章节落定后，
//! 结果装配器一次性派生 AudiobookResult 与 ConversionStats。
//! 两者从不增量修改，避免读取方观察到与章节列表不一致的统计

use serde::{Deserialize, Serialize};

/// 单章合成结果
///
/// 写入后不可变。失败的章节保留 error 信息，不影响其余章节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterAudioResult {
    pub chapter_index: u32,
    pub title: String,
    /// 实际使用的音色 ID
    pub speaker_used: String,
    /// 音频制品的引用（文件路径或下载 URL）
    pub audio_ref: String,
    pub duration_seconds: f64,
    pub audio_size_bytes: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChapterAudioResult {
    /// 成功的章节结果
    pub fn succeeded(
        chapter_index: u32,
        title: impl Into<String>,
        speaker_used: impl Into<String>,
        audio_ref: impl Into<String>,
        duration_seconds: f64,
        audio_size_bytes: u64,
    ) -> Self {
        Self {
            chapter_index,
            title: title.into(),
            speaker_used: speaker_used.into(),
            audio_ref: audio_ref.into(),
            duration_seconds,
            audio_size_bytes,
            success: true,
            error: None,
        }
    }

    /// 失败的章节结果
    pub fn failed(
        chapter_index: u32,
        title: impl Into<String>,
        speaker_used: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            chapter_index,
            title: title.into(),
            speaker_used: speaker_used.into(),
            audio_ref: String::new(),
            duration_seconds: 0.0,
            audio_size_bytes: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// 有声书结果
///
/// 播放客户端消费的聚合对象，整体派生、整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudiobookResult {
    pub chapters: Vec<ChapterAudioResult>,
    pub chapter_count: usize,
    pub total_duration_seconds: f64,
    pub total_size_bytes: u64,
    pub sample_rate: u32,
    pub format: String,
}

/// 转换统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_chapters_found: usize,
    pub chapters_successfully_converted: usize,
    pub total_words_processed: usize,
    /// 成功率百分比；0 次尝试时报 0 而非错误
    pub conversion_success_rate: f64,
    pub total_processing_time_seconds: f64,
    /// 每秒处理词数；耗时为 0 时报 0 而非错误
    pub processing_efficiency_words_per_second: f64,
}

/// 装配有声书结果
///
/// 在全部章节落定之后调用一次，失败章节计入列表但不贡献时长与体积
pub fn assemble_audiobook(
    chapters: Vec<ChapterAudioResult>,
    sample_rate: u32,
    format: impl Into<String>,
) -> AudiobookResult {
    let total_duration_seconds = chapters
        .iter()
        .filter(|c| c.success)
        .map(|c| c.duration_seconds)
        .sum();
    let total_size_bytes = chapters
        .iter()
        .filter(|c| c.success)
        .map(|c| c.audio_size_bytes)
        .sum();
    let chapter_count = chapters.len();

    AudiobookResult {
        chapters,
        chapter_count,
        total_duration_seconds,
        total_size_bytes,
        sample_rate,
        format: format.into(),
    }
}

/// 计算转换统计
///
/// `total_words_processed` 是送入合成的词数总和（含失败章节），
/// `elapsed_seconds` 是整个章节循环的耗时
pub fn compute_stats(
    results: &[ChapterAudioResult],
    total_words_processed: usize,
    elapsed_seconds: f64,
) -> ConversionStats {
    let attempts = results.len();
    let successes = results.iter().filter(|r| r.success).count();

    let conversion_success_rate = if attempts == 0 {
        0.0
    } else {
        successes as f64 / attempts as f64 * 100.0
    };

    let processing_efficiency_words_per_second = if elapsed_seconds <= 0.0 {
        0.0
    } else {
        total_words_processed as f64 / elapsed_seconds
    };

    ConversionStats {
        total_chapters_found: attempts,
        chapters_successfully_converted: successes,
        total_words_processed,
        conversion_success_rate,
        total_processing_time_seconds: elapsed_seconds,
        processing_efficiency_words_per_second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(index: u32, duration: f64, size: u64) -> ChapterAudioResult {
        ChapterAudioResult::succeeded(
            index,
            format!("Chapter {}", index),
            "narrator-1",
            format!("/audio/{}.wav", index),
            duration,
            size,
        )
    }

    #[test]
    fn test_assemble_totals() {
        let result = assemble_audiobook(
            vec![
                ok(1, 10.0, 1000),
                ChapterAudioResult::failed(2, "Chapter 2", "narrator-1", "engine busy"),
                ok(3, 5.5, 500),
            ],
            24000,
            "wav",
        );

        assert_eq!(result.chapter_count, 3);
        assert!((result.total_duration_seconds - 15.5).abs() < 1e-9);
        assert_eq!(result.total_size_bytes, 1500);
        assert_eq!(result.sample_rate, 24000);
        assert_eq!(result.format, "wav");
    }

    #[test]
    fn test_stats_all_success() {
        let results = vec![ok(1, 1.0, 10), ok(2, 1.0, 10)];
        let stats = compute_stats(&results, 100, 4.0);
        assert_eq!(stats.conversion_success_rate, 100.0);
        assert_eq!(stats.chapters_successfully_converted, 2);
        assert_eq!(stats.processing_efficiency_words_per_second, 25.0);
    }

    #[test]
    fn test_stats_partial_failure_rate() {
        // 4 章失败 1 章 → 75%
        let results = vec![
            ok(1, 1.0, 10),
            ChapterAudioResult::failed(2, "Chapter 2", "narrator-1", "timeout"),
            ok(3, 1.0, 10),
            ok(4, 1.0, 10),
        ];
        let stats = compute_stats(&results, 40, 2.0);
        assert_eq!(stats.conversion_success_rate, 75.0);
        assert_eq!(stats.chapters_successfully_converted, 3);
        assert_eq!(stats.total_chapters_found, 4);
    }

    #[test]
    fn test_stats_zero_attempts_guard() {
        let stats = compute_stats(&[], 0, 1.0);
        assert_eq!(stats.conversion_success_rate, 0.0);
    }

    #[test]
    fn test_stats_zero_elapsed_guard() {
        let results = vec![ok(1, 1.0, 10)];
        let stats = compute_stats(&results, 100, 0.0);
        assert_eq!(stats.processing_efficiency_words_per_second, 0.0);
    }
}
