//! Domain Layer - 领域层
//!
//! 转换流水线的纯领域类型与算法:
//! - document: 文档格式与规范化文本
//! - chapter: 章节实体
//! - segmenter: 启发式章节分割
//! - tier: 访问层级截断策略
//! - audiobook: 合成结果与统计装配

pub mod audiobook;
pub mod chapter;
pub mod document;
pub mod segmenter;
pub mod tier;

pub use audiobook::{
    assemble_audiobook, compute_stats, AudiobookResult, ChapterAudioResult, ConversionStats,
};
pub use chapter::{count_words, Chapter};
pub use document::{DocumentFormat, NormalizedText};
pub use segmenter::{segment_chapters, segment_chapters_default, SegmenterConfig, FALLBACK_TITLE};
pub use tier::{apply_tier, TierCatalog, TierLimits};
