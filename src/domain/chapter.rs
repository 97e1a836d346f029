//! Chapter Context - 章节实体
//!
//! 章节是 TTS 合成的基本单位

use serde::{Deserialize, Serialize};

/// 章节
///
/// 不变量:
/// - `index` 从 1 开始，在同一文档内严格递增且连续
/// - `word_count` 等于 `body` 按空白切分的 token 数
/// - 经层级策略截断之后不再变更
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub index: u32,
    pub title: String,
    pub body: String,
    pub word_count: usize,
}

impl Chapter {
    /// 创建章节，word_count 自动计算
    pub fn new(index: u32, title: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let word_count = count_words(&body);
        Self {
            index,
            title: title.into(),
            body,
            word_count,
        }
    }
}

/// 按空白切分统计词数
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
