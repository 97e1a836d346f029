//! Tier Policy - 访问层级内容截断策略
//!
//! 根据调用方层级（sample / free / premium）限制转换的章节数量
//! 与每章词数。纯函数、无副作用、完全确定，保证同一文档在同一
//! 层级下的预览结果可复现。
//!
//! 具体数值来自配置而非硬编码，详见 config/types.rs 的 TiersConfig

use serde::{Deserialize, Serialize};

use crate::domain::chapter::{count_words, Chapter};

/// 层级限额
///
/// 0 表示不限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// 最多保留的章节数
    pub max_chapters: usize,
    /// 每章最多保留的词数
    pub max_words_per_chapter: usize,
}

impl TierLimits {
    /// 不限制任何内容
    pub const UNBOUNDED: TierLimits = TierLimits {
        max_chapters: 0,
        max_words_per_chapter: 0,
    };

    pub fn new(max_chapters: usize, max_words_per_chapter: usize) -> Self {
        Self {
            max_chapters,
            max_words_per_chapter,
        }
    }
}

/// 层级限额表
///
/// 层级名 → 限额的固定查找表。默认值 sample 5×50、free 10×250、
/// premium 不限；可被配置覆盖
#[derive(Debug, Clone)]
pub struct TierCatalog {
    limits: std::collections::HashMap<String, TierLimits>,
}

impl Default for TierCatalog {
    fn default() -> Self {
        let mut limits = std::collections::HashMap::new();
        limits.insert("sample".to_string(), TierLimits::new(5, 50));
        limits.insert("free".to_string(), TierLimits::new(10, 250));
        limits.insert("premium".to_string(), TierLimits::UNBOUNDED);
        Self { limits }
    }
}

impl TierCatalog {
    pub fn new(limits: std::collections::HashMap<String, TierLimits>) -> Self {
        Self { limits }
    }

    /// 查找层级限额，未知层级名返回 None
    pub fn lookup(&self, tier: &str) -> Option<TierLimits> {
        self.limits.get(tier).copied()
    }
}

/// 应用层级策略
///
/// 保留前 `max_chapters` 章（不重排），每章正文截断到前
/// `max_words_per_chapter` 个词并重新计算词数。章节索引保持
/// 截断前的连续编号
pub fn apply_tier(chapters: Vec<Chapter>, limits: &TierLimits) -> Vec<Chapter> {
    let keep = if limits.max_chapters == 0 {
        chapters.len()
    } else {
        limits.max_chapters.min(chapters.len())
    };

    chapters
        .into_iter()
        .take(keep)
        .map(|ch| truncate_chapter(ch, limits.max_words_per_chapter))
        .collect()
}

/// 截断单章正文到词数上限
///
/// 在词边界截断；若保留窗口内存在句末标点且其位置不早于上限的
/// 70%，则优先在句末截断，避免音频在半句处戛然而止。词数上限
/// 始终是硬约束
fn truncate_chapter(chapter: Chapter, max_words: usize) -> Chapter {
    if max_words == 0 || chapter.word_count <= max_words {
        return chapter;
    }

    let words: Vec<&str> = chapter.body.split_whitespace().collect();
    let kept = &words[..max_words];
    let mut body = kept.join(" ");

    // 从截断窗口尾部向前找句末标点，保留词数不得低于上限的 70%
    let min_keep = (max_words * 7 / 10).max(1);
    for i in (min_keep - 1..max_words).rev() {
        let w = kept[i];
        if w.ends_with('.') || w.ends_with('!') || w.ends_with('?') {
            body = kept[..=i].join(" ");
            break;
        }
    }

    let word_count = count_words(&body);
    Chapter {
        index: chapter.index,
        title: chapter.title,
        body,
        word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chapters(n: usize, words_each: usize) -> Vec<Chapter> {
        (1..=n)
            .map(|i| {
                let body = vec!["word"; words_each].join(" ");
                Chapter::new(i as u32, format!("Chapter {}", i), body)
            })
            .collect()
    }

    #[test]
    fn test_chapter_count_capped() {
        let limits = TierLimits::new(5, 50);
        let result = apply_tier(make_chapters(12, 10), &limits);
        assert_eq!(result.len(), 5);
        // 原始顺序保持不变
        assert_eq!(result[0].title, "Chapter 1");
        assert_eq!(result[4].title, "Chapter 5");
    }

    #[test]
    fn test_word_count_capped() {
        let limits = TierLimits::new(10, 50);
        let result = apply_tier(make_chapters(3, 200), &limits);
        assert_eq!(result.len(), 3);
        for ch in &result {
            assert!(ch.word_count <= 50);
            assert_eq!(ch.word_count, ch.body.split_whitespace().count());
        }
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let result = apply_tier(make_chapters(20, 500), &TierLimits::UNBOUNDED);
        assert_eq!(result.len(), 20);
        assert_eq!(result[7].word_count, 500);
    }

    #[test]
    fn test_idempotent_and_pure() {
        let limits = TierLimits::new(2, 5);
        let chapters = make_chapters(4, 20);
        let once = apply_tier(chapters.clone(), &limits);
        let twice = apply_tier(once.clone(), &limits);
        assert_eq!(once, twice);

        // 相同输入产生相同输出
        let again = apply_tier(chapters, &limits);
        assert_eq!(once, again);
    }

    #[test]
    fn test_truncation_prefers_sentence_boundary() {
        let body = "One two three four five six seven. Eight nine ten eleven twelve";
        let chapter = Chapter::new(1, "Chapter 1", body);
        let result = apply_tier(vec![chapter], &TierLimits::new(0, 10));

        // 句号在第 7 词（>= 70% 窗口），应在此截断
        assert_eq!(result[0].body, "One two three four five six seven.");
        assert_eq!(result[0].word_count, 7);
    }

    #[test]
    fn test_truncation_hard_cap_without_boundary() {
        let body = vec!["word"; 100].join(" ");
        let chapter = Chapter::new(1, "Chapter 1", body);
        let result = apply_tier(vec![chapter], &TierLimits::new(0, 30));
        assert_eq!(result[0].word_count, 30);
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog = TierCatalog::default();
        assert_eq!(catalog.lookup("sample"), Some(TierLimits::new(5, 50)));
        assert_eq!(catalog.lookup("free"), Some(TierLimits::new(10, 250)));
        assert_eq!(catalog.lookup("premium"), Some(TierLimits::UNBOUNDED));
        assert_eq!(catalog.lookup("platinum"), None);
    }

    #[test]
    fn test_short_chapter_untouched() {
        let chapter = Chapter::new(1, "Chapter 1", "only four words here");
        let result = apply_tier(vec![chapter.clone()], &TierLimits::new(5, 50));
        assert_eq!(result[0], chapter);
    }
}
