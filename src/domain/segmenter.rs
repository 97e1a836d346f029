//! Chapter Segmenter - 章节分割器
//!
//! 在规范化文本中启发式检测章节边界，产出有序章节列表。
//!
//! 检测策略:
//! 1. 扫描疑似标题行：短行（默认 60 字符以内），且匹配
//!    "Chapter N" / "Part N" / 编号 / 罗马数字 / 全大写短行之一，
//!    且后随空行或更长的正文行
//! 2. 首个标题之前的内容视为前言（front matter），整体丢弃
//! 3. 相邻标题之间无正文时合并，以后出现的标题为准
//! 4. 全文未检出任何标题时，整体作为单章 "Full Text" 兜底
//!
//! 检测是尽力而为的启发式，不保证召回率；调用方只应依赖结构不变量
//! （索引从 1 连续递增、词数非负）

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::chapter::Chapter;
use crate::domain::document::NormalizedText;

/// 默认标题行最大字符数
pub const DEFAULT_MAX_HEADING_CHARS: usize = 60;

/// 未检出任何标题时的兜底章节标题
pub const FALLBACK_TITLE: &str = "Full Text";

/// 前言关键词：命中的标题不作为章节起点
const SKIP_SECTIONS: &[&str] = &[
    "copyright",
    "dedication",
    "acknowledgment",
    "acknowledgments",
    "foreword",
    "preface",
    "prologue",
    "table of contents",
    "contents",
    "about the author",
    "also by",
    "praise for",
    "publishing information",
    "isbn",
    "library of congress",
    "first edition",
];

/// 分割配置
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// 标题行最大字符数
    pub max_heading_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_heading_chars: DEFAULT_MAX_HEADING_CHARS,
        }
    }
}

/// "Chapter 1" / "Part 2" / "Book III" 等显式章节标记
fn chapter_marker_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(chapter|part|book|section)\s+(\d+|[ivxlcdm]+)\b").unwrap()
    })
}

/// "1. Introduction" 形式的编号小节
fn numbered_section_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+\S").unwrap())
}

/// 独立的罗马数字行（"IV" / "XII."）
fn roman_numeral_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[IVXLCDM]+\.?$").unwrap())
}

/// 全大写短行（含至少一个字母，字母全部大写）
fn is_all_caps_line(line: &str) -> bool {
    let mut has_alpha = false;
    for ch in line.chars() {
        if ch.is_alphabetic() {
            has_alpha = true;
            if !ch.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// 标题文本是否命中前言关键词
fn is_skip_section(title: &str) -> bool {
    let lower = title.to_lowercase();
    SKIP_SECTIONS.iter().any(|kw| lower.contains(kw))
}

/// 判断第 i 行是否为章节标题行，是则返回整理后的标题文本
fn detect_heading(lines: &[&str], i: usize, config: &SegmenterConfig) -> Option<String> {
    let line = lines[i].trim();
    if line.is_empty() || line.chars().count() >= config.max_heading_chars {
        return None;
    }

    let looks_like_heading = chapter_marker_pattern().is_match(line)
        || numbered_section_pattern().is_match(line)
        || roman_numeral_pattern().is_match(line)
        || is_all_caps_line(line);
    if !looks_like_heading {
        return None;
    }

    if is_skip_section(line) {
        return None;
    }

    // 上下文：标题之后应是空行，或比标题更长的正文行。
    // 文档末尾的孤立短行不视为标题
    let followed_ok = match lines.get(i + 1) {
        None => false,
        Some(next) if next.trim().is_empty() => true,
        Some(next) => next.trim().chars().count() > line.chars().count(),
    };
    if !followed_ok {
        return None;
    }

    Some(line.to_string())
}

/// 对规范化文本进行章节分割
///
/// 返回的章节索引从 1 开始连续递增；输入不含任何可用文本时返回空列表
pub fn segment_chapters(text: &NormalizedText, config: &SegmenterConfig) -> Vec<Chapter> {
    let joined = text.join();
    let lines: Vec<&str> = joined.lines().collect();

    let mut headings: Vec<(usize, String)> = Vec::new();
    for i in 0..lines.len() {
        if let Some(title) = detect_heading(&lines, i, config) {
            headings.push((i, title));
        }
    }

    // 兜底：无标题时整体作为单章
    if headings.is_empty() {
        let body = joined.trim();
        if body.is_empty() {
            return Vec::new();
        }
        return vec![Chapter::new(1, FALLBACK_TITLE, body)];
    }

    // 相邻标题之间无正文时合并，前者视为分节标签，后者作为章节标题
    let mut merged: Vec<(usize, String)> = Vec::new();
    for (idx, title) in headings {
        if let Some(&(prev_idx, _)) = merged.last() {
            let has_body = lines[prev_idx + 1..idx].iter().any(|l| !l.trim().is_empty());
            if !has_body {
                merged.pop();
            }
        }
        merged.push((idx, title));
    }

    let mut chapters = Vec::with_capacity(merged.len());
    for (n, (start, title)) in merged.iter().enumerate() {
        let end = merged.get(n + 1).map(|&(e, _)| e).unwrap_or(lines.len());
        let body = lines[start + 1..end].join("\n").trim().to_string();
        chapters.push(Chapter::new(n as u32 + 1, title.clone(), body));
    }

    chapters
}

/// 使用默认配置分割（便捷方法）
pub fn segment_chapters_default(text: &NormalizedText) -> Vec<Chapter> {
    segment_chapters(text, &SegmenterConfig::default())
}
