//! 提取文本清理
//!
//! 在分割之前修复常见的提取伪影：独立页码行、跨行断词、
//! 多余空行、弯引号与省略号。注意不能删除全大写短行，
//! 它们可能是章节标题

use regex::Regex;
use std::sync::OnceLock;

fn page_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\d+\s*$").unwrap())
}

fn hyphen_break_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w)-\s*\n\s*(\w)").unwrap())
}

fn excess_blank_lines_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n\s*\n+").unwrap())
}

fn ellipsis_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{4,}").unwrap())
}

/// 清理单个文本块
pub fn clean_block(text: &str) -> String {
    // 跨行断词先于其他按行处理
    let text = hyphen_break_pattern().replace_all(text, "$1$2");
    let text = page_number_pattern().replace_all(&text, "");
    let text = excess_blank_lines_pattern().replace_all(&text, "\n\n");
    let text = ellipsis_pattern().replace_all(&text, "...");

    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{201C}' | '\u{201D}' => cleaned.push('"'),
            '\u{2018}' | '\u{2019}' => cleaned.push('\''),
            _ => cleaned.push(ch),
        }
    }

    cleaned.trim().to_string()
}
