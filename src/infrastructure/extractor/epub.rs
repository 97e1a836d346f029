//! EPUB Extractor - 按 spine 顺序展开 XHTML 内容
//!
//! 每个 spine 条目转为一个文本块，HTML 经 html2text 转为纯文本

use std::io::Cursor;

use epub::doc::EpubDoc;

use crate::application::ports::ExtractError;
use crate::domain::NormalizedText;

use super::cleanup::clean_block;

/// html2text 渲染宽度。取足够大的值避免人为换行打断句子
const RENDER_WIDTH: usize = 10_000;

/// 从 EPUB 字节提取规范化文本
pub fn extract_epub(data: &[u8]) -> Result<NormalizedText, ExtractError> {
    let mut doc = EpubDoc::from_reader(Cursor::new(data.to_vec()))
        .map_err(|e| ExtractError::CorruptDocument(format!("Failed to parse EPUB: {}", e)))?;

    let spine_len = doc.get_num_pages();
    let mut blocks = Vec::with_capacity(spine_len);

    loop {
        if let Some((content, _mime)) = doc.get_current_str() {
            let text = html2text::from_read(content.as_bytes(), RENDER_WIDTH);
            blocks.push(clean_block(&text));
        } else {
            tracing::debug!("EPUB spine entry yielded no readable content");
            blocks.push(String::new());
        }
        if !doc.go_next() {
            break;
        }
    }

    if blocks.is_empty() {
        return Err(ExtractError::CorruptDocument(
            "EPUB contains no readable spine entries".to_string(),
        ));
    }

    Ok(NormalizedText::new(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_is_corrupt() {
        let err = extract_epub(b"not a zip archive at all").unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
    }
}
