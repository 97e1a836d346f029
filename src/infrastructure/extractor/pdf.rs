//! PDF Extractor - lopdf 纯 Rust 解析
//!
//! 按页序提取文本，每页一个块。无法提取文本的页（例如扫描图片页）
//! 贡献空块而非报错，部分失败不致命

use lopdf::Document;

use crate::application::ports::ExtractError;
use crate::domain::NormalizedText;

use super::cleanup::clean_block;

/// 从 PDF 字节提取规范化文本
pub fn extract_pdf(data: &[u8]) -> Result<NormalizedText, ExtractError> {
    let doc = Document::load_mem(data)
        .map_err(|e| ExtractError::CorruptDocument(format!("Failed to parse PDF: {}", e)))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractError::CorruptDocument(
            "PDF contains no pages".to_string(),
        ));
    }

    let mut blocks = Vec::with_capacity(pages.len());
    let mut failed_pages = 0usize;

    // get_pages 返回按页码排序的映射，块序即页序
    for (&page_number, _) in pages.iter() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => blocks.push(clean_block(&text)),
            Err(e) => {
                failed_pages += 1;
                tracing::debug!(page = page_number, error = %e, "Page yielded no text");
                blocks.push(String::new());
            }
        }
    }

    if failed_pages > 0 {
        tracing::warn!(
            failed_pages = failed_pages,
            total_pages = blocks.len(),
            "Some PDF pages yielded no extractable text"
        );
    }

    Ok(NormalizedText::new(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_is_corrupt() {
        let err = extract_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
        assert!(err.to_string().contains("CorruptDocument"));
    }

    #[test]
    fn test_empty_input_is_corrupt() {
        assert!(extract_pdf(&[]).is_err());
    }
}
