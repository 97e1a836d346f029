//! Document Extractor - 多格式文档文本提取
//!
//! 按 DocumentFormat 分派到具体格式解析器，统一产出 NormalizedText。
//! 任何格式提取后若文本完全空白，视为损坏文档

mod cleanup;
mod epub;
mod pdf;
mod txt;

use crate::application::ports::{DocumentExtractorPort, ExtractError};
use crate::domain::{DocumentFormat, NormalizedText};

/// 组合式文档提取器，实现 DocumentExtractorPort
pub struct FormatDocumentExtractor;

impl FormatDocumentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FormatDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractorPort for FormatDocumentExtractor {
    fn extract(&self, data: &[u8], format: DocumentFormat) -> Result<NormalizedText, ExtractError> {
        let text = match format {
            DocumentFormat::Pdf => pdf::extract_pdf(data)?,
            DocumentFormat::Epub => epub::extract_epub(data)?,
            DocumentFormat::Txt => txt::extract_txt(data)?,
        };

        if text.is_blank() {
            return Err(ExtractError::CorruptDocument(format!(
                "No text content could be extracted from {} document",
                format.as_str()
            )));
        }

        tracing::debug!(
            format = format.as_str(),
            blocks = text.block_count(),
            "Document text extracted"
        );
        Ok(text)
    }
}
