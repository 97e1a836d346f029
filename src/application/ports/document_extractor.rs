//! Document Extractor Port - 文档文本提取抽象

use thiserror::Error;

use crate::domain::{DocumentFormat, NormalizedText};

/// 文档提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 声明的格式不受支持
    #[error("UnsupportedFormat: {0}")]
    UnsupportedFormat(String),
    /// 文档损坏或无法提取出任何文本
    #[error("CorruptDocument: {0}")]
    CorruptDocument(String),
}

/// 由 MIME 类型与文件名解析文档格式。MIME 优先，扩展名兜底
pub fn resolve_format(mime_type: &str, filename: &str) -> Result<DocumentFormat, ExtractError> {
    DocumentFormat::from_declared(mime_type, Some(filename)).ok_or_else(|| {
        ExtractError::UnsupportedFormat(format!(
            "unsupported document type (mime: {}, filename: {}); expected PDF, EPUB or TXT",
            mime_type, filename
        ))
    })
}

/// 文档提取端口。同步接口，调用方负责放入阻塞上下文
pub trait DocumentExtractorPort: Send + Sync {
    /// 按声明格式从原始字节提取规范化文本
    fn extract(&self, data: &[u8], format: DocumentFormat) -> Result<NormalizedText, ExtractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_by_mime() {
        assert_eq!(
            resolve_format("application/pdf", "whatever.bin").unwrap(),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_resolve_format_by_extension_fallback() {
        assert_eq!(
            resolve_format("application/octet-stream", "book.epub").unwrap(),
            DocumentFormat::Epub
        );
    }

    #[test]
    fn test_resolve_format_unknown_is_unsupported() {
        let err = resolve_format("image/png", "cover.png").unwrap_err();
        assert!(err.to_string().contains("UnsupportedFormat"));
    }
}
