//! 纯文本提取 - UTF-8 宽容解码 + 行尾规范化

use crate::application::ports::ExtractError;
use crate::domain::NormalizedText;

use super::cleanup::clean_block;

/// 从纯文本字节提取规范化文本。整个文件作为单个块
pub fn extract_txt(data: &[u8]) -> Result<NormalizedText, ExtractError> {
    let text = String::from_utf8_lossy(data);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    Ok(NormalizedText::new(vec![clean_block(&normalized)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_normalized() {
        let result = extract_txt(b"line one\r\nline two\rline three").unwrap();
        assert_eq!(result.blocks()[0], "line one\nline two\nline three");
    }

    #[test]
    fn test_invalid_utf8_is_lossy_not_fatal() {
        let result = extract_txt(&[b'h', b'i', 0xFF, b'!']).unwrap();
        assert!(result.blocks()[0].starts_with("hi"));
    }

    #[test]
    fn test_empty_input_yields_blank_text() {
        let result = extract_txt(b"").unwrap();
        assert!(result.is_blank());
    }
}
