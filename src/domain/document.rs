//! Document Context - 文档值类型
//!
//! 上传文档的格式识别与提取后的规范化文本表示

use serde::{Deserialize, Serialize};

/// 支持的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Epub,
    Txt,
}

impl DocumentFormat {
    /// 根据声明的 MIME 类型和文件名推断格式
    ///
    /// MIME 优先，扩展名兜底。两者都无法识别时返回 None，
    /// 由调用方映射为 UnsupportedFormat 错误
    pub fn from_declared(mime_type: &str, filename: Option<&str>) -> Option<Self> {
        match mime_type {
            "application/pdf" => return Some(Self::Pdf),
            "application/epub+zip" => return Some(Self::Epub),
            "text/plain" => return Some(Self::Txt),
            _ => {}
        }

        let name = filename?.to_lowercase();
        if name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if name.ends_with(".epub") {
            Some(Self::Epub)
        } else if name.ends_with(".txt") || name.ends_with(".text") {
            Some(Self::Txt)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Epub => "epub",
            Self::Txt => "txt",
        }
    }
}

/// 规范化文本
///
/// 文档提取后的中间表示：有序文本块序列。
/// 块边界即结构提示（PDF 每页一块，EPUB 每个 spine 文档一块，TXT 整体一块）。
/// 提取失败的页贡献空块，块序与原文档顺序一致。
/// 提取完成后不可变，由章节分割器消费
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    blocks: Vec<String>,
}

impl NormalizedText {
    pub fn new(blocks: Vec<String>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// 是否不含任何可用文本（所有块为空或纯空白）
    pub fn is_blank(&self) -> bool {
        self.blocks.iter().all(|b| b.trim().is_empty())
    }

    /// 按原始顺序拼接为完整文本，块之间以换行分隔
    pub fn join(&self) -> String {
        self.blocks.join("\n")
    }
}
