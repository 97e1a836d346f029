//! Conversion Commands - 转换作业命令定义

use uuid::Uuid;

use crate::application::ports::JobStatus;

/// 提交转换命令
#[derive(Debug)]
pub struct SubmitConversionCommand {
    /// 上传的原始文件名
    pub filename: String,
    /// 声明的 MIME 类型
    pub mime_type: String,
    /// 文档原始字节
    pub data: Vec<u8>,
    /// 访问层级名（sample / free / premium）
    pub tier: String,
    /// 音色 ID，缺省时使用配置的默认音色
    pub voice_id: Option<String>,
}

/// 提交转换响应
#[derive(Debug)]
pub struct SubmitConversionResponse {
    pub job_id: Uuid,
    pub title: String,
    pub status: JobStatus,
    /// 层级截断后待合成的章节数
    pub chapter_count: usize,
}

/// 取消转换命令
#[derive(Debug)]
pub struct CancelConversionCommand {
    pub job_id: Uuid,
}
