//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 端口定义（DocumentExtractor、TtsEngine、AudioStorage、JobTracker）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{CancelConversionHandler, SubmitConfig, SubmitConversionHandler},
    CancelConversionCommand, SubmitConversionCommand, SubmitConversionResponse,
};

pub use error::ApplicationError;

pub use ports::{
    AudioStorageError, AudioStoragePort, ConversionJob, DocumentExtractorPort, ExtractError,
    JobError, JobStatus, JobTrackerPort, SynthesisRequest, SynthesisResponse, TtsEnginePort,
    TtsError,
};

pub use queries::{
    handlers::{GetChapterAudioHandler, GetJobResultHandler, GetJobStatusHandler, ListJobsHandler},
    GetChapterAudioQuery, GetJobResultQuery, GetJobStatusQuery,
};
